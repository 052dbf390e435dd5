//! Generation history service.
//!
//! History is paginated. Every page fetch returns, besides the page itself, a
//! [`HistoryCursor`] for the following page while the service reports more
//! items. A cursor is consumed by the fetch it is passed to.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    error::{Error, Result},
    http::{decode, HttpClient, NO_QUERY},
    types::VoiceSettings,
};

/// Generation history service.
#[derive(Clone)]
pub struct HistoryService {
    http: Arc<HttpClient>,
}

impl HistoryService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Fetches one page of history.
    ///
    /// Returns the page and, when the service reports more items, a cursor for
    /// the next page carrying the same page size.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let (mut page, mut next) = client.history().list(&HistoryQuery::new().page_size(5)).await?;
    /// print(&page);
    ///
    /// while let Some(cursor) = next {
    ///     (page, next) = client.history().next(cursor).await?;
    ///     print(&page);
    /// }
    /// ```
    pub async fn list(&self, query: &HistoryQuery) -> Result<(HistoryPage, Option<HistoryCursor>)> {
        query.validate()?;
        debug!(
            "fetching history page (page_size={:?}, after={:?})",
            query.page_size, query.start_after
        );

        let body = self.http.get_bytes("/v1/history", query).await?;
        let page: HistoryPage = decode(&body)?;
        let cursor = HistoryCursor::after(query, &page, &body)?;
        Ok((page, cursor))
    }

    /// Fetches the page a cursor points to.
    pub async fn next(
        &self,
        cursor: HistoryCursor,
    ) -> Result<(HistoryPage, Option<HistoryCursor>)> {
        self.list(&cursor.into_query()).await
    }

    /// Returns a stream that walks every page starting at `query`.
    ///
    /// The stream ends after the last page, or after the first error.
    pub fn pages(&self, query: HistoryQuery) -> BoxStream<'static, Result<HistoryPage>> {
        let service = self.clone();
        stream::try_unfold(Some(query), move |state| {
            let service = service.clone();
            async move {
                let Some(query) = state else {
                    return Ok::<_, Error>(None);
                };
                let (page, cursor) = service.list(&query).await?;
                Ok(Some((page, cursor.map(HistoryCursor::into_query))))
            }
        })
        .boxed()
    }

    /// Gets a single history item.
    pub async fn get(&self, history_item_id: &str) -> Result<HistoryItem> {
        let path = format!("/v1/history/{}", history_item_id);
        self.http.get(&path, NO_QUERY).await
    }

    /// Downloads the audio of a history item.
    pub async fn audio(&self, history_item_id: &str) -> Result<Bytes> {
        let path = format!("/v1/history/{}/audio", history_item_id);
        self.http.get_bytes(&path, NO_QUERY).await
    }

    /// Deletes a history item.
    pub async fn delete(&self, history_item_id: &str) -> Result<()> {
        let path = format!("/v1/history/{}", history_item_id);
        self.http.delete(&path).await
    }

    /// Downloads several history items.
    ///
    /// A single id yields the audio file; several yield a zip archive.
    pub async fn download(&self, request: &DownloadHistoryRequest) -> Result<Bytes> {
        if request.history_item_ids.is_empty() {
            return Err(Error::Validation(
                "history_item_ids must be non-empty".to_string(),
            ));
        }
        self.http
            .post_json_bytes("/v1/history/download", NO_QUERY, request)
            .await
    }
}

// ==================== Pagination ====================

/// Parameters of a history page fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// Items per page. The service default applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Fetch items after this history item.
    #[serde(
        default,
        rename = "start_after_history_item_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_after: Option<String>,

    /// Only return items generated with this voice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn start_after(mut self, history_item_id: impl Into<String>) -> Self {
        self.start_after = Some(history_item_id.into());
        self
    }

    pub fn voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == Some(0) {
            return Err(Error::Validation("page_size must be positive".to_string()));
        }
        Ok(())
    }
}

/// Continuation to the next history page.
///
/// Holds the page size and the last item seen. It is not `Clone`: passing it
/// to [`HistoryService::next`] consumes it, so each cursor drives exactly one
/// fetch. Dropping it unused is fine.
#[derive(Debug, PartialEq, Eq)]
pub struct HistoryCursor {
    page_size: Option<u32>,
    start_after: String,
    voice_id: Option<String>,
}

impl HistoryCursor {
    /// Builds the cursor that follows `page`, fetched with `query` and decoded
    /// from `payload`.
    ///
    /// Returns `None` once the service reports no more items.
    pub(crate) fn after(
        query: &HistoryQuery,
        page: &HistoryPage,
        payload: &[u8],
    ) -> Result<Option<Self>> {
        if !page.has_more {
            return Ok(None);
        }
        let start_after = match page.last_history_item_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(Error::decode(
                    "history page",
                    "has_more is set without last_history_item_id",
                    payload,
                ))
            }
        };
        Ok(Some(Self {
            page_size: query.page_size,
            start_after,
            voice_id: query.voice_id.clone(),
        }))
    }

    /// Returns the page size carried to the next fetch.
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Returns the id of the last item of the previous page.
    pub fn start_after(&self) -> &str {
        &self.start_after
    }

    /// Overrides the page size for the next fetch.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Converts the cursor into the query for the next page.
    pub fn into_query(self) -> HistoryQuery {
        HistoryQuery {
            page_size: self.page_size,
            start_after: Some(self.start_after),
            voice_id: self.voice_id,
        }
    }
}

// ==================== Request/Response Types ====================

/// A page of history items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub history: Vec<HistoryItem>,

    #[serde(default)]
    pub last_history_item_id: Option<String>,

    pub has_more: bool,
}

/// A past generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub history_item_id: String,

    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(default)]
    pub voice_id: Option<String>,

    #[serde(default)]
    pub voice_name: Option<String>,

    #[serde(default)]
    pub voice_category: Option<String>,

    #[serde(default)]
    pub model_id: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    /// Generation time as a Unix timestamp.
    #[serde(default)]
    pub date_unix: i64,

    #[serde(default)]
    pub character_count_change_from: i64,

    #[serde(default)]
    pub character_count_change_to: i64,

    #[serde(default)]
    pub content_type: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub settings: Option<VoiceSettings>,

    #[serde(default)]
    pub feedback: Option<Feedback>,

    #[serde(default)]
    pub share_link_id: Option<String>,
}

/// Feedback left on a history item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feedback {
    pub thumbs_up: bool,
    pub feedback: String,
    pub emotions: bool,
    pub inaccurate_clone: bool,
    pub glitches: bool,
    pub audio_quality: bool,
    pub other: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_status: Option<String>,
}

/// Request for downloading history items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadHistoryRequest {
    pub history_item_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[&str], has_more: bool) -> HistoryPage {
        HistoryPage {
            history: ids
                .iter()
                .map(|id| HistoryItem {
                    history_item_id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
            last_history_item_id: ids.last().map(|id| id.to_string()),
            has_more,
        }
    }

    #[test]
    fn test_cursor_carries_page_size() {
        let query = HistoryQuery::new().page_size(5);
        let cursor = HistoryCursor::after(&query, &page(&["a", "b"], true), b"{}")
            .unwrap()
            .expect("cursor");

        assert_eq!(cursor.page_size(), Some(5));
        assert_eq!(cursor.start_after(), "b");

        let next = cursor.into_query();
        assert_eq!(next, HistoryQuery::new().page_size(5).start_after("b"));
    }

    #[test]
    fn test_cursor_override_page_size() {
        let query = HistoryQuery::new().page_size(5).voice_id("v1");
        let cursor = HistoryCursor::after(&query, &page(&["a"], true), b"{}")
            .unwrap()
            .unwrap()
            .with_page_size(20);

        let next = cursor.into_query();
        assert_eq!(next.page_size, Some(20));
        assert_eq!(next.voice_id.as_deref(), Some("v1"));
    }

    #[test]
    fn test_no_cursor_when_exhausted() {
        let query = HistoryQuery::new().page_size(5);
        assert!(HistoryCursor::after(&query, &page(&["a"], false), b"{}").unwrap().is_none());
        assert!(HistoryCursor::after(&query, &page(&[], false), b"{}").unwrap().is_none());
    }

    #[test]
    fn test_has_more_without_last_id_is_decode_error() {
        let query = HistoryQuery::new();
        let payload = br#"{"history":[],"has_more":true}"#;
        match HistoryCursor::after(&query, &page(&[], true), payload) {
            Err(Error::Decode {
                target, fragment, ..
            }) => {
                assert_eq!(target, "history page");
                assert_eq!(fragment, r#"{"history":[],"has_more":true}"#);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            HistoryQuery::new().page_size(0).validate(),
            Err(Error::Validation(_))
        ));
        assert!(HistoryQuery::new().validate().is_ok());
    }

    #[test]
    fn test_query_wire_names() {
        let query = HistoryQuery::new().page_size(5).start_after("abc");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"page_size": 5, "start_after_history_item_id": "abc"})
        );
    }

    #[test]
    fn test_page_decode() {
        let page: HistoryPage = serde_json::from_str(
            r#"{
                "history": [{
                    "history_item_id": "h1",
                    "voice_id": "v1",
                    "text": "hello",
                    "date_unix": 1700000000,
                    "content_type": "audio/mpeg",
                    "state": "created",
                    "feedback": {"thumbs_up": true, "feedback": "", "emotions": false,
                                 "inaccurate_clone": false, "glitches": false,
                                 "audio_quality": true, "other": false}
                }],
                "last_history_item_id": "h1",
                "has_more": false
            }"#,
        )
        .unwrap();

        assert_eq!(page.history.len(), 1);
        assert_eq!(page.history[0].text.as_deref(), Some("hello"));
        assert!(page.history[0].feedback.as_ref().unwrap().thumbs_up);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_requires_has_more() {
        let result = serde_json::from_str::<HistoryPage>(r#"{"history": []}"#);
        assert!(result.is_err());
    }
}
