//! HTTP client implementation for ElevenLabs API.

use std::time::Duration;

use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt, TryStreamExt};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    Client as ReqwestClient, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{
    error::{Error, Result},
    multipart::MultipartBody,
};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "xi-api-key";

const USER_AGENT_VALUE: &str = "giztoy-elevenlabs-rust/1.0";

/// Empty query string.
pub const NO_QUERY: &[(&str, &str)] = &[];

/// A stream of raw body chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// HTTP client for ElevenLabs API.
///
/// `timeout` bounds every buffered call end to end. Streamed bodies are only
/// bounded per read, so long audio is not cut off partway.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub fn new(base_url: String, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| Error::Config(format!("api_key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
            timeout,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET and decodes the JSON response.
    pub async fn get<R, Q>(&self, path: &str, query: &Q) -> Result<R>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let body = self.get_bytes(path, query).await?;
        decode(&body)
    }

    /// Performs a GET and returns the raw response body.
    pub async fn get_bytes<Q>(&self, path: &str, query: &Q) -> Result<Bytes>
    where
        Q: Serialize + ?Sized,
    {
        let request = self.builder(Method::GET, path).query(query);
        self.send(Method::GET, path, request).await?.bytes().await.map_err(Error::from)
    }

    /// Performs a POST with a JSON body and decodes the JSON response.
    pub async fn post_json<T, R>(&self, path: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.post_json_bytes(path, NO_QUERY, body).await?;
        decode(&body)
    }

    /// Performs a POST with a JSON body and returns the raw response body.
    pub async fn post_json_bytes<Q, T>(&self, path: &str, query: &Q, body: &T) -> Result<Bytes>
    where
        Q: Serialize + ?Sized,
        T: Serialize + ?Sized,
    {
        let request = self.builder(Method::POST, path).query(query).json(body);
        self.send(Method::POST, path, request).await?.bytes().await.map_err(Error::from)
    }

    /// Performs a POST with a JSON body and streams the response body.
    pub async fn post_json_stream<Q, T>(
        &self,
        path: &str,
        query: &Q,
        body: &T,
    ) -> Result<ByteStream>
    where
        Q: Serialize + ?Sized,
        T: Serialize + ?Sized,
    {
        let request = self
            .stream_builder(Method::POST, path)
            .query(query)
            .json(body);
        let response = self.send(Method::POST, path, request).await?;
        Ok(response.bytes_stream().map_err(Error::from).boxed())
    }

    /// Posts a multipart form and returns the raw response body.
    pub async fn post_multipart_bytes(&self, path: &str, body: MultipartBody) -> Result<Bytes> {
        debug!("multipart parts: {}", body.parts().len());
        let request = self
            .builder(Method::POST, path)
            .header(ACCEPT, "application/json")
            .multipart(body.into_form());
        self.send(Method::POST, path, request).await?.bytes().await.map_err(Error::from)
    }

    /// Posts a multipart form and decodes the JSON response.
    pub async fn post_multipart<R>(&self, path: &str, body: MultipartBody) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let body = self.post_multipart_bytes(path, body).await?;
        decode(&body)
    }

    /// Performs a DELETE and discards the response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let request = self.builder(Method::DELETE, path);
        self.send(Method::DELETE, path, request).await?;
        Ok(())
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        self.stream_builder(method, path).timeout(self.timeout)
    }

    fn stream_builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url).headers(self.headers.clone())
    }

    /// Sends a request and turns non-2xx responses into API errors.
    async fn send(&self, method: Method, path: &str, request: RequestBuilder) -> Result<Response> {
        debug!("{} {}", method, path);

        let response = request.send().await?;
        let status = response.status();
        debug!("{} {} -> {}", method, path, status.as_u16());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        debug!("error body: {} bytes", body.len());
        Err(Error::from_response(status.as_u16(), &body))
    }
}

/// Decodes a JSON body, reporting the target type on failure.
pub(crate) fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    serde_json::from_slice(body).map_err(|e| Error::decode(short_type_name::<R>(), e, body))
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    match full.find('<') {
        Some(generic) => full[..generic].rsplit("::").next().unwrap_or(full),
        None => full.rsplit("::").next().unwrap_or(full),
    }
}
