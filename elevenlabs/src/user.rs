//! Account information service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    error::Result,
    http::{HttpClient, NO_QUERY},
};

/// Account information service.
pub struct UserService {
    http: Arc<HttpClient>,
}

impl UserService {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Gets the account owning the API key.
    pub async fn get(&self) -> Result<User> {
        self.http.get("/v1/user", NO_QUERY).await
    }

    /// Gets the subscription of the account.
    pub async fn subscription(&self) -> Result<Subscription> {
        self.http.get("/v1/user/subscription", NO_QUERY).await
    }
}

/// The account owning the API key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub subscription: Subscription,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default)]
    pub is_new_user: bool,

    #[serde(default)]
    pub is_onboarding_complete: bool,

    #[serde(default)]
    pub can_use_delayed_payment_methods: bool,

    /// The API key itself; never printed by the CLI.
    #[serde(default, skip_serializing)]
    pub xi_api_key: Option<String>,
}

/// Subscription tier and usage counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    pub tier: String,
    pub status: String,
    pub currency: Option<String>,
    pub character_count: i64,
    pub character_limit: i64,
    pub next_character_count_reset_unix: i64,
    pub voice_limit: i64,
    pub professional_voice_limit: i64,
    pub max_voice_add_edits: i64,
    pub voice_add_edit_counter: i64,
    pub allowed_to_extend_character_limit: bool,
    pub can_extend_character_limit: bool,
    pub can_extend_voice_limit: bool,
    pub can_use_instant_voice_cloning: bool,
    pub can_use_professional_voice_cloning: bool,
    pub has_open_invoices: bool,
    pub next_invoice: Option<Invoice>,
}

impl Subscription {
    /// Returns the characters left in the current period.
    pub fn remaining_characters(&self) -> i64 {
        (self.character_limit - self.character_count).max(0)
    }
}

/// Upcoming invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    pub amount_due_cents: i64,
    pub next_payment_attempt_unix: i64,
}
