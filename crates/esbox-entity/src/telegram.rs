//! Telegram account linking envelopes.

use serde::{Deserialize, Serialize};

/// Body of the send-code call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramCodeRequest {
    /// Phone number in international format.
    pub phone: String,
}

/// Body of the verify-code call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramVerifyRequest {
    /// Code received in the Telegram app.
    pub code: String,
}

/// Outcome of either linking step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelegramAuthResponse {
    /// Whether the step succeeded.
    #[serde(default)]
    pub success: bool,
    /// Backend message.
    #[serde(default)]
    pub message: String,
    /// Whether a second factor password is still required.
    #[serde(default)]
    pub requires_2fa: bool,
    /// Linked Telegram account details, when available.
    #[serde(default)]
    pub telegram_user: Option<serde_json::Value>,
}
