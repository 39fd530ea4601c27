//! Telegram account linking.

use std::sync::Arc;

use tracing::info;

use esbox_client::RemoteApi;
use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_entity::telegram::{TelegramAuthResponse, TelegramCodeRequest, TelegramVerifyRequest};

use crate::notification::NotificationCenter;

/// Two-step phone/code flow that links a Telegram account.
#[derive(Debug, Clone)]
pub struct TelegramLink {
    api: Arc<dyn RemoteApi>,
    notifications: NotificationCenter,
}

impl TelegramLink {
    /// Creates a new linking flow.
    pub fn new(api: Arc<dyn RemoteApi>, notifications: NotificationCenter) -> Self {
        Self { api, notifications }
    }

    /// Ask the backend to send a login code to `phone`.
    pub async fn send_code(&self, phone: &str) -> AppResult<TelegramAuthResponse> {
        let phone: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        if phone.is_empty() {
            return Err(AppError::validation("Enter your phone number"));
        }
        let resp = self
            .api
            .telegram_send_code(&TelegramCodeRequest { phone })
            .await?;
        self.report(&resp, "Code sent");
        Ok(resp)
    }

    /// Submit the code received in the Telegram app.
    pub async fn verify_code(&self, code: &str) -> AppResult<TelegramAuthResponse> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::validation("Enter the code sent to Telegram"));
        }
        let resp = self
            .api
            .telegram_verify(&TelegramVerifyRequest {
                code: code.to_string(),
            })
            .await?;
        if resp.success {
            info!(requires_2fa = resp.requires_2fa, "Telegram account verified");
        }
        self.report(&resp, "Telegram linked");
        Ok(resp)
    }

    fn report(&self, resp: &TelegramAuthResponse, fallback: &str) {
        let message = if resp.message.trim().is_empty() {
            fallback.to_string()
        } else {
            resp.message.clone()
        };
        if resp.success {
            self.notifications.success(message);
        } else {
            self.notifications.error(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::ToastLevel;
    use crate::testing::{FakeApi, harness};

    #[tokio::test]
    async fn test_empty_inputs_rejected() {
        let api = FakeApi::new();
        let h = harness(&api);
        assert!(h.telegram.send_code("   ").await.unwrap_err().is_validation());
        assert!(h.telegram.verify_code("").await.unwrap_err().is_validation());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_link_flow() {
        let api = FakeApi::new();
        let h = harness(&api);
        let sent = h.telegram.send_code("+1 555 0100").await.unwrap();
        assert!(sent.success);
        assert_eq!(api.calls().last().map(String::as_str), Some("telegram_send_code:+15550100"));

        let linked = h.telegram.verify_code(" 12345 ").await.unwrap();
        assert!(linked.success);
        let toasts = h.notifications.drain();
        assert_eq!(toasts.len(), 2);
        assert!(toasts.iter().all(|t| t.level == ToastLevel::Success));
    }
}
