//! reqwest implementation of [`RemoteApi`].

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};

use esbox_core::config::api::ApiConfig;
use esbox_core::error::{AppError, ErrorKind};
use esbox_core::result::AppResult;
use esbox_core::types::{FileId, FolderId};
use esbox_entity::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    User, VerifyEmailRequest,
};
use esbox_entity::telegram::{TelegramAuthResponse, TelegramCodeRequest, TelegramVerifyRequest};
use esbox_entity::{
    CreateFolder, FileAction, Folder, FolderUpdate, Listing, MessageResponse, TrashItem,
};

use crate::api::{ByteStream, CreatedFolder, FileUpload, ListQuery, RemoteApi};
use crate::endpoints;
use crate::error;
use crate::session::TokenStore;

/// HTTP client for the ESBox REST API.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    /// `{base_url}{api_prefix}` without a trailing slash.
    root: String,
    /// Timeout for JSON calls; streams and uploads run without one.
    timeout: Duration,
    tokens: TokenStore,
}

impl HttpApiClient {
    /// Build a client from configuration and a session store.
    pub fn new(config: &ApiConfig, tokens: TokenStore) -> AppResult<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;

        let root = config.root();
        Url::parse(&root).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid API base URL '{root}'"),
                e,
            )
        })?;

        Ok(Self {
            http,
            root,
            timeout: Duration::from_secs(config.timeout_seconds),
            tokens,
        })
    }

    /// The session store this client reads its bearer token from.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        let raw = format!("{}/{}", self.root, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, format!("Invalid request URL '{raw}'"), e)
        })
    }

    /// Start a request with the bearer token attached when signed in.
    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.tokens.get().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> AppResult<T> {
        let builder = self.request(Method::GET, url).await.timeout(self.timeout);
        decode(send(builder).await?).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> AppResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut builder = self
            .request(method, self.url(path)?)
            .await
            .timeout(self.timeout);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        decode(send(builder).await?).await
    }
}

/// Send and turn transport failures and error statuses into [`AppError`].
async fn send(builder: RequestBuilder) -> AppResult<Response> {
    let resp = builder.send().await.map_err(error::from_transport)?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    debug!(%status, "Request rejected by backend");
    Err(error::from_status(status, &body))
}

/// Decode a JSON body; an empty body decodes as `{}`.
async fn decode<T: DeserializeOwned>(resp: Response) -> AppResult<T> {
    let text = resp.text().await.map_err(error::from_transport)?;
    let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
    serde_json::from_str(text).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            "Unexpected response from server",
            e,
        )
    })
}

/// Accept both `{"message", "folder": {...}}` and a bare folder object.
fn parse_created_folder(value: Value) -> CreatedFolder {
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let folder = match value.get("folder") {
        Some(inner) => serde_json::from_value::<Folder>(inner.clone()).ok(),
        None => serde_json::from_value::<Folder>(value).ok(),
    };
    CreatedFolder { message, folder }
}

fn file_name_of(path: &Path, fallback: &str) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(fallback)
        .to_string()
}

#[async_trait]
impl RemoteApi for HttpApiClient {
    async fn register(&self, req: &RegisterRequest) -> AppResult<MessageResponse> {
        self.send_json(Method::POST, endpoints::REGISTER, Some(req)).await
    }

    #[instrument(skip_all, fields(email = %req.email))]
    async fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse> {
        let resp: LoginResponse = self
            .send_json(Method::POST, endpoints::LOGIN, Some(req))
            .await?;
        info!("Signed in");
        Ok(resp)
    }

    async fn logout(&self) -> AppResult<MessageResponse> {
        self.send_json::<(), _>(Method::POST, endpoints::LOGOUT, None)
            .await
    }

    async fn current_user(&self) -> AppResult<User> {
        self.get_json(self.url(endpoints::ME)?).await
    }

    async fn forgot_password(&self, req: &ForgotPasswordRequest) -> AppResult<MessageResponse> {
        self.send_json(Method::POST, endpoints::FORGOT_PASSWORD, Some(req))
            .await
    }

    async fn reset_password(&self, req: &ResetPasswordRequest) -> AppResult<MessageResponse> {
        self.send_json(Method::POST, endpoints::RESET_PASSWORD, Some(req))
            .await
    }

    async fn verify_email(&self, req: &VerifyEmailRequest) -> AppResult<MessageResponse> {
        self.send_json(Method::POST, endpoints::VERIFY_EMAIL, Some(req))
            .await
    }

    #[instrument(skip(self))]
    async fn list(&self, query: ListQuery) -> AppResult<Listing> {
        let mut url = self.url(endpoints::FILES_AND_FOLDERS)?;
        match query {
            ListQuery::Children(Some(parent)) => {
                url.query_pairs_mut()
                    .append_pair("parent_id", &parent.to_string());
            }
            ListQuery::Children(None) => {}
            ListQuery::Starred => {
                url.query_pairs_mut().append_pair("starred", "true");
            }
        }
        self.get_json(url).await
    }

    async fn list_trash(&self) -> AppResult<Listing> {
        self.get_json(self.url(endpoints::TRASH)?).await
    }

    #[instrument(skip_all, fields(name = %req.name))]
    async fn create_folder(&self, req: &CreateFolder) -> AppResult<CreatedFolder> {
        let value: Value = self
            .send_json(Method::POST, endpoints::CREATE_FOLDER, Some(req))
            .await?;
        Ok(parse_created_folder(value))
    }

    async fn update_folder(
        &self,
        id: FolderId,
        update: &FolderUpdate,
    ) -> AppResult<MessageResponse> {
        self.send_json(Method::PATCH, &endpoints::folder(id), Some(update))
            .await
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<MessageResponse> {
        self.send_json::<(), _>(Method::DELETE, &endpoints::folder(id), None)
            .await
    }

    #[instrument(skip_all, fields(name = %upload.name, size = upload.size))]
    async fn upload_file(&self, upload: FileUpload) -> AppResult<MessageResponse> {
        let file = tokio::fs::File::open(&upload.path).await?;
        let total = upload.size;
        let sent = Arc::new(AtomicU64::new(0));
        let progress = upload.progress.clone();

        let stream = tokio_util::io::ReaderStream::new(file).inspect_ok(move |chunk| {
            let len = chunk.len() as u64;
            let so_far = sent.fetch_add(len, Ordering::Relaxed) + len;
            if let Some(report) = &progress {
                report(so_far, total);
            }
        });

        let part = reqwest::multipart::Part::stream_with_length(
            reqwest::Body::wrap_stream(stream),
            total,
        )
        .file_name(file_name_of(&upload.path, &upload.name))
        .mime_str(&upload.mime_type)
        .map_err(|e| AppError::with_source(ErrorKind::Validation, "Invalid MIME type", e))?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("name", upload.name.clone());
        if let Some(parent) = upload.parent_id {
            form = form.text("parent_id", parent.to_string());
        }

        let builder = self
            .request(Method::POST, self.url(endpoints::UPLOAD_FILE)?)
            .await
            .multipart(form);
        let resp = decode(send(builder).await?).await?;
        info!("Upload finished");
        Ok(resp)
    }

    async fn update_file(&self, id: FileId, action: &FileAction) -> AppResult<MessageResponse> {
        self.send_json(Method::PATCH, &endpoints::file(id), Some(action))
            .await
    }

    async fn stream_file(&self, id: FileId) -> AppResult<ByteStream> {
        let builder = self
            .request(Method::GET, self.url(&endpoints::file_view(id))?)
            .await;
        let resp = send(builder).await?;
        let stream = resp.bytes_stream().map_err(error::from_transport);
        Ok(Box::pin(stream))
    }

    fn stream_url(&self, id: FileId) -> String {
        format!("{}/{}", self.root, endpoints::file_view(id))
    }

    async fn restore_trash(&self, item: &TrashItem) -> AppResult<MessageResponse> {
        self.send_json(Method::PATCH, endpoints::TRASH, Some(item))
            .await
    }

    async fn purge_trash(&self, item: &TrashItem) -> AppResult<MessageResponse> {
        let mut url = self.url(endpoints::TRASH)?;
        url.query_pairs_mut()
            .append_pair("item_id", &item.item_id.to_string())
            .append_pair("item_type", &item.item_type.to_string());
        let builder = self
            .request(Method::DELETE, url)
            .await
            .timeout(self.timeout);
        decode(send(builder).await?).await
    }

    async fn telegram_send_code(
        &self,
        req: &TelegramCodeRequest,
    ) -> AppResult<TelegramAuthResponse> {
        self.send_json(Method::POST, endpoints::TELEGRAM_SEND_CODE, Some(req))
            .await
    }

    async fn telegram_verify(
        &self,
        req: &TelegramVerifyRequest,
    ) -> AppResult<TelegramAuthResponse> {
        self.send_json(Method::POST, endpoints::TELEGRAM_VERIFY, Some(req))
            .await
    }
}
