//! Persistence adapter. One enum fronts both the local SQLite store and the
//! remote REST service, so the app never branches on where palettes live.

use crate::config::{BackendKind, Config};
use crate::storage::{Storage, StorageHandle};
use anyhow::Context;
use reqwest::StatusCode;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};

pub mod api;
pub mod models;

pub use api::ApiClient;
use models::{FieldError, PaletteDraft, SavedPalette, User};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("not signed in")]
    Unauthorized,
    #[error("palette not found")]
    NotFound,
    #[error("{}", join_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    RateLimited(String),
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(body_message(body)),
            StatusCode::BAD_REQUEST => {
                let details = serde_json::from_str::<serde_json::Value>(body)
                    .ok()
                    .and_then(|v| v.get("details").cloned())
                    .and_then(|d| serde_json::from_value::<Vec<FieldError>>(d).ok())
                    .filter(|d| !d.is_empty());
                Self::Validation(details.unwrap_or_else(|| {
                    vec![FieldError {
                        path: String::new(),
                        message: body_message(body),
                    }]
                }))
            }
            s => Self::Server {
                status: s.as_u16(),
                body: body_message(body),
            },
        }
    }

    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Server { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The server answers with plain text, `{"error": ..}` or `{"message": ..}`.
fn body_message(body: &str) -> String {
    let trimmed = body.trim();
    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| trimmed.to_string())
}

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[derive(Debug, Clone)]
pub enum Backend {
    Local { storage: StorageHandle, user: User },
    Remote(ApiClient),
}

impl Backend {
    pub fn local(storage: StorageHandle, local_user: &str) -> Self {
        Self::Local {
            storage,
            user: User {
                id: local_user.to_string(),
                email: String::new(),
            },
        }
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let backend = match cfg.backend.kind {
            BackendKind::Local => Self::local(
                StorageHandle::new(cfg.database_path()),
                &cfg.account.local_user,
            ),
            BackendKind::Remote => {
                ApiClient::with_session_file(&cfg.backend.base_url, &cfg.session_path())
                    .map(Self::Remote)
                    .with_context(|| format!("connect to {}", cfg.backend.base_url))?
            }
        };
        debug!(kind = backend.kind(), "backend ready");
        Ok(backend)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Remote(_) => "remote",
        }
    }

    pub async fn current_user(&self) -> Result<Option<User>, BackendError> {
        match self {
            Self::Local { user, .. } => Ok(Some(user.clone())),
            Self::Remote(api) => api.current_user().await,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, BackendError> {
        match self {
            Self::Local { user, .. } => Ok(user.clone()),
            Self::Remote(api) => {
                let user = api.login(email, password).await?;
                info!(user = %user.id, "signed in");
                Ok(user)
            }
        }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, BackendError> {
        match self {
            Self::Local { user, .. } => Ok(user.clone()),
            Self::Remote(api) => {
                let user = api.register(email, password).await?;
                info!(user = %user.id, "registered");
                Ok(user)
            }
        }
    }

    pub async fn logout(&self) -> Result<(), BackendError> {
        match self {
            Self::Local { .. } => Ok(()),
            Self::Remote(api) => api.logout().await,
        }
    }

    pub async fn list_palettes(&self) -> Result<Vec<SavedPalette>, BackendError> {
        match self {
            Self::Local { storage, user } => {
                let owner = user.id.clone();
                blocking(storage, move |s| s.list_palettes(&owner)).await
            }
            Self::Remote(api) => api.list_palettes().await,
        }
    }

    pub async fn latest_palette(&self) -> Result<Option<SavedPalette>, BackendError> {
        match self {
            Self::Local { storage, user } => {
                let owner = user.id.clone();
                blocking(storage, move |s| s.latest_palette(&owner)).await
            }
            Self::Remote(api) => api.latest_palette().await,
        }
    }

    pub async fn create_palette(&self, draft: &PaletteDraft) -> Result<SavedPalette, BackendError> {
        let draft = checked(draft)?;
        debug!(name = %draft.name, colors = draft.colors.len(), "create palette");
        match self {
            Self::Local { storage, user } => {
                let owner = user.id.clone();
                blocking(storage, move |s| s.create_palette(&owner, &draft, now_unix())).await
            }
            Self::Remote(api) => api.create_palette(&draft).await,
        }
    }

    pub async fn update_palette(
        &self,
        id: i64,
        draft: &PaletteDraft,
    ) -> Result<SavedPalette, BackendError> {
        let draft = checked(draft)?;
        debug!(id, name = %draft.name, "update palette");
        match self {
            Self::Local { storage, user } => {
                let owner = user.id.clone();
                blocking(storage, move |s| s.update_palette(&owner, id, &draft, now_unix()))
                    .await?
                    .ok_or(BackendError::NotFound)
            }
            Self::Remote(api) => api.update_palette(id, &draft).await,
        }
    }

    pub async fn delete_palette(&self, id: i64) -> Result<(), BackendError> {
        debug!(id, "delete palette");
        match self {
            Self::Local { storage, user } => {
                let owner = user.id.clone();
                let deleted = blocking(storage, move |s| s.delete_palette(&owner, id)).await?;
                if deleted { Ok(()) } else { Err(BackendError::NotFound) }
            }
            Self::Remote(api) => api.delete_palette(id).await,
        }
    }

    /// Park a palette until the user signs in.
    pub async fn stage_palette(&self, draft: &PaletteDraft) -> Result<(), BackendError> {
        let draft = checked(draft)?;
        match self {
            Self::Local { storage, .. } => {
                blocking(storage, move |s| s.stage_palette(&draft, now_unix())).await
            }
            Self::Remote(api) => api.stage_palette(&draft).await,
        }
    }

    pub async fn staged_palette(&self) -> Result<Option<PaletteDraft>, BackendError> {
        match self {
            Self::Local { storage, .. } => blocking(storage, |s| s.staged_palette()).await,
            Self::Remote(api) => api.staged_palette().await,
        }
    }

    pub async fn clear_staged_palette(&self) -> Result<(), BackendError> {
        match self {
            Self::Local { storage, .. } => blocking(storage, |s| s.clear_staged_palette()).await,
            Self::Remote(api) => api.clear_staged_palette().await,
        }
    }

    /// Save the staged palette (if any) for the signed-in user, then clear it.
    pub async fn adopt_staged_palette(&self) -> Result<Option<SavedPalette>, BackendError> {
        let Some(draft) = self.staged_palette().await? else {
            return Ok(None);
        };
        if self.current_user().await?.is_none() {
            return Err(BackendError::Unauthorized);
        }
        let saved = self.create_palette(&draft).await?;
        self.clear_staged_palette().await?;
        info!(id = saved.id, "adopted staged palette");
        Ok(Some(saved))
    }
}

fn checked(draft: &PaletteDraft) -> Result<PaletteDraft, BackendError> {
    let draft = draft.normalized();
    draft.validate().map_err(BackendError::Validation)?;
    Ok(draft)
}

async fn blocking<T, F>(storage: &StorageHandle, f: F) -> Result<T, BackendError>
where
    T: Send + 'static,
    F: FnOnce(&Storage) -> anyhow::Result<T> + Send + 'static,
{
    let handle = storage.clone();
    tokio::task::spawn_blocking(move || {
        let s = handle.open()?;
        f(&s)
    })
    .await
    .map_err(|e| BackendError::Storage(e.to_string()))?
    .map_err(|e| BackendError::Storage(format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_db(tag: &str) -> PathBuf {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        std::env::temp_dir().join(format!(
            "huewave-test-{tag}-{}-{nanos}.sqlite3",
            std::process::id()
        ))
    }

    fn draft(name: &str, colors: &[&str]) -> PaletteDraft {
        PaletteDraft {
            name: name.into(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_status_validation_details() {
        let body = r#"{"error":"Invalid palette data","details":[{"path":"name","message":"Name is required"}]}"#;
        let err = BackendError::from_status(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err,
            BackendError::Validation(vec![FieldError {
                path: "name".into(),
                message: "Name is required".into(),
            }])
        );
        assert_eq!(err.to_string(), "name: Name is required");
    }

    #[test]
    fn test_from_status_plain_text() {
        let err = BackendError::from_status(StatusCode::BAD_REQUEST, "Email already exists");
        assert_eq!(err.to_string(), "Email already exists");

        let err = BackendError::from_status(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many login attempts. Please try again in 15 minutes.",
        );
        assert!(matches!(err, BackendError::RateLimited(ref m) if m.contains("15 minutes")));
        assert!(!err.should_retry());
    }

    #[test]
    fn test_retry_classification() {
        assert!(BackendError::from_status(StatusCode::BAD_GATEWAY, "").should_retry());
        assert!(BackendError::Transport("reset".into()).should_retry());
        assert!(!BackendError::from_status(StatusCode::UNAUTHORIZED, "Not logged in").should_retry());
        assert_eq!(
            BackendError::from_status(StatusCode::NOT_FOUND, "{\"error\":\"Palette not found\"}"),
            BackendError::NotFound
        );
    }

    #[test]
    fn test_remote_from_config_restores_session() {
        let dir = std::env::temp_dir().join(format!(
            "huewave-remote-{}-{}",
            std::process::id(),
            OffsetDateTime::now_utc().unix_timestamp_nanos()
        ));
        let mut cfg = Config::default();
        cfg.paths.data_dir = dir.clone();
        cfg.backend.kind = BackendKind::Remote;
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(cfg.session_path(), "connect.sid=abc").unwrap();

        let Backend::Remote(api) = Backend::from_config(&cfg).unwrap() else {
            panic!("expected remote backend");
        };
        assert_eq!(api.session_cookies().as_deref(), Some("connect.sid=abc"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_local_crud() {
        let path = temp_db("crud");
        let backend = Backend::local(StorageHandle::new(&path), "local");

        assert_eq!(backend.current_user().await.unwrap().unwrap().id, "local");
        let saved = backend
            .create_palette(&draft(" Mint ", &["#abc", "#00FF00"]))
            .await
            .unwrap();
        assert_eq!(saved.name, "Mint");
        assert_eq!(saved.colors, vec!["#AABBCC".to_string(), "#00FF00".to_string()]);

        let updated = backend
            .update_palette(saved.id, &draft("Mint Chip", &["#98FF98"]))
            .await
            .unwrap();
        assert_eq!(updated.name, "Mint Chip");
        assert_eq!(backend.latest_palette().await.unwrap().unwrap().id, saved.id);

        backend.delete_palette(saved.id).await.unwrap();
        assert_eq!(
            backend.delete_palette(saved.id).await,
            Err(BackendError::NotFound)
        );
        assert!(backend.list_palettes().await.unwrap().is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_local_rejects_invalid_draft() {
        let path = temp_db("invalid");
        let backend = Backend::local(StorageHandle::new(&path), "local");
        let err = backend.create_palette(&draft("", &["#FF0000"])).await.unwrap_err();
        assert!(matches!(err, BackendError::Validation(ref f) if f[0].path == "name"));
        assert_eq!(
            backend.update_palette(42, &draft("x", &["#FF0000"])).await,
            Err(BackendError::NotFound)
        );
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_adopt_staged_palette() {
        let path = temp_db("adopt");
        let backend = Backend::local(StorageHandle::new(&path), "local");

        assert!(backend.adopt_staged_palette().await.unwrap().is_none());

        backend
            .stage_palette(&draft("Peach", &["#FFDAB9"]))
            .await
            .unwrap();
        let adopted = backend.adopt_staged_palette().await.unwrap().unwrap();
        assert_eq!(adopted.name, "Peach");
        assert!(backend.staged_palette().await.unwrap().is_none());
        assert_eq!(backend.list_palettes().await.unwrap().len(), 1);

        let _ = std::fs::remove_file(path);
    }
}
