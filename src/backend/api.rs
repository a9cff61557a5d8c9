use super::BackendError;
use super::models::{PaletteDraft, SavedPalette, User};
use backon::{ExponentialBuilder, Retryable};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// REST client for the HueWave web service.
///
/// The session lives in the cookie jar. With a session file the jar is
/// seeded from disk and written back after sign-in, so separate CLI runs
/// share one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    origin: Url,
    jar: Arc<Jar>,
    session_file: Option<PathBuf>,
}

impl ApiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let origin = Url::parse(&base_url)
            .map_err(|e| BackendError::Transport(format!("invalid base url {base_url}: {e}")))?;
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("huewave/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            origin,
            jar,
            session_file: None,
        })
    }

    /// Like `new`, restoring session cookies saved in `path` by an earlier run.
    pub fn with_session_file(base_url: &str, path: &Path) -> Result<Self, BackendError> {
        let mut client = Self::new(base_url)?;
        match fs::read_to_string(path) {
            Ok(raw) => {
                for pair in raw.split(';').map(str::trim).filter(|p| p.contains('=')) {
                    client.jar.add_cookie_str(pair, &client.origin);
                }
                debug!(path = %path.display(), "session restored");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("read session file {}: {e}", path.display()),
        }
        client.session_file = Some(path.to_path_buf());
        Ok(client)
    }

    /// Cookie header the jar would send to the service, if any.
    pub fn session_cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|v| v.to_str().ok().map(str::to_string))
    }

    /// Write the current session to the session file (no-op without one).
    pub fn save_session(&self) -> std::io::Result<()> {
        let Some(path) = &self.session_file else {
            return Ok(());
        };
        let Some(cookies) = self.session_cookies() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_private(path, &cookies)
    }

    pub fn clear_session(&self) -> std::io::Result<()> {
        match &self.session_file {
            Some(path) => match fs::remove_file(path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            },
            None => Ok(()),
        }
    }

    fn keep_session(&self) {
        if let Err(e) = self.save_session() {
            warn!("save session: {e}");
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, BackendError> {
        let res = req.send().await.map_err(map_reqwest_error)?;
        let status = res.status();
        debug!(status = status.as_u16(), url = %res.url(), "api response");
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(BackendError::from_status(status, &body))
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, BackendError> {
        self.send(req)
            .await?
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// `None` when the session is not signed in. Transient failures are retried.
    pub async fn current_user(&self) -> Result<Option<User>, BackendError> {
        let fetch = || async {
            self.json::<User>(self.http.get(self.url("/api/user"))).await
        };
        let res = fetch
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_secs(1))
                    .with_max_delay(Duration::from_secs(10))
                    .with_max_times(3),
            )
            .when(|e: &BackendError| e.should_retry())
            .notify(|e, dur| {
                warn!(
                    "user fetch failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            })
            .await;
        match res {
            Ok(user) => Ok(Some(user)),
            Err(BackendError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let body = json!({ "email": email, "password": password });
        let v: serde_json::Value = self
            .json(self.http.post(self.url("/api/login")).json(&body))
            .await?;
        let user = user_from_auth_response(v)?;
        self.keep_session();
        Ok(user)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, BackendError> {
        let body = json!({ "email": email, "password": password });
        let v: serde_json::Value = self
            .json(self.http.post(self.url("/api/register")).json(&body))
            .await?;
        let user = user_from_auth_response(v)?;
        self.keep_session();
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), BackendError> {
        let res = self.send(self.http.post(self.url("/api/logout"))).await;
        // The local copy goes either way; a dead session is as good as signed out.
        if let Err(e) = self.clear_session() {
            warn!("remove session file: {e}");
        }
        res.map(|_| ())
    }

    pub async fn list_palettes(&self) -> Result<Vec<SavedPalette>, BackendError> {
        self.json(self.http.get(self.url("/api/palettes"))).await
    }

    pub async fn latest_palette(&self) -> Result<Option<SavedPalette>, BackendError> {
        match self.json(self.http.get(self.url("/api/palettes/latest"))).await {
            Ok(p) => Ok(Some(p)),
            Err(BackendError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_palette(&self, draft: &PaletteDraft) -> Result<SavedPalette, BackendError> {
        self.json(self.http.post(self.url("/api/palettes")).json(draft))
            .await
    }

    pub async fn update_palette(
        &self,
        id: i64,
        draft: &PaletteDraft,
    ) -> Result<SavedPalette, BackendError> {
        self.json(
            self.http
                .put(self.url(&format!("/api/palettes/{id}")))
                .json(draft),
        )
        .await
    }

    pub async fn delete_palette(&self, id: i64) -> Result<(), BackendError> {
        self.send(self.http.delete(self.url(&format!("/api/palettes/{id}"))))
            .await?;
        Ok(())
    }

    pub async fn stage_palette(&self, draft: &PaletteDraft) -> Result<(), BackendError> {
        self.send(self.http.post(self.url("/api/store-palette")).json(draft))
            .await?;
        Ok(())
    }

    /// The service answers `null` when nothing is staged.
    pub async fn staged_palette(&self) -> Result<Option<PaletteDraft>, BackendError> {
        self.json(self.http.get(self.url("/api/palettes/stored")))
            .await
    }

    pub async fn clear_staged_palette(&self) -> Result<(), BackendError> {
        self.send(self.http.post(self.url("/api/clear-stored-palette")))
            .await?;
        Ok(())
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut f = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    f.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents)
}

fn map_reqwest_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Transport("request timed out".to_string())
    } else {
        BackendError::Transport(e.to_string())
    }
}

/// Login and register wrap the user as `{"user": {..}, "message": ..}`; accept a bare user too.
fn user_from_auth_response(v: serde_json::Value) -> Result<User, BackendError> {
    let user = v.get("user").cloned().unwrap_or(v);
    serde_json::from_value(user).map_err(|e| BackendError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_wrapped_response() {
        let v = json!({
            "message": "Login successful",
            "user": { "id": 4, "email": "a@b.c" },
            "sessionId": "abc"
        });
        let user = user_from_auth_response(v).unwrap();
        assert_eq!(user.id, "4");
        assert_eq!(user.email, "a@b.c");
    }

    #[test]
    fn test_user_from_bare_response() {
        let user = user_from_auth_response(json!({ "id": 9, "email": "x@y.z" })).unwrap();
        assert_eq!(user.id, "9");
        assert!(matches!(
            user_from_auth_response(json!({ "ok": true })),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let api = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url("/api/user"), "http://localhost:5000/api/user");
        assert!(matches!(ApiClient::new("not a url"), Err(BackendError::Transport(_))));
    }

    fn session_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("huewave-session-{tag}-{}", std::process::id()))
            .join("session")
    }

    #[test]
    fn test_session_survives_new_client() {
        let path = session_path("persist");
        let first = ApiClient::with_session_file("http://localhost:5000", &path).unwrap();
        assert!(first.session_cookies().is_none());

        first.jar.add_cookie_str("connect.sid=s%3Aabc", &first.origin);
        first.save_session().unwrap();

        let second = ApiClient::with_session_file("http://localhost:5000/", &path).unwrap();
        assert_eq!(second.session_cookies().as_deref(), Some("connect.sid=s%3Aabc"));

        second.clear_session().unwrap();
        assert!(!path.exists());
        let third = ApiClient::with_session_file("http://localhost:5000", &path).unwrap();
        assert!(third.session_cookies().is_none());
        // Removing an already missing file is fine.
        third.clear_session().unwrap();
    }

    #[test]
    fn test_save_session_without_file_is_noop() {
        let api = ApiClient::new("http://localhost:5000").unwrap();
        api.jar.add_cookie_str("sid=1", &api.origin);
        api.save_session().unwrap();
        assert_eq!(api.session_cookies().as_deref(), Some("sid=1"));
    }
}
