// src/integrations/backend/client.rs
//
// Film log REST client
//
// ARCHITECTURE:
// - `FilmLogApi` is the seam services depend on (mocked in tests)
// - `HttpFilmLogApi` talks to `/api/filmlogs/` with a cookie session
// - Every write carries the CSRF header read from the cookie jar
// - JSON shapes live in `wire`, never here

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderName};
use reqwest::{Client, RequestBuilder, Response, Url};

use super::wire::{CreatedFilmLog, FilmLogListResponse, FilmLogPayload};
use crate::config::DiaryConfig;
use crate::domain::{FilmLogDraft, FilmLogEntry, FilmLogId};
use crate::error::{AppError, AppResult};

const FILM_LOGS_PATH: &str = "api/filmlogs/";
const SESSION_COOKIE_NAME: &str = "sessionid";

/// Remote collection of film logs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilmLogApi: Send + Sync {
    /// Full collection, in the backend's order
    async fn list(&self) -> AppResult<Vec<FilmLogEntry>>;

    async fn create(&self, draft: &FilmLogDraft) -> AppResult<CreatedFilmLog>;

    /// Replace the whole record
    async fn update(&self, id: &FilmLogId, draft: &FilmLogDraft) -> AppResult<CreatedFilmLog>;

    async fn delete(&self, id: &FilmLogId) -> AppResult<()>;
}

/// reqwest implementation with a persistent cookie jar
pub struct HttpFilmLogApi {
    collection_url: Url,
    http_client: Client,
    cookie_jar: Arc<Jar>,
    csrf_cookie_name: String,
    csrf_header_name: HeaderName,
}

impl HttpFilmLogApi {
    pub fn new(config: &DiaryConfig) -> AppResult<Self> {
        let base = format!("{}/", config.api_base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| AppError::Config(format!("Invalid api_base_url '{}': {}", base, e)))?;
        let collection_url = base_url
            .join(FILM_LOGS_PATH)
            .map_err(|e| AppError::Config(format!("Invalid film log endpoint: {}", e)))?;

        let csrf_header_name = HeaderName::from_bytes(config.csrf_header_name.as_bytes())
            .map_err(|e| AppError::Config(format!("Invalid csrf_header_name: {}", e)))?;

        let cookie_jar = Arc::new(Jar::default());
        if let Some(session_id) = &config.session_id {
            cookie_jar.add_cookie_str(
                &format!("{}={}; Path=/", SESSION_COOKIE_NAME, session_id),
                &base_url,
            );
        }
        if let Some(token) = &config.csrf_token {
            cookie_jar.add_cookie_str(
                &format!("{}={}; Path=/", config.csrf_cookie_name, token),
                &base_url,
            );
        }

        let mut builder = Client::builder().cookie_provider(Arc::clone(&cookie_jar));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| AppError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            collection_url,
            http_client,
            cookie_jar,
            csrf_cookie_name: config.csrf_cookie_name.clone(),
            csrf_header_name,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// `{collection}/{id}/` with the id percent-encoded as one path segment
    fn record_url(&self, id: &FilmLogId) -> AppResult<Url> {
        if matches!(id.as_str(), "" | "." | "..") {
            return Err(AppError::Other(format!("Invalid film log id '{}'", id)));
        }

        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("'{}' cannot carry a path", self.collection_url)))?
            .pop_if_empty()
            .push(id.as_str())
            .push("");
        Ok(url)
    }

    /// Current CSRF token, as the backend last set it in the jar
    pub fn csrf_token(&self) -> Option<String> {
        let cookies = self.cookie_jar.cookies(&self.collection_url)?;
        let cookies = cookies.to_str().ok()?;

        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.csrf_cookie_name)
            .map(|(_, value)| value.to_string())
    }

    /// Attach the CSRF header to a state-changing request
    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match self.csrf_token() {
            Some(token) => request.header(self.csrf_header_name.clone(), token),
            None => {
                log::warn!(
                    "No '{}' cookie in the session; sending write without {}",
                    self.csrf_cookie_name,
                    self.csrf_header_name.as_str()
                );
                request
            }
        }
    }

    // ========================================================================
    // INTERNAL: Request Execution
    // ========================================================================

    async fn send(&self, request: RequestBuilder, action: &str) -> AppResult<Response> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                log::error!("Film log {} failed: {}", action, e);
                AppError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().filter(|b| !b.trim().is_empty());
            log::error!("Film log {} returned status {}", action, status);
            return Err(AppError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn read_created(response: Response, action: &str) -> AppResult<CreatedFilmLog> {
        response.json::<CreatedFilmLog>().await.map_err(|e| {
            log::error!("Film log {} response could not be decoded: {}", action, e);
            AppError::from(e)
        })
    }
}

#[async_trait]
impl FilmLogApi for HttpFilmLogApi {
    async fn list(&self) -> AppResult<Vec<FilmLogEntry>> {
        let request = self.http_client.get(self.collection_url.clone());
        let response = self.send(request, "fetch").await?;

        let body: FilmLogListResponse = response.json().await.map_err(|e| {
            log::error!("Film log collection could not be decoded: {}", e);
            AppError::from(e)
        })?;

        let entries = body.into_entries(Utc::now());
        log::debug!("Fetched {} film logs", entries.len());
        Ok(entries)
    }

    async fn create(&self, draft: &FilmLogDraft) -> AppResult<CreatedFilmLog> {
        let payload = FilmLogPayload::from(draft);
        let request = self
            .with_csrf(self.http_client.post(self.collection_url.clone()))
            .json(&payload);

        let response = self.send(request, "create").await?;
        Self::read_created(response, "create").await
    }

    async fn update(&self, id: &FilmLogId, draft: &FilmLogDraft) -> AppResult<CreatedFilmLog> {
        let payload = FilmLogPayload::from(draft);
        let request = self
            .with_csrf(self.http_client.put(self.record_url(id)?))
            .json(&payload);

        let response = self.send(request, "update").await?;
        Self::read_created(response, "update").await
    }

    async fn delete(&self, id: &FilmLogId) -> AppResult<()> {
        let request = self.with_csrf(self.http_client.delete(self.record_url(id)?));
        self.send(request, "delete").await?;
        Ok(())
    }
}
