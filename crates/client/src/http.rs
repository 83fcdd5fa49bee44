//! HTTP implementation of [`FleetApi`].

use std::time::Duration;

use async_trait::async_trait;
use fleet_core::{RoverId, TaskKind};
use reqwest::{Response, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::FleetApi;
use crate::error::ClientError;
use crate::session::{Session, SessionStartResponse};

pub const DEFAULT_BASE_URL: &str = "https://fleetbots-production.up.railway.app/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the fleet service REST API.
#[derive(Debug, Clone)]
pub struct FleetClient {
    base_url: Url,
    http: reqwest::Client,
    timeout: Duration,
}

impl FleetClient {
    /// Create a client for `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url =
            Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl(format!("{trimmed}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{trimmed}: cannot be used as a base url"
            )));
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append `segments` to the base path. Each segment is percent-encoded,
    /// so a rover id cannot escape its path position.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Turn a non-2xx answer into [`ClientError::Protocol`] and decode the rest.
    async fn read_json(resp: Response) -> Result<Value, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Protocol {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn open_session(&self) -> Result<Session, ClientError> {
        let url = self.endpoint(&["session", "start"])?;
        let resp = self.http.post(url).timeout(self.timeout).send().await?;
        let body = Self::read_json(resp).await?;
        let parsed: SessionStartResponse = serde_json::from_value(body)
            .map_err(|e| ClientError::Decode(format!("session response: {e}")))?;
        let id = parsed
            .session_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::Decode("session response has no session_id".into()))?;
        Ok(Session::new(id, parsed.message.unwrap_or_default()))
    }

    async fn get_status(&self, session: &Session) -> Result<Value, ClientError> {
        let url = self.endpoint(&["fleet", "status"])?;
        let resp = self
            .http
            .get(url)
            .query(&[("session_id", session.id.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;
        Self::read_json(resp).await
    }

    async fn post_task(
        &self,
        session: &Session,
        rover: &RoverId,
        kind: TaskKind,
    ) -> Result<Value, ClientError> {
        let url = self.endpoint(&["rover", rover.as_str(), "task"])?;
        let resp = self
            .http
            .post(url)
            .query(&[("session_id", session.id.as_str()), ("task", kind.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;
        Self::read_json(resp).await
    }
}

#[async_trait]
impl FleetApi for FleetClient {
    async fn start_session(&self) -> Result<Session, ClientError> {
        let result = self.open_session().await;
        match &result {
            Ok(session) => info!(session = %session.id, message = %session.message, "Session started"),
            Err(e) => warn!(error = %e, "Starting session failed"),
        }
        result
    }

    async fn fleet_status(&self, session: &Session) -> Result<Value, ClientError> {
        let result = self.get_status(session).await;
        match &result {
            Ok(_) => debug!(session = %session.id, "Fleet status fetched"),
            Err(e) => warn!(session = %session.id, error = %e, "Fetching fleet status failed"),
        }
        result
    }

    async fn assign_task(
        &self,
        session: &Session,
        rover: &RoverId,
        kind: TaskKind,
    ) -> Result<Value, ClientError> {
        let result = self.post_task(session, rover, kind).await;
        match &result {
            Ok(_) => info!(rover = %rover, task = %kind, "Task assigned"),
            Err(e) => warn!(rover = %rover, task = %kind, error = %e, "Assigning task failed"),
        }
        result
    }
}
