//! HTTP implementation of the agent service client.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::GangwayConfig;
use crate::error::{AdapterError, Result};
use crate::types::{ChatMessage, RunStatus, TranscriptMessage};

use super::{AgentService, CheckpointRecord};

#[derive(Debug, Deserialize)]
struct ThreadCreated {
    thread_id: String,
}

#[derive(Debug, Deserialize)]
struct StatePatched {
    #[serde(default)]
    checkpoint_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunStarted {
    #[serde(default)]
    run_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunStatusBody {
    #[serde(default = "unknown_status")]
    status: RunStatus,
}

fn unknown_status() -> RunStatus {
    RunStatus::Unknown
}

#[derive(Debug, Deserialize)]
struct Transcript {
    #[serde(default)]
    messages: Vec<TranscriptMessage>,
}

/// Client for the remote agent-run service over HTTP/JSON.
///
/// The underlying reqwest client carries the short request timeout as its
/// default; the transcript join call overrides it with the longer
/// `join_timeout` since the service blocks server-side until the transcript
/// is available.
pub struct HttpAgentService {
    http: reqwest::Client,
    base_url: String,
    assistant_id: String,
    join_timeout: std::time::Duration,
}

impl HttpAgentService {
    pub fn new(config: &GangwayConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AdapterError::Network)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            assistant_id: config.assistant_id.clone(),
            join_timeout: config.join_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Check the response status, surfacing non-2xx as an API error with
    /// the response body as the message.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(AdapterError::api(status.as_u16(), body))
    }
}

#[async_trait]
impl AgentService for HttpAgentService {
    async fn create_thread(&self) -> Result<String> {
        let body = json!({"thread_id": "", "metadata": {}, "if_exists": "raise"});
        let resp = self.http.post(self.url("/threads")).json(&body).send().await?;
        let data: ThreadCreated = Self::check(resp).await?.json().await?;
        debug!(thread_id = %data.thread_id, "created thread");
        Ok(data.thread_id)
    }

    async fn fetch_history(&self, thread_id: &str) -> Result<Vec<CheckpointRecord>> {
        let resp = self
            .http
            .get(self.url(&format!("/threads/{thread_id}/history")))
            .send()
            .await?;
        let records: Vec<CheckpointRecord> = Self::check(resp).await?.json().await?;
        Ok(records)
    }

    async fn patch_state(
        &self,
        thread_id: &str,
        checkpoint_id: &str,
        message: &ChatMessage,
        as_node: &str,
    ) -> Result<Option<String>> {
        let body = json!({
            "values": {"messages": [message]},
            "checkpoint": {
                "checkpoint_id": checkpoint_id,
                "thread_id": thread_id,
                "checkpoint_ns": "",
                "checkpoint_map": {},
            },
            "as_node": as_node,
        });
        let resp = self
            .http
            .post(self.url(&format!("/threads/{thread_id}/state")))
            .json(&body)
            .send()
            .await?;
        let data: StatePatched = Self::check(resp).await?.json().await?;
        Ok(data.checkpoint_id)
    }

    async fn start_run(&self, thread_id: &str, content: &str, username: &str) -> Result<String> {
        let body = json!({
            "assistant_id": self.assistant_id,
            "input": {
                "messages": [{"content": content, "type": "human"}],
                "openwebui_username": username,
            },
            "metadata": {},
        });
        let resp = self
            .http
            .post(self.url(&format!("/threads/{thread_id}/runs")))
            .json(&body)
            .send()
            .await?;
        let data: RunStarted = Self::check(resp).await?.json().await?;
        let run_id = data.run_id.filter(|id| !id.is_empty()).ok_or_else(|| {
            AdapterError::EmptyResponse("Failed to start run - No run ID received".to_string())
        })?;
        debug!(thread_id, run_id = %run_id, "started run");
        Ok(run_id)
    }

    async fn run_status(&self, thread_id: &str, run_id: &str) -> Result<RunStatus> {
        let resp = self
            .http
            .get(self.url(&format!("/threads/{thread_id}/runs/{run_id}")))
            .send()
            .await?;
        let data: RunStatusBody = Self::check(resp).await?.json().await?;
        Ok(data.status)
    }

    async fn fetch_transcript(
        &self,
        thread_id: &str,
        run_id: &str,
    ) -> Result<Vec<TranscriptMessage>> {
        let resp = self
            .http
            .get(self.url(&format!("/threads/{thread_id}/runs/{run_id}/join")))
            .timeout(self.join_timeout)
            .send()
            .await?;
        let data: Transcript = Self::check(resp).await?.json().await?;
        Ok(data.messages)
    }
}
