//! The intent-resolution seam.
//!
//! The orchestrator performs exactly one resolver call per planning run.
//! [`IntentResolver`] is the trait seam; [`HttpIntentResolver`] is the
//! production implementation posting to the remote service with a bearer
//! token and a bounded timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    error::{Result, WorkflowError},
    intent::ResolveResponse,
    params::{GeoLocation, PlanningRequest},
};

/// Default bound on the open-ended-latency network call.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(30);

/// External collaborator that turns a free-form request into a structured
/// intent plus candidate options.
#[async_trait]
pub trait IntentResolver: Send + Sync {
    /// Resolve the user's message into an intent and candidates.
    async fn resolve(&self, request: &PlanningRequest) -> Result<ResolveResponse>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveBody<'a> {
    user_message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_location: Option<&'a GeoLocation>,
}

/// HTTP implementation of [`IntentResolver`].
pub struct HttpIntentResolver {
    client: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
    timeout: Duration,
}

impl HttpIntentResolver {
    /// Creates a resolver posting to `endpoint` with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            bearer_token: None,
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    /// Attaches a bearer token sent with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Overrides the call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn network_error(&self, context: &str, e: reqwest::Error) -> WorkflowError {
        if e.is_timeout() {
            WorkflowError::network(format!(
                "intent resolution timed out after {:?}",
                self.timeout
            ))
        } else {
            WorkflowError::network(format!("{context}: {e}"))
        }
    }
}

#[async_trait]
impl IntentResolver for HttpIntentResolver {
    async fn resolve(&self, request: &PlanningRequest) -> Result<ResolveResponse> {
        let body = ResolveBody {
            user_message: &request.user_message,
            current_location: request.current_location.as_ref(),
        };

        // The per-request timeout bounds the whole exchange, body reads
        // included; a server that returns headers and then stalls cannot
        // hang the run.
        let mut builder = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&body);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.network_error("intent resolution failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(WorkflowError::network(format!(
                "intent resolution returned {status}: {detail}"
            )));
        }

        response
            .json::<ResolveResponse>()
            .await
            .map_err(|e| self.network_error("invalid resolver response", e))
    }
}
