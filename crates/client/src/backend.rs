use crate::error::Result;
use crate::lines::LineSplitter;
use futures_util::StreamExt;
use sentinel_protocol::{AnalyzeRequest, ModelsResponse, ResultPayload, DEFAULT_MODEL};
use sentinel_stream::{Control, ProgressSink, StreamConsumer};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MODELS_TIMEOUT: Duration = Duration::from_secs(5);

/// Cloud Run terminates TLS at its edge; plain-http URLs against `*.run.app`
/// hosts get redirected and the streamed response body is lost. Upgrade them.
pub fn resolve_backend_url(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.contains("run.app") {
        return trimmed.replacen("http://", "https://", 1);
    }
    trimmed.to_string()
}

/// HTTP client for the analysis backend.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self> {
        // Only connection establishment is time-bounded; individual stream
        // events have no deadline (an analysis can legitimately take minutes).
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: resolve_backend_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists the models the backend advertises.
    ///
    /// Never fails: any error (network, non-200, decode, empty list)
    /// collapses to the single default model, so callers always have at
    /// least one usable entry.
    pub async fn fetch_models(&self) -> Vec<String> {
        match self.try_fetch_models().await {
            Ok(models) if !models.is_empty() => models,
            Ok(_) => {
                log::warn!("backend advertised no models, using default");
                vec![DEFAULT_MODEL.to_string()]
            }
            Err(err) => {
                log::warn!("model listing failed ({err}), using default");
                vec![DEFAULT_MODEL.to_string()]
            }
        }
    }

    async fn try_fetch_models(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .timeout(MODELS_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let body: ModelsResponse = response.json().await?;
        Ok(body.models)
    }

    /// Runs one analysis request, draining the streamed event response to
    /// its terminal outcome. Progress messages are forwarded to `sink` as
    /// they arrive; the consumer stops at the first terminal event.
    pub async fn analyze(
        &self,
        request: &AnalyzeRequest,
        sink: &mut dyn ProgressSink,
    ) -> Result<ResultPayload> {
        let response = self
            .http
            .post(format!("{}/analyze", self.base_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let mut body = response.bytes_stream();
        let mut splitter = LineSplitter::new();
        let mut consumer = StreamConsumer::new();
        let mut done = false;

        'stream: while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for line in splitter.push_chunk(&chunk) {
                if consumer.push_line(&line, sink)? == Control::Done {
                    done = true;
                    break 'stream;
                }
            }
        }
        if !done {
            if let Some(tail) = splitter.finish() {
                consumer.push_line(&tail, sink)?;
            }
        }
        Ok(consumer.finish()?)
    }
}
