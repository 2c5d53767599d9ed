//! Shared HTTP client with retry logic for chat requests.

use std::{future::Future, time::Duration};

use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource, RequestBuilderExt, retry::Never};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::error::LlmError;

/// Configuration for HTTP client resilience
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Bounds connecting, each read, and a whole non-streamed exchange.
    /// A streamed answer may take longer as long as data keeps arriving.
    pub timeout: Duration,
    pub max_retries: u32,
    /// Base duration for exponential backoff
    pub initial_retry_delay: Duration,
    /// Cap on the backoff duration
    pub max_retry_delay: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 2,
            initial_retry_delay: Duration::from_millis(500),
            max_retry_delay: Duration::from_secs(10),
        }
    }
}

/// Shared HTTP client with retry logic and exponential backoff.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    ///
    /// Building the client performs no network I/O.
    pub fn new(config: HttpClientConfig, user_agent: Option<&str>) -> Result<Self, LlmError> {
        let default_ua = format!("llm-gate/{}", env!("CARGO_PKG_VERSION"));
        let ua = user_agent.unwrap_or(&default_ua);

        // No total deadline here: it would also cut off long streamed bodies.
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .user_agent(ua)
            .build()
            .map_err(|e| LlmError::Request(format!("Failed to build reqwest client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Make a POST request with JSON body and decode a JSON response.
    #[tracing::instrument(
        name = "http_post_json",
        skip(self, headers, body),
        fields(url = %url),
        err
    )]
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<Res, LlmError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let body = &to_body(body)?;

        let res = self
            .with_retry(move || async move {
                let res = self
                    .request(url, headers, body)
                    .timeout(self.config.timeout)
                    .send()
                    .await
                    .map_err(|e| LlmError::network("Request failed", e))?;

                if res.status().is_success() {
                    debug!(status = %res.status(), "HTTP request successful");
                    Ok(res)
                } else {
                    Err(status_error(res).await)
                }
            })
            .await?;

        let response_text = res
            .text()
            .await
            .map_err(|e| LlmError::network("Failed to read response body", e))?;

        serde_json::from_str(&response_text).map_err(|e| LlmError::Parse {
            message: "Failed to parse API response".to_string(),
            source: Box::new(e),
        })
    }

    /// Make a POST request and hand back its server-sent event stream, opened.
    ///
    /// Only opening the stream is retried; once events are being consumed, a
    /// transport fault ends the stream and nothing reconnects.
    #[tracing::instrument(
        name = "http_post_stream",
        skip(self, headers, body),
        fields(url = %url),
        err
    )]
    pub async fn post_stream<Req>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<EventSource, LlmError>
    where
        Req: Serialize,
    {
        let body = &to_body(body)?;

        self.with_retry(move || async move {
            let mut events = self.request(url, headers, body).eventsource().map_err(|e| {
                LlmError::Request(format!("Failed to prepare streaming request: {e}"))
            })?;
            events.set_retry_policy(Box::new(Never));

            match events.next().await {
                Some(Ok(Event::Open)) => {
                    debug!("Event stream opened");
                    Ok(events)
                }
                Some(Err(reqwest_eventsource::Error::InvalidStatusCode(_, res))) => {
                    Err(status_error(res).await)
                }
                Some(Err(reqwest_eventsource::Error::Transport(e))) => {
                    Err(LlmError::network("Request failed", e))
                }
                Some(Err(e)) => Err(event_stream_error(e)),
                Some(Ok(Event::Message(_))) | None => Err(LlmError::Api {
                    message: "Event stream closed before it opened".to_string(),
                    status_code: None,
                    source: None,
                }),
            }
        })
        .await
    }

    fn request(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> reqwest::RequestBuilder {
        let mut req_builder = self.client.post(url).json(body);

        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        req_builder
    }

    /// Run `send` until it succeeds or fails with a non-retryable error.
    ///
    /// Transport faults, 429 (rate limit) and 5xx errors are retried with
    /// exponential backoff. Other 4xx errors fail immediately.
    async fn with_retry<T, F, Fut>(&self, mut send: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=self.config.max_retries {
            match send().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.config.max_retries + 1,
                        error = %e,
                        "HTTP request failed"
                    );
                    last_error = Some(e);
                }
            }

            // Exponential backoff with jitter
            if attempt < self.config.max_retries {
                let base_delay =
                    self.config.initial_retry_delay.as_millis() as f64 * 2_f64.powi(attempt as i32);

                // +/- 10% jitter (0.9 to 1.1)
                let jitter_factor = rand::random::<f64>() * 0.2 + 0.9;
                let delay_ms = (base_delay * jitter_factor) as u64;

                let delay = Duration::from_millis(delay_ms).min(self.config.max_retry_delay);

                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Api {
            message: format!(
                "Request failed after max retries ({}) with unknown error",
                self.config.max_retries
            ),
            status_code: None,
            source: None,
        }))
    }
}

fn to_body<Req: Serialize>(body: &Req) -> Result<serde_json::Value, LlmError> {
    serde_json::to_value(body).map_err(|e| LlmError::Parse {
        message: "Failed to serialize request".to_string(),
        source: Box::new(e),
    })
}

/// Turn a non-success response into an API error carrying its status.
async fn status_error(res: reqwest::Response) -> LlmError {
    let status = res.status();
    warn!(status = %status, "API returned error status");

    let is_retryable =
        status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
    let error_text = res
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let error_text = extract_error_message(&error_text);

    let message = if is_retryable {
        format!("Transient API error ({status}): {error_text}")
    } else {
        format!("Fatal API Error ({status}): {error_text}")
    };

    LlmError::Api {
        message,
        status_code: Some(status.as_u16()),
        source: None,
    }
}

/// Map a fault raised while reading an event stream.
pub(crate) fn event_stream_error(err: reqwest_eventsource::Error) -> LlmError {
    match err {
        reqwest_eventsource::Error::Transport(e) => {
            LlmError::network("Failed to read streamed response", e)
        }
        reqwest_eventsource::Error::InvalidContentType(content_type, _) => LlmError::Api {
            message: format!("Expected an event stream, got content type {content_type:?}"),
            status_code: None,
            source: None,
        },
        other => LlmError::Parse {
            message: format!("Malformed event stream: {other}"),
            source: other.to_string().into(),
        },
    }
}

/// Pull `error.message` out of an OpenAI-style error body, else keep the raw text.
pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("message").or(Some(error)))
                .and_then(|message| message.as_str().map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_unwrapped_from_openai_body() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(extract_error_message(body), "Incorrect API key provided");
    }

    #[test]
    fn plain_string_error_is_unwrapped() {
        assert_eq!(extract_error_message(r#"{"error":"model not found"}"#), "model not found");
    }

    #[test]
    fn non_json_error_body_is_kept_verbatim() {
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn malformed_event_stream_is_a_parse_error() {
        let err = event_stream_error(reqwest_eventsource::Error::InvalidLastEventId(
            "bad\nid".to_string(),
        ));

        assert!(matches!(err, LlmError::Parse { .. }));
        assert!(!err.is_retryable());
    }
}
