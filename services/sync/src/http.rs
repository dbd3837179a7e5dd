use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Send a GET request, retrying transient failures with exponential
/// backoff. Retries on timeouts, connect errors and 5xx; honors
/// Retry-After on 429; fails fast on any other 4xx.
pub async fn get_json_with_retry<T: DeserializeOwned>(
    build: impl Fn() -> RequestBuilder,
    max_retries: u32,
) -> Result<T, HttpError> {
    let mut last_error = String::new();

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let backoff_secs = std::cmp::min(1u64 << attempt, 30);
            tracing::warn!(attempt, backoff_secs, "retrying after backoff");
            tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
        }

        let response = match build().send().await {
            Ok(resp) => resp,
            Err(e) => {
                last_error = e.to_string();
                if e.is_timeout() || e.is_connect() {
                    continue;
                }
                return Err(HttpError::Request(e));
            }
        };

        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(HttpError::Request);
        }

        // Honor Retry-After header for 429
        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(retry_after) = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
            {
                let wait = std::cmp::min(retry_after, 60);
                tracing::warn!(wait, "rate-limited, waiting Retry-After");
                tokio::time::sleep(Duration::from_secs(wait)).await;
            }
            last_error = "429 Too Many Requests".to_string();
            continue;
        }

        // Retry on 5xx
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            last_error = format!("{status}: {body}");
            continue;
        }

        // Fail fast on 4xx (except 429 handled above)
        let body = response.text().await.unwrap_or_default();
        return Err(HttpError::Status { status, body });
    }

    Err(HttpError::MaxRetriesExceeded {
        attempts: max_retries + 1,
        last_error,
    })
}
