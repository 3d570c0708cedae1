use anyhow::{Error, anyhow};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Sends a request, retrying on transport errors and 5xx responses
///
/// # Parameters
/// - `request`: Closure issuing the request
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// The first response that is not a server error, or the last failure
pub async fn send_with_retry<F, Fut>(
    mut request: F,
    retries: usize,
    delay_ms: u64,
) -> Result<reqwest::Response, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        let err = match request().await {
            Ok(response) if response.status().is_server_error() => {
                anyhow!("Server responded with {}", response.status())
            }
            Ok(response) => return Ok(response),
            Err(e) => Error::from(e),
        };
        if attempt > retries {
            return Err(err);
        }
        debug!("Attempt {attempt}/{retries} failed: {err}. Retrying...");
        attempt += 1;
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
