use std::time::Duration;

/// Back-off requested by the hub when it answers 429.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(240);

/// Retry settings for per-file fetches with a fixed back-off.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first try. `None` retries
    /// until the operation succeeds or `should_retry` says stop.
    pub max_attempts: Option<usize>,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            backoff: RATE_LIMIT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    pub fn bounded(max_attempts: usize, backoff: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            backoff,
        }
    }

    /// Run `action`, sleeping `backoff` between attempts for as long as
    /// `should_retry` allows and attempts remain.
    pub fn run<T, E, F, R>(&self, mut action: F, mut should_retry: R) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        R: FnMut(&E) -> bool,
    {
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            match action() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let exhausted = self.max_attempts.is_some_and(|max| attempt >= max);
                    if exhausted || !should_retry(&err) {
                        return Err(err);
                    }
                    std::thread::sleep(self.backoff);
                }
            }
        }
    }
}

/// Whether a fetch error is the hub's rate limiter speaking.
///
/// The hub surfaces 429 responses through several error layers, so the check
/// inspects the rendered message rather than any one error type.
pub fn is_rate_limit(err: &impl std::fmt::Display) -> bool {
    let msg = err.to_string();
    msg.contains("429") || msg.contains("Too Many Requests")
}
