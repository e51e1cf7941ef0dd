use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::GenerationError;
use crate::config::GenerationConfig;

/// A text-completion service: prompt in, raw text out.
///
/// Implementations must stop work promptly once `cancel` fires.
#[async_trait]
pub trait TextBackend: Send + Sync {
    async fn complete(&self, prompt: &str, cancel: CancellationToken)
        -> Result<String, GenerationError>;
}

/// Retry behaviour for ordinary content requests. The meal-plan path
/// always uses [`RetryPolicy::single`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn single() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub fn from_config(cfg: &GenerationConfig) -> Self {
        Self {
            max_attempts: cfg.retry_attempts.max(1),
            backoff: cfg.retry_backoff,
        }
    }
}

#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn TextBackend>,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        Self { backend }
    }

    /// Runs one backend call bounded by `deadline`.
    ///
    /// The call gets a child of `cancel`; it is cancelled when the deadline
    /// expires, so the in-flight request is torn down rather than left
    /// running in the background.
    pub async fn generate(
        &self,
        prompt: &str,
        deadline: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let call = cancel.child_token();
        let started = Instant::now();

        let result = tokio::select! {
            res = self.backend.complete(prompt, call.clone()) => res,
            _ = tokio::time::sleep(deadline) => Err(GenerationError::Timeout(deadline)),
            _ = cancel.cancelled() => Err(GenerationError::Cancelled),
        };
        call.cancel();

        match &result {
            Ok(text) => debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                len = text.len(),
                "generation completed"
            ),
            Err(e) => debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                kind = e.kind(),
                "generation failed"
            ),
        }
        result
    }

    pub async fn generate_with_retry(
        &self,
        prompt: &str,
        deadline: Duration,
        policy: RetryPolicy,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let attempts = policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.generate(prompt, deadline, cancel).await {
                Ok(text) => return Ok(text),
                Err(GenerationError::Cancelled) => return Err(GenerationError::Cancelled),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    warn!(attempt, max_attempts = attempts, kind = e.kind(), error = %e, "generation attempt failed; retrying");
                    tokio::select! {
                        _ = tokio::time::sleep(policy.backoff) => {}
                        _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// One scripted backend reply.
    pub enum Reply {
        Text(String),
        Fail,
        /// Never completes; only cancellation ends it.
        Hang,
    }

    /// Backend replaying a fixed script; the last reply repeats.
    pub struct ScriptedBackend {
        replies: Mutex<VecDeque<Reply>>,
        pub calls: AtomicUsize,
    }

    impl ScriptedBackend {
        pub fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn text(body: &str) -> Self {
            Self::new(vec![Reply::Text(body.to_string())])
        }

        pub fn hanging() -> Self {
            Self::new(vec![Reply::Hang])
        }

        pub fn failing() -> Self {
            Self::new(vec![Reply::Fail])
        }

        fn next(&self) -> Reply {
            let mut q = self.replies.lock().unwrap();
            if q.len() > 1 {
                q.pop_front().unwrap()
            } else {
                match q.front() {
                    Some(Reply::Text(t)) => Reply::Text(t.clone()),
                    Some(Reply::Fail) | None => Reply::Fail,
                    Some(Reply::Hang) => Reply::Hang,
                }
            }
        }
    }

    #[async_trait]
    impl TextBackend for ScriptedBackend {
        async fn complete(
            &self,
            _prompt: &str,
            cancel: CancellationToken,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.next() {
                Reply::Text(t) => Ok(t),
                Reply::Fail => Err(GenerationError::Unavailable("status 503".into())),
                Reply::Hang => {
                    cancel.cancelled().await;
                    Err(GenerationError::Cancelled)
                }
            }
        }
    }
}
