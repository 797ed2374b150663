use std::sync::Arc;
use tokio::runtime::{Builder, Runtime as TokioRuntime};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Failed to create runtime: {0}")]
    Creation(String),
}

/// The agent is strictly sequential: one line in, at most one network or
/// disk call, one reply out. A current-thread runtime is all it needs.
pub struct Runtime {
    inner: Arc<TokioRuntime>,
}

impl Runtime {
    pub fn new() -> Result<Self, RuntimeError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .thread_name("bhanu-main")
            .build()
            .map_err(|e| RuntimeError::Creation(e.to_string()))?;

        info!("Runtime initialized (current thread)");

        Ok(Self {
            inner: Arc::new(runtime),
        })
    }

    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        self.inner.block_on(future)
    }
}
