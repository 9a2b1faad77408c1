use crate::{
    config::SchedulerConfig,
    scheduler::{Scheduler, SchedulerError},
};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use std::any::Any;
use tracing::{debug, error};

/// Submits units of work to a rayon thread pool.
///
/// Blocking in `wait_and_get` from inside the same pool can starve it: the
/// waiting worker is not available to run the graph.
#[derive(Debug, Clone, Default)]
pub struct Pool {
    /// `None` targets rayon's global pool.
    pool: Option<Arc<ThreadPool>>,
}

impl Pool {
    /// Scheduler backed by rayon's global pool.
    ///
    /// The global pool has no panic handler, so a panicking step aborts the
    /// process. Use [`Pool::with_config`] to keep a faulting step local to
    /// its unit of work.
    #[must_use]
    pub fn global() -> Self {
        Self::default()
    }

    /// Build a dedicated pool from `config`.
    ///
    /// A step that panics on one of its workers is logged and dropped; the
    /// worker and the process keep running, and the graph it belonged to
    /// never completes.
    ///
    /// # Errors
    /// If `config` fails [`SchedulerConfig::validate`] or rayon cannot start
    /// the workers.
    pub fn with_config(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        let mut builder = ThreadPoolBuilder::new();
        if let Some(num_threads) = config.num_threads {
            builder = builder.num_threads(num_threads.get());
        }
        if let Some(name) = config.thread_name.clone() {
            builder = builder.thread_name(move |idx| format!("{name}-{idx}"));
        }
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }
        builder = builder.panic_handler(log_step_panic);
        let pool = builder.build().map_err(SchedulerError::PoolBuild)?;
        debug!(threads = pool.current_num_threads(), "built scheduler pool");
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    /// Number of worker threads behind this scheduler.
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |pool| pool.current_num_threads())
    }
}

impl Scheduler for Pool {
    fn schedule<W>(&self, work: W)
    where
        W: FnOnce() + Send + 'static,
    {
        match &self.pool {
            Some(pool) => pool.spawn(work),
            None => rayon::spawn(work),
        }
    }
}

fn log_step_panic(payload: Box<dyn Any + Send>) {
    let reason = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    error!(reason, "step panicked on a pool worker");
}
