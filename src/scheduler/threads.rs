use crate::{
    config::SchedulerConfig,
    scheduler::{Scheduler, SchedulerError},
};
use std::sync::Arc;
#[cfg(not(feature = "loom"))]
use tracing::{error, trace};

/// Spawns one detached OS thread per submitted unit of work.
///
/// Simple and unbounded: every fan-out sibling and every scheduling boundary
/// costs a thread. Prefer [`Pool`](crate::scheduler::Pool) for heavy graphs.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "loom", allow(dead_code))]
pub struct ThreadPerTask {
    thread_name: Option<Arc<str>>,
    stack_size: Option<usize>,
}

impl ThreadPerTask {
    /// Scheduler with platform-default thread settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler that names and sizes its threads from `config`.
    /// `config.num_threads` is ignored.
    ///
    /// # Errors
    /// If `config` fails [`SchedulerConfig::validate`].
    pub fn with_config(config: &SchedulerConfig) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self {
            thread_name: config.thread_name.as_deref().map(Arc::from),
            stack_size: config.stack_size,
        })
    }
}

impl Scheduler for ThreadPerTask {
    #[cfg(not(feature = "loom"))]
    fn schedule<W>(&self, work: W)
    where
        W: FnOnce() + Send + 'static,
    {
        let mut builder = std::thread::Builder::new();
        if let Some(name) = &self.thread_name {
            builder = builder.name(name.to_string());
        }
        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }
        match builder.spawn(work) {
            Ok(handle) => trace!(thread = ?handle.thread().id(), "spawned worker thread"),
            Err(err) => {
                error!(%err, "failed to spawn worker thread");
                panic!("ThreadPerTask::schedule: failed to spawn thread: {err}");
            }
        }
    }

    #[cfg(feature = "loom")]
    fn schedule<W>(&self, work: W)
    where
        W: FnOnce() + Send + 'static,
    {
        crate::sync::thread::spawn(work);
    }
}
