use crate::scheduler::SchedulerError;
use core::num::NonZeroUsize;

/// Settings for the threaded schedulers.
///
/// `ThreadPerTask` honours `thread_name` and `stack_size`; `Pool` honours all
/// three. Unset fields fall back to the platform or rayon defaults.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Number of worker threads in a dedicated pool.
    pub num_threads: Option<NonZeroUsize>,
    /// Name given to spawned threads. Pool workers get a `-{index}` suffix.
    pub thread_name: Option<String>,
    /// Stack size of spawned threads, in bytes.
    pub stack_size: Option<usize>,
}

impl SchedulerConfig {
    /// Configuration with every field left to the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count of a dedicated pool.
    pub fn with_num_threads(mut self, num_threads: NonZeroUsize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Set the name of spawned threads.
    pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.thread_name = Some(thread_name.into());
        self
    }

    /// Set the stack size of spawned threads.
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    /// Check the settings before any thread is spawned with them.
    ///
    /// # Errors
    /// If the stack size is zero or the thread name contains a NUL byte.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.stack_size == Some(0) {
            return Err(SchedulerError::InvalidStackSize);
        }
        if let Some(name) = &self.thread_name
            && name.contains('\0')
        {
            return Err(SchedulerError::InvalidThreadName(name.clone()));
        }
        Ok(())
    }
}
