mod pool;
mod threads;

pub use crate::scheduler::{pool::Pool, threads::ThreadPerTask};
use derive_more::Debug;
use thiserror::Error;

/// Capability that runs zero-argument units of work.
///
/// Every submitted unit must eventually run exactly once. Nothing is promised
/// about ordering between independent submissions or about the thread a unit
/// runs on, and any conforming scheduler yields the same graph results as any
/// other.
///
/// Schedulers are cheap handles: the graph clones one into every unit of work
/// that may itself submit further work.
pub trait Scheduler: Clone + Send + 'static {
    /// Submit `work` for execution.
    fn schedule<W>(&self, work: W)
    where
        W: FnOnce() + Send + 'static;
}

/// Type-erased unit of work handed to a [`FromFn`] scheduler.
pub type Job = Box<dyn FnOnce() + Send>;

/// Error kind for scheduler construction failures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchedulerError {
    /// A configured stack size of zero bytes.
    #[error("stack size must be non-zero")]
    InvalidStackSize,
    /// A configured thread name that contains a NUL byte.
    #[error("thread name {0:?} contains a NUL byte")]
    InvalidThreadName(String),
    /// The rayon thread pool could not be built.
    #[error("failed to build worker pool")]
    PoolBuild(#[source] rayon::ThreadPoolBuildError),
}

/// Runs every unit immediately on the submitting thread.
///
/// With this scheduler a whole graph executes on the thread that calls
/// `wait_and_get`, and a panic in any step propagates to that caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl Scheduler for Inline {
    #[inline]
    fn schedule<W>(&self, work: W)
    where
        W: FnOnce() + Send + 'static,
    {
        work();
    }
}

/// Scheduler backed by any `Fn(Job)` callable, see [`from_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(#[debug(skip)] F);

/// Turn a callable that accepts a boxed unit of work into a [`Scheduler`].
///
/// The callable must run each job it receives exactly once.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(Job) + Clone + Send + 'static,
{
    FromFn(f)
}

impl<F> Scheduler for FromFn<F>
where
    F: Fn(Job) + Clone + Send + 'static,
{
    fn schedule<W>(&self, work: W)
    where
        W: FnOnce() + Send + 'static,
    {
        (self.0)(Box::new(work));
    }
}
