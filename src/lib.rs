//! Composable continuation graphs with pluggable schedulers.
//!
//! A graph is a chain of computation steps, optionally branching into
//! fan-out/join nodes, whose execution is deferred to a [`Scheduler`]. It
//! is built bottom-up: every call to [`Graph::then`] or [`Graph::then_all`]
//! consumes the graph so far and wraps it as the predecessor of a new node,
//! so the static type of a graph describes the whole chain and every
//! intermediate output type is known at compile time.
//!
//! Execution runs top-down in two phases:
//! - **walk-up**: starting at the leaf, each node wraps its own stage around
//!   the stages collected so far and hands them to its predecessor;
//! - **cascade-down**: the [`Root`] feeds [`Nothing`] to the first stage, and
//!   every stage passes its result to the next one.
//!
//! Fan-out nodes submit all but one sibling to the scheduler, run the last
//! one inline, and join the outputs with an atomic countdown: exactly one
//! sibling, the one that observes the counter reach zero, continues with the
//! rest of the chain. [`Graph::wait_and_get`] appends a terminal step that
//! signals a [`Latch`] and blocks on it.
//!
//! Key modules:
//! - `continuation`: the absence-aware call adapter used by every step.
//! - `graph`: node kinds, the walk-up/cascade protocol and the fan-out join.
//! - `scheduler`: the `Scheduler` capability and its implementations.
//! - `config`: settings for the threaded schedulers.
//! - `latch`: the one-shot completion signal.
//!
//! Quick start:
//!
//! ```
//! use ctg::{Graph, Inline, ThreadPerTask, initiate, initiate_all};
//!
//! let three = initiate(|| 1)
//!     .then(|x: i32| x + 1)
//!     .then(|x: i32| x + 1)
//!     .wait_and_get(&Inline);
//! assert_eq!(three, 3);
//!
//! let sum = initiate_all((|| 1, || 2))
//!     .then(|a: i32, b: i32| a + b)
//!     .wait_and_get(&ThreadPerTask::new());
//! assert_eq!(sum, 3);
//! ```
//!
//! Steps receive their input by value, so every callable, input and output
//! must be `Send + 'static`, and inputs of fan-out nodes must be `Clone`.

/// Settings for the threaded schedulers.
///
/// Exposes `SchedulerConfig`, consumed by `ThreadPerTask::with_config` and
/// `Pool::with_config`.
pub mod config;
/// The absence-aware call adapter.
///
/// Defines `Continuation`, implemented for closures taking no argument, one
/// argument, or the fields of a tuple input, with the markers that select
/// between them.
pub mod continuation;
/// Graph nodes and their execution.
///
/// Contains the `Graph` trait with the chaining operations, the `Cascade`
/// stages produced during the walk-up, linear and scheduling-boundary nodes,
/// and the fan-out/join node with its atomic countdown.
pub mod graph;
/// One-shot completion signal with blocking wait.
pub mod latch;
/// The scheduler capability and its implementations.
///
/// Provides `Inline`, `ThreadPerTask`, a rayon-backed `Pool` and `from_fn`
/// for arbitrary `Fn(Job)` callables.
pub mod scheduler;
mod sync;
/// The absence value and internal hand-off cells.
pub mod types;

pub use crate::{
    config::SchedulerConfig,
    continuation::{Continuation, NoArg, Spread, WithArg},
    graph::{Cascade, Done, Graph, Root, Schedule, Siblings, Then, WhenAll},
    latch::Latch,
    scheduler::{FromFn, Inline, Job, Pool, Scheduler, SchedulerError, ThreadPerTask, from_fn},
    types::Nothing,
};

/// Start a graph with a single step under a scheduling boundary.
///
/// `f` takes no argument (or explicitly takes [`Nothing`]). Nothing runs until
/// the graph is executed; the step then runs as a unit of work on the
/// scheduler.
pub fn initiate<F, M>(f: F) -> Then<Schedule<Root>, F, M>
where
    F: Continuation<Nothing, M>,
{
    Root.schedule().then(f)
}

/// Start a graph with a fan-out node under a scheduling boundary.
///
/// `siblings` is a tuple of 2 to 8 callables or a `Vec` of callables; their
/// outputs are joined in sibling order.
pub fn initiate_all<Fs, M>(siblings: Fs) -> WhenAll<Schedule<Root>, Fs, M>
where
    Fs: Siblings<Nothing, M>,
{
    Root.schedule().then_all(siblings)
}
