mod drive;
mod join;
mod node;

pub use crate::graph::{
    join::{Join, Many, Siblings, WhenAll},
    node::{Hop, Root, Schedule, Step, Then},
};
use crate::{continuation::Continuation, scheduler::Scheduler};

/// A composable chain of computation steps, possibly branching into
/// fan-out/join nodes.
///
/// Every node owns its predecessor by value, so the static type of a graph
/// spells out the whole chain and [`Graph::Output`] is derived from it at
/// compile time. Chaining and running consume the graph:
///
/// ```compile_fail,E0382
/// use ctg::{Graph, Inline, initiate};
///
/// let graph = initiate(|| 1);
/// let _next = graph.then(|x: i32| x + 1);
/// // `graph` was moved into `_next`.
/// let _ = graph.wait_and_get(&Inline);
/// ```
///
/// Execution is two-phase. `walk_up` travels from the leaf to the [`Root`],
/// each node wrapping its own stage around the stages collected so far; the
/// root then starts the cascade downwards, feeding [`Nothing`] to the first
/// stage.
///
/// [`Nothing`]: crate::types::Nothing
pub trait Graph: Sized {
    /// Value produced by the last node of the graph.
    type Output: Send + 'static;

    /// Collect this node's stage in front of `children` and continue towards
    /// the root, which starts executing the collected stages.
    fn walk_up<S, K>(self, scheduler: &S, children: K)
    where
        S: Scheduler,
        K: Cascade<Self::Output>;

    /// Append a step that receives this graph's output.
    fn then<F, M>(self, f: F) -> Then<Self, F, M>
    where
        F: Continuation<Self::Output, M>,
    {
        Then::new(self, f)
    }

    /// Append a fan-out node: every sibling in `siblings` receives a clone of
    /// this graph's output, and their results are joined in sibling order.
    ///
    /// `siblings` is a tuple of 2 to 8 callables, joined into a tuple, or a
    /// `Vec` of callables of one type, joined into a `Vec`.
    fn then_all<Fs, M>(self, siblings: Fs) -> WhenAll<Self, Fs, M>
    where
        Fs: Siblings<Self::Output, M>,
    {
        WhenAll::new(self, siblings)
    }

    /// Append a scheduling boundary: everything downstream of it is submitted
    /// to the scheduler instead of running on the current thread.
    fn schedule(self) -> Schedule<Self> {
        Schedule::new(self)
    }

    /// Start the graph and return without waiting for it. The final output is
    /// dropped.
    fn execute<S: Scheduler>(self, scheduler: &S) {
        self.walk_up(scheduler, Done);
    }

    /// Run the graph on `scheduler` and block until its output is available.
    ///
    /// There is no fault channel: if a step panics on a worker thread the
    /// graph never completes and this call blocks forever. With
    /// [`Inline`](crate::scheduler::Inline) the panic reaches the caller
    /// instead. Rayon's global pool ([`Pool::global`](crate::scheduler::Pool::global))
    /// aborts the process on a step panic; a pool built with
    /// [`Pool::with_config`](crate::scheduler::Pool::with_config) only loses
    /// the faulting unit.
    fn wait_and_get<S: Scheduler>(self, scheduler: &S) -> Self::Output {
        drive::wait_and_get(self, scheduler)
    }
}

/// The downstream part of a graph collected during the walk-up: a stage that
/// accepts its predecessor's output and carries the remaining stages with it.
pub trait Cascade<In>: Send + 'static {
    /// Compute this stage from `input` and pass the result further down.
    fn execute<S: Scheduler>(self, scheduler: &S, input: In);
}

/// Terminal stage that discards the final output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Done;

impl<In> Cascade<In> for Done {
    #[inline]
    fn execute<S: Scheduler>(self, _scheduler: &S, _input: In) {}
}
