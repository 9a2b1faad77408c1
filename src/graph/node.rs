use crate::{
    continuation::Continuation,
    graph::{Cascade, Graph},
    scheduler::Scheduler,
    types::Nothing,
};
use core::marker::PhantomData;
use derive_more::Debug;

/// The empty predecessor of every graph.
///
/// It produces [`Nothing`] and is where the walk-up turns into the cascade.
#[must_use]
#[derive(Debug, Clone, Copy, Default)]
pub struct Root;

impl Graph for Root {
    type Output = Nothing;

    fn walk_up<S, K>(self, scheduler: &S, children: K)
    where
        S: Scheduler,
        K: Cascade<Nothing>,
    {
        children.execute(scheduler, ());
    }
}

/// Scheduling boundary: the rest of the chain runs as a unit of work on the
/// scheduler. The predecessor's output is forwarded unchanged.
#[must_use]
#[derive(Debug)]
pub struct Schedule<P> {
    parent: P,
}

impl<P: Graph> Schedule<P> {
    pub(crate) fn new(parent: P) -> Self {
        Self { parent }
    }
}

impl<P: Graph> Graph for Schedule<P> {
    type Output = P::Output;

    fn walk_up<S, K>(self, scheduler: &S, children: K)
    where
        S: Scheduler,
        K: Cascade<Self::Output>,
    {
        let Self { parent } = self;
        parent.walk_up(scheduler, Hop { rest: children });
    }
}

/// Stage of a [`Schedule`] node.
#[derive(Debug)]
pub struct Hop<K> {
    rest: K,
}

impl<In, K> Cascade<In> for Hop<K>
where
    In: Send + 'static,
    K: Cascade<In>,
{
    fn execute<S: Scheduler>(self, scheduler: &S, input: In) {
        let Self { rest } = self;
        let inner = scheduler.clone();
        scheduler.schedule(move || rest.execute(&inner, input));
    }
}

/// Step node: one callable applied to the predecessor's output.
#[must_use]
#[derive(Debug)]
pub struct Then<P, F, M> {
    parent: P,
    #[debug(skip)]
    f: F,
    _marker: PhantomData<fn() -> M>,
}

impl<P, F, M> Then<P, F, M>
where
    P: Graph,
    F: Continuation<P::Output, M>,
{
    pub(crate) fn new(parent: P, f: F) -> Self {
        Self {
            parent,
            f,
            _marker: PhantomData,
        }
    }
}

impl<P, F, M> Graph for Then<P, F, M>
where
    P: Graph,
    F: Continuation<P::Output, M>,
    M: 'static,
{
    type Output = F::Output;

    fn walk_up<S, K>(self, scheduler: &S, children: K)
    where
        S: Scheduler,
        K: Cascade<Self::Output>,
    {
        let Self {
            parent,
            f,
            _marker,
        } = self;
        parent.walk_up(
            scheduler,
            Step {
                f,
                rest: children,
                _marker,
            },
        );
    }
}

/// Stage of a [`Then`] node.
#[derive(Debug)]
pub struct Step<F, M, K> {
    #[debug(skip)]
    f: F,
    rest: K,
    _marker: PhantomData<fn() -> M>,
}

impl<In, F, M, K> Cascade<In> for Step<F, M, K>
where
    F: Continuation<In, M>,
    K: Cascade<F::Output>,
    M: 'static,
{
    #[inline]
    fn execute<S: Scheduler>(self, scheduler: &S, input: In) {
        let Self { f, rest, _marker } = self;
        rest.execute(scheduler, f.run(input));
    }
}
