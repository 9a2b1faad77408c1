use crate::{
    continuation::Continuation,
    graph::{Cascade, Graph},
    scheduler::Scheduler,
    sync::{Arc, AtomicUsize, Ordering, fence},
    types::Slot,
};
use core::marker::PhantomData;
use derive_more::Debug;
use tracing::trace;

/// Fan-out/join node: several sibling callables share one predecessor and
/// their outputs are joined, in sibling order, exactly once.
#[must_use]
#[derive(Debug)]
pub struct WhenAll<P, Fs, M> {
    parent: P,
    #[debug(skip)]
    siblings: Fs,
    _marker: PhantomData<fn() -> M>,
}

impl<P, Fs, M> WhenAll<P, Fs, M>
where
    P: Graph,
    Fs: Siblings<P::Output, M>,
{
    pub(crate) fn new(parent: P, siblings: Fs) -> Self {
        Self {
            parent,
            siblings,
            _marker: PhantomData,
        }
    }
}

impl<P, Fs, M> Graph for WhenAll<P, Fs, M>
where
    P: Graph,
    Fs: Siblings<P::Output, M>,
    M: 'static,
{
    type Output = Fs::Output;

    fn walk_up<S, K>(self, scheduler: &S, children: K)
    where
        S: Scheduler,
        K: Cascade<Self::Output>,
    {
        let Self {
            parent,
            siblings,
            _marker,
        } = self;
        parent.walk_up(
            scheduler,
            Join {
                siblings,
                rest: children,
                _marker,
            },
        );
    }
}

/// Stage of a [`WhenAll`] node.
#[derive(Debug)]
pub struct Join<Fs, M, K> {
    #[debug(skip)]
    siblings: Fs,
    rest: K,
    _marker: PhantomData<fn() -> M>,
}

impl<In, Fs, M, K> Cascade<In> for Join<Fs, M, K>
where
    Fs: Siblings<In, M>,
    K: Cascade<Fs::Output>,
    M: 'static,
{
    fn execute<S: Scheduler>(self, scheduler: &S, input: In) {
        let Self {
            siblings,
            rest,
            _marker,
        } = self;
        siblings.fork(scheduler, input, rest);
    }
}

/// A group of sibling callables that run concurrently on the same input.
///
/// Implemented for tuples of 2 to 8 [`Continuation`]s (heterogeneous outputs,
/// joined into a tuple) and for `Vec<F>` (joined into a `Vec`).
pub trait Siblings<In, M>: Send + 'static {
    /// Joined outputs, in sibling order.
    type Output: Send + 'static;

    /// Run every sibling on `input` and hand the joined output to `rest`.
    ///
    /// All siblings but the last are submitted to `scheduler`; the last one
    /// runs on the calling thread. Whichever sibling finishes last runs
    /// `rest`.
    fn fork<S, K>(self, scheduler: &S, input: In, rest: K)
    where
        S: Scheduler,
        K: Cascade<Self::Output>;
}

/// Marker for a homogeneous `Vec` of siblings.
#[derive(Debug, Clone, Copy)]
pub struct Many<M>(PhantomData<fn() -> M>);

/// Per-sibling output slots that can be turned into the joined output once
/// every slot has been written.
pub(crate) trait SlotArray: Send + Sync + 'static {
    type Output: Send + 'static;

    /// # Safety
    ///
    /// Every slot is written and those writes happen-before this call. Called
    /// at most once.
    unsafe fn assemble(&self) -> Self::Output;
}

impl<T: Send + 'static> SlotArray for Vec<Slot<T>> {
    type Output = Vec<T>;

    unsafe fn assemble(&self) -> Vec<T> {
        // SAFETY: Guaranteed by the caller.
        self.iter().map(|slot| unsafe { slot.take() }).collect()
    }
}

/// Shared state of one fan-out execution.
///
/// `left` counts the siblings that haven't finished yet. Each sibling writes
/// only its own slot, so the slots need no locking; the sibling that brings
/// `left` to zero owns the join.
pub(crate) struct JoinState<A, K> {
    left: AtomicUsize,
    slots: A,
    rest: Slot<K>,
}

impl<A, K> JoinState<A, K>
where
    A: SlotArray,
    K: Cascade<A::Output>,
{
    fn new(siblings: usize, slots: A, rest: K) -> Self {
        let state = Self {
            left: AtomicUsize::new(siblings),
            slots,
            rest: Slot::default(),
        };
        // SAFETY: `state` is not shared with any other thread yet.
        unsafe { state.rest.put(rest) };
        state
    }

    /// Record that one sibling has stored its output. The caller that
    /// observes the countdown reaching zero assembles the outputs and runs
    /// the downstream stage.
    fn arrive<S: Scheduler>(&self, scheduler: &S) {
        fence(Ordering::Release);
        if self.left.fetch_sub(1, Ordering::Relaxed) != 1 {
            return;
        }
        fence(Ordering::Acquire);
        // SAFETY: Every sibling stored its output before its Release fence and
        // decrement; the Acquire fence above makes all of those stores visible.
        // Exactly one decrement observes 1, so nobody else touches the slots.
        let (output, rest) = unsafe { (self.slots.assemble(), self.rest.take()) };
        trace!(output = core::any::type_name::<A::Output>(), "fan-out joined");
        rest.execute(scheduler, output);
    }
}

impl<In, F, M> Siblings<In, Many<M>> for Vec<F>
where
    In: Clone + Send + 'static,
    F: Continuation<In, M>,
    M: 'static,
{
    type Output = Vec<F::Output>;

    fn fork<S, K>(self, scheduler: &S, input: In, rest: K)
    where
        S: Scheduler,
        K: Cascade<Self::Output>,
    {
        let mut siblings = self.into_iter();
        let Some(last) = siblings.next_back() else {
            // Nothing to wait for.
            rest.execute(scheduler, Vec::new());
            return;
        };
        let total = siblings.len() + 1;
        let slots: Vec<Slot<F::Output>> = (0..total).map(|_| Slot::default()).collect();
        let state = Arc::new(JoinState::new(total, slots, rest));

        for (idx, sibling) in siblings.enumerate() {
            let input = input.clone();
            let state = Arc::clone(&state);
            let inner = scheduler.clone();
            scheduler.schedule(move || {
                let output = sibling.run(input);
                // SAFETY: Slot `idx` belongs to this sibling alone.
                unsafe { state.slots[idx].put(output) };
                state.arrive(&inner);
            });
        }

        let output = last.run(input);
        // SAFETY: The last slot belongs to the inline sibling alone.
        unsafe { state.slots[total - 1].put(output) };
        state.arrive(scheduler);
    }
}

macro_rules! impl_siblings {
    ($($idx:tt $F:ident $M:ident),* ; $last:tt $LF:ident $LM:ident) => {
        impl<$($F: Send + 'static,)* $LF: Send + 'static> SlotArray for ($(Slot<$F>,)* Slot<$LF>,) {
            type Output = ($($F,)* $LF,);

            unsafe fn assemble(&self) -> Self::Output {
                // SAFETY: Guaranteed by the caller.
                unsafe { ($(self.$idx.take(),)* self.$last.take(),) }
            }
        }

        impl<In, $($F, $M,)* $LF, $LM> Siblings<In, ($($M,)* $LM,)> for ($($F,)* $LF,)
        where
            In: Clone + Send + 'static,
            $($F: Continuation<In, $M>, $M: 'static,)*
            $LF: Continuation<In, $LM>,
            $LM: 'static,
        {
            type Output = (
                $(<$F as Continuation<In, $M>>::Output,)*
                <$LF as Continuation<In, $LM>>::Output,
            );

            fn fork<S, K>(self, scheduler: &S, input: In, rest: K)
            where
                S: Scheduler,
                K: Cascade<Self::Output>,
            {
                let slots: (
                    $(Slot<<$F as Continuation<In, $M>>::Output>,)*
                    Slot<<$LF as Continuation<In, $LM>>::Output>,
                ) = Default::default();
                let state = Arc::new(JoinState::new($last + 1, slots, rest));

                $(
                    let sibling = self.$idx;
                    let sibling_input = input.clone();
                    let sibling_state = Arc::clone(&state);
                    let inner = scheduler.clone();
                    scheduler.schedule(move || {
                        let output = sibling.run(sibling_input);
                        // SAFETY: This slot belongs to this sibling alone.
                        unsafe { sibling_state.slots.$idx.put(output) };
                        sibling_state.arrive(&inner);
                    });
                )*

                let output = self.$last.run(input);
                // SAFETY: The last slot belongs to the inline sibling alone.
                unsafe { state.slots.$last.put(output) };
                state.arrive(scheduler);
            }
        }
    };
}

impl_siblings!(0 F0 M0; 1 F1 M1);
impl_siblings!(0 F0 M0, 1 F1 M1; 2 F2 M2);
impl_siblings!(0 F0 M0, 1 F1 M1, 2 F2 M2; 3 F3 M3);
impl_siblings!(0 F0 M0, 1 F1 M1, 2 F2 M2, 3 F3 M3; 4 F4 M4);
impl_siblings!(0 F0 M0, 1 F1 M1, 2 F2 M2, 3 F3 M3, 4 F4 M4; 5 F5 M5);
impl_siblings!(0 F0 M0, 1 F1 M1, 2 F2 M2, 3 F3 M3, 4 F4 M4, 5 F5 M5; 6 F6 M6);
impl_siblings!(0 F0 M0, 1 F1 M1, 2 F2 M2, 3 F3 M3, 4 F4 M4, 5 F5 M5, 6 F6 M6; 7 F7 M7);
