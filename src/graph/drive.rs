use crate::{
    continuation::WithArg,
    graph::Graph,
    latch::Latch,
    scheduler::Scheduler,
    sync::Arc,
    types::Slot,
};
use tracing::debug;

/// Where the terminal step of `wait_and_get` leaves the final output.
struct Handoff<T> {
    latch: Latch,
    output: Slot<T>,
}

pub(super) fn wait_and_get<G, S>(graph: G, scheduler: &S) -> G::Output
where
    G: Graph,
    S: Scheduler,
{
    let handoff = Arc::new(Handoff {
        latch: Latch::new(),
        output: Slot::default(),
    });
    let sink = Arc::clone(&handoff);
    let graph = graph.then::<_, WithArg>(move |output: G::Output| {
        // SAFETY: The terminal step runs once and is the only writer; the
        // waiting thread reads only after `count_down`, which releases the
        // latch mutex after this store.
        unsafe { sink.output.put(output) };
        sink.latch.count_down();
    });

    debug!(
        output = core::any::type_name::<G::Output>(),
        "waiting for graph to complete"
    );
    graph.execute(scheduler);
    handoff.latch.wait();
    debug!("graph completed");

    // SAFETY: `wait` returned, so the terminal step's store happened-before
    // this read and no other thread touches the slot any more.
    unsafe { handoff.output.take() }
}
