#![allow(missing_docs)]
#![cfg(not(feature = "loom"))]

use ctg::{Graph, Inline, Nothing, Pool, ThreadPerTask, initiate};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
};

#[test]
fn single_step() {
    assert_eq!(initiate(|| 1).wait_and_get(&Inline), 1);
    assert_eq!(initiate(|| 1).wait_and_get(&ThreadPerTask::new()), 1);
}

#[test]
fn linear_composition_inline() {
    let graph = initiate(|| 1)
        .then(|x: i32| x + 1)
        .then(|x: i32| x + 1);
    assert_eq!(graph.wait_and_get(&Inline), 3);
}

#[test]
fn linear_composition_threaded() {
    let graph = initiate(|| 1)
        .then(|x: i32| x + 1)
        .then(|x: i32| x + 1);
    assert_eq!(graph.wait_and_get(&ThreadPerTask::new()), 3);
}

#[test]
fn output_type_changes_along_the_chain() {
    let graph = initiate(|| 21_u64)
        .then(|x: u64| x * 2)
        .then(|x: u64| format!("answer={x}"))
        .then(|s: String| s.len());
    assert_eq!(graph.wait_and_get(&Inline), "answer=42".len());
}

#[test]
fn void_step_feeds_nullary_step_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let graph = initiate(|| 1)
        .then(|_: i32| {})
        .then(move || counter.fetch_add(1, Ordering::SeqCst) + 10);
    assert_eq!(graph.wait_and_get(&ThreadPerTask::new()), 10);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn void_graph_yields_nothing() {
    let (): Nothing = initiate(|| {}).then(|| {}).wait_and_get(&Inline);
}

#[test]
fn nothing_is_delivered_when_declared() {
    let graph = initiate(|| {}).then(|absent: Nothing| {
        let (): Nothing = absent;
        "received"
    });
    assert_eq!(graph.wait_and_get(&Inline), "received");
}

#[test]
fn steps_run_in_chain_order() {
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));
    let (a, b, c) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));
    initiate(move || a.lock().unwrap().push("first"))
        .then(move || b.lock().unwrap().push("second"))
        .then(move || c.lock().unwrap().push("third"))
        .wait_and_get(&ThreadPerTask::new());
    assert_eq!(*log.lock().unwrap(), ["first", "second", "third"]);
}

#[test]
fn initiate_runs_off_the_calling_thread() {
    let caller = thread::current().id();
    let worker = initiate(|| thread::current().id()).wait_and_get(&ThreadPerTask::new());
    assert_ne!(caller, worker);
}

#[test]
fn scheduling_boundary_mid_chain() {
    let caller = thread::current().id();
    let (before, after) = initiate(|| 5)
        .then(|x: i32| (x, thread::current().id()))
        .schedule()
        .then(|(x, before): (i32, thread::ThreadId)| (x * 2, before, thread::current().id()))
        .then(|(x, before, after): (i32, thread::ThreadId, thread::ThreadId)| {
            assert_eq!(x, 10);
            (before, after)
        })
        .wait_and_get(&ThreadPerTask::new());
    assert_ne!(before, caller);
    assert_ne!(after, caller);
    assert_ne!(before, after);
}

#[test]
fn scheduling_boundary_forwards_output_inline() {
    let graph = initiate(|| "kept").schedule().schedule().then(|s: &'static str| s.len());
    assert_eq!(graph.wait_and_get(&Inline), 4);
}

#[test]
fn execute_starts_without_waiting() {
    let (tx, rx) = mpsc::channel();
    initiate(|| 40)
        .then(|x: i32| x + 2)
        .then(move |x: i32| tx.send(x).unwrap())
        .execute(&ThreadPerTask::new());
    assert_eq!(rx.recv().unwrap(), 42);
}

#[test]
fn execute_returns_before_the_first_step_finishes() {
    let (start_tx, start_rx) = mpsc::channel::<()>();
    let (done_tx, done_rx) = mpsc::channel();
    initiate(move || {
        start_rx.recv().unwrap();
        1
    })
    .then(move |x: i32| done_tx.send(x + 1).unwrap())
    .execute(&ThreadPerTask::new());
    // The first step is still blocked here; a blocking `execute` would never
    // get this far.
    start_tx.send(()).unwrap();
    assert_eq!(done_rx.recv().unwrap(), 2);
}

#[test]
fn long_chain_on_pool() {
    let pool = Pool::global();
    let graph = initiate(|| 0_u32)
        .then(|x: u32| x + 1)
        .schedule()
        .then(|x: u32| x + 1)
        .schedule()
        .then(|x: u32| x + 1)
        .then(|x: u32| x + 1);
    assert_eq!(graph.wait_and_get(&pool), 4);
}
