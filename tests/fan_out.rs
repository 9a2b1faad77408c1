#![allow(missing_docs)]
#![cfg(not(feature = "loom"))]

use ctg::{Graph, Inline, Nothing, Pool, Scheduler, ThreadPerTask, initiate, initiate_all};
use rand::Rng;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

fn jitter() {
    let micros = rand::thread_rng().gen_range(0..400);
    thread::sleep(Duration::from_micros(micros));
}

#[test]
fn pair_is_ordered() {
    let graph = initiate_all((|| 1, || 2));
    assert_eq!(graph.wait_and_get(&ThreadPerTask::new()), (1, 2));
}

#[test]
fn pair_is_ordered_under_random_timing() {
    let scheduler = ThreadPerTask::new();
    for _ in 0..1000 {
        let graph = initiate_all((
            || {
                jitter();
                1
            },
            || {
                jitter();
                2
            },
        ));
        assert_eq!(graph.wait_and_get(&scheduler), (1, 2));
    }
}

#[test]
fn chain_after_fan_out() {
    let graph = initiate_all((|| 1, || 1)).then(|t: (i32, i32)| t.0 + t.1);
    assert_eq!(graph.wait_and_get(&ThreadPerTask::new()), 2);
}

#[test]
fn joined_output_can_be_spread_into_arguments() {
    let graph = initiate_all((|| 2, || "x", || 'y')).then(|n: usize, s: &'static str, c: char| {
        format!("{}{c}", s.repeat(n))
    });
    assert_eq!(graph.wait_and_get(&Inline), "xxy");
}

fn join_exactly_once<S: Scheduler>(scheduler: &S) {
    let joins = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&joins);
    let graph = initiate_all((
        || {
            jitter();
            1
        },
        || {
            jitter();
            2
        },
        || {
            jitter();
            3
        },
        || {
            jitter();
            4
        },
        || {
            jitter();
            5
        },
    ))
    .then(move |t: (i32, i32, i32, i32, i32)| {
        counter.fetch_add(1, Ordering::SeqCst);
        t.0 + t.1 + t.2 + t.3 + t.4
    });
    assert_eq!(graph.wait_and_get(scheduler), 15);
    assert_eq!(joins.load(Ordering::SeqCst), 1);
}

#[test]
fn five_siblings_join_exactly_once() {
    let threads = ThreadPerTask::new();
    let pool = Pool::global();
    for _ in 0..200 {
        join_exactly_once(&threads);
        join_exactly_once(&pool);
    }
    join_exactly_once(&Inline);
}

#[test]
fn siblings_run_exactly_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let siblings: Vec<_> = (0..8)
        .map(|idx| {
            let runs = Arc::clone(&runs);
            move || {
                runs.fetch_add(1, Ordering::SeqCst);
                idx
            }
        })
        .collect();
    let joined = initiate_all(siblings).wait_and_get(&ThreadPerTask::new());
    assert_eq!(joined, (0..8).collect::<Vec<_>>());
    assert_eq!(runs.load(Ordering::SeqCst), 8);
}

#[test]
fn vec_siblings_keep_order_under_random_timing() {
    let scheduler = Pool::global();
    for _ in 0..100 {
        let siblings: Vec<_> = (0..6_u32)
            .map(|idx| {
                move |base: u32| {
                    jitter();
                    base + idx
                }
            })
            .collect();
        let graph = initiate(|| 100_u32).then_all(siblings);
        assert_eq!(graph.wait_and_get(&scheduler), vec![100, 101, 102, 103, 104, 105]);
    }
}

#[test]
fn empty_vec_joins_immediately() {
    let siblings: Vec<fn() -> u8> = Vec::new();
    let graph = initiate_all(siblings).then(|v: Vec<u8>| v.len());
    assert_eq!(graph.wait_and_get(&ThreadPerTask::new()), 0);
}

#[test]
fn siblings_share_a_cloned_input() {
    let graph = initiate(|| vec![1, 2, 3]).then_all((
        |v: Vec<i32>| v.iter().sum::<i32>(),
        |v: Vec<i32>| v.len(),
        |v: Vec<i32>| v.into_iter().max(),
    ));
    assert_eq!(graph.wait_and_get(&ThreadPerTask::new()), (6, 3, Some(3)));
}

#[test]
fn void_siblings_join_into_nothing() {
    let graph = initiate_all((|| {}, || 7)).then(|(): Nothing, x: i32| x * 6);
    assert_eq!(graph.wait_and_get(&Inline), 42);
}

#[test]
fn nested_fan_outs_under_random_timing() {
    let scheduler = ThreadPerTask::new();
    for _ in 0..200 {
        let graph = initiate_all((
            || {
                jitter();
                1
            },
            || {
                jitter();
                2
            },
            || {
                jitter();
                3
            },
        ))
        .then_all((
            |t: (i32, i32, i32)| {
                jitter();
                assert_eq!(t.0 + t.1 + t.2, 6);
                0
            },
            |t: (i32, i32, i32)| {
                jitter();
                assert_eq!(t.0 + t.1 + t.2, 6);
                1
            },
        ))
        .then_all((
            |(a, b): (i32, i32)| {
                assert_eq!(a + b, 1);
                String::from("hello")
            },
            |(a, b): (i32, i32)| {
                assert_eq!(a + b, 1);
                String::from("world")
            },
        ))
        .then(|s0: String, s1: String| s0 + &s1);
        assert_eq!(graph.wait_and_get(&scheduler), "helloworld");
    }
}

#[test]
fn schedulers_agree_on_results() {
    fn build() -> impl Graph<Output = (String, usize)> {
        initiate_all((|| 3_usize, || 4_usize))
            .then(|a: usize, b: usize| a * b)
            .then_all((|n: usize| "*".repeat(n), |n: usize| n + 1))
    }

    let inline = build().wait_and_get(&Inline);
    let threads = build().wait_and_get(&ThreadPerTask::new());
    let pool = build().wait_and_get(&Pool::global());
    assert_eq!(inline, ("*".repeat(12), 13));
    assert_eq!(threads, inline);
    assert_eq!(pool, inline);
}
