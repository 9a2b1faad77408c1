use crate::sync::{Condvar, Mutex};
use std::sync::PoisonError;

/// Single-shot completion signal: one `count_down`, any number of waiters.
///
/// The flag and the condition variable are only touched under the mutex, so a
/// value written before `count_down` is visible to every thread returning
/// from `wait`.
#[derive(Debug)]
pub struct Latch {
    finished: Mutex<bool>,
    cv: Condvar,
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

impl Latch {
    /// Create an unsignalled latch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            finished: Mutex::new(false),
            cv: Condvar::new(),
        }
    }

    /// Signal completion and wake all waiters.
    ///
    /// Intended to be called once per logical completion.
    pub fn count_down(&self) {
        let mut finished = self.finished.lock().unwrap_or_else(PoisonError::into_inner);
        *finished = true;
        self.cv.notify_all();
    }

    /// Block until [`Latch::count_down`] has been called. Has no timeout.
    pub fn wait(&self) {
        let mut finished = self.finished.lock().unwrap_or_else(PoisonError::into_inner);
        while !*finished {
            finished = self
                .cv
                .wait(finished)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Whether the latch has already been signalled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        *self.finished.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use std::{sync::Arc, thread, time::Duration};

    #[test]
    fn wait_returns_after_count_down() {
        let latch = Arc::new(Latch::new());
        assert!(!latch.is_finished());

        let signaller = {
            let latch = Arc::clone(&latch);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                latch.count_down();
            })
        };
        latch.wait();
        assert!(latch.is_finished());
        signaller.join().unwrap();
    }

    #[test]
    fn releases_every_waiter() {
        let latch = Arc::new(Latch::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let latch = Arc::clone(&latch);
                thread::spawn(move || latch.wait())
            })
            .collect();
        latch.count_down();
        for waiter in waiters {
            waiter.join().unwrap();
        }
    }

    #[test]
    fn wait_after_signal_does_not_block() {
        let latch = Latch::new();
        latch.count_down();
        latch.wait();
        latch.wait();
    }
}
