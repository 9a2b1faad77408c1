#[cfg(not(feature = "loom"))]
use crate::sync::{LoomPtrCompat, LoomUnsafeCellCompat};
use crate::sync::UnsafeCell;
use derive_more::{Debug, Deref, DerefMut};

/// The absence value: what a step produces when it has nothing to return.
///
/// It is the unit type, so a closure with no return value already produces
/// it, and a zero-argument closure accepts it as its (dropped) input. The
/// graph root yields `Nothing` to the first step.
pub type Nothing = ();

/// A minimal `UnsafeCell` wrapper that is `Sync` when `T: Send`.
///
/// Used internally for single-writer hand-off slots: every cell is written by
/// exactly one thread and read by exactly one thread, and the two accesses are
/// ordered by an atomic countdown or a latch.
#[derive(Debug, Deref, DerefMut)]
#[repr(transparent)]
pub(crate) struct SyncUnsafeCell<T>(UnsafeCell<T>);

unsafe impl<T: Send> Sync for SyncUnsafeCell<T> {}

impl<T> SyncUnsafeCell<T> {
    pub(crate) fn new(val: T) -> Self {
        Self(UnsafeCell::new(val))
    }
}

/// Write-once, take-once value cell shared between a producer and a consumer
/// thread.
pub(crate) struct Slot<T>(SyncUnsafeCell<Option<T>>);

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Slot<T> {
    pub(crate) fn empty() -> Self {
        Self(SyncUnsafeCell::new(None))
    }

    /// # Safety
    ///
    /// No other thread may access the slot concurrently, and the consumer must
    /// only call [`Slot::take`] after a happens-before edge from this store.
    pub(crate) unsafe fn put(&self, value: T) {
        // SAFETY: Exclusive access is guaranteed by the caller.
        unsafe { self.0.get_mut().with(|ptr| *ptr = Some(value)) };
    }

    /// # Safety
    ///
    /// The producer's store must happen-before this call, and no other thread
    /// may access the slot concurrently.
    pub(crate) unsafe fn take(&self) -> T {
        // SAFETY: Exclusive access and visibility are guaranteed by the caller.
        let value = unsafe { self.0.get_mut().with(|ptr| (*ptr).take()) };
        value.expect("Slot::take")
    }
}
