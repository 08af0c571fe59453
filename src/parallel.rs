//! Shared-mutable scratch buffers for the parallel pipeline stages.
//!
//! The vertex, assembly, rasterizer, and fragment stages all dispatch over
//! `rayon`, with every work item writing to a disjoint slot of a `Vec` it
//! shares with every other work item in the stage. Wrapping the whole `Vec`
//! in a `Mutex` would serialize what's supposed to be embarrassingly
//! parallel, so instead each scratch buffer is held behind
//! `TrustedThreadSafe`, an unsafe cell that asserts the caller already
//! guarantees disjoint access.

use std::cell::UnsafeCell;

/// An `UnsafeCell` wrapper that is unconditionally `Send` and `Sync`.
///
/// Safety is the caller's responsibility: every stage that hands out a
/// `TrustedThreadSafe<Vec<T>>` to its worker closures must guarantee that no
/// two workers ever write to (or read, while another writes) the same index
/// concurrently. The vertex stage, primitive assembly, and fragment shader
/// all satisfy this because each work item owns exactly one output slot (one
/// vertex, one primitive, one pixel). The rasterizer additionally guards
/// concurrent writes to the *same* pixel from different primitives with the
/// per-pixel mutex buffer in [`crate::pipeline`].
pub struct TrustedThreadSafe<T> {
    inner: UnsafeCell<T>,
}

impl<T> TrustedThreadSafe<T> {
    /// Wraps a value for disjoint-access parallel mutation.
    pub fn new(value: T) -> TrustedThreadSafe<T> {
        TrustedThreadSafe { inner: UnsafeCell::new(value) }
    }

    /// Borrows the wrapped value immutably.
    ///
    /// # Safety
    /// No other caller may hold a `&mut` borrow of the same index/region at
    /// the same time.
    #[inline(always)]
    pub unsafe fn as_ref(&self) -> &T {
        &*self.inner.get()
    }

    /// Borrows the wrapped value mutably.
    ///
    /// # Safety
    /// No other caller may hold any borrow of the same index/region at the
    /// same time.
    #[allow(clippy::mut_from_ref)]
    #[inline(always)]
    pub unsafe fn as_mut(&self) -> &mut T {
        &mut *self.inner.get()
    }

    /// Unwraps back into an owned value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

unsafe impl<T> Send for TrustedThreadSafe<T> {}

unsafe impl<T> Sync for TrustedThreadSafe<T> {}
