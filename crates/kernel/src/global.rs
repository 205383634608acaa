use core::cell::UnsafeCell;

/// Minimal wrapper to store kernel state in statics.
///
/// Safety: the kernel runs on one hart and traps never nest, so boot code
/// and the trap handler never hold references at the same time.
pub struct KernelCell<T> {
    inner: UnsafeCell<T>,
}

impl<T> KernelCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: UnsafeCell::new(value),
        }
    }

    /// # Safety
    /// Callers must ensure no other reference obtained from this cell is live.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn get_mut(&self) -> &mut T {
        unsafe { &mut *self.inner.get() }
    }
}

unsafe impl<T> Sync for KernelCell<T> {}
