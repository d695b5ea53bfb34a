//! Shared in-flight flags (`processing`, `page_loading`, `app_loading`).
//!
//! The flag is cleared when the guard drops, so every exit path of an
//! action (success, failure, early return) releases it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle to a boolean in-flight flag.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag {
    inner: Arc<AtomicBool>,
}

impl BusyFlag {
    /// Create a cleared flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the flag is currently set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    /// Set the flag if it is clear. Returns `None` when it was already set.
    #[must_use]
    pub fn try_begin(&self) -> Option<BusyGuard> {
        self.inner
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                inner: Arc::clone(&self.inner),
            })
    }

    /// Set the flag unconditionally.
    #[must_use]
    pub fn begin(&self) -> BusyGuard {
        self.inner.store(true, Ordering::Release);
        BusyGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Clears the owning [`BusyFlag`] on drop.
#[derive(Debug)]
pub struct BusyGuard {
    inner: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.inner.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::BusyFlag;

    #[test]
    fn guard_clears_flag_on_drop() {
        let flag = BusyFlag::new();
        let observer = flag.clone();
        {
            let _guard = flag.begin();
            assert!(observer.is_set());
        }
        assert!(!observer.is_set());
    }

    #[test]
    fn try_begin_refuses_while_set() {
        let flag = BusyFlag::new();
        let guard = flag.try_begin();
        assert!(guard.is_some());
        assert!(flag.try_begin().is_none());
        drop(guard);
        assert!(flag.try_begin().is_some());
    }
}
