//! Request-scoped rewrite state.

use std::cell::Cell;

/// Enable latch and re-entrancy lock for URL rewriting.
///
/// Lives inside a [`RequestContext`], so state never outlives the request
/// that created it. `Cell` keeps it `!Sync`: a context is only ever touched
/// by the worker serving its request.
#[derive(Debug)]
pub struct RewriteGuard {
    enabled: Cell<bool>,
    locked: Cell<bool>,
}

impl Default for RewriteGuard {
    fn default() -> Self {
        Self {
            enabled: Cell::new(true),
            locked: Cell::new(false),
        }
    }
}

impl RewriteGuard {
    /// Stop rewriting for the rest of the request. There is no way back.
    pub fn disable(&self) {
        self.enabled.set(false);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    #[cfg(test)]
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Take the re-entrancy lock, or `None` if a rewrite is already running.
    ///
    /// The lock is released when the returned token drops, on every exit
    /// path including unwinding.
    pub fn try_lock(&self) -> Option<RewriteLock<'_>> {
        if self.locked.replace(true) {
            return None;
        }
        Some(RewriteLock { flag: &self.locked })
    }
}

/// Held while a rewrite callback computes its URL.
#[must_use = "the lock is released as soon as the token is dropped"]
pub struct RewriteLock<'a> {
    flag: &'a Cell<bool>,
}

impl Drop for RewriteLock<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Per-request state threaded through the router and every filter.
#[derive(Debug, Default)]
pub struct RequestContext {
    guard: RewriteGuard,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn guard(&self) -> &RewriteGuard {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn test_defaults() {
        let guard = RewriteGuard::default();
        assert!(guard.is_enabled());
        assert!(!guard.is_locked());
    }

    #[test]
    fn test_disable_is_one_way() {
        let ctx = RequestContext::new();
        ctx.guard().disable();
        ctx.guard().disable();
        assert!(!ctx.guard().is_enabled());
    }

    #[test]
    fn test_lock_is_exclusive() {
        let guard = RewriteGuard::default();
        let outer = guard.try_lock();
        assert!(outer.is_some());
        assert!(guard.try_lock().is_none());

        drop(outer);
        assert!(!guard.is_locked());
        assert!(guard.try_lock().is_some());
    }

    #[test]
    fn test_lock_released_on_panic() {
        let guard = RewriteGuard::default();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _lock = guard.try_lock().unwrap();
            panic!("rewrite failed");
        }));

        assert!(result.is_err());
        assert!(!guard.is_locked());
    }

    #[test]
    fn test_contexts_are_independent() {
        let first = RequestContext::new();
        let second = RequestContext::new();
        first.guard().disable();
        assert!(second.guard().is_enabled());
    }
}
