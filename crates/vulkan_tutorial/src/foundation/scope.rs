//! Scoped ownership of external handles
//!
//! [`ScopedHandle`] pairs a resource with the function that frees it, so the
//! resource is released exactly once: either explicitly through
//! [`ScopedHandle::release`] or when the handle goes out of scope. An empty
//! handle releases as a no-op.
//!
//! Structs that own several handles get reverse-acquisition teardown from
//! field order: Rust drops fields top to bottom, so the handle acquired last
//! is declared first.
//!
//! [`ScopeGuard`] is the plain "run this on scope exit unless committed"
//! helper for cleanup that is not tied to a single value.

use std::fmt;

type ReleaseFn<T> = Box<dyn FnOnce(T)>;

/// Owns one external resource and releases it exactly once
pub struct ScopedHandle<T> {
    label: &'static str,
    resource: Option<T>,
    release: Option<ReleaseFn<T>>,
}

impl<T> ScopedHandle<T> {
    /// Take ownership of `resource`; `release` runs when the handle is released
    pub fn new(label: &'static str, resource: T, release: impl FnOnce(T) + 'static) -> Self {
        log::debug!("Acquired {}", label);
        Self {
            label,
            resource: Some(resource),
            release: Some(Box::new(release)),
        }
    }

    /// A handle that owns nothing; releasing it does nothing
    pub const fn empty(label: &'static str) -> Self {
        Self {
            label,
            resource: None,
            release: None,
        }
    }

    /// Whether the handle currently owns a resource
    pub const fn is_empty(&self) -> bool {
        self.resource.is_none()
    }

    /// Borrow the resource
    pub const fn get(&self) -> Option<&T> {
        self.resource.as_ref()
    }

    /// Mutably borrow the resource
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.resource.as_mut()
    }

    /// Move the resource out without releasing it
    ///
    /// The caller becomes responsible for the resource; the handle is left empty.
    pub fn take(&mut self) -> Option<T> {
        self.release = None;
        self.resource.take()
    }

    /// Release the resource now
    pub fn release(&mut self) {
        if let (Some(resource), Some(release)) = (self.resource.take(), self.release.take()) {
            log::debug!("Releasing {}", self.label);
            release(resource);
        }
    }
}

impl<T> Drop for ScopedHandle<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: fmt::Debug> fmt::Debug for ScopedHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedHandle")
            .field("label", &self.label)
            .field("resource", &self.resource)
            .finish()
    }
}

/// Runs a closure when dropped, unless committed first
#[must_use = "the guard runs its closure as soon as it is dropped"]
pub struct ScopeGuard<F: FnOnce()> {
    guard: Option<F>,
}

impl<F: FnOnce()> ScopeGuard<F> {
    /// Arm a guard
    pub const fn new(guard: F) -> Self {
        Self { guard: Some(guard) }
    }

    /// Disarm the guard; the closure will not run
    pub fn commit(mut self) {
        self.guard = None;
    }
}

impl<F: FnOnce()> Drop for ScopeGuard<F> {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            guard();
        }
    }
}
