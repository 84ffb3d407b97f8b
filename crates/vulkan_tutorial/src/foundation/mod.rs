//! Foundation utilities: logging setup and scoped resource ownership

pub mod logging;
pub mod scope;

pub use scope::{ScopeGuard, ScopedHandle};
