//! Aggregated release of resources opened while building sorted views.

use crate::error::VerifyError;
use std::io;
use tracing::{debug, warn};

/// A resource that must be released exactly once.
pub trait Closable: Send {
    /// Release the resource. Calling it again must be a no-op.
    fn close(&mut self) -> io::Result<()>;

    /// Human-readable description used in diagnostics.
    fn describe(&self) -> String {
        "resource".to_string()
    }
}

/// Owner of every handle a record source opened.
///
/// `close` attempts every handle even if earlier ones fail and reports all
/// failures together. The set is empty and reusable afterwards.
#[derive(Default)]
pub struct ClosableSet {
    handles: Vec<Box<dyn Closable>>,
}

impl ClosableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle.
    pub fn add(&mut self, handle: Box<dyn Closable>) {
        debug!("Registering closable {}", handle.describe());
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Close every registered handle in registration order.
    pub fn close(&mut self) -> Result<(), VerifyError> {
        let mut failures = Vec::new();
        for mut handle in self.handles.drain(..) {
            if let Err(e) = handle.close() {
                warn!("Failed to close {}: {e}", handle.describe());
                failures.push(e);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(VerifyError::Close { failures })
        }
    }
}

impl std::fmt::Debug for ClosableSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosableSet")
            .field("handles", &self.handles.len())
            .finish()
    }
}

impl Drop for ClosableSet {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Releasing resources on drop failed: {e}");
        }
    }
}
