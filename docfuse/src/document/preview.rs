//! Revocable preview resources for image entries.
//!
//! A [`PreviewHandle`] is an opaque `preview:<n>` URI that a presentation layer
//! can resolve back to the image bytes. Handles are released when dropped, so
//! deleting an entry (or clearing the list) can never leak a preview. Releasing
//! is idempotent: each URI is released at most once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::ByteSource;

#[derive(Debug, Default)]
struct RegistryState {
    live: HashMap<String, ByteSource>,
    next: u64,
    released: u64,
}

/// Issues and tracks preview handles.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl PreviewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a preview for `source` and return its owning handle.
    pub fn create(&self, source: &ByteSource) -> PreviewHandle {
        let mut state = self.lock();
        state.next += 1;
        let uri = format!("preview:{}", state.next);
        state.live.insert(uri.clone(), source.clone());

        PreviewHandle {
            uri,
            registry: Arc::downgrade(&self.state),
        }
    }

    /// Resolve a live preview URI to its content.
    pub fn resolve(&self, uri: &str) -> Option<ByteSource> {
        self.lock().live.get(uri).cloned()
    }

    /// Number of previews currently alive.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Number of previews released so far.
    pub fn released_count(&self) -> u64 {
        self.lock().released
    }

    /// Release every live preview, e.g. on application teardown.
    ///
    /// Returns how many previews were released. Handles that are dropped
    /// afterwards release nothing.
    pub fn release_all(&self) -> usize {
        let mut state = self.lock();
        let count = state.live.len();
        state.live.clear();
        state.released += count as u64;
        count
    }
}

fn release(state: &Mutex<RegistryState>, uri: &str) -> bool {
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if state.live.remove(uri).is_some() {
        state.released += 1;
        true
    } else {
        false
    }
}

/// Owning handle to one preview resource.
#[derive(Debug)]
pub struct PreviewHandle {
    uri: String,
    registry: Weak<Mutex<RegistryState>>,
}

impl PreviewHandle {
    /// The URI the presentation layer uses to display the preview.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Some(state) = self.registry.upgrade() {
            release(&state, &self.uri);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(bytes: &[u8]) -> ByteSource {
        ByteSource::Memory(Arc::from(bytes.to_vec()))
    }

    #[test]
    fn test_create_and_resolve() {
        let registry = PreviewRegistry::new();
        let handle = registry.create(&memory(b"png"));

        assert!(handle.uri().starts_with("preview:"));
        assert!(registry.resolve(handle.uri()).is_some());
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn test_drop_releases_once() {
        let registry = PreviewRegistry::new();
        let handle = registry.create(&memory(b"png"));
        let uri = handle.uri().to_string();

        drop(handle);

        assert!(registry.resolve(&uri).is_none());
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.released_count(), 1);
    }

    #[test]
    fn test_release_all_then_drop_does_not_double_count() {
        let registry = PreviewRegistry::new();
        let first = registry.create(&memory(b"a"));
        let second = registry.create(&memory(b"b"));

        assert_eq!(registry.release_all(), 2);
        drop(first);
        drop(second);

        assert_eq!(registry.released_count(), 2);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_handle_outlives_registry() {
        let registry = PreviewRegistry::new();
        let handle = registry.create(&memory(b"a"));
        drop(registry);
        drop(handle);
    }

    #[test]
    fn test_uris_are_distinct() {
        let registry = PreviewRegistry::new();
        let a = registry.create(&memory(b"a"));
        let b = registry.create(&memory(b"b"));
        assert_ne!(a.uri(), b.uri());
    }
}
