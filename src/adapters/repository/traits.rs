//! Repository collaborator traits
//!
//! This module defines the narrow capability sets the import and export
//! paths need from an image repository. Adapters implement them; the core
//! never talks to a concrete backend.

use crate::domain::{
    Artifact, EntityKind, EntityRef, EntitySummary, FileAnnotationInfo, ImageRecord, ObjectId,
    Result,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Repository service trait for entity resolution and annotation writes
///
/// This trait defines the interface that repository adapters must implement
/// to receive imported metadata and exported artifacts.
#[async_trait]
pub trait RepositoryService: Send + Sync {
    /// Resolve an entity by kind and identifier
    ///
    /// Returns `None` when nothing of that kind has that identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be queried.
    async fn resolve_entity(&self, kind: EntityKind, id: ObjectId)
        -> Result<Option<EntitySummary>>;

    /// Resolve a file annotation by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be queried.
    async fn resolve_file(&self, id: ObjectId) -> Result<Option<FileAnnotationInfo>>;

    /// Read the full bytes of a file annotation
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be read.
    async fn read_file(&self, id: ObjectId) -> Result<Vec<u8>>;

    /// Create a key-value annotation and link it to `target`
    ///
    /// Every call creates a new annotation; nothing is merged with what the
    /// target already holds.
    ///
    /// # Arguments
    ///
    /// * `target` - Entity receiving the annotation
    /// * `namespace` - Annotation namespace
    /// * `pairs` - Ordered key/value pairs
    ///
    /// # Returns
    ///
    /// The identifier of the new annotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the annotation cannot be stored.
    async fn create_key_value_annotation(
        &self,
        target: &EntityRef,
        namespace: &str,
        pairs: Vec<(String, String)>,
    ) -> Result<ObjectId>;

    /// Store an artifact as a new file annotation
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    async fn upload_artifact(&self, artifact: Artifact) -> Result<ObjectId>;
}

/// Source of image records for export
#[async_trait]
pub trait ObjectMetadataSource: Send + Sync {
    /// List the images behind a container or a single image
    ///
    /// For `Dataset` these are the dataset's child images in stored order,
    /// for `Image` the image itself. Returns `None` when `id` does not
    /// resolve to an entity of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be queried.
    async fn list_images(&self, kind: EntityKind, id: ObjectId)
        -> Result<Option<Vec<ImageRecord>>>;
}

/// A releasable connection to the repository
pub trait RepositorySession: Send + Sync {
    /// Release the session
    ///
    /// Implementations must tolerate repeated calls.
    fn close(&self);

    /// True once `close` has been called
    fn is_closed(&self) -> bool;
}

/// Releases a session when dropped
///
/// Coordinators hold one of these for the whole operation, so the session is
/// closed on success, early return, error and unwind alike.
pub struct SessionGuard<S: RepositorySession + ?Sized> {
    session: Arc<S>,
}

impl<S: RepositorySession + ?Sized> SessionGuard<S> {
    /// Guard an open session
    pub fn new(session: Arc<S>) -> Self {
        Self { session }
    }

    /// Access the guarded session
    pub fn session(&self) -> &S {
        &self.session
    }
}

impl<S: RepositorySession + ?Sized> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        tracing::debug!("Releasing repository session");
        self.session.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSession {
        closes: AtomicUsize,
    }

    impl RepositorySession for CountingSession {
        fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }

        fn is_closed(&self) -> bool {
            self.closes.load(Ordering::SeqCst) > 0
        }
    }

    #[test]
    fn test_guard_closes_once_on_drop() {
        let session = Arc::new(CountingSession::default());
        {
            let guard = SessionGuard::new(session.clone());
            assert!(!guard.session().is_closed());
        }
        assert_eq!(session.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_closes_on_unwind() {
        let session = Arc::new(CountingSession::default());
        let inner = session.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = SessionGuard::new(inner);
            panic!("operation failed");
        });
        assert!(result.is_err());
        assert_eq!(session.closes.load(Ordering::SeqCst), 1);
    }
}
