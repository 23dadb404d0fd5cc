use std::cell::RefCell;
use std::rc::Rc;

use super::{AnnotationObserver, AnnotationSession};
use crate::annotation::AnnotationView;
use crate::config::EngineConfig;
use crate::detection::test_support::fill_block;
use crate::geometry::FrameSize;
use crate::storage::{KeyValueStore, MemoryKeyValueStore, StorageError};
use crate::surface::RasterSurface;
use crate::training::TrainingStore;

/// Session over a `width`×`height` frame with an in-memory training pool.
pub(super) fn session(width: u32, height: u32) -> AnnotationSession {
    let mut session = AnnotationSession::new(&EngineConfig::default(), TrainingStore::in_memory());
    session.set_frame_size(FrameSize::new(width as f32, height as f32));
    session
}

/// Session whose training pool and session state live in `backend`.
pub(super) fn session_with_backend(
    width: u32,
    height: u32,
    backend: &MemoryKeyValueStore,
) -> AnnotationSession {
    let training = TrainingStore::open(Box::new(backend.clone()));
    let mut session = AnnotationSession::new(&EngineConfig::default(), training)
        .with_storage(Box::new(backend.clone()));
    session.set_frame_size(FrameSize::new(width as f32, height as f32));
    session
}

/// 200×100 surface with two 20×20 glyph blobs far apart.
pub(super) fn two_glyph_surface() -> RasterSurface {
    let mut surface = RasterSurface::new(200, 100);
    fill_block(&mut surface, 20, 20, 39, 39);
    fill_block(&mut surface, 120, 40, 139, 59);
    surface
}

/// Records every list pushed to it.
#[derive(Clone, Default)]
pub(super) struct RecordingObserver {
    pub(super) updates: Rc<RefCell<Vec<Vec<AnnotationView>>>>,
}

impl RecordingObserver {
    pub(super) fn update_count(&self) -> usize {
        self.updates.borrow().len()
    }

    pub(super) fn last(&self) -> Vec<AnnotationView> {
        self.updates.borrow().last().cloned().unwrap_or_default()
    }
}

impl AnnotationObserver for RecordingObserver {
    fn annotations_changed(&mut self, annotations: &[AnnotationView]) {
        self.updates.borrow_mut().push(annotations.to_vec());
    }
}

/// Backend that reads fine but rejects every write.
pub(super) struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _bytes: &[u8]) -> Result<(), StorageError> {
        Err(StorageError::Backend("read-only".into()))
    }
}
