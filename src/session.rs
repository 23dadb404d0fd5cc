//! Annotation lifecycle coordination.
//!
//! [`AnnotationSession`] owns the ordered annotation list and drives it from
//! detection passes, manual framing, label actions, re-inking and commits.
//! Renderers subscribe with an [`AnnotationObserver`] and receive the full,
//! ordered view list after every change.

use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::annotation::{Annotation, AnnotationColor, AnnotationId, AnnotationView};
use crate::config::{EngineConfig, SessionSettings};
use crate::detection::RegionDetector;
use crate::geometry::{FrameSize, NormalizedRect};
use crate::storage::KeyValueStore;
use crate::suggestion::SuggestionEngine;
use crate::training::TrainingStore;

mod commit;
mod detection;
mod editing;
mod framing;
mod labeling;
mod persistence;
mod status;
mod summary;
mod tool;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod commit_tests;
#[cfg(test)]
mod editing_tests;
#[cfg(test)]
mod labeling_tests;

pub use commit::CommitReport;
pub use detection::DetectionReport;
pub use persistence::{
    SESSION_SNAPSHOT_VERSION, SESSION_STORAGE_KEY, SessionError, SessionSnapshot,
    TOOL_STORAGE_KEY,
};
pub use status::{SessionStatus, StatusTone};
pub use summary::RecognizedText;
pub use tool::InkTool;

/// Receives the ordered annotation list whenever it changes.
pub trait AnnotationObserver {
    fn annotations_changed(&mut self, annotations: &[AnnotationView]);
}

/// Coordinates annotations, suggestions and the training store for one page.
pub struct AnnotationSession {
    settings: SessionSettings,
    detector: RegionDetector,
    suggestions: SuggestionEngine,
    training: TrainingStore,
    storage: Option<Box<dyn KeyValueStore>>,
    annotations: Vec<Annotation>,
    frame: FrameSize,
    tool: InkTool,
    rng: StdRng,
    colors_assigned: usize,
    reink_target: Option<AnnotationId>,
    status: SessionStatus,
    observers: Vec<Box<dyn AnnotationObserver>>,
}

impl AnnotationSession {
    pub fn new(config: &EngineConfig, training: TrainingStore) -> Self {
        let config = config.clone().normalized();
        Self {
            rng: StdRng::seed_from_u64(config.session.rng_seed),
            settings: config.session,
            detector: RegionDetector::new(config.detection),
            suggestions: SuggestionEngine::new(&config.suggestions),
            training,
            storage: None,
            annotations: Vec::new(),
            frame: FrameSize::new(0.0, 0.0),
            tool: InkTool::default(),
            colors_assigned: 0,
            reink_target: None,
            status: SessionStatus::idle(),
            observers: Vec::new(),
        }
    }

    /// Attach storage for the annotation set and the selected tool, restoring
    /// the saved tool if there is one.
    pub fn with_storage(mut self, storage: Box<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        if let Some(tool) = self.load_saved_tool() {
            self.tool = tool;
        }
        self
    }

    /// Pixel size of the reference frame that manual input is expressed in.
    pub fn set_frame_size(&mut self, frame: FrameSize) {
        self.frame = frame;
    }

    pub fn frame_size(&self) -> FrameSize {
        self.frame
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|annotation| annotation.id() == id)
    }

    /// Render-ready views in annotation order.
    pub fn views(&self) -> Vec<AnnotationView> {
        self.annotations.iter().map(Annotation::view).collect()
    }

    pub fn training(&self) -> &TrainingStore {
        &self.training
    }

    pub fn training_mut(&mut self) -> &mut TrainingStore {
        &mut self.training
    }

    pub fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }

    /// Register a renderer. It immediately receives the current list.
    pub fn subscribe(&mut self, mut observer: Box<dyn AnnotationObserver>) {
        observer.annotations_changed(&self.views());
        self.observers.push(observer);
    }

    /// Candidate list for a fresh annotation or a re-analysis.
    pub fn candidates_for_seed(&self, seed: u64) -> Vec<String> {
        self.suggestions.candidates(self.training.entries(), seed)
    }

    /// Append an unconfirmed annotation seeded with the current annotation count.
    fn push_annotation(&mut self, rect: NormalizedRect) -> AnnotationId {
        let seed = self.annotations.len() as u64;
        let candidates = self.candidates_for_seed(seed);
        let color = AnnotationColor::for_index(self.colors_assigned);
        self.colors_assigned += 1;
        let annotation = Annotation::new(rect, candidates, color);
        let id = annotation.id().clone();
        debug!("Created annotation {id} with seed {seed}");
        self.annotations.push(annotation);
        id
    }

    fn index_of(&self, id: &AnnotationId) -> Option<usize> {
        let index = self
            .annotations
            .iter()
            .position(|annotation| annotation.id() == id);
        if index.is_none() {
            debug!("Ignoring action for unknown annotation {id}");
        }
        index
    }

    /// Push the current list to observers and persist it when enabled.
    fn annotations_updated(&mut self) {
        let views = self.views();
        for observer in &mut self.observers {
            observer.annotations_changed(&views);
        }
        if self.settings.persist_session {
            self.persist_quietly();
        }
    }
}

impl std::fmt::Debug for AnnotationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationSession")
            .field("annotations", &self.annotations.len())
            .field("frame", &self.frame)
            .field("tool", &self.tool)
            .field("status", &self.status)
            .finish()
    }
}
