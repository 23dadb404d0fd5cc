use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current on-disk layout version.
pub const TRAINING_DOCUMENT_VERSION: u32 = 1;

/// Confirmed samples for one `(char, unknown)` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingEntry {
    pub char: String,
    #[serde(default)]
    pub unknown: bool,
    /// Captured sample images as PNG data URIs.
    #[serde(default)]
    pub samples: Vec<String>,
    /// Number of committed samples, including ones committed without an image.
    #[serde(default)]
    pub count: u32,
}

impl TrainingEntry {
    pub(crate) fn new(char: &str, unknown: bool) -> Self {
        Self {
            char: char.to_string(),
            unknown,
            samples: Vec::new(),
            count: 0,
        }
    }

    pub fn matches(&self, char: &str, unknown: bool) -> bool {
        self.char == char && self.unknown == unknown
    }

    /// Record one more sample, with or without an image.
    pub(crate) fn record(&mut self, sample: Option<String>) {
        if let Some(sample) = sample {
            self.samples.push(sample);
        }
        self.count = self.count.saturating_add(1);
    }

    /// Fold another entry for the same key into this one.
    pub(crate) fn absorb(&mut self, other: TrainingEntry) {
        self.count = self.count.saturating_add(other.count);
        self.samples.extend(other.samples);
    }

    fn normalized(mut self) -> Option<Self> {
        if self.char.is_empty() {
            return None;
        }
        let images = u32::try_from(self.samples.len()).unwrap_or(u32::MAX);
        self.count = self.count.max(images);
        (self.count > 0).then_some(self)
    }
}

/// Persisted training pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDocument {
    #[serde(default = "current_version")]
    pub version: u32,
    pub entries: Vec<TrainingEntry>,
    pub updated_at: Option<String>,
}

fn current_version() -> u32 {
    TRAINING_DOCUMENT_VERSION
}

impl TrainingDocument {
    pub(crate) fn empty() -> Self {
        Self {
            version: TRAINING_DOCUMENT_VERSION,
            entries: Vec::new(),
            updated_at: None,
        }
    }

    pub(crate) fn position(&self, char: &str, unknown: bool) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.matches(char, unknown))
    }

    /// Merge entries by key, keeping first-seen order.
    pub(crate) fn merge(&mut self, incoming: impl IntoIterator<Item = TrainingEntry>) -> usize {
        let mut merged = 0;
        for entry in incoming.into_iter().filter_map(TrainingEntry::normalized) {
            match self.position(&entry.char, entry.unknown) {
                Some(index) => self.entries[index].absorb(entry),
                None => self.entries.push(entry),
            }
            merged += 1;
        }
        merged
    }

    /// Parse stored bytes in the current or the older sample-count layout.
    ///
    /// An object carrying `entries` or `version` is read as the current
    /// layout and must parse as one; anything else must be the legacy
    /// `samples` layout.
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        let Some(object) = value.as_object() else {
            return Err(DocumentError::NotAnObject);
        };
        let is_current = object.contains_key("entries") || object.contains_key("version");
        let (entries, updated_at) = if is_current {
            let doc: TrainingDocument = serde_json::from_value(value)?;
            if doc.version != TRAINING_DOCUMENT_VERSION {
                return Err(DocumentError::UnsupportedVersion(doc.version));
            }
            (doc.entries, doc.updated_at)
        } else {
            let legacy: LegacyDocument = serde_json::from_value(value)?;
            (
                legacy
                    .samples
                    .into_iter()
                    .map(LegacySample::into_entry)
                    .collect(),
                legacy.updated_at,
            )
        };
        let mut document = Self::empty();
        document.merge(entries);
        document.updated_at = updated_at;
        Ok(document)
    }
}

/// Reasons stored training bytes were not accepted.
#[derive(Debug, Error)]
pub(crate) enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported training data version {0}")]
    UnsupportedVersion(u32),
    #[error("training data is not a JSON object")]
    NotAnObject,
}

/// Early layout: counts only, no sample images.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LegacyDocument {
    #[serde(default)]
    samples: Vec<LegacySample>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Deserialize)]
struct LegacySample {
    char: String,
    #[serde(default)]
    count: u32,
    #[serde(default)]
    unknown: bool,
}

impl LegacySample {
    fn into_entry(self) -> TrainingEntry {
        TrainingEntry {
            char: self.char,
            unknown: self.unknown,
            samples: Vec::new(),
            count: self.count,
        }
    }
}
