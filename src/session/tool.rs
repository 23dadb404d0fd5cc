use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AnnotationSession, StatusTone};
use crate::session::persistence::TOOL_STORAGE_KEY;
use crate::surface::StrokeStyle;

const PEN_RGB: [u8; 3] = [0xef, 0x44, 0x44];
const HANDWRITING_RGB: [u8; 3] = [0x25, 0x63, 0xeb];
const INK_WIDTH: f32 = 3.0;
const ERASER_WIDTH: f32 = 16.0;

/// Input mode for pointer gestures over the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InkTool {
    /// Drag to draw a manual frame.
    #[default]
    Frame,
    /// Red pen for tracing inside a box to trigger re-analysis.
    Pen,
    /// Blue pen for rewriting a glyph.
    Handwriting,
    /// Erases pen and handwriting ink.
    Eraser,
}

impl InkTool {
    pub const ALL: [InkTool; 4] = [Self::Frame, Self::Pen, Self::Handwriting, Self::Eraser];

    /// Brush used by the tool; `None` for framing.
    pub fn stroke_style(&self) -> Option<StrokeStyle> {
        match self {
            Self::Frame => None,
            Self::Pen => Some(StrokeStyle::ink(PEN_RGB, INK_WIDTH)),
            Self::Handwriting => Some(StrokeStyle::ink(HANDWRITING_RGB, INK_WIDTH)),
            Self::Eraser => Some(StrokeStyle::eraser(ERASER_WIDTH)),
        }
    }

    /// True when pointer drags paint instead of framing.
    pub fn draws(&self) -> bool {
        !matches!(self, Self::Frame)
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::Frame => "Drag over the page to frame a character.",
            Self::Pen => "Trace inside a box with the red pen to re-analyze it.",
            Self::Handwriting => "Rewrite a character in blue, then re-analyze it.",
            Self::Eraser => "Erase pen and handwriting strokes.",
        }
    }
}

impl AnnotationSession {
    pub fn tool(&self) -> InkTool {
        self.tool
    }

    /// Switch tools and remember the choice.
    pub fn set_tool(&mut self, tool: InkTool) {
        self.tool = tool;
        self.set_status(tool.hint(), StatusTone::Info);
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let result = serde_json::to_vec(&tool)
            .map_err(|err| err.to_string())
            .and_then(|bytes| {
                storage
                    .set(TOOL_STORAGE_KEY, &bytes)
                    .map_err(|err| err.to_string())
            });
        if let Err(err) = result {
            warn!("Failed to save selected tool: {err}");
        }
    }

    pub(super) fn load_saved_tool(&self) -> Option<InkTool> {
        let bytes = match self.storage.as_ref()?.get(TOOL_STORAGE_KEY) {
            Ok(bytes) => bytes?,
            Err(err) => {
                warn!("Failed to read saved tool: {err}");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(tool) => Some(tool),
            Err(err) => {
                debug!("Ignoring unrecognised saved tool: {err}");
                None
            }
        }
    }
}
