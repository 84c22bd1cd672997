//! One entry of the walkthrough queue.

use std::{fmt, sync::Arc};

use crate::{geometry::Rect, host::ObservableView};

/// What a suggestion points at: a live view or an explicit rectangle.
/// Exactly one of the two exists by construction.
#[derive(Clone)]
pub enum SuggestionTarget {
    View(Arc<dyn ObservableView>),
    Frame(Rect),
}

impl fmt::Debug for SuggestionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionTarget::View(view) => f
                .debug_tuple("View")
                .field(&view.frame())
                .finish(),
            SuggestionTarget::Frame(rect) => f.debug_tuple("Frame").field(rect).finish(),
        }
    }
}

/// A target plus the text shown next to it. Immutable once created; the
/// queue owns it and the orchestrator keeps a transient copy of the one
/// currently presented.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub target: SuggestionTarget,
    pub text: String,
}

impl Suggestion {
    pub fn for_view(view: Arc<dyn ObservableView>, text: impl Into<String>) -> Self {
        Self {
            target: SuggestionTarget::View(view),
            text: text.into(),
        }
    }

    pub fn for_frame(frame: Rect, text: impl Into<String>) -> Self {
        Self {
            target: SuggestionTarget::Frame(frame),
            text: text.into(),
        }
    }

    /// A suggestion is valid while its view is attached; explicit frames
    /// are always valid.
    pub fn is_valid(&self) -> bool {
        match &self.target {
            SuggestionTarget::View(view) => view.is_attached(),
            SuggestionTarget::Frame(_) => true,
        }
    }

    /// Current frame of the target, `None` when the view has detached.
    pub(crate) fn resolved_frame(&self) -> Option<Rect> {
        match &self.target {
            SuggestionTarget::View(view) => view.frame(),
            SuggestionTarget::Frame(rect) => Some(*rect),
        }
    }
}
