#![forbid(unsafe_code)]

//! Tutorial data model.
//!
//! A [`Tutorial`] is an ordered list of [`Step`]s under a stable id. Values
//! are immutable once constructed: the engine owns a tutorial exclusively
//! while it runs and only ever reads it.
//!
//! # Example
//! ```ignore
//! let tour = Tutorial::new(
//!     "first-run",
//!     vec![
//!         Step::new("compose-button", "Start here", "Tap to write your first note."),
//!         Step::new("archive-tab", "Your archive", "Everything you save lands here."),
//!     ],
//! );
//! ```

use std::fmt;

/// Stable identity of a tutorial, used for the persisted shown flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TutorialId(String);

impl TutorialId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TutorialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TutorialId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TutorialId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Opaque handle naming a UI element; the host resolves it to geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetId(String);

impl TargetId {
    /// Create a target handle from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The handle as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TargetId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// One highlight-and-explain unit: a target plus the text shown beside it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// The UI element this step points at.
    pub target: TargetId,
    /// Short heading rendered in the tooltip card.
    pub title: String,
    /// Body text rendered under the title, word-wrapped to the card width.
    pub message: String,
}

impl Step {
    /// Create a step.
    #[must_use]
    pub fn new(
        target: impl Into<TargetId>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            title: title.into(),
            message: message.into(),
        }
    }
}

/// An ordered sequence of steps shown at most once per installation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tutorial {
    /// Stable identity; keys the persisted shown flag.
    pub id: TutorialId,
    /// Steps in presentation order.
    pub steps: Vec<Step>,
}

impl Tutorial {
    /// Create a tutorial from an id and its steps.
    #[must_use]
    pub fn new(id: impl Into<TutorialId>, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            steps,
        }
    }

    /// Number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the tutorial has no steps at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
