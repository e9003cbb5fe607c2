//! Width QA checks for batches of translations.
//!
//! # Architecture
//!
//! - `evaluator`: compares a measured width with an optional maximum
//! - `batch`: resolves constraints for a batch and produces one verdict per translation
//! - `events`: observability sink the batch processor reports to
//!
//! Everything here is request-scoped. Nothing is persisted.

mod batch;
mod evaluator;
mod events;

pub use batch::{BatchQaProcessor, ConstraintResolver};
pub use evaluator::{evaluate, Evaluation};
pub use events::{QaEvents, TracingEvents};

use crate::measurement::FontSpec;

/// A single translation submitted for a QA check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub id: u64,
    pub text: String,
    pub string_id: u64,
}

/// Width limit for a source string, plus the font it is rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringConstraint {
    pub string_id: u64,
    pub max_width_pixels: u32,
    pub font: String,
    pub font_size: u32,
}

impl StringConstraint {
    pub fn font_spec(&self) -> FontSpec {
        FontSpec::new(self.font.clone(), self.font_size)
    }
}

/// Outcome of the width check for one translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub translation_id: u64,
    pub passed: bool,
    pub message: Option<String>,
}

/// Verdicts in the same order as the submitted batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub verdicts: Vec<Verdict>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn passed_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.verdicts.len() - self.passed_count()
    }
}

impl IntoIterator for BatchResult {
    type Item = Verdict;
    type IntoIter = std::vec::IntoIter<Verdict>;

    fn into_iter(self) -> Self::IntoIter {
        self.verdicts.into_iter()
    }
}

/// Descriptive metadata about the batch, used only for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchContext {
    pub project_id: u64,
    pub project_name: String,
    pub target_language: Option<String>,
    pub source_language: Option<String>,
    pub file_name: Option<String>,
}
