use tracing::{info, warn};

use super::{BatchContext, BatchResult};
use crate::crowdin::MetadataError;

/// Observability hooks for a QA batch run.
///
/// The processor never depends on a particular sink; the server uses
/// `TracingEvents`, tests record calls.
pub trait QaEvents: Send + Sync {
    fn batch_started(&self, context: &BatchContext, size: usize);

    fn lookup_failed(&self, translation_id: u64, string_id: u64, error: &MetadataError);

    fn width_exceeded(&self, translation_id: u64, width: u32, max: u32);

    fn batch_completed(&self, context: &BatchContext, result: &BatchResult);
}

/// Writes QA events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl QaEvents for TracingEvents {
    fn batch_started(&self, context: &BatchContext, size: usize) {
        info!(
            "[QA] Processing {} translations for project {} ({})",
            size,
            context.project_name,
            context.target_language.as_deref().unwrap_or("unknown")
        );
    }

    fn lookup_failed(&self, translation_id: u64, string_id: u64, error: &MetadataError) {
        warn!(
            "[QA] Metadata lookup for string {} (translation {}) failed, treating as unconstrained: {}",
            string_id, translation_id, error
        );
    }

    fn width_exceeded(&self, translation_id: u64, width: u32, max: u32) {
        warn!(
            "[QA] Translation {} failed: {}px exceeds {}px by {}px",
            translation_id,
            width,
            max,
            width - max
        );
    }

    fn batch_completed(&self, context: &BatchContext, result: &BatchResult) {
        info!(
            "[QA] Completed project {} ({}): {} passed, {} failed",
            context.project_name,
            context.target_language.as_deref().unwrap_or("unknown"),
            result.passed_count(),
            result.failed_count()
        );
    }
}
