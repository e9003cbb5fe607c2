use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

use super::{evaluate, BatchContext, BatchResult, QaEvents, StringConstraint, Translation, Verdict};
use crate::crowdin::MetadataError;
use crate::measurement::{FontSpec, TextMeasurer};

/// Source of per-string width constraints.
///
/// `Ok(None)` means the string has no width limit.
#[async_trait]
pub trait ConstraintResolver: Send + Sync {
    async fn resolve(&self, string_id: u64) -> Result<Option<StringConstraint>, MetadataError>;
}

/// Runs width checks over a batch of translations.
pub struct BatchQaProcessor {
    measurer: Arc<dyn TextMeasurer>,
    events: Arc<dyn QaEvents>,
    default_font: FontSpec,
    concurrency: usize,
}

impl BatchQaProcessor {
    pub fn new(
        measurer: Arc<dyn TextMeasurer>,
        events: Arc<dyn QaEvents>,
        default_font: FontSpec,
        concurrency: usize,
    ) -> Self {
        Self {
            measurer,
            events,
            default_font,
            concurrency: concurrency.max(1),
        }
    }

    /// Produce one verdict per translation, in input order.
    ///
    /// Lookup failures are reported to the event sink and the translation is
    /// treated as unconstrained, so a single failure never aborts the batch.
    pub async fn process<R>(
        &self,
        context: &BatchContext,
        batch: &[Translation],
        resolver: &R,
    ) -> BatchResult
    where
        R: ConstraintResolver + ?Sized,
    {
        self.events.batch_started(context, batch.len());

        // Futures are built up front so the stream holds no borrowing closure.
        // `buffered` keeps output order equal to input order.
        let checks: Vec<_> = batch
            .iter()
            .map(|translation| self.check(translation, resolver))
            .collect();
        let verdicts: Vec<Verdict> = stream::iter(checks)
            .buffered(self.concurrency)
            .collect()
            .await;

        let result = BatchResult { verdicts };
        self.events.batch_completed(context, &result);
        result
    }

    async fn check<R>(&self, translation: &Translation, resolver: &R) -> Verdict
    where
        R: ConstraintResolver + ?Sized,
    {
        let constraint = match resolver.resolve(translation.string_id).await {
            Ok(constraint) => constraint,
            Err(e) => {
                self.events
                    .lookup_failed(translation.id, translation.string_id, &e);
                None
            }
        };

        let font = constraint
            .as_ref()
            .map(StringConstraint::font_spec)
            .unwrap_or_else(|| self.default_font.clone());
        let width = self.measurer.measure(&translation.text, &font);
        let max = constraint.as_ref().map(|c| c.max_width_pixels);

        let evaluation = evaluate(width, max);
        if let (false, Some(max)) = (evaluation.passed, max) {
            self.events.width_exceeded(translation.id, width, max);
        }

        Verdict {
            translation_id: translation.id,
            passed: evaluation.passed,
            message: evaluation.message,
        }
    }
}
