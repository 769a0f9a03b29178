use futures::stream::{self, StreamExt};

use crate::models::{ChangeBatch, ChangeEvent, RecordOutcome, SkipReason};
use crate::services::evaluator::PulseEvaluator;

#[derive(Clone)]
pub struct ChangeConsumer {
    evaluator: PulseEvaluator,
    max_concurrent: usize,
}

impl ChangeConsumer {
    pub fn new(evaluator: PulseEvaluator, max_concurrent: usize) -> Self {
        ChangeConsumer {
            evaluator,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Каждая запись обрабатывается независимо; порядок результатов не гарантируется
    pub async fn handle(&self, batch: ChangeBatch) -> Vec<RecordOutcome> {
        let tasks: Vec<_> = batch
            .records
            .into_iter()
            .map(|event| {
                let this = self.clone();
                async move { this.dispatch(event).await }
            })
            .collect();

        let outcomes = stream::iter(tasks)
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        tracing::debug!("Processed {} change events", outcomes.len());
        outcomes
    }

    async fn dispatch(&self, event: ChangeEvent) -> RecordOutcome {
        let Some(image) = event.dynamodb.new_image.as_ref() else {
            tracing::warn!("No new image found");
            return RecordOutcome::Skipped { reason: SkipReason::NoNewImage };
        };

        if !event.is_insert() {
            tracing::warn!("The event isn't INSERT but {}", event.event_name);
            return RecordOutcome::Skipped { reason: SkipReason::NotInsert };
        }

        self.evaluator.evaluate(image).await
    }
}
