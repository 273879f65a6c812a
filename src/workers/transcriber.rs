use tracing::{Instrument, error, info, info_span, warn};

use crate::infrastructure::llm::ModelError;
use crate::infrastructure::storage::StorageError;
use crate::modules::ingest::{ClaimedItem, DescriptorError, JobDescriptor, WorkQueue};
use crate::modules::transcription::{PublishError, ResultLocation, publish, transcribe};
use crate::state::JobContext;

/// Anything that stops a claimed item short of a published transcript. These are
/// logged and reported, never returned from [`TranscriptionJob::run`].
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("could not read relocated configuration: {0}")]
    Download(#[source] StorageError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("model call failed: {0}")]
    Model(#[from] ModelError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

#[derive(Debug)]
pub enum ItemOutcome {
    Published(ResultLocation),
    Failed(ProcessingError),
}

#[derive(Debug)]
pub struct ItemReport {
    pub item: ClaimedItem,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSummary {
    NoWorkFound,
    /// Candidates existed but none could be relocated.
    RelocationFailed,
    /// At least one relocated item did not get a published transcript.
    RelocatedButFailed,
    Completed,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub items: Vec<ItemReport>,
    pub skipped: usize,
}

impl RunReport {
    pub fn published(&self) -> impl Iterator<Item = &ResultLocation> {
        self.items.iter().filter_map(|report| match &report.outcome {
            ItemOutcome::Published(location) => Some(location),
            ItemOutcome::Failed(_) => None,
        })
    }

    pub fn summary(&self) -> RunSummary {
        if self.items.is_empty() {
            if self.skipped > 0 {
                RunSummary::RelocationFailed
            } else {
                RunSummary::NoWorkFound
            }
        } else if self
            .items
            .iter()
            .any(|report| matches!(report.outcome, ItemOutcome::Failed(_)))
        {
            RunSummary::RelocatedButFailed
        } else {
            RunSummary::Completed
        }
    }

    fn log_summary(&self) {
        let claimed = self.items.len();
        let published = self.published().count();

        match self.summary() {
            RunSummary::NoWorkFound => info!("No work found"),
            RunSummary::RelocationFailed => {
                warn!(skipped = self.skipped, "No candidate could be relocated")
            }
            RunSummary::RelocatedButFailed => warn!(
                claimed,
                published,
                skipped = self.skipped,
                "Work relocated but transcription failed"
            ),
            RunSummary::Completed => info!(claimed, published, "Job completed"),
        }
    }
}

/// One invocation of the batch job: claim up to `batch_size` configuration
/// objects and run each through parse, model and publish.
pub struct TranscriptionJob {
    ctx: JobContext,
}

impl TranscriptionJob {
    pub fn new(ctx: JobContext) -> Self {
        Self { ctx }
    }

    /// Fails only when the source area cannot be listed. Per-item problems end
    /// up in the report.
    pub async fn run(&self) -> Result<RunReport, StorageError> {
        let config = &self.ctx.config;

        info!(
            bucket = %config.bucket,
            source = %config.source_prefix,
            destination = %config.destination_prefix,
            batch_size = config.batch_size,
            "Starting JSON file moving job"
        );

        let mut queue = WorkQueue::new(
            self.ctx.storage.as_ref(),
            &config.bucket,
            &config.source_prefix,
            &config.destination_prefix,
        );

        let mut items = Vec::new();
        while items.len() < config.batch_size {
            let Some(item) = queue.claim_next().await? else {
                break;
            };

            let span = info_span!("work_item", key = %item.relocated_key);
            let outcome = self.process_item(&item).instrument(span).await;
            items.push(ItemReport { item, outcome });
        }

        let report = RunReport {
            items,
            skipped: queue.skipped(),
        };
        report.log_summary();

        Ok(report)
    }

    async fn process_item(&self, item: &ClaimedItem) -> ItemOutcome {
        match self.try_process(item).await {
            Ok(location) => ItemOutcome::Published(location),
            Err(e) => {
                error!(error = %e, "Error processing JSON data");
                ItemOutcome::Failed(e)
            }
        }
    }

    async fn try_process(&self, item: &ClaimedItem) -> Result<ResultLocation, ProcessingError> {
        info!("Processing config file");

        let storage = self.ctx.storage.as_ref();
        let raw = storage
            .get_object(&item.bucket, &item.relocated_key)
            .await
            .map_err(ProcessingError::Download)?;

        let descriptor = JobDescriptor::from_slice(&raw)?;
        info!(video = %descriptor.video_uri, "Read job descriptor");

        let artifact = transcribe(self.ctx.model.as_ref(), &descriptor).await?;

        let location = publish(
            storage,
            self.ctx.config.output_bucket.as_deref(),
            &descriptor.video_uri,
            &artifact,
        )
        .await?;

        info!(video = %descriptor.video_uri, "Transcription completed for video");

        Ok(location)
    }
}
