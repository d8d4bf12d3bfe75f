//! Fire-and-forget job dispatcher.
//!
//! [`JobDispatcher::dispatch`] builds a transfer client, spawns its run on a
//! detached Tokio task and returns immediately. The caller-visible contract
//! is "accepted for execution", never "completed": the run's success or
//! failure is written only to the log, as a completion record emitted from
//! the spawned task. There is no stored handle and no cancellation path.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;
use xfer_core::job::JobRequest;
use xfer_core::transfer::{ExecutionError, TransferClientFactory};

/// Receipt for an accepted job.
#[derive(Debug, Clone, Copy)]
pub struct Accepted {
    pub job_id: Uuid,
}

pub struct JobDispatcher {
    factory: Arc<dyn TransferClientFactory>,
    routine_nums: usize,
}

impl JobDispatcher {
    /// `routine_nums` is the concurrency degree given to every run.
    pub fn new(factory: Arc<dyn TransferClientFactory>, routine_nums: usize) -> Self {
        Self {
            factory,
            routine_nums,
        }
    }

    /// Start `request` in the background.
    ///
    /// Fails only if the transfer client cannot be constructed; in that case
    /// nothing is spawned. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, request: JobRequest) -> Result<Accepted, ExecutionError> {
        let job_id = Uuid::new_v4();
        let image_count = request.images.len();
        let config = request.into_transfer_config(self.routine_nums);
        let client = self.factory.build(config)?;

        let span = tracing::info_span!("image_transfer", %job_id);
        // Detached: the JoinHandle is dropped on purpose.
        tokio::spawn(
            async move {
                match client.run().await {
                    Ok(()) => tracing::info!("Image transfer completed successfully"),
                    Err(e) => tracing::error!(error = %e, "Image transfer failed"),
                }
            }
            .instrument(span),
        );

        tracing::info!(%job_id, image_count, routine_nums = self.routine_nums, "Image transfer dispatched");
        Ok(Accepted { job_id })
    }
}
