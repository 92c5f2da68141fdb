//! The `batch_cancel_workflows` activity.

use std::{future::Future, sync::Arc};

use helpers::connection::authorized_request;
use log::{error, info, warn};
use temporal_sdk::{ActContext, ActivityError};

use super::{BatchActivities, failure::status_to_activity_error};
use crate::{
    request::{build_start_request, new_job_id},
    service::BatchOperationService,
};

impl<S: BatchOperationService> BatchActivities<S> {
    /// Start one batch operation over every execution matching the
    /// visibility query. Each call uses a fresh job id, so calling twice
    /// starts two batches.
    ///
    /// Resolves to `ActivityError::Cancelled` if `cancelled` fires before the
    /// service answers.
    pub async fn start_batch<C>(&self, cancelled: C) -> Result<(), ActivityError>
    where
        C: Future<Output = ()>,
    {
        let job_id = new_job_id();
        let request = build_start_request(&self.namespace, self.operation, &job_id);
        info!(
            "Starting batch {} in namespace={} job_id={job_id}",
            self.operation, self.namespace
        );

        let call = async {
            let request = authorized_request(self.api_key.as_ref(), request)?;
            self.service.start_batch_operation(request).await
        };

        tokio::select! {
            result = call => match result {
                Ok(response) => {
                    info!(
                        "Batch cancel response: job_id={job_id} response={:?}",
                        response.into_inner()
                    );
                    Ok(())
                }
                Err(status) => {
                    let err = status_to_activity_error("start batch operation", status);
                    error!("Batch cancel failed: job_id={job_id}: {err:?}");
                    Err(err)
                }
            },
            () = cancelled => {
                warn!("Batch cancel activity cancelled before the service answered (job_id={job_id})");
                Err(ActivityError::Cancelled { details: None })
            }
        }
    }
}

/// Activity entry point. Takes no meaningful input and returns nothing.
pub async fn batch_cancel_workflows<S: BatchOperationService>(
    ctx: ActContext,
    activities: Arc<BatchActivities<S>>,
) -> Result<(), ActivityError> {
    activities.start_batch(ctx.cancelled()).await
}
