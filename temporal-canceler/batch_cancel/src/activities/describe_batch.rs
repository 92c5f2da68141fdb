//! Activity reporting progress of a previously started batch operation.

use std::{future::Future, sync::Arc};

use helpers::connection::authorized_request;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use temporal_sdk::{ActContext, ActivityError};
use temporal_sdk_core_protos::temporal::api::{
    enums::v1::BatchOperationState, workflowservice::v1::DescribeBatchOperationResponse,
};

use super::{BatchActivities, failure::status_to_activity_error};
use crate::{request::build_describe_request, service::BatchOperationService};

/// Snapshot of a batch job as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOperationStatus {
    pub job_id: String,
    /// e.g. `BATCH_OPERATION_STATE_RUNNING`.
    pub state: String,
    pub reason: String,
    pub total_operations: i64,
    pub completed_operations: i64,
    pub failed_operations: i64,
}

impl From<DescribeBatchOperationResponse> for BatchOperationStatus {
    fn from(resp: DescribeBatchOperationResponse) -> Self {
        Self {
            state: resp.state().as_str_name().to_owned(),
            job_id: resp.job_id,
            reason: resp.reason,
            total_operations: resp.total_operation_count,
            completed_operations: resp.complete_operation_count,
            failed_operations: resp.failure_operation_count,
        }
    }
}

impl<S: BatchOperationService> BatchActivities<S> {
    /// One snapshot of the batch. A batch the service reports as failed
    /// fails the activity without retry; running and completed batches are
    /// returned as-is.
    pub async fn describe_batch<C>(
        &self,
        job_id: &str,
        cancelled: C,
    ) -> Result<BatchOperationStatus, ActivityError>
    where
        C: Future<Output = ()>,
    {
        if job_id.trim().is_empty() {
            return Err(ActivityError::NonRetryable(anyhow::anyhow!(
                "describe_batch_operation requires a job id"
            )));
        }

        let request = build_describe_request(&self.namespace, job_id);
        let call = async {
            let request = authorized_request(self.api_key.as_ref(), request)?;
            self.service.describe_batch_operation(request).await
        };

        tokio::select! {
            result = call => match result {
                Ok(response) => {
                    let response = response.into_inner();
                    let failed = response.state() == BatchOperationState::Failed;
                    let status = BatchOperationStatus::from(response);
                    if failed {
                        error!("Batch job_id={job_id} failed: {status:?}");
                        return Err(ActivityError::NonRetryable(anyhow::anyhow!(
                            "batch operation {job_id} failed ({} of {} operations failed)",
                            status.failed_operations,
                            status.total_operations
                        )));
                    }
                    info!("Batch status: {status:?}");
                    Ok(status)
                }
                Err(status) => {
                    let err = status_to_activity_error("describe batch operation", status);
                    error!("Describing batch job_id={job_id} failed: {err:?}");
                    Err(err)
                }
            },
            () = cancelled => {
                warn!("Describe activity cancelled (job_id={job_id})");
                Err(ActivityError::Cancelled { details: None })
            }
        }
    }
}

/// Activity entry point; input is the job id logged by
/// `batch_cancel_workflows`.
pub async fn describe_batch_operation<S: BatchOperationService>(
    ctx: ActContext,
    activities: Arc<BatchActivities<S>>,
    job_id: String,
) -> Result<BatchOperationStatus, ActivityError> {
    activities.describe_batch(&job_id, ctx.cancelled()).await
}
