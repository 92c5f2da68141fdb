//! Activity that waits until no execution matching the batch query is still
//! running.

use std::{future::Future, sync::Arc, time::Duration};

use helpers::connection::authorized_request;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use temporal_sdk::{ActContext, ActivityError};
use tokio::time::Instant;

use super::{BatchActivities, failure::status_to_activity_error};
use crate::{request::build_count_request, service::BatchOperationService};

/// How long to keep polling visibility, and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmOptions {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 240_000,
            poll_interval_ms: 5_000,
        }
    }
}

impl<S: BatchOperationService> BatchActivities<S> {
    /// Poll `CountWorkflowExecutions` for the batch query until the count
    /// reaches zero (`true`) or the timeout elapses (`false`). The count is
    /// always checked at least once.
    pub async fn confirm_cancelled<C>(
        &self,
        options: ConfirmOptions,
        cancelled: C,
    ) -> Result<bool, ActivityError>
    where
        C: Future<Output = ()>,
    {
        let deadline = Instant::now() + Duration::from_millis(options.timeout_ms);
        let poll_interval = Duration::from_millis(options.poll_interval_ms);
        tokio::pin!(cancelled);

        loop {
            let call = async {
                let request =
                    authorized_request(self.api_key.as_ref(), build_count_request(&self.namespace))?;
                self.service.count_workflow_executions(request).await
            };

            let running = tokio::select! {
                result = call => match result {
                    Ok(response) => response.into_inner().count,
                    Err(status) => {
                        let err = status_to_activity_error("count running executions", status);
                        error!("Counting running executions failed: {err:?}");
                        return Err(err);
                    }
                },
                () = &mut cancelled => {
                    warn!("Confirm activity cancelled while counting executions");
                    return Err(ActivityError::Cancelled { details: None });
                }
            };

            if running == 0 {
                info!("No matching executions left running in namespace={}", self.namespace);
                return Ok(true);
            }
            if Instant::now() >= deadline {
                warn!("{running} matching executions still running after {}ms", options.timeout_ms);
                return Ok(false);
            }
            info!("{running} matching executions still running; checking again in {poll_interval:?}");

            tokio::select! {
                () = tokio::time::sleep(poll_interval) => {}
                () = &mut cancelled => {
                    warn!("Confirm activity cancelled while waiting to poll");
                    return Err(ActivityError::Cancelled { details: None });
                }
            }
        }
    }
}

/// Activity entry point. Missing input uses [`ConfirmOptions::default`].
pub async fn confirm_all_cancelled<S: BatchOperationService>(
    ctx: ActContext,
    activities: Arc<BatchActivities<S>>,
    options: Option<ConfirmOptions>,
) -> Result<bool, ActivityError> {
    activities
        .confirm_cancelled(options.unwrap_or_default(), ctx.cancelled())
        .await
}
