//! Worker wiring: activity registration and shutdown handling.

use std::{future::Future, io, sync::Arc};

use log::{error, info};
use temporal_sdk::{ActContext, Worker};
use tokio::signal;

use crate::{
    activities::{
        BatchActivities, ConfirmOptions, batch_cancel_workflows, confirm_all_cancelled,
        describe_batch_operation,
    },
    request::{BATCH_CANCEL_ACTIVITY, CONFIRM_CANCELLED_ACTIVITY, DESCRIBE_BATCH_ACTIVITY},
    service::BatchOperationService,
};

/// Register the batch activities on `worker`. No workflow types are
/// registered; this worker only executes activities.
pub fn register_activities<S: BatchOperationService>(
    worker: &mut Worker,
    activities: Arc<BatchActivities<S>>,
) {
    let batch = activities.clone();
    worker.register_activity(
        BATCH_CANCEL_ACTIVITY,
        move |ctx: ActContext, _payload: Option<String>| batch_cancel_workflows(ctx, batch.clone()),
    );
    let describe = activities.clone();
    worker.register_activity(
        DESCRIBE_BATCH_ACTIVITY,
        move |ctx: ActContext, job_id: String| {
            describe_batch_operation(ctx, describe.clone(), job_id)
        },
    );
    worker.register_activity(
        CONFIRM_CANCELLED_ACTIVITY,
        move |ctx: ActContext, options: Option<ConfirmOptions>| {
            confirm_all_cancelled(ctx, activities.clone(), options)
        },
    );
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())?
            .recv()
            .await;
        info!("Received SIGTERM");
        Ok::<(), io::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<io::Result<()>>();

    tokio::select! {
        res = signal::ctrl_c() => res,
        res = terminate => res,
    }
}

/// Wait for `signal`, then call `initiate` once so the worker stops polling
/// and drains in-flight activities. If the signal handler could not be
/// installed the worker keeps running and `initiate` is never called.
pub async fn shutdown_on<F, T>(signal: F, initiate: T)
where
    F: Future<Output = io::Result<()>>,
    T: FnOnce(),
{
    match signal.await {
        Ok(()) => {
            info!("Shutdown signal received, shutting down worker …");
            initiate();
        }
        Err(err) => error!("Failed to listen for shutdown signals: {err}"),
    }
}
