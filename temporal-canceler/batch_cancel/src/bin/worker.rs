//! Worker binary for the batch canceler.
//!
//! Reads `.env` from the working directory, connects to the canceler
//! namespace to poll the task queue and to the target namespace to issue
//! batch operations, then runs until Ctrl+C / SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use env_logger::Env;
use helpers::{CancelerConfig, connect};
use log::info;
use temporal_sdk::Worker;
use temporal_sdk_core::{CoreRuntime, init_worker};
use temporal_sdk_core_api::Worker as _;
use temporal_sdk_core_api::{
    telemetry::TelemetryOptionsBuilder,
    worker::{WorkerConfigBuilder, WorkerVersioningStrategy},
};

use batch_cancel::{
    activities::BatchActivities,
    worker::{register_activities, shutdown_on, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting batch_cancel worker …");

    let config = CancelerConfig::load().context("failed loading canceler configuration")?;

    let worker_connection = connect(&config.worker, Arc::new(config.worker.api_key.clone())).await?;
    let target_connection = connect(&config.target, Arc::new(config.target.api_key.clone())).await?;
    let activities = Arc::new(BatchActivities::from_connection(
        target_connection,
        config.operation,
    ));

    let telemetry_options = TelemetryOptionsBuilder::default().build()?;
    let runtime = CoreRuntime::new_assume_tokio(telemetry_options)?;

    let worker_config = WorkerConfigBuilder::default()
        .namespace(config.worker.namespace.clone())
        .task_queue(config.task_queue.clone())
        .versioning_strategy(WorkerVersioningStrategy::None {
            build_id: "rust-sdk".to_owned(),
        })
        .build()?;

    let core_worker = Arc::new(init_worker(
        &runtime,
        worker_config,
        worker_connection.into_client(),
    )?);
    let mut worker = Worker::new_from_core(core_worker.clone(), config.task_queue.clone());

    register_activities(&mut worker, activities);

    let core = core_worker.clone();
    tokio::spawn(shutdown_on(shutdown_signal(), move || {
        core.initiate_shutdown()
    }));

    info!(
        "Worker started for task queue: {} (namespace={}, batch operation={})",
        config.task_queue, config.worker.namespace, config.operation
    );

    worker.run().await?;

    info!("Worker shut down");
    Ok(())
}
