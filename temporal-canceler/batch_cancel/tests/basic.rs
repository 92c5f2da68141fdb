//! Compile-time checks that the real Temporal client plugs into the worker.
//!
//! Running the activities against a live client needs a Temporal server, so
//! here we only make sure the production types line up: the `RetryClient`
//! implements the service seam and the activities can be registered with it.

use std::sync::Arc;

use batch_cancel::{
    activities::BatchActivities, service::BatchOperationService, worker::register_activities,
};
use temporal_client::{Client, RetryClient};
use temporal_sdk::Worker;

fn _assert_service<S: BatchOperationService>() {}

fn _register_with_real_client(worker: &mut Worker, acts: Arc<BatchActivities<RetryClient<Client>>>) {
    register_activities(worker, acts);
}

#[test]
fn real_client_is_a_batch_service() {
    _assert_service::<RetryClient<Client>>();
    let _ = _register_with_real_client;
}
