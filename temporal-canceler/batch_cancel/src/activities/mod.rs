//! Activities registered on the canceler worker.
//!
//! All activities share one [`BatchActivities`] value holding the client
//! built at startup, so no connection is opened per invocation.

mod batch_cancel;
mod confirm_cancelled;
mod describe_batch;
mod failure;

use std::sync::Arc;

use helpers::{ApiKeySupplier, BatchOperationKind, TemporalConnection};
use temporal_client::{Client, RetryClient};

pub use batch_cancel::batch_cancel_workflows;
pub use confirm_cancelled::{ConfirmOptions, confirm_all_cancelled};
pub use describe_batch::{BatchOperationStatus, describe_batch_operation};

use crate::service::BatchOperationService;

/// State injected into every activity invocation.
pub struct BatchActivities<S> {
    service: S,
    namespace: String,
    operation: BatchOperationKind,
    api_key: Arc<dyn ApiKeySupplier>,
}

impl<S: BatchOperationService> BatchActivities<S> {
    pub fn new(
        service: S,
        namespace: impl Into<String>,
        operation: BatchOperationKind,
        api_key: Arc<dyn ApiKeySupplier>,
    ) -> Self {
        Self {
            service,
            namespace: namespace.into(),
            operation,
            api_key,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl BatchActivities<RetryClient<Client>> {
    /// Issue batch calls over `connection`, in the namespace it is bound to.
    pub fn from_connection(connection: TemporalConnection, operation: BatchOperationKind) -> Self {
        let namespace = connection.namespace().to_owned();
        let api_key = connection.api_key_supplier();
        Self::new(connection.into_client(), namespace, operation, api_key)
    }
}
