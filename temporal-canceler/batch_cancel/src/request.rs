//! Construction of batch operation requests.

use helpers::BatchOperationKind;
use temporal_sdk_core_protos::temporal::api::{
    batch::v1::{BatchOperationCancellation, BatchOperationTermination},
    workflowservice::v1::{
        CountWorkflowExecutionsRequest, DescribeBatchOperationRequest, StartBatchOperationRequest,
        start_batch_operation_request::Operation,
    },
};
use uuid::Uuid;

/// Activity type name the scheduler dispatches on the task queue.
pub const BATCH_CANCEL_ACTIVITY: &str = "batch_cancel_workflows";
pub const DESCRIBE_BATCH_ACTIVITY: &str = "describe_batch_operation";
pub const CONFIRM_CANCELLED_ACTIVITY: &str = "confirm_all_cancelled";

/// Evaluated by the server; the worker never enumerates executions itself.
pub const VISIBILITY_QUERY: &str = r#"WorkloadId = "1" AND ExecutionStatus = "Running""#;
pub const BATCH_REASON: &str = "Runaway Train";

pub fn new_job_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn operation_for(kind: BatchOperationKind) -> Operation {
    match kind {
        BatchOperationKind::Cancel => {
            Operation::CancellationOperation(BatchOperationCancellation::default())
        }
        BatchOperationKind::Terminate => {
            Operation::TerminationOperation(BatchOperationTermination::default())
        }
    }
}

pub fn build_start_request(
    namespace: &str,
    kind: BatchOperationKind,
    job_id: &str,
) -> StartBatchOperationRequest {
    StartBatchOperationRequest {
        namespace: namespace.to_owned(),
        visibility_query: VISIBILITY_QUERY.to_owned(),
        job_id: job_id.to_owned(),
        reason: BATCH_REASON.to_owned(),
        operation: Some(operation_for(kind)),
        ..Default::default()
    }
}

pub fn build_describe_request(namespace: &str, job_id: &str) -> DescribeBatchOperationRequest {
    DescribeBatchOperationRequest {
        namespace: namespace.to_owned(),
        job_id: job_id.to_owned(),
        ..Default::default()
    }
}

/// Counts executions the batch targets that are still running.
pub fn build_count_request(namespace: &str) -> CountWorkflowExecutionsRequest {
    CountWorkflowExecutionsRequest {
        namespace: namespace.to_owned(),
        query: VISIBILITY_QUERY.to_owned(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn count_request_reuses_the_batch_query() {
        let req = build_count_request("prod.abc12");
        assert_eq!(req.namespace, "prod.abc12");
        assert_eq!(req.query, VISIBILITY_QUERY);
    }

    #[test]
    fn start_request_sets_only_the_expected_fields() {
        let req = build_start_request("prod.abc12", BatchOperationKind::Terminate, "job-1");

        assert_eq!(req.namespace, "prod.abc12");
        assert_eq!(
            req.visibility_query,
            "WorkloadId = \"1\" AND ExecutionStatus = \"Running\""
        );
        assert_eq!(req.job_id, "job-1");
        assert_eq!(req.reason, "Runaway Train");
        assert!(req.executions.is_empty());
        assert_eq!(
            req.operation,
            Some(Operation::TerminationOperation(
                BatchOperationTermination::default()
            ))
        );
    }

    #[test]
    fn cancel_kind_selects_cancellation_operation() {
        let req = build_start_request("ns", BatchOperationKind::Cancel, "job-2");
        assert!(matches!(
            req.operation,
            Some(Operation::CancellationOperation(_))
        ));
    }

    #[test]
    fn job_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| new_job_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
