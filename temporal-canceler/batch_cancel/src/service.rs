//! The slice of the WorkflowService API the activities call.

use std::future::Future;

use temporal_client::{Client, RetryClient, WorkflowService};
use temporal_sdk_core_protos::temporal::api::workflowservice::v1::{
    CountWorkflowExecutionsRequest, CountWorkflowExecutionsResponse, DescribeBatchOperationRequest,
    DescribeBatchOperationResponse, StartBatchOperationRequest, StartBatchOperationResponse,
};
use tonic::{Request, Response, Status};

/// Unary batch-operation and visibility RPCs. Implemented by the real
/// Temporal client and by in-process fakes in tests.
pub trait BatchOperationService: Send + Sync + 'static {
    fn start_batch_operation(
        &self,
        request: Request<StartBatchOperationRequest>,
    ) -> impl Future<Output = Result<Response<StartBatchOperationResponse>, Status>> + Send;

    fn describe_batch_operation(
        &self,
        request: Request<DescribeBatchOperationRequest>,
    ) -> impl Future<Output = Result<Response<DescribeBatchOperationResponse>, Status>> + Send;

    fn count_workflow_executions(
        &self,
        request: Request<CountWorkflowExecutionsRequest>,
    ) -> impl Future<Output = Result<Response<CountWorkflowExecutionsResponse>, Status>> + Send;
}

impl BatchOperationService for RetryClient<Client> {
    fn start_batch_operation(
        &self,
        request: Request<StartBatchOperationRequest>,
    ) -> impl Future<Output = Result<Response<StartBatchOperationResponse>, Status>> + Send {
        // Raw service calls need `&mut`; clones share the underlying channel.
        let mut client = self.clone();
        async move { WorkflowService::start_batch_operation(&mut client, request).await }
    }

    fn describe_batch_operation(
        &self,
        request: Request<DescribeBatchOperationRequest>,
    ) -> impl Future<Output = Result<Response<DescribeBatchOperationResponse>, Status>> + Send {
        let mut client = self.clone();
        async move { WorkflowService::describe_batch_operation(&mut client, request).await }
    }

    fn count_workflow_executions(
        &self,
        request: Request<CountWorkflowExecutionsRequest>,
    ) -> impl Future<Output = Result<Response<CountWorkflowExecutionsResponse>, Status>> + Send {
        let mut client = self.clone();
        async move { WorkflowService::count_workflow_executions(&mut client, request).await }
    }
}
