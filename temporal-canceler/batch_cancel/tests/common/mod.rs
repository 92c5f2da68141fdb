//! In-process stand-in for the Temporal WorkflowService.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use batch_cancel::{activities::BatchActivities, service::BatchOperationService};
use helpers::{ApiKey, BatchOperationKind};
use temporal_sdk_core_protos::temporal::api::{
    enums::v1::BatchOperationState,
    workflowservice::v1::{
        CountWorkflowExecutionsRequest, CountWorkflowExecutionsResponse,
        DescribeBatchOperationRequest, DescribeBatchOperationResponse, StartBatchOperationRequest,
        StartBatchOperationResponse,
    },
};
use tonic::{Code, Request, Response, Status};

pub const MAIN_KEY: &str = "tmprl-main-secret-key";
pub const NAMESPACE: &str = "prod.abc12";

#[derive(Clone)]
pub enum Reply {
    Ok,
    Fail(Code, &'static str),
    /// Never answers.
    Hang,
}

pub struct Recorded<T> {
    pub message: T,
    pub authorization: Option<String>,
}

pub struct FakeBatchService {
    reply: Reply,
    describe_state: BatchOperationState,
    /// Answers to successive count calls; the last one repeats.
    running_counts: Mutex<VecDeque<i64>>,
    pub started: Mutex<Vec<Recorded<StartBatchOperationRequest>>>,
    pub described: Mutex<Vec<Recorded<DescribeBatchOperationRequest>>>,
    pub counted: Mutex<Vec<Recorded<CountWorkflowExecutionsRequest>>>,
}

impl FakeBatchService {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            describe_state: BatchOperationState::Running,
            running_counts: Mutex::new(VecDeque::from([0])),
            started: Mutex::new(Vec::new()),
            described: Mutex::new(Vec::new()),
            counted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_describe_state(mut self, state: BatchOperationState) -> Self {
        self.describe_state = state;
        self
    }

    pub fn with_running_counts(self, counts: impl IntoIterator<Item = i64>) -> Self {
        *self.running_counts.lock().unwrap() = counts.into_iter().collect();
        self
    }

    fn next_running_count(&self) -> i64 {
        let mut counts = self.running_counts.lock().unwrap();
        if counts.len() > 1 {
            counts.pop_front().unwrap_or_default()
        } else {
            counts.front().copied().unwrap_or_default()
        }
    }

    fn record<T>(request: Request<T>) -> Recorded<T> {
        let authorization = request
            .metadata()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Recorded {
            message: request.into_inner(),
            authorization,
        }
    }

    async fn answer<T>(&self, ok: T) -> Result<Response<T>, Status> {
        match self.reply.clone() {
            Reply::Ok => Ok(Response::new(ok)),
            Reply::Fail(code, msg) => Err(Status::new(code, msg)),
            Reply::Hang => std::future::pending().await,
        }
    }
}

impl BatchOperationService for FakeBatchService {
    async fn start_batch_operation(
        &self,
        request: Request<StartBatchOperationRequest>,
    ) -> Result<Response<StartBatchOperationResponse>, Status> {
        self.started.lock().unwrap().push(Self::record(request));
        self.answer(StartBatchOperationResponse::default()).await
    }

    async fn describe_batch_operation(
        &self,
        request: Request<DescribeBatchOperationRequest>,
    ) -> Result<Response<DescribeBatchOperationResponse>, Status> {
        let recorded = Self::record(request);
        let job_id = recorded.message.job_id.clone();
        self.described.lock().unwrap().push(recorded);
        self.answer(DescribeBatchOperationResponse {
            job_id,
            state: self.describe_state as i32,
            reason: "Runaway Train".to_owned(),
            total_operation_count: 10,
            complete_operation_count: 4,
            failure_operation_count: 1,
            ..Default::default()
        })
        .await
    }

    async fn count_workflow_executions(
        &self,
        request: Request<CountWorkflowExecutionsRequest>,
    ) -> Result<Response<CountWorkflowExecutionsResponse>, Status> {
        self.counted.lock().unwrap().push(Self::record(request));
        let count = self.next_running_count();
        self.answer(CountWorkflowExecutionsResponse {
            count,
            ..Default::default()
        })
        .await
    }
}

pub fn activities(reply: Reply, operation: BatchOperationKind) -> Arc<BatchActivities<FakeBatchService>> {
    activities_over(FakeBatchService::new(reply), operation)
}

pub fn activities_over(
    service: FakeBatchService,
    operation: BatchOperationKind,
) -> Arc<BatchActivities<FakeBatchService>> {
    Arc::new(BatchActivities::new(
        service,
        NAMESPACE,
        operation,
        Arc::new(ApiKey::new(MAIN_KEY)),
    ))
}
