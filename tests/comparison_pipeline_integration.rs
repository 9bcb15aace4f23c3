//! End-to-end tests for the comparison pipeline.
//!
//! Runs `ExecuteComparisonHandler` with in-memory persistence against both the
//! scripted mock provider and the real OpenAI client pointed at a local stub.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use common::{StubReply, StubServer, FENCED_COMPLETION};
use tradeoff_compass::adapters::ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
use tradeoff_compass::adapters::storage::InMemoryComparisonRepository;
use tradeoff_compass::application::handlers::comparison::{
    ExecuteComparisonCommand, ExecuteComparisonHandler, GetComparisonHandler,
};
use tradeoff_compass::domain::comparison::{ComparisonInput, ComparisonStatus, ServiceError};
use tradeoff_compass::ports::AIProvider;

fn input() -> ComparisonInput {
    ComparisonInput::new(
        vec!["A".to_string(), "B".to_string()],
        vec!["cost".to_string()],
    )
    .unwrap()
}

#[tokio::test]
async fn fenced_completion_produces_single_option_record() {
    let repository = InMemoryComparisonRepository::new();
    let provider = Arc::new(MockAIProvider::new().with_response(FENCED_COMPLETION));
    let handler = ExecuteComparisonHandler::new(Arc::new(repository.clone()), provider);

    let record = handler
        .handle(ExecuteComparisonCommand::new(input()))
        .await
        .unwrap();

    assert_eq!(record.options.len(), 1);
    assert_eq!(record.options[0].name, "A");
    assert!(record.options[0].pros.is_empty());
    assert!(record.options[0].cons.is_empty());
    assert!(record.options[0].scores.is_empty());
    assert!(record.trade_offs.is_empty());

    let view = GetComparisonHandler::new(Arc::new(repository))
        .handle(record.id)
        .await
        .unwrap();
    assert_eq!(view.status(), ComparisonStatus::Completed);
}

#[tokio::test]
async fn real_client_against_stub_runs_the_whole_pipeline() {
    let stub = StubServer::start(vec![
        StubReply::status(502),
        StubReply::completion(FENCED_COMPLETION),
    ])
    .await;
    let provider: Arc<dyn AIProvider> = Arc::new(
        OpenAIProvider::new(
            OpenAIConfig::new("sk-test")
                .with_base_url(stub.base_url())
                .with_base_delay(Duration::from_millis(10)),
        )
        .unwrap(),
    );
    let repository = InMemoryComparisonRepository::new();
    let handler = ExecuteComparisonHandler::new(Arc::new(repository.clone()), provider);

    let record = handler
        .handle(ExecuteComparisonCommand::new(input()))
        .await
        .unwrap();

    assert_eq!(stub.calls(), 2);
    assert_eq!(record.options[0].name, "A");

    let prompt = stub.last_body().unwrap()["messages"][1]["content"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.contains("1. A"));
    assert!(prompt.contains("2. B"));
    assert!(prompt.contains("1. cost"));
}

#[tokio::test]
async fn exhausted_retries_leave_a_pending_request() {
    let stub = StubServer::start(vec![StubReply::status(500)]).await;
    let provider: Arc<dyn AIProvider> = Arc::new(
        OpenAIProvider::new(
            OpenAIConfig::new("sk-test")
                .with_base_url(stub.base_url())
                .with_max_retries(2)
                .with_base_delay(Duration::from_millis(10)),
        )
        .unwrap(),
    );
    let repository = InMemoryComparisonRepository::new();
    let handler = ExecuteComparisonHandler::new(Arc::new(repository.clone()), provider);

    let err = handler
        .handle(ExecuteComparisonCommand::new(input()))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::AiUnavailable(_)));
    assert_eq!(err.status_code(), 502);
    assert_eq!(stub.calls(), 2);
    assert_eq!(repository.request_count().await, 1);
    assert_eq!(repository.result_count().await, 0);
}

#[tokio::test]
async fn caller_cancellation_aborts_the_completion() {
    let repository = InMemoryComparisonRepository::new();
    let provider = Arc::new(
        MockAIProvider::new()
            .with_response(FENCED_COMPLETION)
            .with_delay(Duration::from_secs(30)),
    );
    let handler = ExecuteComparisonHandler::new(Arc::new(repository.clone()), provider);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = handler
        .handle(ExecuteComparisonCommand::new(input()).with_cancellation(token))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::AiUnavailable(_)));
    assert_eq!(repository.result_count().await, 0);
}

#[tokio::test]
async fn prose_wrapped_completion_with_bad_trade_off_degrades() {
    let repository = InMemoryComparisonRepository::new();
    let provider = Arc::new(MockAIProvider::new().with_response(
        "Here is the comparison: {\"options\":[{\"name\":\" A \",\"pros\":[\"cheap\",\"\"],\
\"cons\":[],\"scores\":{\"cost\":3}}],\"tradeOffs\":[{\"scenario\":\"x\"}]} Hope it helps.",
    ));
    let handler = ExecuteComparisonHandler::new(Arc::new(repository), provider);

    let record = handler
        .handle(ExecuteComparisonCommand::new(input()))
        .await
        .unwrap();

    assert_eq!(record.options[0].name, "A");
    assert_eq!(record.options[0].pros, vec!["cheap"]);
    assert_eq!(record.options[0].scores.get("cost").map(String::as_str), Some("3"));
    assert!(record.trade_offs.is_empty());
}
