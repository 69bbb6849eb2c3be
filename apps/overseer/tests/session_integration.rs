//! Integration tests for full delegation sessions
//!
//! These tests run the human, manager and workers through the router with
//! scripted completion services and check the envelopes that flowed between
//! them and the report that reached the human.

use std::sync::Arc;

use overseer::agents::selection::RoundRobin;
use overseer::agents::types::Completion;
use overseer::agents::{
    Agent, AgentError, EventSink, HumanAgent, ManagerAgent, MessageType, RecordingSink,
    ScriptedGateway, Session, WorkerAgent,
};
use overseer::infrastructure::MemoryReportWriter;

const HAIKU: &str = "Salt wind on the tide\nwaves fold the moon into foam\nthe shore keeps nothing";

fn decision(should_continue: bool, to: &str, message: &str) -> String {
    serde_json::json!({
        "metadata": { "continue": should_continue },
        "payload": {
            "to": to,
            "message": message,
            "tasks": [message],
            "next_task": message
        }
    })
    .to_string()
}

struct Harness {
    sink: RecordingSink,
    output: MemoryReportWriter,
    manager_gateway: Arc<ScriptedGateway>,
    worker_gateway: Arc<ScriptedGateway>,
}

/// One manager and one worker, each with its own script
fn single_worker_session(
    manager_replies: Vec<String>,
    worker_replies: Vec<Completion>,
) -> (Session, Harness) {
    let sink = RecordingSink::new();
    let shared_sink: Arc<dyn EventSink> = Arc::new(sink.clone());
    let output = MemoryReportWriter::new();
    let manager_gateway = Arc::new(ScriptedGateway::new(manager_replies));
    let worker_gateway = Arc::new(ScriptedGateway::from_completions(worker_replies));

    let worker = WorkerAgent::new(worker_gateway.clone()).with_sink(shared_sink.clone());
    let manager = ManagerAgent::new(manager_gateway.clone(), vec![worker.id()])
        .with_sink(shared_sink.clone());
    let human = HumanAgent::new(Box::new(output.clone()));

    let session = Session::new(human, manager, vec![worker], shared_sink);
    (
        session,
        Harness {
            sink,
            output,
            manager_gateway,
            worker_gateway,
        },
    )
}

fn message_types(sink: &RecordingSink) -> Vec<MessageType> {
    sink.messages().into_iter().map(|m| m.0).collect()
}

#[tokio::test]
async fn haiku_scenario_produces_one_report() {
    let (session, harness) = single_worker_session(
        vec![
            decision(true, "AI", "Draft a haiku about the sea."),
            decision(false, "HUMAN", "The haiku is finished."),
            "Summary text".to_string(),
        ],
        vec![Completion::new(HAIKU)],
    );

    let outcome = session
        .run("Write a haiku about the sea.")
        .await
        .expect("session completes");

    assert_eq!(outcome.deliveries, 4);
    assert_eq!(harness.worker_gateway.call_count(), 1);
    assert_eq!(harness.manager_gateway.call_count(), 3);
    assert_eq!(
        message_types(&harness.sink),
        vec![
            MessageType::SendPurpose,
            MessageType::SendTask,
            MessageType::SendResult,
            MessageType::SendSummary,
        ]
    );

    let reports = harness.output.reports();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert!(report.contains("Write a haiku about the sea."));
    assert!(report.contains("Summary text"));
    assert!(report.contains(HAIKU));
}

#[tokio::test]
async fn worker_receives_the_decision_message_verbatim() {
    let task = "Draft a haiku about the sea.\nUse 5-7-5 syllables — no title.";
    let (session, harness) = single_worker_session(
        vec![
            decision(true, "AI", task),
            decision(false, "HUMAN", "done"),
            "Summary".to_string(),
        ],
        vec![Completion::new(HAIKU)],
    );

    session.run("haiku").await.unwrap();

    let worker_request = &harness.worker_gateway.requests()[0];
    assert_eq!(worker_request.turns.len(), 1);
    assert_eq!(worker_request.turns[0].text, task);

    let messages = harness.sink.messages();
    let (_, _, _, task_content) = messages
        .iter()
        .find(|m| m.0 == MessageType::SendTask)
        .unwrap();
    assert_eq!(task_content, task);
    let (_, _, _, result_content) = messages
        .iter()
        .find(|m| m.0 == MessageType::SendResult)
        .unwrap();
    assert_eq!(result_content, HAIKU);
}

#[tokio::test]
async fn goal_reaches_manager_unchanged() {
    let goal = "  Plan a trip:\n\t• Kyoto 京都\n\t• Osaka  ";
    let (session, harness) = single_worker_session(
        vec![
            decision(true, "AI", "a"),
            decision(false, "HUMAN", "done"),
            "Summary".to_string(),
        ],
        vec![Completion::new("r")],
    );

    let outcome = session.run(goal).await.unwrap();

    let messages = harness.sink.messages();
    assert_eq!(messages[0].0, MessageType::SendPurpose);
    assert_eq!(messages[0].1, outcome.human);
    assert_eq!(messages[0].2, outcome.manager);
    assert_eq!(messages[0].3, goal);

    let first_request = &harness.manager_gateway.requests()[0];
    assert_eq!(first_request.turns[1].text, format!("Human> {goal}"));
}

#[tokio::test]
async fn loop_count_matches_continue_decisions() {
    let k = 3;
    let mut manager_replies: Vec<String> = (0..=k)
        .map(|i| decision(true, "AI", &format!("task {i}")))
        .collect();
    manager_replies.push(decision(false, "HUMAN", "done"));
    manager_replies.push("Summary".to_string());
    let worker_replies = (0..=k)
        .map(|i| Completion::new(format!("result {i}")))
        .collect();

    let (session, harness) = single_worker_session(manager_replies, worker_replies);
    session.run("goal").await.unwrap();

    // The first task comes from the purpose, the next k from evaluations.
    assert_eq!(harness.sink.count(MessageType::SendTask), k + 1);
    assert_eq!(harness.sink.count(MessageType::SendResult), k + 1);
    assert_eq!(harness.sink.count(MessageType::SendSummary), 1);
    assert_eq!(harness.worker_gateway.call_count(), k + 1);

    let report = &harness.output.reports()[0];
    assert_eq!(report.matches("\"continue\":true").count(), k + 1);
    assert_eq!(report.matches("### [assistant]").count(), k + 2);
    for i in 0..=k {
        assert!(report.contains(&format!("Worker> result {i}")));
    }
}

#[tokio::test]
async fn tasks_precede_results_and_summary_ends_the_session() {
    let (session, harness) = single_worker_session(
        vec![
            decision(true, "AI", "a"),
            decision(true, "AI", "b"),
            decision(false, "HUMAN", "done"),
            "Summary".to_string(),
        ],
        vec![Completion::new("ra"), Completion::new("rb")],
    );

    session.run("goal").await.unwrap();

    let types = message_types(&harness.sink);
    let first_task = types.iter().position(|t| *t == MessageType::SendTask).unwrap();
    let first_result = types.iter().position(|t| *t == MessageType::SendResult).unwrap();
    assert!(first_task < first_result);

    // Strict alternation: every task is answered before the next one is sent.
    let exchange: Vec<_> = types
        .iter()
        .filter(|t| matches!(t, MessageType::SendTask | MessageType::SendResult))
        .collect();
    for pair in exchange.chunks(2) {
        assert_eq!(pair, [&MessageType::SendTask, &MessageType::SendResult]);
    }

    assert_eq!(types.last(), Some(&MessageType::SendSummary));
    assert_eq!(harness.sink.count(MessageType::SendSummary), 1);
    assert_eq!(harness.manager_gateway.remaining(), 0);
}

#[tokio::test]
async fn malformed_decision_aborts_without_report() {
    let (session, harness) = single_worker_session(
        vec![
            decision(true, "AI", "a"),
            r#"{"metadata":{"continue":false},"payload":{"message":"who is this for?"}}"#
                .to_string(),
        ],
        vec![Completion::new("r")],
    );

    let result = session.run("goal").await;

    assert!(matches!(result, Err(AgentError::MalformedDecision(_))));
    assert!(harness.output.reports().is_empty());
    assert_eq!(harness.sink.count(MessageType::SendSummary), 0);
}

#[tokio::test]
async fn empty_worker_answer_aborts_without_report() {
    let (session, harness) = single_worker_session(
        vec![decision(true, "AI", "a")],
        vec![Completion::empty()],
    );

    let result = session.run("goal").await;

    assert!(matches!(result, Err(AgentError::EmptyResponse(_))));
    assert!(harness.output.reports().is_empty());
    assert_eq!(harness.sink.count(MessageType::SendResult), 0);
}

#[tokio::test]
async fn service_failure_aborts_without_report() {
    // The manager's script runs out after the first decision.
    let (session, harness) =
        single_worker_session(vec![decision(true, "AI", "a")], vec![Completion::new("r")]);

    let result = session.run("goal").await;

    assert!(matches!(result, Err(AgentError::Service(_))));
    assert!(harness.output.reports().is_empty());
}

#[tokio::test]
async fn round_limit_caps_delegation() {
    let sink = RecordingSink::new();
    let shared_sink: Arc<dyn EventSink> = Arc::new(sink.clone());
    let output = MemoryReportWriter::new();
    let manager_gateway = Arc::new(ScriptedGateway::new([
        decision(true, "AI", "a"),
        decision(true, "AI", "b"),
        "Summary".to_string(),
    ]));
    let worker_gateway = Arc::new(ScriptedGateway::new(["ra"]));

    let worker = WorkerAgent::new(worker_gateway).with_sink(shared_sink.clone());
    let manager = ManagerAgent::new(manager_gateway, vec![worker.id()])
        .with_max_rounds(Some(1))
        .with_sink(shared_sink.clone());
    let human = HumanAgent::new(Box::new(output.clone()));

    Session::new(human, manager, vec![worker], shared_sink)
        .run("goal")
        .await
        .unwrap();

    assert_eq!(sink.count(MessageType::SendTask), 1);
    assert_eq!(output.reports().len(), 1);
}

#[tokio::test]
async fn round_robin_alternates_workers() {
    let sink = RecordingSink::new();
    let shared_sink: Arc<dyn EventSink> = Arc::new(sink.clone());
    let output = MemoryReportWriter::new();
    let manager_gateway = Arc::new(ScriptedGateway::new([
        decision(true, "AI", "a"),
        decision(true, "AI", "b"),
        decision(true, "AI", "c"),
        decision(false, "HUMAN", "done"),
        "Summary".to_string(),
    ]));
    let first = WorkerAgent::new(Arc::new(ScriptedGateway::new(["a1", "c1"])))
        .with_sink(shared_sink.clone());
    let second =
        WorkerAgent::new(Arc::new(ScriptedGateway::new(["b2"]))).with_sink(shared_sink.clone());
    let worker_ids = vec![first.id(), second.id()];

    let manager = ManagerAgent::new(manager_gateway, worker_ids.clone())
        .with_selector(Box::<RoundRobin>::default())
        .with_sink(shared_sink.clone());
    let human = HumanAgent::new(Box::new(output.clone()));

    Session::new(human, manager, vec![first, second], shared_sink)
        .run("goal")
        .await
        .unwrap();

    let task_recipients: Vec<_> = sink
        .messages()
        .into_iter()
        .filter(|m| m.0 == MessageType::SendTask)
        .map(|m| m.2)
        .collect();
    assert_eq!(task_recipients, vec![worker_ids[0], worker_ids[1], worker_ids[0]]);

    let report = &output.reports()[0];
    assert!(report.contains("Worker> a1"));
    assert!(report.contains("Worker> b2"));
    assert!(report.contains("Worker> c1"));
}

#[tokio::test]
async fn manager_without_registered_worker_fails_delivery() {
    let sink: Arc<dyn EventSink> = Arc::new(RecordingSink::new());
    let output = MemoryReportWriter::new();
    let ghost = WorkerAgent::new(Arc::new(ScriptedGateway::new(["never"])));
    let manager = ManagerAgent::new(
        Arc::new(ScriptedGateway::new([decision(true, "AI", "a")])),
        vec![ghost.id()],
    )
    .with_sink(sink.clone());
    let human = HumanAgent::new(Box::new(output.clone()));

    let result = Session::new(human, manager, vec![], sink).run("goal").await;

    assert!(matches!(result, Err(AgentError::AgentNotFound(_))));
    assert!(output.reports().is_empty());
}
