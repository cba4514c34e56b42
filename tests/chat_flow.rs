//! End-to-end chat flows through the assistant service, including the
//! libSQL persistence round trip.

use std::sync::Arc;

use cea_assist::assistant::Assistant;
use cea_assist::config::AssistantConfig;
use cea_assist::router::{KeywordRouter, SpecialistId};
use cea_assist::specialists::SpecialistRegistry;
use cea_assist::store::{ConversationStore, LibSqlBackend};
use cea_assist::tools::LookupRegistry;
use cea_assist::workflow::{Workflow, WorkflowConfig, WorkflowDeps, WorkflowState};

fn build_assistant(
    config: AssistantConfig,
    store: Option<Arc<dyn ConversationStore>>,
) -> Assistant {
    let tools = Arc::new(LookupRegistry::with_builtins());
    let workflow = Workflow::new(
        WorkflowConfig::new(config.quit_token.clone(), config.interrupt_before.clone()),
        WorkflowDeps {
            store: store.clone(),
            specialists: Arc::new(SpecialistRegistry::with_defaults(tools, None)),
            classifier: Box::new(KeywordRouter::new()),
        },
    );
    Assistant::new(config, workflow, store)
}

#[tokio::test]
async fn veteran_conversation_routes_to_the_veteran_specialist() {
    let assistant = build_assistant(AssistantConfig::default(), None);

    let reply = assistant
        .chat("vet-1", None, "I'm a veteran leaving the military soon")
        .await;

    assert_eq!(reply.specialist, "veteran");
    assert_eq!(reply.workflow_state, WorkflowState::Completed);
    assert!(reply.content.contains("SkillBridge") || !reply.content.is_empty());

    // Follow-up stays in the same conversation and can switch specialists.
    let follow_up = assistant
        .chat(
            "vet-1",
            Some(reply.conversation_id),
            "my spouse needs visa sponsorship help",
        )
        .await;
    assert_eq!(follow_up.conversation_id, reply.conversation_id);
    assert_eq!(follow_up.specialist, "international");
}

#[tokio::test]
async fn quit_flow_closes_the_session() {
    let config = AssistantConfig {
        interrupt_before: vec![SpecialistId::Veteran],
        ..AssistantConfig::default()
    };
    let assistant = build_assistant(config, None);

    let paused = assistant.chat("u1", None, "veteran career help").await;
    assert_eq!(paused.workflow_state, WorkflowState::AwaitingInput);

    let ended = assistant
        .chat("u1", Some(paused.conversation_id), "quit")
        .await;
    assert_eq!(ended.workflow_state, WorkflowState::Completed);
    assert_eq!(ended.specialist, "system");

    // Messages after termination get the closed-session notice.
    let after = assistant
        .chat("u1", Some(paused.conversation_id), "hello again")
        .await;
    assert_eq!(after.specialist, "system");
    assert!(after.content.contains("session has ended"));
}

#[tokio::test]
async fn conversations_survive_a_service_restart() {
    let store: Arc<dyn ConversationStore> = Arc::new(LibSqlBackend::new_memory().await.unwrap());

    let assistant = build_assistant(AssistantConfig::default(), Some(Arc::clone(&store)));
    let reply = assistant
        .chat("u1", None, "environmental justice in my community")
        .await;
    assert_eq!(reply.specialist, "environmental_justice");
    let id = reply.conversation_id;

    // Persistence is fire-and-forget; give the spawned writes a moment.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    // A fresh assistant over the same store hydrates the conversation.
    let restarted = build_assistant(AssistantConfig::default(), Some(Arc::clone(&store)));
    let follow_up = restarted
        .chat("u1", Some(id), "tell me more about the options")
        .await;
    assert_eq!(follow_up.conversation_id, id);
    assert_eq!(follow_up.workflow_state, WorkflowState::Completed);

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let history = restarted.history(id).await.unwrap();
    // Two full turns persisted across the restart.
    assert!(history.len() >= 4, "expected at least 4 messages, got {}", history.len());
}

#[tokio::test]
async fn history_endpoint_data_matches_the_live_session() {
    let assistant = build_assistant(AssistantConfig::default(), None);
    let reply = assistant.chat("u1", None, "hello there").await;

    let history = assistant.history(reply.conversation_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "hello there");
    assert_eq!(history[1].content, reply.content);
}
