//! CLI channel — stdin/stdout REPL for local use.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use crate::assistant::Assistant;
use crate::error::ChannelError;
use crate::workflow::WorkflowState;

const CLI_USER: &str = "local-user";

/// Read lines from stdin and run each through the assistant until EOF or
/// the session closes. The whole REPL is one conversation.
pub async fn run_repl(assistant: Arc<Assistant>) -> Result<(), ChannelError> {
    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();
    let mut conversation_id: Option<Uuid> = None;

    eprintln!("{} ready. Type a message, or \"quit\" when paused to end.", assistant.name());
    eprint!("> ");

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line.trim().to_string(),
            Ok(None) => break, // EOF
            Err(e) => {
                return Err(ChannelError::StartupFailed {
                    name: "cli".to_string(),
                    reason: format!("Error reading stdin: {e}"),
                });
            }
        };
        if line.is_empty() {
            eprint!("> ");
            continue;
        }

        let reply = assistant.chat(CLI_USER, conversation_id, &line).await;
        conversation_id = Some(reply.conversation_id);

        println!("\n[{}] {}\n", reply.specialist, reply.content);

        if reply.workflow_state.is_paused() {
            eprintln!("(paused — reply to continue)");
        }
        // A system notice with a completed state is the termination ack.
        if reply.specialist == "system" && reply.workflow_state == WorkflowState::Completed {
            break;
        }
        eprint!("> ");
    }

    Ok(())
}
