use std::sync::Arc;

use cea_assist::assistant::Assistant;
use cea_assist::channels;
use cea_assist::config::AssistantConfig;
use cea_assist::llm::{self, LlmBackend, LlmConfig, LlmProvider};
use cea_assist::router::KeywordRouter;
use cea_assist::specialists::SpecialistRegistry;
use cea_assist::store::{ConversationStore, LibSqlBackend};
use cea_assist::tools::LookupRegistry;
use cea_assist::workflow::{Workflow, WorkflowConfig, WorkflowDeps};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AssistantConfig::from_env()?;

    eprintln!("🌱 Climate Economy Assistant v{}", env!("CARGO_PKG_VERSION"));

    // ── LLM (optional) ──────────────────────────────────────────────────
    // Without a key the general specialist falls back to templated answers.
    let llm: Option<Arc<dyn LlmProvider>> = if let Ok(key) = std::env::var("CEA_ANTHROPIC_API_KEY")
    {
        let model = std::env::var("CEA_LLM_MODEL")
            .unwrap_or_else(|_| "claude-sonnet-4-20250514".to_string());
        eprintln!("   LLM: anthropic ({model})");
        Some(llm::create_provider(&LlmConfig {
            backend: LlmBackend::Anthropic,
            api_key: secrecy::SecretString::from(key),
            model,
            base_url: None,
            max_tokens: 1024,
            temperature: 0.3,
        })?)
    } else if let Ok(key) = std::env::var("CEA_OPENAI_API_KEY") {
        let model = std::env::var("CEA_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        eprintln!("   LLM: openai ({model})");
        Some(llm::create_provider(&LlmConfig {
            backend: LlmBackend::OpenAi,
            api_key: secrecy::SecretString::from(key),
            model,
            base_url: std::env::var("CEA_LLM_BASE_URL").ok(),
            max_tokens: 1024,
            temperature: 0.3,
        })?)
    } else {
        eprintln!("   LLM: none (set CEA_ANTHROPIC_API_KEY or CEA_OPENAI_API_KEY to enable)");
        None
    };

    // ── Database ────────────────────────────────────────────────────────
    let db_path = std::env::var("CEA_DB_PATH").unwrap_or_else(|_| "./data/cea-assist.db".to_string());
    let store: Arc<dyn ConversationStore> = Arc::new(
        LibSqlBackend::new_local(std::path::Path::new(&db_path))
            .await
            .unwrap_or_else(|e| {
                eprintln!("Error: Failed to open database at {db_path}: {e}");
                std::process::exit(1);
            }),
    );
    eprintln!("   Database: {db_path}");

    // ── Tools and specialists ───────────────────────────────────────────
    let tools = Arc::new(LookupRegistry::with_builtins());
    eprintln!("   Tools: {} registered", tools.count());

    let specialists = Arc::new(SpecialistRegistry::with_defaults(Arc::clone(&tools), llm));
    eprintln!("   Specialists: {} registered", specialists.count());

    if !config.interrupt_before.is_empty() {
        let names: Vec<&str> = config.interrupt_before.iter().map(|s| s.as_str()).collect();
        eprintln!("   Human review before: {}", names.join(", "));
    }

    // ── Workflow and assistant ──────────────────────────────────────────
    let workflow = Workflow::new(
        WorkflowConfig::new(config.quit_token.clone(), config.interrupt_before.clone()),
        WorkflowDeps {
            store: Some(Arc::clone(&store)),
            specialists,
            classifier: Box::new(KeywordRouter::new()),
        },
    );
    let assistant = Arc::new(Assistant::new(config.clone(), workflow, Some(store)));

    // ── Channels ────────────────────────────────────────────────────────
    eprintln!("   Chat API: http://0.0.0.0:{}/api/chat", config.http_port);
    eprintln!("   Type a message and press Enter.\n");

    let http_assistant = Arc::clone(&assistant);
    let http_port = config.http_port;
    tokio::spawn(async move {
        if let Err(e) = channels::serve(http_assistant, http_port).await {
            tracing::error!(error = %e, "HTTP channel exited");
        }
    });

    channels::run_repl(assistant).await?;

    Ok(())
}
