use std::io::{self, Write};

use clap::{Parser, Subcommand};
use storefront::config::ClientConfig;
use storefront::http::HttpChatClient;
use storefront::session::{SessionState, TurnOutcome};
use storefront::{ChatBackend, ChatError, ChatRequest, ConfigError, SubmitRejected};
use tracing_subscriber::EnvFilter;

mod render;
mod repl;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Rejected(#[from] SubmitRejected),
    #[error("service unhealthy: {0}")]
    Unhealthy(String),
    #[error("chat request failed")]
    TurnFailed,
    #[error("io failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "storefront-cli", about = "Terminal client for the shopping assistant chat service")]
struct Cli {
    /// Chat service base URL (default http://localhost:8000).
    #[arg(long, global = true, env = "STOREFRONT_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive conversation (default).
    Chat,
    /// Send one query and print the reply.
    Ask {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
        /// Print the raw service response.
        #[arg(long)]
        json: bool,
    },
    /// Check that the service is up.
    Ping,
    #[command(subcommand)]
    Sessions(SessionsCommand),
}

#[derive(Subcommand, Debug)]
enum SessionsCommand {
    List,
    Show { id: String },
    Clear { id: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(cli.base_url.as_deref(), cli.timeout_secs)?;
    tracing::debug!(base_url = %config.base_url, request_secs = config.timeouts.request_secs, "client configured");
    let client = HttpChatClient::new(config)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(&client).await,
        Command::Ask { message, json } => run_ask(&client, &message.join(" "), json).await,
        Command::Ping => run_ping(&client).await,
        Command::Sessions(command) => run_sessions(&client, command).await,
    }
}

/// Environment config, with command-line flags taking precedence.
fn build_config(base_url: Option<&str>, timeout_secs: Option<u64>) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = base_url {
        config.base_url = ClientConfig::new(url)?.base_url;
    }
    if let Some(secs) = timeout_secs.filter(|secs| *secs > 0) {
        config = config.with_request_timeout(secs);
    }
    Ok(config)
}

async fn run_chat(client: &HttpChatClient) -> Result<(), CliError> {
    let mut state = SessionState::default();
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run(&mut state, client, stdin, &mut io::stdout()).await
}

async fn run_ask(client: &HttpChatClient, message: &str, json: bool) -> Result<(), CliError> {
    if json {
        let request = ChatRequest { message: message.to_owned(), session_id: None };
        let response = client.send_chat(&request).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let mut state = SessionState::default();
    let mut out = io::stdout();
    let outcome = repl::ask(&mut state, client, message, &mut out).await?;
    out.flush()?;
    if outcome == TurnOutcome::Failed {
        return Err(CliError::TurnFailed);
    }
    if let Some(session_id) = state.session_id() {
        eprintln!("session: {session_id}");
    }
    Ok(())
}

async fn run_ping(client: &HttpChatClient) -> Result<(), CliError> {
    let health = client.health().await?;
    if health.status != "ok" && health.status != "healthy" {
        return Err(CliError::Unhealthy(format!("{}: {}", health.status, health.message)));
    }
    println!("ok");
    Ok(())
}

async fn run_sessions(client: &HttpChatClient, command: SessionsCommand) -> Result<(), CliError> {
    let rendered = match command {
        SessionsCommand::List => render::session_list(&client.list_sessions().await?),
        SessionsCommand::Show { id } => render::session_transcript(&client.session_history(&id).await?),
        SessionsCommand::Clear { id } => format!("{}\n", client.clear_session(&id).await?.message),
    };
    print!("{rendered}");
    Ok(())
}
