//! Interactive chat loop.
//!
//! Each plain line is one submission through the session controller; lines
//! starting with `/` inspect or reset local state and never reach the
//! service.

#[cfg(test)]
#[path = "repl_test.rs"]
mod repl_test;

use std::io::Write;

use storefront::ChatBackend;
use storefront::session::{SessionState, TurnOutcome, submit_query, unix_millis};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::CliError;
use crate::render;

const HELP: &str = "\
Type a shopping query, or one of:
  /results     current product results
  /history     previous searches
  /show <n>    products of history entry <n>
  /session     server session id
  /new         start a new conversation
  /quit        exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Query(String),
    Results,
    History,
    Show(usize),
    Session,
    New,
    Help,
    Quit,
    Invalid(String),
    Empty,
}

pub fn parse_line(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Query(line.to_owned());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("results"), None) => ReplCommand::Results,
        (Some("history"), None) => ReplCommand::History,
        (Some("show"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => ReplCommand::Show(n),
            _ => ReplCommand::Invalid(format!("/show expects a history number, got `{n}`")),
        },
        (Some("show"), None) => ReplCommand::Invalid("/show expects a history number".to_owned()),
        (Some("session"), None) => ReplCommand::Session,
        (Some("new"), None) => ReplCommand::New,
        (Some("help"), None) => ReplCommand::Help,
        (Some("quit" | "exit"), None) => ReplCommand::Quit,
        _ => ReplCommand::Invalid(format!("unknown command `{line}`; try /help")),
    }
}

/// Read lines from `input` until EOF or `/quit`.
pub async fn run<B, R, W>(state: &mut SessionState, backend: &B, input: R, out: &mut W) -> Result<(), CliError>
where
    B: ChatBackend + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{HELP}")?;
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !handle(state, backend, parse_line(&line), out).await? {
            break;
        }
    }
    Ok(())
}

/// Returns `false` when the loop should stop.
async fn handle<B, W>(state: &mut SessionState, backend: &B, command: ReplCommand, out: &mut W) -> Result<bool, CliError>
where
    B: ChatBackend + ?Sized,
    W: Write,
{
    match command {
        ReplCommand::Empty => {}
        ReplCommand::Query(text) => {
            ask(state, backend, &text, out).await?;
        }
        ReplCommand::Results => write!(out, "{}", render::results(state.results_query(), state.current_results()))?,
        ReplCommand::History => write!(out, "{}", render::history(state.history()))?,
        ReplCommand::Show(n) => match state.history().get(n - 1) {
            Some(entry) => write!(out, "{}", render::history_entry(entry))?,
            None => writeln!(out, "no history entry {n}")?,
        },
        ReplCommand::Session => writeln!(out, "{}", state.session_id().unwrap_or("(no session yet)"))?,
        ReplCommand::New => {
            state.reset();
            writeln!(out, "started a new conversation")?;
        }
        ReplCommand::Help => writeln!(out, "{HELP}")?,
        ReplCommand::Quit => return Ok(false),
        ReplCommand::Invalid(message) => writeln!(out, "{message}")?,
    }
    Ok(true)
}

/// Submit one query and print the assistant reply, plus the new results
/// when the reply replaced them.
///
/// # Errors
///
/// Only local failures (rejected input, write errors). A failed request is
/// reported through the transcript and returned as [`TurnOutcome::Failed`].
pub async fn ask<B, W>(state: &mut SessionState, backend: &B, text: &str, out: &mut W) -> Result<TurnOutcome, CliError>
where
    B: ChatBackend + ?Sized,
    W: Write,
{
    let outcome = submit_query(state, backend, text, unix_millis).await?;

    if let Some(reply) = state.transcript().last() {
        writeln!(out, "{}", reply.content)?;
    }
    if let TurnOutcome::Replied { results_replaced: true, archived } = outcome {
        if archived {
            writeln!(out, "(previous results moved to history)")?;
        }
        write!(out, "{}", render::results(state.results_query(), state.current_results()))?;
    }
    Ok(outcome)
}
