// Line-oriented terminal front-end over the same session pipeline as the web UI.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::completion::Completion;
use crate::persona::Persona;
use crate::session::{MessageRole, Session};

const HELP: &str = "Commands: /role <Assistant|Counselor|Teacher|Artist>, /prompt <text>, /show, /clear, /quit";

enum Command<'a> {
    Role(&'a str),
    Prompt(&'a str),
    Show,
    Clear,
    Quit,
    Help,
    Say(&'a str),
}

fn parse_line(line: &str) -> Command<'_> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Say(line);
    };
    let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    match name {
        "role" => Command::Role(arg.trim()),
        "prompt" => Command::Prompt(arg.trim()),
        "show" => Command::Show,
        "clear" => Command::Clear,
        "quit" | "exit" => Command::Quit,
        _ => Command::Help,
    }
}

/// Reads lines from `input` until EOF or `/quit`, printing replies to `output`.
pub async fn run_chat_loop<R, W, C>(input: R, mut output: W, session: &mut Session, client: &C) -> Result<()>
where
    R: BufRead,
    W: Write,
    C: Completion,
{
    writeln!(output, "Chatting as {}. {}", session.persona(), HELP)?;
    for line in input.lines() {
        let line = line.context("Failed to read from input")?;
        match parse_line(&line) {
            Command::Quit => break,
            Command::Help => writeln!(output, "{}", HELP)?,
            Command::Role(name) => match name.parse::<Persona>() {
                Ok(persona) => {
                    session.set_persona(persona);
                    writeln!(output, "Role set to {}: {}", persona, session.role_prompt())?;
                }
                Err(e) => writeln!(output, "{}", e)?,
            },
            Command::Prompt(text) => {
                session.set_role_prompt(text);
                writeln!(output, "Role prompt: {}", session.role_prompt())?;
            }
            Command::Show => {
                for msg in session.messages() {
                    let tag = match msg.role {
                        MessageRole::System => "system",
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                    };
                    writeln!(output, "[{}] {}", tag, msg.content)?;
                }
            }
            Command::Clear => {
                session.clear();
                writeln!(output, "Conversation cleared.")?;
            }
            Command::Say(text) => {
                if text.is_empty() {
                    continue;
                }
                writeln!(output, "Thinking...")?;
                output.flush()?;
                match session.submit(text, client).await {
                    Ok(Some(reply)) => writeln!(output, "{}: {}", session.persona(), reply)?,
                    Ok(None) => {}
                    Err(e) => {
                        error!("Chat submission failed: {}", e);
                        writeln!(output, "Error: {}", e)?;
                    }
                }
            }
        }
        output.flush()?;
    }
    info!(messages = session.messages().len(), "Chat session ended");
    Ok(())
}

/// Runs the chat loop on the process's stdin and stdout.
pub async fn run_terminal_chat<C: Completion>(persona: Persona, client: &C) -> Result<()> {
    let mut session = Session::new(persona);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_chat_loop(stdin.lock(), stdout.lock(), &mut session, client).await
}
