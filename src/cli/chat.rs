use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{agent::Agent, utils, warning};

use super::setup::build_agent;

/// Thread id of the single terminal conversation.
pub const THREAD_ID: &str = "abc123";

pub async fn chat() {
    let agent = build_agent().await;
    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    if let Err(e) = run_chat(&agent, THREAD_ID, input, &mut output).await {
        warning!("Terminal I/O failed: {}", e);
    }
}

/// Reads user lines and prints the agent's replies until the user quits.
///
/// The loop ends on `quit`/`exit` (any case), on end of input, or after the
/// first failed turn, which is reported before returning.
pub async fn run_chat<R, W>(
    agent: &Agent,
    thread_id: &str,
    input: R,
    output: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all("MusicAI Playlist Agent 🤖\n".as_bytes()).await?;
    output
        .write_all(b"Type 'quit/exit' to end the conversation!\n")
        .await?;

    let mut lines = input.lines();
    loop {
        output.write_all(b"You: ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };

        if utils::is_exit_command(&line) {
            output.write_all(b"Goodbye! Enjoy your playlist!\n").await?;
            break;
        }

        let spinner = thinking_spinner();
        let result = agent.invoke(thread_id, &line).await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => {
                output
                    .write_all(format!("MusicAI: {}\n", reply).as_bytes())
                    .await?;
            }
            Err(e) => {
                output
                    .write_all(format!("An error occurred: {}\n", e).as_bytes())
                    .await?;
                break;
            }
        }
    }

    output.flush().await
}

fn thinking_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Thinking...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
