//! Shared helpers for interactive commands.

use anyhow::Result;
use colored::Colorize;
use std::io::{IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Ask a blocking Y/n question on the terminal.
///
/// Returns `assume` without prompting when `assume` is `true` (the `--yes`
/// flag) or when stdin is not a TTY — non-interactive callers never hang
/// on a prompt.
pub async fn confirm(question: &str, assume: bool) -> Result<bool> {
    if assume {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        // Non-interactive without --yes: decline rather than block
        eprintln!("{}", "non-interactive session, pass --yes to confirm".yellow());
        return Ok(false);
    }

    print!("{} [Y/n]: ", question.green());
    std::io::stdout().flush()?;

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut response = String::new();
    reader.read_line(&mut response).await?;
    let response = response.trim().to_lowercase();

    Ok(response.is_empty() || response == "y" || response == "yes")
}
