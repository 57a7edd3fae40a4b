use std::process::Stdio;

use askama::Template;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::models::{Quote, Reflection};

/// Hands a block of text to whatever share surface the host offers.
/// Sharing is fire-and-forget: failures are logged, never returned.
pub trait ShareGateway: Send + Sync {
    fn share_text(&self, text: &str);
}

/// Writes shared text to the log. Used when no share command is configured.
pub struct LogShareGateway;

impl ShareGateway for LogShareGateway {
    fn share_text(&self, text: &str) {
        tracing::info!(text, "shared text");
    }
}

/// Pipes shared text into the stdin of an external program such as
/// `wl-copy` or `pbcopy`.
pub struct CommandShareGateway {
    program: String,
    args: Vec<String>,
}

impl CommandShareGateway {
    /// Build from a whitespace separated command line. Returns `None` for a
    /// blank command.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl ShareGateway for CommandShareGateway {
    fn share_text(&self, text: &str) {
        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(program = %self.program, "failed to start share command: {e}");
                return;
            }
        };

        let text = text.to_string();
        let program = self.program.clone();
        tokio::spawn(async move {
            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    tracing::warn!(%program, "failed to write to share command: {e}");
                }
            }
            match child.wait().await {
                Ok(status) if !status.success() => {
                    tracing::warn!(%program, %status, "share command exited with failure")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(%program, "share command failed: {e}"),
            }
        });
    }
}

#[derive(Template)]
#[template(
    source = "\"{{ text }}\"\n— {{ author }}{% if let Some(t) = take %}\n\nMy Take\n{{ t }}{% endif %}{% if let Some(n) = note %}\n\nReflection\n{{ n }}{% endif %}",
    ext = "txt"
)]
struct ShareText<'a> {
    text: &'a str,
    author: &'a str,
    take: Option<&'a str>,
    note: Option<&'a str>,
}

fn non_blank(take: Option<&str>) -> Option<&str> {
    take.filter(|t| !t.trim().is_empty())
}

/// Text shared from the quote screen: the quote, its author and an optional
/// personal take.
pub fn quote_share_text(quote: &Quote, take: Option<&str>) -> Result<String, askama::Error> {
    ShareText {
        text: &quote.text,
        author: &quote.author,
        take: non_blank(take),
        note: None,
    }
    .render()
}

/// Text shared from a stored reflection. The note is appended when
/// `include_note` is set and the note is not empty.
pub fn reflection_share_text(
    reflection: &Reflection,
    take: Option<&str>,
    include_note: bool,
) -> Result<String, askama::Error> {
    let note = Some(reflection.note.as_str()).filter(|n| include_note && !n.is_empty());
    ShareText {
        text: &reflection.quote_content,
        author: &reflection.author,
        take: non_blank(take),
        note,
    }
    .render()
}
