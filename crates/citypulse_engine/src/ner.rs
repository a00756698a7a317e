//! Entity recognition through an external model process.
//!
//! The process reads one JSON object per line on stdin, `{"text": "..."}`,
//! and answers each with one line holding a JSON array of
//! `{"label", "text", "start", "end"}` objects.
use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use citypulse_core::Entity;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("recognizer command is empty")]
    EmptyCommand,
    #[error("recognizer io: {0}")]
    Io(#[from] io::Error),
    #[error("recognizer closed its output")]
    Closed,
    #[error("recognizer protocol: {0}")]
    Protocol(#[from] serde_json::Error),
}

#[async_trait]
pub trait EntityRecognizer: Send {
    async fn annotate(&mut self, text: &str) -> Result<Vec<Entity>, RecognizerError>;
}

#[derive(Serialize)]
struct Request<'a> {
    text: &'a str,
}

/// Long-lived model process, killed when dropped.
pub struct ProcessRecognizer {
    _child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl ProcessRecognizer {
    /// Spawn `command[0]` with the remaining elements as arguments.
    pub fn spawn(command: &[String]) -> Result<Self, RecognizerError> {
        let (program, args) = command.split_first().ok_or(RecognizerError::EmptyCommand)?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take().ok_or(RecognizerError::Closed)?;
        let stdout = child.stdout.take().ok_or(RecognizerError::Closed)?;
        Ok(Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
        })
    }
}

#[async_trait]
impl EntityRecognizer for ProcessRecognizer {
    async fn annotate(&mut self, text: &str) -> Result<Vec<Entity>, RecognizerError> {
        let mut line = serde_json::to_vec(&Request { text })?;
        line.push(b'\n');
        self.stdin.write_all(&line).await?;
        self.stdin.flush().await?;

        let reply = self
            .stdout
            .next_line()
            .await?
            .ok_or(RecognizerError::Closed)?;
        Ok(serde_json::from_str(&reply)?)
    }
}
