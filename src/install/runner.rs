//! Installer subprocess
//!
//! Runs `bower update` in the public root and forwards every output line to
//! an [`OutputSink`]. The exit status is turned into an [`InstallOutcome`].

use crate::error::{GateError, GateResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Max number of output lines kept in a failed outcome.
pub const ERROR_TAIL_LINES: usize = 50;

/// Receives installer output, one line at a time
pub trait OutputSink: Send + Sync {
    fn line(&self, line: &str);
}

/// Forwards installer output to the tracing subscriber at info level
///
/// stdout and stderr are not told apart.
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn line(&self, line: &str) {
        info!("{}", line);
    }
}

/// What the installer is asked to do
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Working directory, the public root holding bower.json
    pub working_dir: PathBuf,

    /// Pass `--allow-root`
    pub allow_root: bool,
}

impl InstallRequest {
    /// Arguments passed to the installer
    pub fn args(&self) -> Vec<&'static str> {
        let mut args = vec!["update"];
        if self.allow_root {
            args.push("--allow-root");
        }
        args
    }
}

/// Result of one installer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Exited with status 0
    Success,
    /// Nonzero exit, signal, timeout or spawn failure
    Failed {
        /// Exit code, `None` when the process never exited normally
        code: Option<i32>,
        /// Last lines of combined output
        tail: Vec<String>,
    },
}

impl InstallOutcome {
    /// Classify an exit status, keeping the end of the output on failure
    pub fn from_status(status: ExitStatus, output: &[String]) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failed {
                code: status.code(),
                tail: output_tail(output),
            }
        }
    }

    /// Failure that carries no exit code
    pub fn failed_without_exit(reason: impl Into<String>, output: &[String]) -> Self {
        let mut tail = output_tail(output);
        tail.push(reason.into());
        Self::Failed { code: None, tail }
    }
}

/// Last `ERROR_TAIL_LINES` lines of output
pub fn output_tail(lines: &[String]) -> Vec<String> {
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].to_vec()
}

/// External package installer
///
/// Implemented by [`BowerCli`]; tests substitute their own.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Run the update and wait for it to exit
    ///
    /// Returns `Err` only when the process could not be started.
    async fn update(
        &self,
        request: &InstallRequest,
        sink: &dyn OutputSink,
    ) -> GateResult<InstallOutcome>;

    /// Human-readable command for logs
    fn describe(&self, request: &InstallRequest) -> String;
}

/// Installer backed by the bower executable
pub struct BowerCli {
    command: String,
    timeout: Option<Duration>,
}

impl BowerCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    /// Kill the installer if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Installer for BowerCli {
    async fn update(
        &self,
        request: &InstallRequest,
        sink: &dyn OutputSink,
    ) -> GateResult<InstallOutcome> {
        let args = request.args();
        debug!(
            "Executing: {} {:?} in {}",
            self.command,
            args,
            request.working_dir.display()
        );

        let mut child = Command::new(&self.command)
            .args(&args)
            .current_dir(&request.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GateError::command_failed(self.describe(request), e))?;

        let mut output = Vec::new();
        let run = async {
            stream_child_output(&mut child, sink, &mut output).await;
            child.wait().await
        };

        let finished = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.ok(),
            None => Some(run.await),
        };

        let Some(status) = finished else {
            let secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
            warn!("Installer exceeded {}s, killing it", secs);
            if let Err(e) = child.kill().await {
                warn!("Failed to kill installer: {}", e);
            }
            return Ok(InstallOutcome::failed_without_exit(
                format!("timed out after {}s", secs),
                &output,
            ));
        };

        match status {
            Ok(status) => {
                debug!("Installer exited with {}", status);
                Ok(InstallOutcome::from_status(status, &output))
            }
            Err(e) => Ok(InstallOutcome::failed_without_exit(
                format!("waiting for installer: {}", e),
                &output,
            )),
        }
    }

    fn describe(&self, request: &InstallRequest) -> String {
        let mut parts = vec![self.command.as_str()];
        parts.extend(request.args());
        parts.join(" ")
    }
}

/// Line reader over one child pipe
///
/// Lines are decoded lossily so non-UTF-8 output never stops the stream. The
/// pending buffer lives here because `read_until` may be cancelled by
/// `select!` after a partial read.
struct OutputLines<R> {
    reader: Option<BufReader<R>>,
    buf: Vec<u8>,
}

impl<R> OutputLines<R>
where
    R: AsyncRead + Unpin,
{
    fn new(pipe: Option<R>) -> Self {
        Self {
            reader: pipe.map(BufReader::new),
            buf: Vec::new(),
        }
    }

    fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Next line without its terminator; `None` once the pipe is closed
    async fn next_line(&mut self) -> Option<String> {
        let reader = self.reader.as_mut()?;
        match reader.read_until(b'\n', &mut self.buf).await {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => {
                let mut end = self.buf.len();
                if self.buf[..end].ends_with(b"\n") {
                    end -= 1;
                }
                if self.buf[..end].ends_with(b"\r") {
                    end -= 1;
                }
                let line = String::from_utf8_lossy(&self.buf[..end]).into_owned();
                self.buf.clear();
                Some(line)
            }
            Err(e) => {
                warn!("Stopped reading installer output: {}", e);
                // dropping the reader closes the pipe so the child cannot block on it
                self.reader = None;
                None
            }
        }
    }
}

/// Stream stdout+stderr from a child process into `sink` as lines arrive
///
/// Every line is also appended to `collected` for failure reporting.
async fn stream_child_output(
    child: &mut Child,
    sink: &dyn OutputSink,
    collected: &mut Vec<String>,
) {
    let mut stdout = OutputLines::new(child.stdout.take());
    let mut stderr = OutputLines::new(child.stderr.take());

    while stdout.is_open() || stderr.is_open() {
        tokio::select! {
            Some(line) = stdout.next_line(), if stdout.is_open() => {
                sink.line(&line);
                collected.push(line);
            }
            Some(line) = stderr.next_line(), if stderr.is_open() => {
                sink.line(&line);
                collected.push(line);
            }
            else => {}
        }
    }
}
