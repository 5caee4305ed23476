//! Execution engine: spawns the process, streams events and aggregates output

use crate::command::AnsibleCommand;
use crate::error::{Error, Result};
use crate::invocation::Invocation;
use crate::parser::{HostResult, parse_output};
use async_channel::{Receiver, Sender};
use command_executor::{Command, Launcher, ProcessEventKind, ProcessHandle};
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Environment variable the wrapped tool reads to disable output buffering
pub const UNBUFFERED_ENV: &str = "PYTHONUNBUFFERED";

/// Options for a single `exec` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Working directory of the spawned process; inherited when unset
    pub cwd: Option<PathBuf>,
    /// Allow the tool to buffer its output; unset falls back to the settings
    pub buffered: Option<bool>,
}

impl ExecOptions {
    /// Default options: inherited working directory, unbuffered output
    pub fn new() -> Self {
        Self::default()
    }

    /// Run in `dir`
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Choose whether the tool may buffer its output
    pub fn buffered(mut self, buffered: bool) -> Self {
        self.buffered = Some(buffered);
        self
    }
}

/// Outcome of one `exec` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// stdout and stderr chunks concatenated in arrival order
    pub output: String,
}

impl ExecutionResult {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn an unsuccessful exit into [`Error::ProcessFailed`]
    pub fn into_success(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::ProcessFailed {
                code: self.exit_code,
                output: self.output,
            })
        }
    }

    /// Per-host JSON results found in the output
    pub fn host_results(&self) -> Result<Vec<HostResult>> {
        parse_output(&self.output)
    }
}

/// Event emitted while a command executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    /// Raw chunk read from stdout
    Stdout(Vec<u8>),
    /// Raw chunk read from stderr
    Stderr(Vec<u8>),
    /// The process terminated with this exit code
    Close(Option<i32>),
}

/// Per-instance execution state: invocation strategy, subscribers and the
/// in-flight flag
#[derive(Debug)]
pub struct CommandContext {
    invocation: Invocation,
    buffered: bool,
    observers: Vec<Sender<CommandEvent>>,
    in_flight: AtomicBool,
}

impl CommandContext {
    /// Create a context with the given strategy and default buffering
    pub fn new(invocation: Invocation, buffered: bool) -> Self {
        Self {
            invocation,
            buffered,
            observers: Vec::new(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The resolved invocation strategy
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Whether output is buffered when `ExecOptions::buffered` is unset
    pub fn buffered_by_default(&self) -> bool {
        self.buffered
    }

    /// Register a new subscriber for every subsequent event
    pub fn subscribe(&mut self) -> Receiver<CommandEvent> {
        let (tx, rx) = async_channel::unbounded();
        self.observers.push(tx);
        rx
    }

    /// Whether an `exec` is currently running
    pub fn is_executing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn emit(&self, event: CommandEvent) {
        for observer in &self.observers {
            // A closed channel only means that subscriber stopped listening
            let _ = observer.try_send(event.clone());
        }
    }

    fn begin(&self) -> Result<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::AlreadyRunning)?;
        Ok(InFlight(&self.in_flight))
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new(Invocation::default(), false)
    }
}

/// Clears the in-flight flag when an execution ends, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Build the process description for `command` without running it
pub(crate) fn build_process<C>(command: &C, options: &ExecOptions) -> Result<Command>
where
    C: AnsibleCommand + ?Sized,
{
    let context = command.context();
    let invocation = context.invocation();

    let mut process = Command::new(invocation.executable(command.command_name()));
    process.args(command.compile_params());

    let buffered = options
        .buffered
        .unwrap_or_else(|| context.buffered_by_default());
    process.env(UNBUFFERED_ENV, if buffered { "" } else { "1" });

    if let Some(dir) = &options.cwd {
        process.current_dir(dir);
    }

    Ok(invocation.apply(process)?)
}

/// Validate, spawn and drive one execution of `command` to completion
///
/// Resolves with the exit code whatever its value; only configuration,
/// re-entrancy, spawn and wait problems are errors. Subscribers get a
/// `Close` event even when waiting for the process fails.
pub(crate) async fn run<C, L>(
    command: &C,
    launcher: &L,
    options: ExecOptions,
) -> Result<ExecutionResult>
where
    C: AnsibleCommand + ?Sized,
    L: Launcher,
{
    let name = command.command_name();
    let reasons = command.validate();
    if !reasons.is_empty() {
        warn!(command = name, ?reasons, "refusing to run mis-configured command");
        return Err(Error::configuration(reasons));
    }
    if let Some(reason) = &command.config().variables_error {
        warn!(command = name, %reason, "refusing to run with unserializable variables");
        return Err(Error::Variables {
            reason: reason.clone(),
        });
    }

    let context = command.context();
    let _in_flight = context.begin().inspect_err(|_| {
        warn!(command = name, "exec called while a previous run is in flight");
    })?;

    let process = build_process(command, &options)?;
    debug!(command = %process, "compiled command line");

    let (mut events, mut handle) = launcher.launch(process).await?;

    let mut output = Vec::new();
    while let Some(event) = events.next().await {
        let Some(chunk) = event.data else {
            continue;
        };
        debug!(command = name, kind = ?event.kind, bytes = chunk.len(), "output chunk");
        output.extend_from_slice(&chunk);
        match event.kind {
            ProcessEventKind::Stdout => context.emit(CommandEvent::Stdout(chunk)),
            ProcessEventKind::Stderr => context.emit(CommandEvent::Stderr(chunk)),
            ProcessEventKind::Started { .. } => {}
        }
    }

    let status = match handle.wait().await {
        Ok(status) => status,
        Err(e) => {
            context.emit(CommandEvent::Close(None));
            warn!(command = name, error = %e, "lost track of process");
            return Err(e.into());
        }
    };
    context.emit(CommandEvent::Close(status.code));
    info!(command = name, exit_code = ?status.code, "command finished");

    Ok(ExecutionResult {
        exit_code: status.code,
        output: String::from_utf8_lossy(&output).into_owned(),
    })
}
