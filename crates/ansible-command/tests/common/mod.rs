//! Launcher test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use command_executor::{
    Command, Error, ExitStatus, Launcher, ProcessEvent, ProcessEventKind, ProcessHandle, Result,
};
use std::sync::{Arc, Mutex};

/// Launcher that records every command and replays scripted output
#[derive(Clone)]
pub struct RecordingLauncher {
    calls: Arc<Mutex<Vec<Command>>>,
    script: Vec<(ProcessEventKind, Vec<u8>)>,
    status: Option<ExitStatus>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            script: Vec::new(),
            status: Some(ExitStatus::from_code(0)),
        }
    }

    pub fn stdout(mut self, chunk: &str) -> Self {
        self.script
            .push((ProcessEventKind::Stdout, chunk.as_bytes().to_vec()));
        self
    }

    pub fn stderr(mut self, chunk: &str) -> Self {
        self.script
            .push((ProcessEventKind::Stderr, chunk.as_bytes().to_vec()));
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.status = Some(ExitStatus::from_code(code));
        self
    }

    /// Make waiting for the process fail after the output was replayed
    pub fn wait_fails(mut self) -> Self {
        self.status = None;
        self
    }

    pub fn calls(&self) -> Vec<Command> {
        self.calls.lock().unwrap().clone()
    }

    /// Arguments of the only recorded call, as strings
    pub fn single_call_args(&self) -> Vec<String> {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one spawn");
        calls[0]
            .get_args()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

#[async_trait]
impl Launcher for RecordingLauncher {
    type EventStream = futures::stream::Iter<std::vec::IntoIter<ProcessEvent>>;
    type Handle = ScriptedHandle;

    async fn launch(&self, command: Command) -> Result<(Self::EventStream, Self::Handle)> {
        self.calls.lock().unwrap().push(command);

        let mut events = vec![ProcessEvent::new(ProcessEventKind::Started { pid: 4242 })];
        events.extend(
            self.script
                .iter()
                .map(|(kind, chunk)| ProcessEvent::with_chunk(*kind, chunk.clone())),
        );

        Ok((
            futures::stream::iter(events),
            ScriptedHandle {
                status: self.status,
            },
        ))
    }
}

/// Handle whose process has always already finished, or was lost
pub struct ScriptedHandle {
    status: Option<ExitStatus>,
}

#[async_trait]
impl ProcessHandle for ScriptedHandle {
    fn pid(&self) -> Option<u32> {
        Some(4242)
    }

    async fn wait(&mut self) -> Result<ExitStatus> {
        self.status.ok_or_else(|| Error::WaitFailed {
            reason: "no child processes".to_string(),
        })
    }

    async fn kill(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Launcher whose executable never exists
pub struct MissingExecutable;

#[async_trait]
impl Launcher for MissingExecutable {
    type EventStream = futures::stream::Iter<std::vec::IntoIter<ProcessEvent>>;
    type Handle = ScriptedHandle;

    async fn launch(&self, command: Command) -> Result<(Self::EventStream, Self::Handle)> {
        Err(Error::CommandNotFound {
            command: command.get_program().to_string_lossy().into_owned(),
        })
    }
}
