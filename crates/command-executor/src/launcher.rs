//! Launcher trait for starting commands

use crate::command::Command;
use crate::error::Result;
use crate::event::ProcessEvent;
use crate::process::{ExitResult, ProcessHandle};
use async_trait::async_trait;
use futures::stream::Stream;

/// A launcher that can start commands and stream their output
#[async_trait]
pub trait Launcher: Send + Sync + 'static {
    /// The event stream type this launcher produces
    type EventStream: Stream<Item = ProcessEvent> + Send + Unpin;

    /// The process handle type this launcher produces
    type Handle: ProcessHandle;

    /// Launch a command, returning its event stream and control handle
    ///
    /// The stream ends once both output pipes of the process are closed.
    async fn launch(&self, command: Command) -> Result<(Self::EventStream, Self::Handle)>;

    /// Launch a command and wait for it to complete, capturing output
    async fn execute(&self, command: Command) -> Result<ExitResult> {
        use futures::StreamExt;

        let (mut events, mut handle) = self.launch(command).await?;
        let mut output = String::new();

        while let Some(event) = events.next().await {
            if let Some(text) = event.text() {
                output.push_str(&text);
            }
        }

        let status = handle.wait().await?;
        Ok(ExitResult { status, output })
    }
}
