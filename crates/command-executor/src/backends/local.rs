//! Local process execution backend

use async_process::{Child, ChildStderr, ChildStdout, Stdio};
use async_trait::async_trait;
use futures::stream::Stream;
use futures_lite::io::AsyncRead;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, info};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::event::{ProcessEvent, ProcessEventKind};
use crate::launcher::Launcher;
use crate::process::{ExitStatus, ProcessHandle};

/// Size of the buffer each pipe read goes through
const CHUNK_SIZE: usize = 8 * 1024;

/// Launcher for executing processes locally
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalLauncher;

/// A handle to control a local process
///
/// Dropping the handle kills the process if it is still running.
pub struct LocalProcessHandle {
    child: Child,
}

/// Stream of output chunks from a local process
///
/// Yields a `Started` event first, then stdout and stderr chunks as they are
/// read. The two pipes are polled alternately so neither can starve the other.
pub struct ChunkStream {
    pid: Option<u32>,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    stderr_first: bool,
    buf: Box<[u8]>,
}

#[async_trait]
impl Launcher for LocalLauncher {
    type EventStream = ChunkStream;
    type Handle = LocalProcessHandle;

    async fn launch(&self, command: Command) -> Result<(Self::EventStream, Self::Handle)> {
        let program = command.get_program().to_string_lossy().into_owned();
        debug!(command = %command, cwd = ?command.get_current_dir(), "launching local process");

        let mut async_cmd = command.prepare();
        async_cmd.stdout(Stdio::piped());
        async_cmd.stderr(Stdio::piped());

        let mut child = async_cmd
            .spawn()
            .map_err(|e| Error::from_spawn(&program, e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (stdout, stderr) = match (stdout, stderr) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            (None, _) => return Err(abandon(child, "stdout")),
            (_, None) => return Err(abandon(child, "stderr")),
        };

        let pid = child.id();
        info!(program = %program, pid, "spawned local process");

        let events = ChunkStream {
            pid: Some(pid),
            stdout: Some(stdout),
            stderr: Some(stderr),
            stderr_first: false,
            buf: vec![0u8; CHUNK_SIZE].into_boxed_slice(),
        };

        let handle = LocalProcessHandle { child };

        Ok((events, handle))
    }
}

/// Kill a child whose pipes could not be captured
fn abandon(mut child: Child, stream: &'static str) -> Error {
    let _ = child.kill();
    Error::StreamUnavailable { stream }
}

#[async_trait]
impl ProcessHandle for LocalProcessHandle {
    fn pid(&self) -> Option<u32> {
        Some(self.child.id())
    }

    async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self
            .child
            .status()
            .await
            .map_err(|e| Error::WaitFailed {
                reason: e.to_string(),
            })?;

        Ok(status.into())
    }

    async fn kill(&mut self) -> Result<()> {
        self.child.kill()?;
        Ok(())
    }
}

impl Drop for LocalProcessHandle {
    fn drop(&mut self) {
        // Errors here mean the process already exited
        let _ = self.child.kill();
    }
}

/// Read one chunk from a pipe, clearing it on EOF or a read error
fn poll_pipe<R: AsyncRead + Unpin>(
    pipe: &mut Option<R>,
    buf: &mut [u8],
    cx: &mut Context<'_>,
) -> Poll<Option<Vec<u8>>> {
    let Some(reader) = pipe.as_mut() else {
        return Poll::Ready(None);
    };

    match Pin::new(reader).poll_read(cx, buf) {
        Poll::Ready(Ok(0)) => {
            *pipe = None;
            Poll::Ready(None)
        }
        Poll::Ready(Ok(n)) => Poll::Ready(Some(buf[..n].to_vec())),
        Poll::Ready(Err(e)) if e.kind() == std::io::ErrorKind::Interrupted => {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
        Poll::Ready(Err(e)) => {
            debug!(error = %e, "closing pipe after read error");
            *pipe = None;
            Poll::Ready(None)
        }
        Poll::Pending => Poll::Pending,
    }
}

impl Stream for ChunkStream {
    type Item = ProcessEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(pid) = this.pid.take() {
            return Poll::Ready(Some(ProcessEvent::new(ProcessEventKind::Started { pid })));
        }

        let order = if this.stderr_first {
            [ProcessEventKind::Stderr, ProcessEventKind::Stdout]
        } else {
            [ProcessEventKind::Stdout, ProcessEventKind::Stderr]
        };
        this.stderr_first = !this.stderr_first;

        for kind in order {
            let polled = match kind {
                ProcessEventKind::Stderr => poll_pipe(&mut this.stderr, &mut this.buf, cx),
                _ => poll_pipe(&mut this.stdout, &mut this.buf, cx),
            };
            if let Poll::Ready(Some(chunk)) = polled {
                return Poll::Ready(Some(ProcessEvent::with_chunk(kind, chunk)));
            }
        }

        if this.stdout.is_none() && this.stderr.is_none() {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
