//! Runtime-agnostic command execution library
//!
//! This crate launches local processes and streams their stdout and stderr as
//! raw chunks in arrival order. It does not depend on a particular async
//! runtime; the futures it returns can be driven by smol, tokio or
//! `futures::executor`.

#![warn(missing_docs)]

pub mod backends;
pub mod command;
pub mod error;
pub mod event;
pub mod launcher;
pub mod layer;
pub mod process;

pub use backends::{LocalLauncher, LocalProcessHandle};
pub use command::{Command, CommandBuilder, shell_quote};
pub use error::{Error, Result};
pub use event::{ProcessEvent, ProcessEventKind};
pub use launcher::Launcher;
pub use layer::{ExecutionLayer, LoginShellLayer};
pub use process::{ExitResult, ExitStatus, ProcessHandle};
