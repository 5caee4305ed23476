//! Programmatic builder for `ansible` and `ansible-playbook` invocations
//!
//! Commands are assembled with chained setters, compiled into an argument
//! vector and executed as a local process. Output is available both as a
//! stream of [`CommandEvent`]s and as an aggregated [`ExecutionResult`].
//!
//! ```no_run
//! use ansible_command::prelude::*;
//!
//! # async fn example() -> ansible_command::Result<()> {
//! let mut playbook = Playbook::new()
//!     .playbook("deploy")
//!     .variables(&serde_json::json!({"release": "1.4.2"}))
//!     .tags(["app"])
//!     .inventory("/etc/ansible/hosts");
//!
//! let events = playbook.subscribe();
//! let result = playbook.exec(ExecOptions::new().cwd("/srv/playbooks")).await?;
//!
//! while let Ok(event) = events.try_recv() {
//!     if let CommandEvent::Stdout(chunk) = event {
//!         print!("{}", String::from_utf8_lossy(&chunk));
//!     }
//! }
//! println!("exit code: {:?}", result.exit_code);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod adhoc;
pub mod args;
pub mod command;
pub mod config;
pub mod error;
pub mod exec;
pub mod invocation;
pub mod parser;
pub mod playbook;
pub mod settings;

pub use adhoc::AdHoc;
pub use args::{ArgValue, Args, ModuleArgs, format_args};
pub use command::AnsibleCommand;
pub use config::CommandConfig;
pub use error::{Error, Result};
pub use exec::{CommandContext, CommandEvent, ExecOptions, ExecutionResult, UNBUFFERED_ENV};
pub use invocation::{Invocation, Platform, ShellStrategy};
pub use parser::{HostResult, HostStatus, parse_output};
pub use playbook::Playbook;
pub use settings::Settings;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        AdHoc, AnsibleCommand, ArgValue, Args, CommandEvent, ExecOptions, ExecutionResult,
        Playbook, Settings,
    };
}
