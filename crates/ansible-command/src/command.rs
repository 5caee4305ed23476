//! Behaviour shared by ad-hoc and playbook commands

use crate::config::CommandConfig;
use crate::error::Result;
use crate::exec::{self, CommandContext, CommandEvent, ExecOptions, ExecutionResult};
use async_channel::Receiver;
use async_trait::async_trait;
use command_executor::{Command, Launcher, LocalLauncher};

/// A buildable, executable ansible command
///
/// Implementors supply the executable name, mandatory-field validation and
/// mode-specific argument assembly; the shared setters, subscription and
/// execution come for free.
#[async_trait]
pub trait AnsibleCommand: Send + Sync {
    /// Name of the executable to run
    fn command_name(&self) -> &'static str;

    /// One diagnostic per missing mandatory option; empty when runnable
    fn validate(&self) -> Vec<String>;

    /// Complete argument vector, ending with the common flags
    fn compile_params(&self) -> Vec<String>;

    /// Recorded options
    fn config(&self) -> &CommandConfig;

    /// Mutable access to the recorded options
    fn config_mut(&mut self) -> &mut CommandConfig;

    /// Execution state of this instance
    fn context(&self) -> &CommandContext;

    /// Mutable execution state of this instance
    fn context_mut(&mut self) -> &mut CommandContext;

    /// Number of parallel processes (`-f`)
    fn forks(mut self, forks: u32) -> Self
    where
        Self: Sized,
    {
        self.config_mut().forks = Some(forks);
        self
    }

    /// Verbosity level such as `"vvv"` (`-vvv`)
    fn verbose(mut self, level: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.config_mut().verbose = Some(level.into());
        self
    }

    /// Remote user (`-u`)
    fn user(mut self, user: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.config_mut().user = Some(user.into());
        self
    }

    /// Inventory path (`-i`)
    fn inventory(mut self, inventory: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.config_mut().inventory = Some(inventory.into());
        self
    }

    /// Private key file (`--private-key`)
    fn private_key(mut self, path: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.config_mut().private_key = Some(path.into());
        self
    }

    /// Limit the selected hosts (`-l`)
    fn limit(mut self, limit: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.config_mut().limit = Some(limit.into());
        self
    }

    /// User to `su` to (`-U`)
    fn su(mut self, user: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.config_mut().su = Some(user.into());
        self
    }

    /// Run with sudo (`-s`)
    fn as_sudo(mut self) -> Self
    where
        Self: Sized,
    {
        self.config_mut().sudo = true;
        self
    }

    /// Run with privilege escalation (`--become`)
    fn as_become(mut self) -> Self
    where
        Self: Sized,
    {
        self.config_mut().escalate = true;
        self
    }

    /// Receive `Stdout`, `Stderr` and `Close` events of every later `exec`
    fn subscribe(&mut self) -> Receiver<CommandEvent> {
        self.context_mut().subscribe()
    }

    /// The process that `exec` would spawn with default options
    fn command_line(&self) -> Result<Command> {
        exec::build_process(self, &ExecOptions::default())
    }

    /// Run the command as a local process
    async fn exec(&self, options: ExecOptions) -> Result<ExecutionResult> {
        exec::run(self, &LocalLauncher, options).await
    }

    /// Run the command through a specific launcher
    async fn exec_with<L>(&self, launcher: &L, options: ExecOptions) -> Result<ExecutionResult>
    where
        L: Launcher,
    {
        exec::run(self, launcher, options).await
    }
}
