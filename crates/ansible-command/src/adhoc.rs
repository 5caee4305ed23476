//! Ad-hoc commands: one module run against a host pattern

use crate::args::{Args, ModuleArgs, format_args};
use crate::command::AnsibleCommand;
use crate::config::CommandConfig;
use crate::exec::CommandContext;
use crate::invocation::{Invocation, Platform};
use crate::settings::Settings;

/// Builder for an `ansible <hosts> -m <module>` invocation
///
/// ```no_run
/// use ansible_command::prelude::*;
///
/// # async fn example() -> ansible_command::Result<()> {
/// let result = AdHoc::new()
///     .hosts("prod-servers")
///     .module("shell")
///     .args("echo 'hello world'")
///     .forks(10)
///     .exec(ExecOptions::default())
///     .await?;
/// println!("{}", result.output);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AdHoc {
    config: CommandConfig,
    context: CommandContext,
}

impl AdHoc {
    /// New command using the platform default invocation
    pub fn new() -> Self {
        Self::default()
    }

    /// New command configured from `settings`
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            config: CommandConfig::default(),
            context: CommandContext::new(
                Invocation::from_settings(settings, Platform::current()),
                settings.buffered,
            ),
        }
    }

    /// New command with an explicit invocation strategy
    pub fn with_invocation(invocation: Invocation) -> Self {
        Self {
            config: CommandConfig::default(),
            context: CommandContext::new(invocation, false),
        }
    }

    /// Module to run (`-m`)
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.config.module = Some(module.into());
        self
    }

    /// Host pattern to run against
    pub fn hosts(mut self, hosts: impl Into<String>) -> Self {
        self.config.hosts = Some(hosts.into());
        self
    }

    /// Module arguments: a string is the freeform argument, a map is
    /// structured `key=value` arguments
    ///
    /// Replaces anything set by a previous call.
    pub fn args(mut self, args: impl Into<ModuleArgs>) -> Self {
        match args.into() {
            ModuleArgs::Structured(structured) => {
                self.config.args = Some(structured);
                self.config.freeform = None;
            }
            ModuleArgs::Freeform(text) => {
                self.config.args = None;
                self.config.freeform = Some(text);
            }
        }
        self
    }

    /// Structured arguments together with a freeform argument
    pub fn args_with_freeform(
        mut self,
        args: impl Into<Args>,
        freeform: impl Into<String>,
    ) -> Self {
        self.config.args = Some(args.into());
        self.config.freeform = Some(freeform.into());
        self
    }
}

impl AnsibleCommand for AdHoc {
    fn command_name(&self) -> &'static str {
        "ansible"
    }

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.config.hosts.is_none() {
            errors.push("\"hosts\" must be specified".to_string());
        }
        if self.config.module.is_none() {
            errors.push("\"module\" must be specified".to_string());
        }
        errors
    }

    fn compile_params(&self) -> Vec<String> {
        let config = &self.config;
        let mut params = vec![
            config.hosts.clone().unwrap_or_default(),
            "-m".to_string(),
            config.module.clone().unwrap_or_default(),
        ];

        if let Some(formatted) = format_args(config.args.as_ref(), config.freeform.as_deref()) {
            params.push("-a".to_string());
            params.push(formatted);
        }

        params.extend(config.common_params());
        params
    }

    fn config(&self) -> &CommandConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut CommandConfig {
        &mut self.config
    }

    fn context(&self) -> &CommandContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut CommandContext {
        &mut self.context
    }
}
