//! Playbook commands

use crate::command::AnsibleCommand;
use crate::config::CommandConfig;
use crate::exec::CommandContext;
use crate::invocation::{Invocation, Platform};
use crate::settings::Settings;
use serde::Serialize;
use serde_json::Value;

/// Builder for an `ansible-playbook <name>.yml` invocation
#[derive(Debug, Default)]
pub struct Playbook {
    config: CommandConfig,
    context: CommandContext,
}

impl Playbook {
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

    /// Playbook name, without the `.yml` extension
    pub fn playbook(mut self, name: impl Into<String>) -> Self {
        self.config.playbook = Some(name.into());
        self
    }

    /// Extra variables, passed as JSON with `-e`
    ///
    /// A value that cannot be represented as JSON makes the command invalid.
    pub fn variables<T: Serialize + ?Sized>(mut self, variables: &T) -> Self {
        match serde_json::to_value(variables) {
            Ok(value) => {
                self.config.variables = Some(value);
                self.config.variables_error = None;
            }
            Err(e) => {
                self.config.variables = None;
                self.config.variables_error = Some(e.to_string());
            }
        }
        self
    }

    /// Only run tasks tagged with any of `tags` (`--tags=a,b`)
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Skip tasks tagged with any of `tags` (`--skip-tags=a,b`)
    pub fn skip_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.skip_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Prompt for the connection password (`--ask-pass`)
    pub fn ask_pass(mut self) -> Self {
        self.config.ask_pass = true;
        self
    }

    /// Prompt for the sudo password (`--ask-sudo-pass`)
    pub fn ask_sudo_pass(mut self) -> Self {
        self.config.ask_sudo_pass = true;
        self
    }
}

/// Whether a variables value is worth passing with `-e`
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `--flag=a,b`, or nothing for an unset or empty list
fn tag_flag(flag: &str, tags: Option<&Vec<String>>) -> Option<String> {
    tags.filter(|tags| !tags.is_empty())
        .map(|tags| format!("{}={}", flag, tags.join(",")))
}

impl AnsibleCommand for Playbook {
    fn command_name(&self) -> &'static str {
        "ansible-playbook"
    }

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.config.playbook.is_none() {
            errors.push("'playbook' must be specified".to_string());
        }
        errors
    }

    fn compile_params(&self) -> Vec<String> {
        let config = &self.config;
        let mut params = vec![format!(
            "{}.yml",
            config.playbook.as_deref().unwrap_or_default()
        )];

        if let Some(variables) = config.variables.as_ref().filter(|v| is_truthy(v)) {
            params.push("-e".to_string());
            params.push(variables.to_string());
        }
        if config.ask_pass {
            params.push("--ask-pass".to_string());
        }
        if config.ask_sudo_pass {
            params.push("--ask-sudo-pass".to_string());
        }
        params.extend(tag_flag("--tags", config.tags.as_ref()));
        params.extend(tag_flag("--skip-tags", config.skip_tags.as_ref()));

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
