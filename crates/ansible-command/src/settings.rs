//! Library settings loaded from YAML or the environment

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the directory holding the ansible executables
pub const INSTALL_PATH_ENV: &str = "ANSIBLE_INSTALL_PATH";
/// Environment variable naming a login shell to run ansible through
pub const LOGIN_SHELL_ENV: &str = "ANSIBLE_LOGIN_SHELL";
/// Environment variable selecting buffered output by default
pub const BUFFERED_ENV: &str = "ANSIBLE_BUFFERED";

/// Settings that apply to every command built from them
///
/// ```yaml
/// install_path: ${HOME}/.local/bin
/// login_shell: /bin/bash
/// buffered: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory containing `ansible` and `ansible-playbook`
    pub install_path: Option<PathBuf>,
    /// Run commands through this login shell instead of the platform default
    pub login_shell: Option<PathBuf>,
    /// Allow the wrapped tool to buffer its output unless `ExecOptions` says otherwise
    pub buffered: bool,
}

impl Settings {
    /// Parse a YAML settings file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse YAML settings, substituting `${VAR}` and `${VAR:-default}` first
    pub fn parse_str(content: &str) -> Result<Self> {
        let content = substitute_env_vars(content, |name| std::env::var(name).ok())?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Read settings from `ANSIBLE_INSTALL_PATH`, `ANSIBLE_LOGIN_SHELL` and
    /// `ANSIBLE_BUFFERED`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let buffered = match non_empty(BUFFERED_ENV) {
            Some(value) => parse_flag(BUFFERED_ENV, &value)?,
            None => false,
        };

        Ok(Self {
            install_path: non_empty(INSTALL_PATH_ENV).map(PathBuf::from),
            login_shell: non_empty(LOGIN_SHELL_ENV).map(PathBuf::from),
            buffered,
        })
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(Error::Settings(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}

/// Substitute `${VAR}` and `${VAR:-default}` references using `lookup`
fn substitute_env_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;
    let mut missing = Vec::new();

    let result = re.replace_all(input, |caps: &regex::Captures<'_>| {
        let expr = &caps[1];
        let (name, default) = match expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (expr, None),
        };

        match lookup(name).or_else(|| default.map(str::to_string)) {
            Some(value) => value,
            None => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if missing.is_empty() {
        Ok(result.into_owned())
    } else {
        Err(Error::Settings(format!(
            "undefined environment variables: {}",
            missing.join(", ")
        )))
    }
}
