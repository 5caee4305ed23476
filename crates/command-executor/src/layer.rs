//! Execution layers that rewrite a command before it is launched.

use crate::command::Command;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Trait for execution layers that can wrap commands
pub trait ExecutionLayer: Send + Sync + std::fmt::Debug {
    /// Wrap a command with this layer's execution context
    fn wrap_command(&self, command: Command) -> Result<Command>;

    /// Get a description of this layer for debugging
    fn description(&self) -> String;
}

/// Layer that runs the command through a login shell
///
/// Produces `<shell> -l -c '<command line>'`, so the command sees the
/// profile-initialised `PATH` of the user. Environment overrides and the
/// working directory move to the outer shell process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginShellLayer {
    /// Shell executable
    pub shell: PathBuf,
}

impl LoginShellLayer {
    /// Create a new login shell layer
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for LoginShellLayer {
    fn default() -> Self {
        Self::new("bash")
    }
}

impl ExecutionLayer for LoginShellLayer {
    fn wrap_command(&self, command: Command) -> Result<Command> {
        if command.get_program().is_empty() {
            return Err(Error::LayerFailed {
                layer: self.description(),
                reason: "command has no program".to_string(),
            });
        }

        let mut shell_cmd = Command::new(&self.shell);
        shell_cmd.arg("-l").arg("-c").arg(command.to_shell_string());

        for (key, value) in command.get_envs() {
            shell_cmd.env(key, value);
        }
        if let Some(dir) = command.get_current_dir() {
            shell_cmd.current_dir(dir);
        }

        Ok(shell_cmd)
    }

    fn description(&self) -> String {
        format!("login shell {}", self.shell.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::path::Path;

    #[test]
    fn test_login_shell_layer() {
        let cmd = Command::builder("ansible")
            .args(["local", "-m", "shell", "-a", "echo 'hi'"])
            .env("PYTHONUNBUFFERED", "1")
            .current_dir("/tmp")
            .build();

        let wrapped = LoginShellLayer::default().wrap_command(cmd).unwrap();

        assert_eq!(wrapped.get_program(), "bash");
        assert_eq!(wrapped.get_args()[..2], ["-l", "-c"]);
        assert_eq!(
            wrapped.get_args()[2],
            r"ansible local -m shell -a 'echo '\''hi'\'''"
        );
        assert_eq!(wrapped.get_env("PYTHONUNBUFFERED"), Some(OsStr::new("1")));
        assert_eq!(wrapped.get_current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn test_empty_program_is_rejected() {
        let err = LoginShellLayer::new("/bin/zsh")
            .wrap_command(Command::new(""))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot wrap command in login shell /bin/zsh: command has no program"
        );
    }
}
