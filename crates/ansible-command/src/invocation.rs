//! How the ansible executables are located and started

use crate::settings::Settings;
use command_executor::{Command, ExecutionLayer, LoginShellLayer};
use std::path::PathBuf;

/// Capability of the host platform that decides the default strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Unix-like systems where ansible runs natively
    Unix,
    /// Windows, where ansible is only reachable through a POSIX shell
    Windows,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// Whether the executable is spawned directly or through a login shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellStrategy {
    /// Spawn the executable itself
    Direct,
    /// Run the full command line through `<shell> -l -c`
    LoginShell(LoginShellLayer),
}

/// Strategy for turning a command name and argv into a process, resolved once
/// when a command is constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    install_path: Option<PathBuf>,
    strategy: ShellStrategy,
}

impl Invocation {
    /// Spawn executables directly, looked up on `PATH`
    pub fn direct() -> Self {
        Self {
            install_path: None,
            strategy: ShellStrategy::Direct,
        }
    }

    /// Run executables through a login shell
    pub fn login_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            install_path: None,
            strategy: ShellStrategy::LoginShell(LoginShellLayer::new(shell)),
        }
    }

    /// Default strategy for a platform
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Unix => Self::direct(),
            Platform::Windows => Self::login_shell("bash"),
        }
    }

    /// Strategy described by `settings`, falling back to the platform default
    pub fn from_settings(settings: &Settings, platform: Platform) -> Self {
        let invocation = match &settings.login_shell {
            Some(shell) => Self::login_shell(shell),
            None => Self::for_platform(platform),
        };
        match &settings.install_path {
            Some(path) => invocation.with_install_path(path),
            None => invocation,
        }
    }

    /// Prefix executable names with a directory
    pub fn with_install_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_path = Some(path.into());
        self
    }

    /// The selected shell strategy
    pub fn strategy(&self) -> &ShellStrategy {
        &self.strategy
    }

    /// Path of the executable called `name`
    pub fn executable(&self, name: &str) -> PathBuf {
        match &self.install_path {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Apply the shell strategy to a fully built command
    pub fn apply(&self, command: Command) -> command_executor::Result<Command> {
        match &self.strategy {
            ShellStrategy::Direct => Ok(command),
            ShellStrategy::LoginShell(layer) => layer.wrap_command(command),
        }
    }
}

impl Default for Invocation {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_platform_defaults() {
        assert_eq!(Invocation::for_platform(Platform::Unix).strategy(), &ShellStrategy::Direct);
        assert_eq!(
            Invocation::for_platform(Platform::Windows).strategy(),
            &ShellStrategy::LoginShell(LoginShellLayer::new("bash"))
        );
    }

    #[test]
    fn test_install_path_prefixes_executable() {
        let invocation = Invocation::direct().with_install_path("/opt/ansible/bin");
        assert_eq!(
            invocation.executable("ansible-playbook"),
            Path::new("/opt/ansible/bin/ansible-playbook")
        );
        assert_eq!(Invocation::direct().executable("ansible"), Path::new("ansible"));
    }

    #[test]
    fn test_settings_override_platform() {
        let settings = Settings {
            login_shell: Some("/bin/zsh".into()),
            install_path: Some("/usr/local/bin".into()),
            ..Default::default()
        };
        let invocation = Invocation::from_settings(&settings, Platform::Unix);

        assert_eq!(
            invocation.strategy(),
            &ShellStrategy::LoginShell(LoginShellLayer::new("/bin/zsh"))
        );
        assert_eq!(invocation.executable("ansible"), Path::new("/usr/local/bin/ansible"));
    }

    #[test]
    fn test_login_shell_wraps_command() {
        let mut cmd = Command::new("ansible");
        cmd.args(["all", "-m", "ping"]);

        let wrapped = Invocation::login_shell("bash").apply(cmd).unwrap();

        assert_eq!(wrapped.get_program(), "bash");
        assert_eq!(wrapped.get_args(), ["-l", "-c", "ansible all -m ping"]);
    }
}
