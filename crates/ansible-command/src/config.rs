//! Option bag shared by ad-hoc and playbook commands

use crate::args::Args;

/// Options recorded by the builder setters
///
/// Created empty with the command and read once per `exec` to compile the
/// argument vector. Which fields are meaningful depends on the command kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandConfig {
    /// Host pattern (ad-hoc)
    pub hosts: Option<String>,
    /// Module name (ad-hoc)
    pub module: Option<String>,
    /// Structured module arguments (ad-hoc)
    pub args: Option<Args>,
    /// Freeform module argument (ad-hoc)
    pub freeform: Option<String>,

    /// Playbook name without the `.yml` extension (playbook)
    pub playbook: Option<String>,
    /// Extra variables passed with `-e` (playbook)
    pub variables: Option<serde_json::Value>,
    /// Why the variables could not be converted to JSON (playbook)
    pub variables_error: Option<String>,
    /// Only run tasks with these tags (playbook)
    pub tags: Option<Vec<String>>,
    /// Skip tasks with these tags (playbook)
    pub skip_tags: Option<Vec<String>>,
    /// Prompt for the connection password (playbook)
    pub ask_pass: bool,
    /// Prompt for the sudo password (playbook)
    pub ask_sudo_pass: bool,

    /// Number of parallel processes
    pub forks: Option<u32>,
    /// Verbosity level such as `v` or `vvv`
    pub verbose: Option<String>,
    /// Remote user
    pub user: Option<String>,
    /// Inventory file path
    pub inventory: Option<String>,
    /// Further limit the selected hosts
    pub limit: Option<String>,
    /// User to `su` to
    pub su: Option<String>,
    /// Private key file used for the connection
    pub private_key: Option<String>,
    /// Run operations with sudo
    pub sudo: bool,
    /// Run operations with privilege escalation
    pub escalate: bool,
}

impl CommandConfig {
    /// Flags shared by every command kind, in their fixed order
    ///
    /// Unset and empty values contribute nothing, regardless of the order in
    /// which the setters were called.
    pub fn common_params(&self) -> Vec<String> {
        let mut params = Vec::new();

        push_flag(&mut params, "-f", self.forks.filter(|n| *n > 0).map(|n| n.to_string()));
        push_flag(&mut params, "-u", present(&self.user));
        push_flag(&mut params, "-i", present(&self.inventory));
        push_flag(&mut params, "-l", present(&self.limit));
        push_flag(&mut params, "-U", present(&self.su));
        push_flag(
            &mut params,
            "--private-key",
            present(&self.private_key).map(|path| format!("\"{}\"", path)),
        );

        if let Some(level) = present(&self.verbose) {
            params.push(format!("-{}", level));
        }
        if self.sudo {
            params.push("-s".to_string());
        }
        if self.escalate {
            params.push("--become".to_string());
        }

        params
    }
}

/// Non-empty string value of an option
fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn push_flag(params: &mut Vec<String>, flag: &str, value: Option<String>) {
    if let Some(value) = value {
        params.push(flag.to_string());
        params.push(value);
    }
}
