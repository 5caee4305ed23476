//! Playbook command execution through a recording launcher

mod common;

use ansible_command::prelude::*;
use ansible_command::{Error, Invocation, UNBUFFERED_ENV};
use common::RecordingLauncher;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

fn playbook() -> Playbook {
    Playbook::with_invocation(Invocation::direct())
}

#[smol_potat::test]
async fn test_playbook_translates_to_ansible_playbook() {
    let launcher = RecordingLauncher::new();

    playbook()
        .playbook("test")
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap();

    let calls = launcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].get_program(), "ansible-playbook");
    assert_eq!(launcher.single_call_args(), ["test.yml"]);
}

#[smol_potat::test]
async fn test_missing_playbook_is_rejected_without_spawning() {
    let launcher = RecordingLauncher::new();

    let err = playbook()
        .variables(&json!({"foo": "bar"}))
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.reasons().unwrap(), ["'playbook' must be specified"]);
    assert!(launcher.calls().is_empty());
}

#[smol_potat::test]
async fn test_unserializable_variables_are_rejected_without_spawning() {
    let launcher = RecordingLauncher::new();
    let mut bad = HashMap::new();
    bad.insert((1, 2), "tuple keys are not JSON");

    let err = playbook()
        .playbook("test")
        .variables(&bad)
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Variables { .. }));
    assert!(err.reasons().is_none());
    assert!(launcher.calls().is_empty());
}

#[smol_potat::test]
async fn test_missing_playbook_wins_over_bad_variables() {
    let launcher = RecordingLauncher::new();
    let mut bad = HashMap::new();
    bad.insert((1, 2), "tuple keys are not JSON");

    let err = playbook()
        .variables(&bad)
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.reasons().unwrap(), ["'playbook' must be specified"]);
    assert!(launcher.calls().is_empty());
}

#[smol_potat::test]
async fn test_falsy_variables_do_not_reach_process() {
    let launcher = RecordingLauncher::new();

    playbook()
        .playbook("test")
        .variables(&false)
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap();

    assert_eq!(launcher.single_call_args(), ["test.yml"]);
}

#[smol_potat::test]
async fn test_variables_are_json_encoded() {
    let launcher = RecordingLauncher::new();

    playbook()
        .playbook("test")
        .variables(&json!({"foo": "bar"}))
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap();

    assert_eq!(launcher.single_call_args(), ["test.yml", "-e", r#"{"foo":"bar"}"#]);
}

#[smol_potat::test]
async fn test_variables_from_struct() {
    #[derive(Serialize)]
    struct Release<'a> {
        version: &'a str,
        hosts: Vec<&'a str>,
        canary: bool,
    }

    let launcher = RecordingLauncher::new();
    let release = Release {
        version: "1.4.2",
        hosts: vec!["web1", "web2"],
        canary: true,
    };

    playbook()
        .playbook("deploy")
        .variables(&release)
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap();

    assert_eq!(
        launcher.single_call_args(),
        [
            "deploy.yml",
            "-e",
            r#"{"version":"1.4.2","hosts":["web1","web2"],"canary":true}"#
        ]
    );
}

#[smol_potat::test]
async fn test_password_prompts() {
    let launcher = RecordingLauncher::new();

    playbook()
        .playbook("test")
        .ask_sudo_pass()
        .ask_pass()
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap();

    assert_eq!(
        launcher.single_call_args(),
        ["test.yml", "--ask-pass", "--ask-sudo-pass"]
    );
}

#[smol_potat::test]
async fn test_tags_and_skip_tags() {
    let launcher = RecordingLauncher::new();

    playbook()
        .playbook("test")
        .tags(vec!["onetag".to_string(), "twotags".to_string()])
        .skip_tags(["onetag"])
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap();

    assert_eq!(
        launcher.single_call_args(),
        ["test.yml", "--tags=onetag,twotags", "--skip-tags=onetag"]
    );
}

#[smol_potat::test]
async fn test_common_flags_come_last_in_fixed_order() {
    let launcher = RecordingLauncher::new();

    playbook()
        .as_sudo()
        .verbose("vv")
        .private_key("/home/user/.ssh/id_rsa")
        .su("root")
        .limit("localhost")
        .inventory("/etc/my/hosts")
        .user("root")
        .forks(10)
        .tags(["deploy"])
        .playbook("test")
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap();

    assert_eq!(
        launcher.single_call_args(),
        [
            "test.yml",
            "--tags=deploy",
            "-f",
            "10",
            "-u",
            "root",
            "-i",
            "/etc/my/hosts",
            "-l",
            "localhost",
            "-U",
            "root",
            "--private-key",
            "\"/home/user/.ssh/id_rsa\"",
            "-vv",
            "-s",
        ]
    );
}

#[smol_potat::test]
async fn test_buffering_and_cwd() {
    let launcher = RecordingLauncher::new();
    let command = playbook().playbook("test");

    command
        .exec_with(&launcher, ExecOptions::new().cwd("/path/to/playbooks").buffered(true))
        .await
        .unwrap();

    let calls = launcher.calls();
    assert_eq!(calls[0].get_env(UNBUFFERED_ENV), Some(OsStr::new("")));
    assert_eq!(calls[0].get_current_dir(), Some(Path::new("/path/to/playbooks")));
}

#[smol_potat::test]
async fn test_settings_choose_default_buffering_and_install_path() {
    let launcher = RecordingLauncher::new();
    let settings = Settings {
        install_path: Some("/opt/ansible/bin".into()),
        login_shell: None,
        buffered: true,
    };
    let command = Playbook::with_settings(&settings).playbook("test");

    command.exec_with(&launcher, ExecOptions::default()).await.unwrap();
    command
        .exec_with(&launcher, ExecOptions::new().buffered(false))
        .await
        .unwrap();

    let calls = launcher.calls();
    if cfg!(unix) {
        assert_eq!(
            calls[0].get_program(),
            Path::new("/opt/ansible/bin/ansible-playbook").as_os_str()
        );
    }
    assert_eq!(calls[0].get_env(UNBUFFERED_ENV), Some(OsStr::new("")));
    assert_eq!(calls[1].get_env(UNBUFFERED_ENV), Some(OsStr::new("1")));
}

#[smol_potat::test]
async fn test_host_results_from_output() {
    let launcher = RecordingLauncher::new()
        .stdout("web1 | success >> {\n")
        .stdout("    \"ping\": \"pong\"\n}\n");

    let result = playbook()
        .playbook("test")
        .exec_with(&launcher, ExecOptions::default())
        .await
        .unwrap();

    let hosts = result.host_results().unwrap();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].host, "web1");
    assert_eq!(hosts[0].data, json!({"ping": "pong"}));
}
