use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(state_root: &Path, args: &[&str]) -> Output {
    run_with_env(state_root, args, &[])
}

fn run_with_env(state_root: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ragforge"));
    cmd.args(args).env("RAGFORGE_STATE_ROOT", state_root);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run ragforge")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output) {
    assert!(
        output.status.success(),
        "stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
}

fn assert_err_contains(output: &Output, needle: &str) {
    assert!(
        !output.status.success(),
        "expected failure, stdout:\n{}\nstderr:\n{}",
        stdout(output),
        stderr(output)
    );
    let text = format!("{}{}", stdout(output), stderr(output));
    assert!(
        text.contains(needle),
        "expected error to contain `{needle}`, got:\n{text}"
    );
}

// Fills every step, saves, lets the countdown restart the form, then quits.
const SAVE_SCRIPT: &str = "enter,text:Support Bot,down,enter,text:Answers support tickets with retrieval.,\
right,enter,text:tickets,down,enter,text:Historical ticket content,\
down,enter,down,enter,down,enter,down,enter,down,enter,text:pinecone,\
right,space,right,enter,right,s,tick,tick,tick,tick,tick,ctrl-c";

#[test]
fn no_args_prints_the_command_help() {
    let dir = tempdir().expect("tempdir");
    let output = run(dir.path(), &[]);
    assert_ok(&output);
    let text = stdout(&output);
    assert!(text.contains("Commands:"));
    assert!(text.contains("wizard"));
    assert!(text.contains("show <id>"));
}

#[test]
fn unknown_command_fails_with_a_message() {
    let dir = tempdir().expect("tempdir");
    let output = run(dir.path(), &["bogus"]);
    assert_err_contains(&output, "unknown command `bogus`");
}

#[test]
fn list_is_empty_before_any_save() {
    let dir = tempdir().expect("tempdir");
    let output = run(dir.path(), &["list"]);
    assert_ok(&output);
    assert!(stdout(&output).contains("no saved configurations"));
}

#[test]
fn show_and_delete_reject_missing_documents() {
    let dir = tempdir().expect("tempdir");
    assert_err_contains(
        &run(dir.path(), &["show", "0123456789abcdef01234567"]),
        "Configuration not found",
    );
    assert_err_contains(
        &run(dir.path(), &["delete", "0123456789abcdef01234567"]),
        "Configuration not found",
    );
}

#[test]
fn remote_setting_round_trips_and_validates() {
    let dir = tempdir().expect("tempdir");
    let output = run(dir.path(), &["remote"]);
    assert_ok(&output);
    assert!(stdout(&output).contains("remote_url is not set"));

    let output = run(dir.path(), &["remote", "https://config.example.com/api"]);
    assert_ok(&output);
    assert!(stdout(&output).contains("remote_url=https://config.example.com/api"));

    let output = run(dir.path(), &["remote"]);
    assert_ok(&output);
    assert!(stdout(&output).contains("remote_url=https://config.example.com/api"));

    assert_err_contains(
        &run(dir.path(), &["remote", "ftp://config.example.com"]),
        "remote_url must start with http:// or https://",
    );

    let output = run(dir.path(), &["remote", "clear"]);
    assert_ok(&output);
    assert!(stdout(&output).contains("remote_url cleared"));
}

#[test]
fn scripted_wizard_saves_then_crud_verbs_round_trip() {
    let dir = tempdir().expect("tempdir");

    let output = run_with_env(
        dir.path(),
        &["wizard"],
        &[("RAGFORGE_WIZARD_SCRIPT_KEYS", SAVE_SCRIPT)],
    );
    assert_ok(&output);
    assert!(stdout(&output).contains("saved_configurations=1"));

    let output = run(dir.path(), &["list"]);
    assert_ok(&output);
    let listing = stdout(&output);
    assert!(listing.contains("saved configurations (1):"));
    assert!(listing.contains("Support Bot"));

    let id = listing
        .lines()
        .find(|line| line.contains("Support Bot"))
        .and_then(|line| line.split_whitespace().next())
        .expect("listed id")
        .to_string();
    assert_eq!(id.len(), 24);

    let output = run(dir.path(), &["show", &id]);
    assert_ok(&output);
    let shown = stdout(&output);
    assert!(shown.contains("\"appName\": \"Support Bot\""));
    assert!(shown.contains("\"knowledgeBaseName\": \"tickets\""));
    assert!(shown.contains("\"enableEncryption\": true"));

    let output = run(dir.path(), &["delete", &id]);
    assert_ok(&output);
    assert!(stdout(&output).contains(&format!("deleted {id}")));

    let output = run(dir.path(), &["list"]);
    assert_ok(&output);
    assert!(stdout(&output).contains("no saved configurations"));
}

#[test]
fn scripted_wizard_cancel_saves_nothing() {
    let dir = tempdir().expect("tempdir");
    let output = run_with_env(
        dir.path(),
        &["wizard"],
        &[("RAGFORGE_WIZARD_SCRIPT_KEYS", "esc")],
    );
    assert_ok(&output);
    assert!(stdout(&output).contains("wizard canceled"));

    let output = run(dir.path(), &["list"]);
    assert_ok(&output);
    assert!(stdout(&output).contains("no saved configurations"));
}

#[test]
fn invalid_script_token_is_reported() {
    let dir = tempdir().expect("tempdir");
    let output = run_with_env(
        dir.path(),
        &["wizard"],
        &[("RAGFORGE_WIZARD_SCRIPT_KEYS", "warp")],
    );
    assert_err_contains(&output, "invalid RAGFORGE_WIZARD_SCRIPT_KEYS token `warp`");
}
