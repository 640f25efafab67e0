use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

fn script(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("money_challenge_cli").expect("binary exists");
    cmd.env("MONEY_CHALLENGE_HOME", home)
        .env("MONEY_CHALLENGE_CLI_SCRIPT", "1")
        .env("MONEY_CHALLENGE_SEED", "7")
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &Path, input: &str) -> String {
    let output = script(home)
        .write_stdin(input.to_string())
        .output()
        .expect("run script CLI");
    assert!(
        output.status.success(),
        "script CLI failed: status={}\nstdout:\n{}\nstderr:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    script(home.path())
        .write_stdin("# comments are skipped\nnew-goal \"Summer trip\" 150 60 1dt,5dt\nbatches\nexit\n")
        .assert()
        .success()
        .stdout(contains("SUCCESS: Created goal `Summer trip`"))
        .stdout(contains("=== Summer trip (all) ==="))
        .stdout(contains("batch-1"));

    let state = home.path().join("data/tounes_money_challenge_v2.json");
    let json = std::fs::read_to_string(state).unwrap();
    assert!(json.contains("\"Summer trip\""));
    assert!(json.contains("\"target_amount\": 150000"));
}

#[test]
fn checking_the_only_batch_reaches_the_goal() {
    let home = TempDir::new().unwrap();
    let stdout = run(
        home.path(),
        "new-goal Tiny 10 7 10dt\ncheck 1\nbatches completed\nprogress\n",
    );

    assert!(stdout.contains("SUCCESS: Created goal `Tiny` with 1 batches."));
    assert!(stdout.contains("SUCCESS: Marked batch-1 (10.000 د.ت) as done."));
    assert!(stdout.contains("SUCCESS: Goal reached!"));
    assert!(stdout.contains("[##########"));
    assert!(stdout.contains("100.0%"));
}

#[test]
fn state_is_reloaded_on_the_next_run() {
    let home = TempDir::new().unwrap();
    run(home.path(), "new-goal Bike 40 30\nnew-goal Laptop 900 200\n");

    let stdout = run(home.path(), "goals\nopen bike\nprogress\n");
    let row = Regex::new(r"(?m)^\*?\s*2\s+Laptop\s+900\.000 د\.ت").unwrap();
    assert!(row.is_match(&stdout), "missing Laptop row:\n{stdout}");
    assert!(stdout.contains("Goal          : Bike"));
    assert!(stdout.contains("Target        : 40.000 د.ت"));
}

#[test]
fn same_seed_gives_the_same_batches() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let input = "new-goal Same 321.5 30\nbatches\n";

    let extract = |stdout: String| -> Vec<String> {
        stdout
            .lines()
            .filter(|line| line.starts_with("batch-"))
            .map(str::to_string)
            .collect()
    };
    let a = extract(run(first.path(), input));
    let b = extract(run(second.path(), input));
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn mistakes_are_reported_without_stopping_the_script() {
    let home = TempDir::new().unwrap();
    script(home.path())
        .write_stdin("chek 1\ncheck 1\nnew-goal Small 5\nnew-goal Odd 20 10 3dt\nversion\n")
        .assert()
        .success()
        .stdout(contains("WARNING: Unknown command `chek`"))
        .stdout(contains("Suggestion: `check`?"))
        .stdout(contains("ERROR: No goal is open"))
        .stdout(contains("ERROR: Invalid input: target must be at least 10.000"))
        .stdout(contains("ERROR: Unknown denomination: 3dt"))
        .stdout(contains("schema  : v2"));
}

#[test]
fn delete_and_restore_round_trip() {
    let home = TempDir::new().unwrap();
    let stdout = run(
        home.path(),
        "new-goal Keep 20\nbackup keep-only\nnew-goal Drop 20\ndelete-goal drop\nbackups\nrestore 1\ngoals\n",
    );

    assert!(stdout.contains("SUCCESS: Deleted goal `Drop`."));
    assert!(stdout.contains("_keep-only.json"));
    assert!(stdout.contains("SUCCESS: Restored"));
    assert!(stdout.contains("Keep"));
}

#[test]
fn config_changes_apply_to_new_goals() {
    let home = TempDir::new().unwrap();
    run(home.path(), "config set target 75\nconfig set denominations 2dt\n");

    let stdout = run(home.path(), "config\nnew-goal Defaults\nprogress\n");
    assert!(stdout.contains("Target        : 75.000 د.ت"));
    assert!(stdout.contains("Denominations : 2 دينار"));
    assert!(
        predicate::str::is_match(r"denominations\s+2dt")
            .unwrap()
            .eval(&stdout)
    );
}

#[test]
fn oversized_targets_are_refused() {
    let home = TempDir::new().unwrap();
    let stdout = run(
        home.path(),
        "new-goal Huge 1000000000000 1 50dt\nconfig set target 2000000\ngoals\n",
    );
    assert!(stdout.contains("ERROR: Invalid input: target must be at most 1000000.000"));
    assert!(stdout.contains("expected an amount between 10.000 and 1000000.000"));
    assert!(!stdout.contains("Created goal `Huge`"));
}

#[test]
fn config_backups_can_be_listed_and_restored() {
    let home = TempDir::new().unwrap();
    let stdout = run(
        home.path(),
        "config set target 75\nconfig set target 80\nconfig backups\nconfig restore 1\nconfig\n",
    );
    assert!(stdout.contains("=== Configuration backups ==="));
    assert!(stdout.contains("_before-set.json"));
    assert!(stdout.contains("SUCCESS: Settings restored from config_"));
    assert!(
        predicate::str::is_match(r"target\s+75\.000")
            .unwrap()
            .eval(&stdout)
    );

    let missing = run(home.path(), "config restore 99\n");
    assert!(missing.contains("no configuration backup #99"));
}

#[test]
fn config_backups_are_pruned_to_the_retention() {
    let home = TempDir::new().unwrap();
    run(home.path(), "config set retention 2\n");
    let stdout = run(
        home.path(),
        "config set duration 10\nconfig set duration 20\nconfig set duration 30\nconfig backups\n",
    );
    let names = Regex::new(r"config_\d{8}_\d{9}").unwrap();
    assert_eq!(names.find_iter(&stdout).count(), 2, "{stdout}");
}
