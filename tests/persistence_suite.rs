mod common;

use std::fs;

use common::{draft, setup_test_env};
use money_challenge::{
    core::{GoalManager, SystemClock},
    errors::{ChallengeError, Result},
    generator::RngSource,
    goal::{AppState, CURRENT_SCHEMA_VERSION},
    storage::{
        json_backend::{load_state_from_path, save_state_to_path},
        BackupInfo, JsonStorage, StateStorage,
    },
    utils::persistence::tmp_path,
};
use tempfile::tempdir;

/// Storage whose disk is always full.
struct FullDisk;

impl StateStorage for FullDisk {
    fn load_state(&self) -> Result<AppState> {
        Ok(AppState::new())
    }

    fn save_state(&self, _state: &AppState) -> Result<()> {
        Err(ChallengeError::StorageError("no space left on device".into()))
    }

    fn backup_state(&self, _note: Option<&str>) -> Result<BackupInfo> {
        Err(ChallengeError::StorageError("no space left on device".into()))
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        Ok(Vec::new())
    }

    fn restore_backup(&self, backup_id: &str) -> Result<AppState> {
        Err(ChallengeError::StorageError(format!("backup `{backup_id}` not found")))
    }
}

#[test]
fn failed_save_is_a_warning_and_keeps_the_change() {
    let mut manager = GoalManager::new(
        Box::new(FullDisk),
        Box::new(SystemClock),
        Box::new(RngSource::seeded(3)),
    );

    let applied = manager.create_goal(draft("Car", 200)).expect("goal is valid");
    assert!(!applied.is_persisted());
    assert!(matches!(
        applied.warning,
        Some(ChallengeError::StorageError(_))
    ));
    let id = applied.into_inner();
    assert_eq!(manager.goals().len(), 1);

    let batch_id = manager.goal(id).unwrap().batches[0].id.clone();
    let applied = manager.toggle_batch(id, &batch_id, true).unwrap();
    assert!(applied.warning.is_some());
    assert!(manager.goal(id).unwrap().batches[0].is_completed);
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("state.json");

    let mut state = AppState::new();
    save_state_to_path(&state, &path).expect("initial save");
    let original = fs::read_to_string(&path).unwrap();

    // A directory at the staging path makes File::create fail.
    fs::create_dir_all(tmp_path(&path)).unwrap();
    state.active_goal_id = Some(uuid::Uuid::new_v4());
    assert!(save_state_to_path(&state, &path).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn restore_brings_back_an_earlier_snapshot() {
    let mut env = setup_test_env();
    let _ = env.manager.create_goal(draft("Kept", 30)).unwrap();
    let checkpoint = env.manager.backup(Some("Only kept")).expect("backup");
    assert!(checkpoint.id.contains("_only-kept"));
    assert!(checkpoint.created_at.is_some());

    let _ = env.manager.create_goal(draft("Dropped", 30)).unwrap();
    assert_eq!(env.manager.goals().len(), 2);

    let warnings = env.manager.restore_backup(&checkpoint.id).expect("restore");
    assert!(warnings.is_empty());
    assert_eq!(env.manager.goals().len(), 1);
    assert_eq!(env.manager.goals()[0].config.name, "Kept");

    let backups = env.manager.list_backups().unwrap();
    assert!(backups.iter().any(|info| info.id.contains("before-restore")));
    assert!(backups.len() <= 3, "retention not applied: {backups:?}");
}

#[test]
fn restore_refuses_paths_outside_the_backup_folder() {
    let env = setup_test_env();
    let storage = JsonStorage::new(env.base.join("data"), None).unwrap();
    assert!(storage.restore_backup("../config/config.json").is_err());
    assert!(storage.restore_backup("missing.json").is_err());
}

#[test]
fn documents_from_a_newer_release_are_rejected() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("state.json");
    fs::write(
        &path,
        format!(
            r#"{{"schema_version": {}, "goals": []}}"#,
            CURRENT_SCHEMA_VERSION + 1
        ),
    )
    .unwrap();

    let err = load_state_from_path(&path).expect_err("newer schema");
    assert!(matches!(
        err,
        ChallengeError::UnsupportedSchema { supported, .. } if supported == CURRENT_SCHEMA_VERSION
    ));
}

#[test]
fn stored_amounts_are_integer_millimes() {
    let mut env = setup_test_env();
    let _ = env.manager.create_goal(draft("Watch", 12)).unwrap();

    let raw = fs::read_to_string(env.base.join("data/tounes_money_challenge_v2.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["schema_version"], CURRENT_SCHEMA_VERSION);
    assert_eq!(json["goals"][0]["config"]["target_amount"], 12_000);
    assert!(json["goals"][0]["batches"]
        .as_array()
        .unwrap()
        .iter()
        .all(|batch| batch["total_value"].is_i64()));
}
