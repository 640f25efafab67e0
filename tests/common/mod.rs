#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use money_challenge::{
    config::ConfigManager,
    core::{FixedClock, GoalManager},
    currency::Amount,
    generator::RngSource,
    goal::GoalDraft,
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub struct TestEnv {
    pub base: PathBuf,
    pub clock: Arc<FixedClock>,
    pub manager: GoalManager,
    pub config_manager: ConfigManager,
}

/// Creates an isolated manager on a fresh directory, a fixed clock and a seeded generator.
pub fn setup_test_env() -> TestEnv {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
    ));
    let manager = manager_at(&base, clock.clone());
    let config_manager =
        ConfigManager::with_base_dir(&base).expect("create config manager for temp dir");

    TestEnv {
        base,
        clock,
        manager,
        config_manager,
    }
}

/// A second manager over the same data directory, as a restarted process would see it.
pub fn manager_at(base: &std::path::Path, clock: Arc<FixedClock>) -> GoalManager {
    let storage =
        JsonStorage::new(base.join("data"), Some(3)).expect("create json storage backend");
    GoalManager::new(
        Box::new(storage),
        Box::new(clock),
        Box::new(RngSource::seeded(42)),
    )
}

pub fn draft(name: &str, dinars: i64) -> GoalDraft {
    GoalDraft {
        name: name.to_string(),
        target_amount: Amount::from_dinars(dinars),
        duration_days: 30,
        denominations: vec![
            Amount::from_millimes(500),
            Amount::from_dinars(1),
            Amount::from_dinars(5),
        ],
    }
}
