//! Shipped data files and the journal round trip on disk.

use std::path::PathBuf;

use swarm_core::data::ControllerConfig;
use swarm_headless::{load_config, load_scenario, verify_journal, MatchJournal, MatchRunner, MatchSetup};
use tempfile::TempDir;

fn data(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn shipped_default_config_matches_builtin() {
    let config = load_config(data("configs/default.ron")).unwrap();
    assert_eq!(config, ControllerConfig::default());
}

#[test]
fn shipped_files_validate() {
    load_config(data("configs/rush.ron")).unwrap();
    for scenario in ["scenarios/corridor.ron", "scenarios/open_field.ron"] {
        let scenario = load_scenario(data(scenario)).unwrap();
        scenario.build().unwrap();
    }
}

#[test]
fn journal_written_to_disk_verifies() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("match.bin");

    let scenario = load_scenario(data("scenarios/open_field.ron")).unwrap();
    let rush = load_config(data("configs/rush.ron")).unwrap();
    let setup = MatchSetup {
        scenario,
        player: rush,
        opponent: ControllerConfig::default(),
        tick_limit: 120,
    };
    let mut runner = MatchRunner::new(setup).unwrap();
    let report = runner.run().unwrap();
    assert!(report.damage_dealt > 0, "pre-placed squads never fought");

    runner.journal().save(&path).unwrap();
    let journal = MatchJournal::load(&path).unwrap();

    assert_eq!(journal.final_state_hash, report.final_state_hash);
    assert!(verify_journal(&journal).unwrap().is_match());
}

#[test]
fn corrupt_journal_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.bin");
    std::fs::write(&path, [0xFF, 0x00, 0x13]).unwrap();

    assert!(MatchJournal::load(&path).is_err());
}
