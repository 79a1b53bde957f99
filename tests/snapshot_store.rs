mod common;

use common::*;
use task_rollup::db::Snapshot;
use task_rollup::guard::{apply_reparenting, depth_violations};
use task_rollup::report::{build_annotated_forest, flatten_for_export, rows_to_csv, CSV_HEADER};
use task_rollup::task::{Project, TimeLogEntry};
use task_rollup::{EngineConfig, Error, GuardError};

fn sample() -> Snapshot {
    Snapshot {
        projects: vec![Project { id: 1, name: "Website".into() }],
        tasks: vec![
            task(1, None, 0, Some(20.0)),
            task(2, Some(1), 1, Some(5.0)),
            task(3, Some(2), 2, Some(3.0)),
            task(4, None, 0, Some(2.0)),
        ],
        time_logs: vec![log(3, 4.0), log(4, 1.0), TimeLogEntry::new(None, 2.0)],
    }
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let snap = Snapshot::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(snap, Snapshot::default());
}

#[test]
fn save_then_load_preserves_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollup.json");
    let snap = sample();
    snap.save(&path).unwrap();
    assert!(!path.with_extension("json.tmp").exists());
    assert_eq!(Snapshot::load(&path).unwrap(), snap);
}

#[test]
fn corrupt_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollup.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Snapshot::load(&path), Err(Error::Parse { .. })));
}

#[test]
fn reparent_persists_new_depths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollup.json");
    let mut snap = sample();

    let err = apply_reparenting(&mut snap.tasks, 1, Some(3), 3).unwrap_err();
    assert_eq!(err, GuardError::CircularReference { task: 1, parent: 3 });
    // Moving 2 (height 1) under 4 lands 3 at depth 2.
    let moved = apply_reparenting(&mut snap.tasks, 2, Some(4), 3).unwrap();
    assert_eq!(moved, vec![2, 3]);
    snap.save(&path).unwrap();

    let reloaded = Snapshot::load(&path).unwrap();
    assert!(depth_violations(&reloaded.tasks, 3).is_empty());
    assert_eq!(reloaded.get(2).unwrap().parent_task_id, Some(4));
    assert_eq!(reloaded.get(3).unwrap().depth, 2);
}

#[test]
fn exported_csv_follows_tree_order() {
    let snap = sample();
    let forest = build_annotated_forest(&snap.tasks, &snap.time_logs, &EngineConfig::default(), today());
    let csv = rows_to_csv(&flatten_for_export(&forest, &snap.projects));
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            CSV_HEADER,
            "T1,Website,New,28.00,4.00,24.00,85.71%",
            "  T2,Website,New,8.00,4.00,4.00,50.00%",
            "    T3,Website,New,3.00,4.00,-1.00,-33.33%",
            "T4,Website,New,2.00,1.00,1.00,50.00%",
        ]
    );
}
