use areamap_core::stages::{self, RouteOutcome};
use areamap_core::{Cell, Error, PipelineConfig, table};
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn config_for(input: &Path, output: &Path) -> PipelineConfig {
    PipelineConfig {
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..Default::default()
    }
}

/// Writes a 3x3 map with a wall in column 2 that has a gap at (2, 2).
fn write_small_sources(dir: &Path) {
    fs::write(
        dir.join("area_category.csv"),
        "id , struct_name\n1, Apartment\n3, MyHome\n4, BandalgomCoffee\n",
    )
    .unwrap();
    fs::write(
        dir.join("area_struct.csv"),
        "category,x,y,area\n\
3,1,1,0\n0,2,1,0\n0,3,1,1\n\
0,1,2,0\n1,2,2,0\n0,3,2,1\n\
0,1,3,0\n0,2,3,0\n4,3,3,1\n",
    )
    .unwrap();
    fs::write(
        dir.join("area_map.csv"),
        "x,y,construction_site\n2,1,1\n2,3,1\n1,1,0\n",
    )
    .unwrap();
}

#[test]
fn prepare_then_path_writes_all_artifacts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("csv");
    fs::create_dir_all(&input).unwrap();
    write_small_sources(&input);
    let cfg = config_for(&input, &tmp.path().join("out"));

    let prepared = stages::prepare(&cfg).unwrap();
    assert_eq!(prepared.grid.len(), 9);
    assert_eq!(
        prepared.report,
        "Area 0 summary:\n  - Apartment: 1\n  - MyHome: 1\n  - ConstructionSite: 2\n\n\
Area 1 summary:\n  - BandalgomCoffee: 1\n\n"
    );
    assert_eq!(fs::read_to_string(&prepared.report_path).unwrap(), prepared.report);

    let merged = fs::read_to_string(&prepared.merged_path).unwrap();
    let mut lines = merged.lines();
    assert_eq!(
        lines.next(),
        Some("area,category,x,y,struct_name,ConstructionSite")
    );
    assert_eq!(lines.next(), Some("0,3,1,1,MyHome,0"));
    assert_eq!(lines.next(), Some("0,0,2,1,,1"));

    let RouteOutcome::Found { path, written_to } = stages::compute_path(&cfg).unwrap() else {
        panic!("expected a path");
    };
    assert_eq!(
        path.cells(),
        [(1, 1), (1, 2), (2, 2), (3, 2), (3, 3)]
            .iter()
            .map(|&(x, y)| Cell::new(x, y))
            .collect::<Vec<_>>()
    );
    assert_eq!(
        fs::read_to_string(&written_to).unwrap(),
        "x,y\n1,1\n1,2\n2,2\n3,2\n3,3\n"
    );
    assert_eq!(stages::load_path(&cfg).unwrap(), path);
}

#[test]
fn merged_table_round_trips_through_reload() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_small_sources(tmp.path());
    let cfg = config_for(tmp.path(), tmp.path());
    let prepared = stages::prepare(&cfg).unwrap();
    assert_eq!(stages::load_merged(&cfg).unwrap(), prepared.grid);
}

#[test]
fn missing_source_aborts_prepare_without_writing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_small_sources(tmp.path());
    fs::remove_file(tmp.path().join("area_map.csv")).unwrap();
    let out = tmp.path().join("out");
    let cfg = config_for(tmp.path(), &out);

    let err = stages::prepare(&cfg).unwrap_err();
    assert!(err.is_input_not_found(), "{err}");
    assert!(err.to_string().contains("area_map.csv"));
    assert!(!cfg.merged_artifact().exists());
    assert!(!out.exists());
}

#[test]
fn failed_report_write_leaves_no_merged_table() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_small_sources(tmp.path());
    let cfg = config_for(tmp.path(), &tmp.path().join("out"));
    // A directory where the report file should go makes the report write fail.
    fs::create_dir_all(cfg.report_artifact()).unwrap();

    let err = stages::prepare(&cfg).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "{err}");
    assert!(!cfg.merged_artifact().exists());
}

#[test]
fn far_coordinates_route_between_adjacent_landmarks() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("area_category.csv"),
        "category,struct\n3,MyHome\n4,BandalgomCoffee\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("area_struct.csv"),
        "x,y,category,area\n1,1,3,0\n2,1,4,0\n4294967295,4294967295,0,0\n",
    )
    .unwrap();
    fs::write(tmp.path().join("area_map.csv"), "x,y,ConstructionSite\n1,1,0\n").unwrap();
    let cfg = config_for(tmp.path(), &tmp.path().join("out"));

    stages::prepare(&cfg).unwrap();
    let RouteOutcome::Found { path, .. } = stages::compute_path(&cfg).unwrap() else {
        panic!("expected a path");
    };
    assert_eq!(path.cells(), [Cell::new(1, 1), Cell::new(2, 1)]);
}

#[test]
fn unresolvable_header_reports_observed_fields() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_small_sources(tmp.path());
    fs::write(
        tmp.path().join("area_category.csv"),
        "kind,label\n1,Apartment\n",
    )
    .unwrap();
    let cfg = config_for(tmp.path(), &tmp.path().join("out"));

    let err = stages::prepare(&cfg).unwrap_err();
    let Error::SchemaResolution {
        field, observed, ..
    } = &err
    else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(*field, "category");
    assert_eq!(observed, &vec!["kind".to_string(), "label".to_string()]);
    assert!(!cfg.merged_artifact().exists());
}

#[test]
fn bad_coordinate_is_reported_with_its_line() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_small_sources(tmp.path());
    fs::write(tmp.path().join("area_map.csv"), "x,y\n1,1\n0,2\n").unwrap();
    let cfg = config_for(tmp.path(), &tmp.path().join("out"));

    let err = stages::prepare(&cfg).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid x value \"0\" in area_map.csv (line 3)"
    );
}

#[test]
fn path_stage_without_merged_table_asks_for_prepare() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = config_for(tmp.path(), tmp.path());
    let err = stages::compute_path(&cfg).unwrap_err();
    assert!(err.is_input_not_found());
    assert!(err.to_string().contains("run `areamap prepare` first"));
}

#[test]
fn missing_destination_writes_no_path_table() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_small_sources(tmp.path());
    let mut cfg = config_for(tmp.path(), tmp.path());
    stages::prepare(&cfg).unwrap();
    stages::compute_path(&cfg).unwrap();
    assert!(cfg.path_artifact().exists());
    cfg.landmarks.destination = "Library".to_string();

    let err = stages::compute_path(&cfg).unwrap_err();
    assert!(matches!(err, Error::LandmarkNotFound { .. }));
    assert!(!cfg.path_artifact().exists());
}

#[test]
fn unreachable_destination_is_not_an_error_and_clears_stale_path() {
    let tmp = tempfile::tempdir().expect("tempdir");
    write_small_sources(tmp.path());
    let cfg = config_for(tmp.path(), tmp.path());
    stages::prepare(&cfg).unwrap();
    stages::compute_path(&cfg).unwrap();
    assert!(cfg.path_artifact().exists());

    // Close the gap.
    fs::write(
        tmp.path().join("area_map.csv"),
        "x,y,ConstructionSite\n2,1,1\n2,2,1\n2,3,1\n",
    )
    .unwrap();
    stages::prepare(&cfg).unwrap();
    assert!(matches!(
        stages::compute_path(&cfg).unwrap(),
        RouteOutcome::Unreachable
    ));
    assert!(!cfg.path_artifact().exists());
}

#[test]
fn sample_fixture_route_has_twenty_steps() {
    let input = repo_root().join("fixtures").join("csv");
    assert!(input.exists(), "fixture missing: {}", input.display());

    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = config_for(&input, tmp.path());
    let prepared = stages::prepare(&cfg).unwrap();
    assert_eq!(prepared.grid.len(), 225);

    let RouteOutcome::Found { path, .. } = stages::compute_path(&cfg).unwrap() else {
        panic!("expected a path");
    };
    assert_eq!(path.steps(), 20);
    assert_eq!(path.start(), Cell::new(2, 3));
    assert_eq!(path.end(), Cell::new(13, 12));

    let reloaded = table::read_path(&cfg.path_artifact()).unwrap();
    assert_eq!(reloaded, path);
}
