//! Loading configuration and catalogs from disk.

use std::io::Write;

use tycoon_core::prelude::*;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn builtin_catalog_round_trips_through_ron() {
    let text = Catalog::standard().to_ron_string().unwrap();
    let file = write_temp(&text);
    let loaded = Catalog::load(file.path()).unwrap();
    assert_eq!(loaded, Catalog::standard());
}

#[test]
fn config_points_at_catalog_file() {
    let catalog = Catalog::standard().to_ron_string().unwrap();
    let catalog_file = write_temp(&catalog);
    let config_text = format!(
        "EngineConfig(tick_interval_ms: 500, catalog_path: Some({:?}))",
        catalog_file.path().display().to_string()
    );
    let config_file = write_temp(&config_text);

    let config = EngineConfig::load(config_file.path()).unwrap();
    assert_eq!(config.tick_interval_ms, 500);
    let session = Session::from_config(config, ManualClock::new(0)).unwrap();
    assert_eq!(session.state().upgrades.len(), Catalog::standard().upgrades.len());
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(&dir.path().join("absent.ron")).unwrap_err();
    assert!(matches!(err, GameError::IoError { .. }));
}

#[test]
fn invalid_catalog_reports_every_problem() {
    let mut catalog = Catalog::standard();
    catalog.upgrades.push(catalog.upgrades[0].clone());
    catalog.research[0].dependencies.push(Dependency::Research("nowhere".to_string()));
    let file = write_temp(&catalog.to_ron_string().unwrap());

    match Catalog::load(file.path()) {
        Err(GameError::CatalogInvalid { errors }) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation failure, got {other:?}"),
    }
}
