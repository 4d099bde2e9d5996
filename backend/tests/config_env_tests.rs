//! Startup configuration resolution from files and the environment.

mod support;

use std::io::Write;

use tempfile::NamedTempFile;
use transit_quest::catalog::SelectionKind;
use transit_quest::config::{AppConfig, ConfigError};

use support::with_scoped_env;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_explicit_path_with_overrides() {
    let file = config_file(
        r#"
[server]
port = 9000

[search]
selection = "round_robin"

[synthesis]
num_points = 120
"#,
    );
    let path = file.path().to_str().unwrap();

    let config = with_scoped_env(
        &[
            ("TRANSIT_CONFIG", Some(path)),
            ("PORT", Some("9100")),
            ("HOST", None),
            ("TRANSIT_SEED", Some("99")),
        ],
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.synthesis.num_points, 120);
    assert_eq!(config.synthesis.seed, Some(99));
    assert_eq!(config.selection_kind().unwrap(), SelectionKind::RoundRobin);
}

#[test]
fn test_bad_seed_is_rejected() {
    let file = config_file("");
    let path = file.path().to_str().unwrap();
    let result = with_scoped_env(
        &[
            ("TRANSIT_CONFIG", Some(path)),
            ("PORT", None),
            ("TRANSIT_SEED", Some("not-a-number")),
        ],
        AppConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_missing_explicit_file() {
    let result = with_scoped_env(
        &[("TRANSIT_CONFIG", Some("/nonexistent/transit.toml"))],
        AppConfig::load,
    );
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[cfg(feature = "http-server")]
#[test]
fn test_state_from_config_with_catalog_file() {
    use transit_quest::http::AppState;

    let catalog = config_file(
        r#"
[[systems]]
id = "wasp-12b"
name = "WASP-12 b"
star_name = "WASP-12"
stellar_type = "G0V"
stellar_radius_solar = 1.6
stellar_temperature_k = 6300.0
distance_light_years = 1410.0
ai_confidence_percent = 97.5
discovery_date = "2008-04-01"

[systems.transit]
period_days = 1.09
transit_depth = 0.014
transit_duration_days = 0.12
"#,
    );
    let mut config = AppConfig::default();
    config.catalog.path = Some(catalog.path().to_path_buf());
    config.search.selection = "by_id".to_string();
    config.search.candidate_id = Some("wasp-12b".to_string());

    let state = AppState::from_config(&config).unwrap();
    assert_eq!(state.search.catalog.len(), 1);
    assert_eq!(state.search.policy.name(), "by_id");
    assert_eq!(state.search.plan.phases().len(), 5);
}
