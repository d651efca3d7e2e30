use std::fs;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use weave_base::{Config, ConfigSection, InjectorConfig, TracingConfig, config_section};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct FleetConfig {
    city: String,
    cars: u32,
    night_shift: bool,
}

#[config_section("dispatch")]
#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct DispatchConfig {
    zone: String,
    radius: u32,
}

#[test]
fn test_config_new() {
    let config = Config::new();
    assert!(config.is_empty());
    assert_eq!(config.len(), 0);
}

#[test]
fn test_config_set_and_get() {
    let mut config = Config::new();
    let fleet = FleetConfig {
        city: "Kyiv".to_string(),
        cars: 12,
        night_shift: true,
    };
    config.set("fleet", &fleet).unwrap();
    assert!(config.contains("fleet"));

    let retrieved: FleetConfig = config.get("fleet").unwrap();
    assert_eq!(retrieved, fleet);
}

#[test]
fn test_config_get_missing() {
    let config = Config::new();
    let result: Option<String> = config.get("missing").unwrap();
    assert_eq!(result, None);
    assert!(config.get::<FleetConfig>("missing").is_err());
}

#[test]
fn test_config_with() {
    let config = Config::new().with("cars", 4).with("city", "Lviv");
    assert_eq!(config.get::<u32>("cars").unwrap(), 4);
    assert_eq!(config.get::<String>("city").unwrap(), "Lviv");
}

#[test]
fn test_config_parse_invalid_json() {
    assert!(Config::parse(r#"{ "fleet": json }"#).is_err());
}

#[test]
fn test_config_parse_file() {
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(
        temp_file.path(),
        r#"
    {
        "fleet": {
            "city": "Odesa",
            "cars": 7,
            "night_shift": false
        },
        "injector": {
            "max_depth": 32,
            "roots": ["taxi"]
        }
    }
    "#,
    )
    .unwrap();

    let config = Config::parse_file(temp_file.path()).unwrap();
    let fleet: FleetConfig = config.get("fleet").unwrap();
    assert_eq!(fleet.city, "Odesa");
    assert_eq!(fleet.cars, 7);

    let injector: InjectorConfig = config.section().unwrap();
    assert_eq!(injector.max_depth, 32);
    assert_eq!(injector.roots, vec!["taxi"]);
}

#[test]
fn test_config_parse_file_not_found() {
    assert!(Config::parse_file("missing_config.json").is_err());
}

#[test]
fn test_config_merge() {
    let mut config = Config::parse(
        r#"
    {
        "fleet": { "city": "Kyiv", "cars": 1 },
        "injector": { "roots": ["taxi::service"] },
        "level": "info"
    }
    "#,
    )
    .unwrap();
    let overrides = Config::parse(
        r#"
    {
        "fleet": { "cars": 20, "night_shift": true },
        "injector": { "roots": ["taxi::repository"] },
        "level": "debug"
    }
    "#,
    )
    .unwrap();
    config.merge_from(overrides).unwrap();

    let fleet: FleetConfig = config.get("fleet").unwrap();
    assert_eq!(
        fleet,
        FleetConfig {
            city: "Kyiv".to_string(),
            cars: 20,
            night_shift: true,
        }
    );
    let injector: InjectorConfig = config.section().unwrap();
    assert_eq!(injector.roots, vec!["taxi::service", "taxi::repository"]);
    assert_eq!(config.get::<String>("level").unwrap(), "debug");
}

#[test]
fn test_config_serialization() {
    let config = Config::new().with("cars", 3u16).with("city", "Dnipro");
    let serialized = serde_json::to_string(&config).unwrap();
    let deserialized: Config = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized.get::<u16>("cars").unwrap(), 3);
    assert_eq!(deserialized.get::<String>("city").unwrap(), "Dnipro");
}

#[test]
fn test_config_section_macro() {
    assert_eq!(DispatchConfig::key(), "dispatch");

    let config = Config::parse(r#"{ "dispatch": { "zone": "center", "radius": 5 } }"#).unwrap();
    let dispatch: DispatchConfig = config.section().unwrap();
    assert_eq!(
        dispatch,
        DispatchConfig {
            zone: "center".to_string(),
            radius: 5,
        }
    );
}

#[test]
fn test_injector_section_defaults() {
    let config = Config::parse(r#"{ "injector": {} }"#).unwrap();
    let injector: InjectorConfig = config.section().unwrap();
    assert_eq!(injector.max_depth, weave::DEFAULT_MAX_DEPTH);
    assert!(injector.roots.is_empty());
}

#[test]
fn test_tracing_section() {
    let config =
        Config::parse(r#"{ "tracing": { "level": "warn", "directives": ["weave=trace"] } }"#)
            .unwrap();
    let tracing: TracingConfig = config.section().unwrap();
    assert_eq!(tracing.level, ::tracing::Level::WARN);
    assert_eq!(tracing.parse_directives().unwrap().len(), 1);

    let config = Config::parse(r#"{ "tracing": { "level": "loud" } }"#).unwrap();
    assert!(config.section::<TracingConfig>().is_err());

    let config = Config::parse(r#"{ "tracing": {} }"#).unwrap();
    let tracing: TracingConfig = config.section().unwrap();
    assert_eq!(tracing.level, ::tracing::Level::INFO);
}
