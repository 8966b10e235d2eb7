// Host-side tests for the JSON options accepted by the web host.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod options {
    include!("../src/options.rs");
}

use options::*;
use sentiscape_core::{EngineConfig, SentimentClass};

#[test]
fn missing_or_blank_config_uses_defaults() {
    assert_eq!(parse_config(None).unwrap(), EngineConfig::default());
    assert_eq!(parse_config(Some("  ")).unwrap(), EngineConfig::default());
}

#[test]
fn partial_config_overrides_only_given_fields() {
    let cfg = parse_config(Some(r#"{"max_particles": 150, "regen_threshold": 0.35}"#)).unwrap();
    assert_eq!(cfg.max_particles, 150);
    assert!((cfg.regen_threshold - 0.35).abs() < 1e-6);
    assert_eq!(cfg.fov, EngineConfig::default().fov);
}

#[test]
fn invalid_config_is_an_error() {
    assert!(parse_config(Some("{not json")).is_err());
    let err = parse_config(Some(r#"{"terrain_resolution": 1}"#)).unwrap_err();
    assert!(format!("{err:#}").contains("terrain_resolution"));
}

#[test]
fn updates_accept_class_name_variants() {
    for name in ["positive", "Positive", "POSITIVE"] {
        let json = format!(r#"{{"sentimentClass":"{name}"}}"#);
        let update = parse_update(&json).unwrap();
        assert_eq!(update.sentiment_class, Some(SentimentClass::Positive));
    }
    assert!(parse_update(r#"{"sentimentClass":"ecstatic"}"#).is_err());
}

#[test]
fn initial_params_clamp_scores() {
    let params = initial_params(Some(r#"{"sentimentClass":"negative","sentimentScore":-3.0}"#)).unwrap();
    assert_eq!(params.sentiment_class, SentimentClass::Negative);
    assert_eq!(params.sentiment_score, -1.0);
    assert!(params.motion_enabled);

    let params = initial_params(None).unwrap();
    assert_eq!(params.sentiment_class, SentimentClass::Neutral);
}
