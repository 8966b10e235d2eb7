use anyhow::Context;
use sentiscape_core::{EngineConfig, SceneParameters, SceneUpdate};

/// Engine config from the optional JSON handed to `SceneHost::new`.
/// Missing or blank input yields the defaults.
pub fn parse_config(json: Option<&str>) -> anyhow::Result<EngineConfig> {
    let config = match json.map(str::trim) {
        None | Some("") => EngineConfig::default(),
        Some(text) => serde_json::from_str(text).context("engine config is not valid JSON")?,
    };
    config.validate().context("engine config rejected")?;
    Ok(config)
}

/// Partial scene update, e.g. `{"sentimentClass":"positive","sentimentScore":0.7}`.
pub fn parse_update(json: &str) -> anyhow::Result<SceneUpdate> {
    serde_json::from_str(json).with_context(|| format!("bad scene update: {json}"))
}

/// Parameters the scene opens with, optionally seeded from a partial update.
pub fn initial_params(json: Option<&str>) -> anyhow::Result<SceneParameters> {
    match json.map(str::trim) {
        None | Some("") => Ok(SceneParameters::default()),
        Some(text) => Ok(parse_update(text)?.apply_to(&SceneParameters::default())),
    }
}
