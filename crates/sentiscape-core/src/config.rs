use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Runtime knobs. Every field is optional in JSON; missing ones take the
/// defaults from `constants`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub terrain_resolution: usize,
    pub terrain_spacing: f32,
    pub max_particles: usize,
    pub spawn_rate: f32,
    /// Score delta beyond which terrain and particles are rebuilt.
    pub regen_threshold: f32,
    pub history_capacity: usize,
    pub fov: f32,
    pub frame_budget_ms: f32,
    /// Fixed seed for reproducible scenes; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            terrain_resolution: TERRAIN_RESOLUTION,
            terrain_spacing: TERRAIN_SPACING,
            max_particles: MAX_PARTICLES,
            spawn_rate: SPAWN_RATE_PER_SEC,
            regen_threshold: REGEN_SCORE_THRESHOLD,
            history_capacity: HISTORY_CAPACITY,
            fov: CAMERA_FOV,
            frame_budget_ms: FRAME_BUDGET_MS,
            seed: None,
        }
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.terrain_resolution < 3 {
            return Err(ConfigError::TerrainResolution(self.terrain_resolution));
        }
        if !(self.terrain_spacing.is_finite() && self.terrain_spacing > 0.0) {
            return Err(ConfigError::TerrainSpacing(self.terrain_spacing));
        }
        if self.max_particles == 0 {
            return Err(ConfigError::NoParticles);
        }
        if self.history_capacity < 2 {
            return Err(ConfigError::HistoryCapacity(self.history_capacity));
        }
        if !(self.spawn_rate.is_finite() && self.spawn_rate >= 0.0) {
            return Err(ConfigError::NotPositive {
                name: "spawn_rate",
                value: self.spawn_rate,
            });
        }
        if !(self.regen_threshold.is_finite() && self.regen_threshold >= 0.0) {
            return Err(ConfigError::NotPositive {
                name: "regen_threshold",
                value: self.regen_threshold,
            });
        }
        positive("fov", self.fov)?;
        positive("frame_budget_ms", self.frame_budget_ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_values() {
        let cfg = EngineConfig {
            terrain_resolution: 2,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::TerrainResolution(2)));

        let cfg = EngineConfig {
            fov: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive { name: "fov", .. })
        ));
    }
}
