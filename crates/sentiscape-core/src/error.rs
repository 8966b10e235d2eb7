use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface dimensions must be non-zero (got {width}x{height})")]
    ZeroSized { width: u32, height: u32 },
    #[error("surface {width}x{height} exceeds the {max}px limit")]
    TooLarge { width: u32, height: u32, max: u32 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("terrain_resolution must be at least 3 (got {0})")]
    TerrainResolution(usize),
    #[error("terrain_spacing must be positive and finite (got {0})")]
    TerrainSpacing(f32),
    #[error("max_particles must be at least 1")]
    NoParticles,
    #[error("history_capacity must be at least 2 (got {0})")]
    HistoryCapacity(usize),
    #[error("{name} must be positive and finite (got {value})")]
    NotPositive { name: &'static str, value: f32 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigError),
}
