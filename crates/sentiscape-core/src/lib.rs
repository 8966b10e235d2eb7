pub mod camera;
pub mod color;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod history;
pub mod lighting;
pub mod noise;
pub mod palette;
pub mod params;
pub mod particles;
pub mod surface;
pub mod terrain;

pub use camera::{Camera, Projection};
pub use color::{Rgb, Rgba8};
pub use compositor::{DrawItem, FrameStats, Shape};
pub use config::EngineConfig;
pub use engine::{Engine, FrameOutcome, SceneHandle, SceneMessage, SkipReason};
pub use error::{ConfigError, EngineError, SurfaceError};
pub use history::{EmotionHistory, EmotionSample};
pub use lighting::LightSource;
pub use palette::{Atmosphere, Palette};
pub use params::{SceneParameters, SceneUpdate, SentimentClass};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use surface::{Snapshot, Surface};
pub use terrain::{Terrain, TerrainPoint, TerrainProfile};
