pub mod config;
pub mod engine;
pub mod error;
pub mod input;

pub use config::{AppConfig, KeymapConfig, ScrollConfig, UiConfig};
pub use engine::{ScrollEngine, ScrollRequest, StepPolicy, Surface, SurfaceHost, SurfaceId};
pub use error::{Error, Result};
