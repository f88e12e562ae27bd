pub mod app;
pub mod event;
pub mod input;
pub mod keymap;
pub mod surface;
pub mod theme;
pub mod widgets;
pub mod workspace;

pub use app::App;
pub use surface::{CellMetrics, TextView};
pub use theme::GruvboxMaterial;
pub use workspace::Workspace;
