pub mod engine;
pub mod history;

pub use engine::{DebugFlags, DisplayMode, PanelCmdData, PanelHandle, PanelSnapshot};
pub use history::History;
