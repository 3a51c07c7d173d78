pub mod app;
pub mod bridge;
pub mod cli;
pub mod constants;
pub mod error;
pub mod payload;
pub mod renderer;
pub mod viewer;
pub mod widget;

pub use bridge::{HostBridge, HostMessage, JsonLinesBridge, RecordingBridge};
pub use error::{Result, ViewerError};
pub use payload::{DocumentPayload, PageNumber, ViewerArgs};
pub use renderer::{DocumentRenderer, PdfiumRenderer};
pub use viewer::{LoadStatus, Offset, PageView, ViewerState};
pub use widget::DocumentPageViewer;
