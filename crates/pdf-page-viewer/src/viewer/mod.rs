pub mod state;
pub mod view;

pub use state::{Effect, LoadStatus, Offset, ViewerEvent, ViewerState};
pub use view::PageView;
