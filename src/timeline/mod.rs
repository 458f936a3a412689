mod navigator;
mod snapshot;

pub use navigator::{Mode, Selection, TimelineNavigator};
pub use snapshot::{derive, snapshot_id, ToolCallSnapshot};
