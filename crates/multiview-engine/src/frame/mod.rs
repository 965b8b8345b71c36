//! Frame production: the coordinator, its snapshots, and the backend seam
//! they render through.

mod backend;
mod coordinator;
mod recorder;
mod snapshot;

pub use backend::{DrawCall, FrameStats, RenderBackend, ViewportBinding};
pub use coordinator::RenderCoordinator;
pub use recorder::{Recorded, RecordedDraw, RecordingBackend};
pub use snapshot::{DrawItem, FrameSnapshot, ViewSnapshot};
