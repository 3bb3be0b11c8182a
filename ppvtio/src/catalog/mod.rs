pub mod extract;
pub mod ids;
pub mod refresher;
pub mod snapshot;

pub use extract::{ExtractorKind, PlaylistExtractor};
pub use refresher::Refresher;
pub use snapshot::{Snapshot, SnapshotStore};
