// Domain models (wire format shared with the dashboard)

mod storage;
mod system;

pub use storage::DiskSummary;
pub use system::{LOAD_AVERAGE_UNSUPPORTED, SystemSnapshot};
