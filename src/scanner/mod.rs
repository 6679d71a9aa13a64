//! Out-of-band data supply for the layout engine: folder listing, EXIF
//! orientation and native-size measurement on a worker pool.

pub mod file_scanner;
pub mod metadata;
pub mod queue;

pub use file_scanner::{FileScanner, ScanConfig};
pub use metadata::{find_largest_jpeg, MetadataExtractor};
pub use queue::{MeasureQueue, MeasureRequest, DEFAULT_WORKERS};
