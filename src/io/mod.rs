mod reader;
mod scan;
mod source;

pub use reader::{Reader, ReaderOptions, Records};
pub use scan::{scan_bytes, scan_stream};
pub use source::Handle;
