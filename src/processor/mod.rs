//! Block processing
//!
//! - **Block** - decode a block's transactions in order and log the results
//! - **Checkpoint** - resume point for the scanner
//! - **Scan** - follow the chain through the block source
//! - **Status** - summarise the block logs

pub mod block;
pub mod checkpoint;
pub mod progress;
pub mod scan;
pub mod status;

pub use block::{BlockLog, BlockProcessor, FailureLogEntry, StampLogEntry};
pub use checkpoint::{resume_height, Checkpoint};
pub use progress::{format_elapsed_time, ScanProgress};
pub use scan::Scanner;
pub use status::{build_status_report, StatusReport};
