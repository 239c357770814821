mod logger;
mod rvm_file;
mod rvm_files;
mod segments;
mod wal;

pub mod rvm;
pub mod rvm_error;
pub mod rvm_options;
pub mod transactions;

pub use rvm::*;
pub use rvm_error::RvmError;
pub use rvm_options::*;
pub use segments::segment::SegmentId;
pub use transactions::transaction::TransId;
