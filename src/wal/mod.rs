pub mod log_record;
pub mod recovery;
