use crate::segments::segment::SegmentId;
use crate::transactions::transaction::TransId;
use std::fmt::{Debug, Formatter};

pub enum RvmError {
    //Precondition errors
    InvalidSegmentName(String),
    SegmentNotMapped(SegmentId),
    SegmentLocked(String),
    TransactionNotFound(TransId),
    SegmentNotInTransaction(TransId, SegmentId),
    RangeOutOfBounds(String, usize, usize, usize), //Segment name, offset, size, segment size

    //Filesystem errors
    CannotCreateBackingDirectory(String, std::io::Error),
    CannotReadSegmentFile(String, std::io::Error),
    CannotWriteSegmentFile(String, std::io::Error),
    CannotPatchSegmentFile(String, std::io::Error),
    CannotRemoveSegmentFile(String, std::io::Error),
    CannotWriteLogRecord(std::io::Error),
    CannotReadLogRecords(std::io::Error),
    CannotRemoveLogFile(std::io::Error),
}

impl Debug for RvmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RvmError::InvalidSegmentName(segment_name) => {
                write!(f, "Invalid segment name: {:?}. Names cannot be empty or contain path separators", segment_name)
            },
            RvmError::SegmentNotMapped(segment_id) => {
                write!(f, "Segment with ID {} is not mapped", segment_id)
            },
            RvmError::SegmentLocked(segment_name) => {
                write!(f, "Segment {} is locked by a live transaction", segment_name)
            },
            RvmError::TransactionNotFound(trans_id) => {
                write!(f, "Transaction with ID {} does not exist", trans_id)
            },
            RvmError::SegmentNotInTransaction(trans_id, segment_id) => {
                write!(f, "Segment with ID {} is not part of transaction {}", segment_id, trans_id)
            },
            RvmError::RangeOutOfBounds(segment_name, offset, size, segment_size) => {
                write!(f, "Range [{}, {}) is out of bounds for segment {} of size {}",
                       offset, offset + size, segment_name, segment_size)
            },
            RvmError::CannotCreateBackingDirectory(directory, io_error) => {
                write!(f, "Cannot create backing directory {}. IO Error: {}", directory, io_error)
            },
            RvmError::CannotReadSegmentFile(segment_name, io_error) => {
                write!(f, "Cannot read segment file for segment {}. IO Error: {}", segment_name, io_error)
            },
            RvmError::CannotWriteSegmentFile(segment_name, io_error) => {
                write!(f, "Cannot write segment file for segment {}. IO Error: {}", segment_name, io_error)
            },
            RvmError::CannotPatchSegmentFile(segment_name, io_error) => {
                write!(f, "Cannot patch segment file for segment {}. IO Error: {}", segment_name, io_error)
            },
            RvmError::CannotRemoveSegmentFile(segment_name, io_error) => {
                write!(f, "Cannot remove segment file for segment {}. IO Error: {}", segment_name, io_error)
            },
            RvmError::CannotWriteLogRecord(io_error) => {
                write!(f, "Cannot write log record. IO Error: {}", io_error)
            },
            RvmError::CannotReadLogRecords(io_error) => {
                write!(f, "Cannot read log records. IO Error: {}", io_error)
            },
            RvmError::CannotRemoveLogFile(io_error) => {
                write!(f, "Cannot remove log file. IO Error: {}", io_error)
            },
        }
    }
}
