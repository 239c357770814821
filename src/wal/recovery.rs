use crate::logger::logger;
use crate::rvm_error::RvmError;
use crate::rvm_file::{RvmFile, RvmFileMode};
use crate::rvm_files;
use crate::rvm_options::{DurabilityLevel, RvmOptions};
use crate::wal::log_record::{check_log_header, LogRecord};
use bytes::Buf;
use std::path::Path;
use std::sync::Arc;

//Replay every complete record in the log file into its segment file, then
//unlink the log. Records hold post-images, so the replay is idempotent and a
//crash between replay and unlink is handled by running it again
pub fn recover_log(options: &Arc<RvmOptions>, directory: &Path) -> Result<(), RvmError> {
    let log_path = rvm_files::log_file_path(directory);
    if !log_path.exists() {
        logger().debug(&format!("No log file at {:?}, nothing to recover", log_path));
        return Ok(());
    }

    let mut log_file = RvmFile::open(log_path.as_path(), RvmFileMode::ReadOnly)
        .map_err(|e| RvmError::CannotReadLogRecords(e))?;
    let log_bytes = log_file.read_all()
        .map_err(|e| RvmError::CannotReadLogRecords(e))?;
    let mut current_ptr = log_bytes.as_slice();

    if check_log_header(&mut current_ptr) {
        while let Some(record) = LogRecord::deserialize(&mut current_ptr) {
            apply_log_record(options, directory, &record)?;
        }

        if current_ptr.has_remaining() {
            logger().debug(&format!("Dropping truncated log tail of {} bytes", current_ptr.remaining()));
        }
    } else {
        logger().debug("Log file has no valid header, nothing to replay");
    }

    if let Err(e) = log_file.delete() {
        logger().error(&format!("Unable to remove log file after replay. IO Error: {}", e));
        return Err(RvmError::CannotRemoveLogFile(e));
    }

    Ok(())
}

fn apply_log_record(
    options: &Arc<RvmOptions>,
    directory: &Path,
    record: &LogRecord
) -> Result<(), RvmError> {
    let segment_file_path = rvm_files::segment_file_path(directory, &record.segment_name);
    if !segment_file_path.exists() {
        logger().debug(&format!("No segment file for {}, skipping log record", record.segment_name));
        return Ok(());
    }

    let mut segment_file = RvmFile::open(segment_file_path.as_path(), RvmFileMode::RandomWrites)
        .map_err(|e| RvmError::CannotPatchSegmentFile(record.segment_name.clone(), e))?;
    segment_file.write_at(record.offset, &record.data)
        .map_err(|e| RvmError::CannotPatchSegmentFile(record.segment_name.clone(), e))?;

    if matches!(options.durability_level, DurabilityLevel::Strong) {
        segment_file.fsync()
            .map_err(|e| RvmError::CannotPatchSegmentFile(record.segment_name.clone(), e))?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::logger::Logger;
    use crate::rvm_files;
    use crate::rvm_options::{start_rvm_options_builder, DurabilityLevel, RvmOptions};
    use crate::wal::log_record::{serialize_log_header, LogRecord};
    use crate::wal::recovery::recover_log;
    use std::fs;
    use std::sync::Arc;

    #[test]
    fn replays_records_and_unlinks_the_log() {
        let options = Arc::new(RvmOptions::default());
        Logger::init(options.clone());
        let directory = tempfile::tempdir().unwrap();

        let segment_file_path = rvm_files::segment_file_path(directory.path(), "a");
        fs::write(segment_file_path.as_path(), vec![0; 8]).unwrap();

        let mut log_bytes = serialize_log_header();
        log_bytes.extend(LogRecord { segment_name: String::from("a"), offset: 2, data: vec![7, 7] }.serialize());
        log_bytes.extend(LogRecord { segment_name: String::from("a"), offset: 6, data: vec![9] }.serialize());
        //Record for a segment whose file does not exist gets skipped
        log_bytes.extend(LogRecord { segment_name: String::from("gone"), offset: 0, data: vec![1] }.serialize());
        let log_path = rvm_files::log_file_path(directory.path());
        fs::write(log_path.as_path(), &log_bytes).unwrap();

        recover_log(&options, directory.path()).unwrap();

        assert_eq!(fs::read(segment_file_path.as_path()).unwrap(), vec![0, 0, 7, 7, 0, 0, 9, 0]);
        assert!(!log_path.exists());
        assert!(!rvm_files::segment_file_path(directory.path(), "gone").exists());

        //Running recovery again with no log is a no op
        recover_log(&options, directory.path()).unwrap();
        assert_eq!(fs::read(segment_file_path.as_path()).unwrap(), vec![0, 0, 7, 7, 0, 0, 9, 0]);
    }

    #[test]
    fn truncated_tail_is_dropped() {
        //Replay under weak durability patches the files without fsyncing them
        let options = Arc::new(start_rvm_options_builder()
            .durability_level(DurabilityLevel::Weak)
            .build());
        Logger::init(options.clone());
        let directory = tempfile::tempdir().unwrap();

        let segment_file_path = rvm_files::segment_file_path(directory.path(), "a");
        fs::write(segment_file_path.as_path(), vec![0; 4]).unwrap();

        let mut log_bytes = serialize_log_header();
        log_bytes.extend(LogRecord { segment_name: String::from("a"), offset: 0, data: vec![5, 5] }.serialize());
        let mut tail = LogRecord { segment_name: String::from("a"), offset: 2, data: vec![6, 6] }.serialize();
        tail.truncate(tail.len() - 1);
        log_bytes.extend(tail);
        fs::write(rvm_files::log_file_path(directory.path()).as_path(), &log_bytes).unwrap();

        recover_log(&options, directory.path()).unwrap();

        assert_eq!(fs::read(segment_file_path.as_path()).unwrap(), vec![5, 5, 0, 0]);
        assert!(!rvm_files::log_file_path(directory.path()).exists());
    }

    #[test]
    fn log_without_valid_header_replays_nothing() {
        let options = Arc::new(RvmOptions::default());
        Logger::init(options.clone());
        let directory = tempfile::tempdir().unwrap();

        let segment_file_path = rvm_files::segment_file_path(directory.path(), "a");
        fs::write(segment_file_path.as_path(), vec![0; 4]).unwrap();

        let mut log_bytes = vec![b'X', b'X', b'X', b'X', 1, 0, 0, 0];
        log_bytes.extend(LogRecord { segment_name: String::from("a"), offset: 0, data: vec![5, 5] }.serialize());
        fs::write(rvm_files::log_file_path(directory.path()).as_path(), &log_bytes).unwrap();

        recover_log(&options, directory.path()).unwrap();

        assert_eq!(fs::read(segment_file_path.as_path()).unwrap(), vec![0, 0, 0, 0]);
        assert!(!rvm_files::log_file_path(directory.path()).exists());
    }
}
