use crate::logger::{logger, Logger};
use crate::rvm_error::RvmError;
use crate::rvm_file::{RvmFile, RvmFileMode};
use crate::rvm_files;
use crate::rvm_options::{DurabilityLevel, RvmOptions};
use crate::segments::segment::SegmentId;
use crate::segments::segment_table::SegmentTable;
use crate::transactions::transaction::{TransId, Transaction};
use crate::transactions::transaction_manager::TransactionManager;
use crate::wal::log_record::{serialize_log_header, LogRecord};
use crate::wal::recovery;
use std::path::PathBuf;
use std::sync::Arc;

//One recoverable virtual memory over one backing directory. All state is
//owned by the handle, two handles over two directories are independent
pub struct Rvm {
    options: Arc<RvmOptions>,
    directory: PathBuf,
    segment_table: SegmentTable,
    transaction_manager: TransactionManager,
}

pub fn init(directory: &str) -> Result<Rvm, RvmError> {
    init_with_options(directory, Arc::new(RvmOptions::default()))
}

pub fn init_with_options(directory: &str, options: Arc<RvmOptions>) -> Result<Rvm, RvmError> {
    Logger::init(options.clone());

    let directory_path = PathBuf::from(directory);
    if let Err(e) = rvm_files::ensure_directory(directory_path.as_path()) {
        logger().error(&format!("Unable to create backing directory {}. IO Error: {}", directory, e));
        return Err(RvmError::CannotCreateBackingDirectory(String::from(directory), e));
    }

    recovery::recover_log(&options, directory_path.as_path())?;

    logger().info(&format!("Recoverable memory initialized over backing directory {}", directory));

    Ok(Rvm {
        transaction_manager: TransactionManager::create(),
        segment_table: SegmentTable::create(),
        directory: directory_path,
        options,
    })
}

impl Rvm {
    //Maps the segment into memory and returns its id. A segment already in
    //the table only grows to size_to_create. A new segment is loaded from its
    //segment file after pending log records have been folded into it, the
    //larger of size_to_create and the file length wins
    pub fn map(&mut self, segment_name: &str, size_to_create: usize) -> Result<SegmentId, RvmError> {
        if !rvm_files::is_valid_segment_name(segment_name) {
            logger().debug(&format!("map: invalid segment name {:?}", segment_name));
            return Err(RvmError::InvalidSegmentName(String::from(segment_name)));
        }

        if let Some(segment) = self.segment_table.by_name_mut(segment_name) {
            if segment.size() < size_to_create {
                segment.grow(size_to_create);
            }
            return Ok(segment.segment_id);
        }

        let segment_id = self.segment_table.insert(segment_name, size_to_create);

        //Pending log records must be folded into the segment files before we read them back
        self.truncate_log()?;

        let segment_file_path = rvm_files::segment_file_path(self.directory.as_path(), segment_name);

        if segment_file_path.exists() {
            let mut segment_file = RvmFile::open(segment_file_path.as_path(), RvmFileMode::ReadOnly)
                .map_err(|e| RvmError::CannotReadSegmentFile(String::from(segment_name), e))?;
            let contents = segment_file.read_all()
                .map_err(|e| RvmError::CannotReadSegmentFile(String::from(segment_name), e))?;

            logger().debug(&format!("map: found segment file for {}, reading {} bytes", segment_name, contents.len()));

            if let Some(segment) = self.segment_table.by_id_mut(segment_id) {
                segment.grow(contents.len());
                segment.data[..contents.len()].copy_from_slice(&contents);
            }
        } else if let Some(segment) = self.segment_table.by_id(segment_id) {
            logger().debug(&format!("map: no segment file for {}, creating it", segment_name));

            let segment_file = RvmFile::create(segment_file_path.as_path(), &segment.data, RvmFileMode::RandomWrites)
                .map_err(|e| RvmError::CannotWriteSegmentFile(String::from(segment_name), e))?;
            if matches!(self.options.durability_level, DurabilityLevel::Strong) {
                segment_file.fsync()
                    .map_err(|e| RvmError::CannotWriteSegmentFile(String::from(segment_name), e))?;
            }
        }

        Ok(segment_id)
    }

    //Forgets the in-memory image. The segment file is untouched
    pub fn unmap(&mut self, segment_id: SegmentId) -> Result<(), RvmError> {
        match self.segment_table.by_id(segment_id) {
            Some(segment) if segment.locked => {
                return Err(RvmError::SegmentLocked(segment.name.clone()));
            },
            Some(_) => {},
            None => {
                logger().debug(&format!("unmap: segment {} is not mapped", segment_id));
                return Err(RvmError::SegmentNotMapped(segment_id));
            }
        }

        self.segment_table.remove_by_id(segment_id);
        Ok(())
    }

    //Removes the segment from memory if mapped and unlinks its segment file.
    //An absent file is not an error
    pub fn destroy(&mut self, segment_name: &str) -> Result<(), RvmError> {
        if !rvm_files::is_valid_segment_name(segment_name) {
            return Err(RvmError::InvalidSegmentName(String::from(segment_name)));
        }

        if let Some(segment) = self.segment_table.by_name(segment_name) {
            if segment.locked {
                return Err(RvmError::SegmentLocked(String::from(segment_name)));
            }
        }
        self.segment_table.remove_by_name(segment_name);

        let segment_file_path = rvm_files::segment_file_path(self.directory.as_path(), segment_name);
        let removed = rvm_files::remove_file_if_exists(segment_file_path.as_path())
            .map_err(|e| RvmError::CannotRemoveSegmentFile(String::from(segment_name), e))?;

        if !removed {
            logger().debug(&format!("destroy: no segment file for {}", segment_name));
        }

        Ok(())
    }

    //Locks every segment and registers a new transaction over them. No
    //segment is locked unless all of them can be
    pub fn begin_trans(&mut self, segment_ids: &[SegmentId]) -> Result<TransId, RvmError> {
        for segment_id in segment_ids {
            let segment = match self.segment_table.by_id(*segment_id) {
                Some(segment) => segment,
                None => {
                    logger().debug(&format!("begin_trans: segment {} is not mapped", segment_id));
                    return Err(RvmError::SegmentNotMapped(*segment_id));
                }
            };
            if segment.locked {
                logger().debug(&format!("begin_trans: segment {} is already locked", segment.name));
                return Err(RvmError::SegmentLocked(segment.name.clone()));
            }
        }

        for segment_id in segment_ids {
            self.segment_table.set_locked(*segment_id, true);
        }

        Ok(self.transaction_manager.begin(segment_ids.to_vec()))
    }

    //Captures the pre-image of [offset, offset + size) so an abort can restore it
    pub fn about_to_modify(
        &mut self,
        trans_id: TransId,
        segment_id: SegmentId,
        offset: usize,
        size: usize
    ) -> Result<(), RvmError> {
        let transaction = match self.transaction_manager.get_mut(trans_id) {
            Some(transaction) => transaction,
            None => {
                logger().debug(&format!("about_to_modify: transaction {} does not exist", trans_id));
                return Err(RvmError::TransactionNotFound(trans_id));
            }
        };
        if !transaction.holds_segment(segment_id) {
            logger().debug(&format!("about_to_modify: segment {} is not part of transaction {}", segment_id, trans_id));
            return Err(RvmError::SegmentNotInTransaction(trans_id, segment_id));
        }

        let segment = match self.segment_table.by_id(segment_id) {
            Some(segment) => segment,
            None => return Err(RvmError::SegmentNotMapped(segment_id)),
        };
        if offset + size > segment.size() {
            return Err(RvmError::RangeOutOfBounds(segment.name.clone(), offset, size, segment.size()));
        }

        transaction.add_undo_record(&segment.name, offset, segment.data[offset..offset + size].to_vec());
        Ok(())
    }

    //Appends the post-image of every captured range to the log, in capture
    //order, then unlocks the transaction's segments and releases its id.
    //Commit is not atomic across records, a crash mid commit leaves a
    //truncated tail that the next recovery drops
    pub fn commit_trans(&mut self, trans_id: TransId) -> Result<(), RvmError> {
        let transaction = match self.transaction_manager.take(trans_id) {
            Some(transaction) => transaction,
            None => {
                logger().debug(&format!("commit_trans: transaction {} does not exist", trans_id));
                return Err(RvmError::TransactionNotFound(trans_id));
            }
        };

        if !transaction.undo_records.is_empty() {
            self.append_committed_ranges(&transaction)?;
        }

        for segment_id in &transaction.segment_ids {
            self.segment_table.set_locked(*segment_id, false);
        }
        self.transaction_manager.release_trans_id(trans_id);

        Ok(())
    }

    //Restores the captured pre-images in reverse capture order, so the
    //earliest capture wins per byte. Nothing is written to the log
    pub fn abort_trans(&mut self, trans_id: TransId) -> Result<(), RvmError> {
        let transaction = match self.transaction_manager.take(trans_id) {
            Some(transaction) => transaction,
            None => {
                logger().debug(&format!("abort_trans: transaction {} does not exist", trans_id));
                return Err(RvmError::TransactionNotFound(trans_id));
            }
        };

        for undo_record in transaction.undo_records.iter().rev() {
            match self.segment_table.by_name_mut(&undo_record.segment_name) {
                Some(segment) => {
                    let end = undo_record.offset + undo_record.data.len();
                    segment.data[undo_record.offset..end].copy_from_slice(&undo_record.data);
                },
                None => {
                    logger().debug(&format!("abort_trans: segment {} no longer exists", undo_record.segment_name));
                }
            }
        }

        for segment_id in &transaction.segment_ids {
            self.segment_table.set_locked(*segment_id, false);
        }
        self.transaction_manager.release_trans_id(trans_id);

        Ok(())
    }

    //Replays the log into the segment files and removes it
    pub fn truncate_log(&mut self) -> Result<(), RvmError> {
        recovery::recover_log(&self.options, self.directory.as_path())
    }

    pub fn segment_data(&self, segment_id: SegmentId) -> Result<&[u8], RvmError> {
        match self.segment_table.by_id(segment_id) {
            Some(segment) => Ok(&segment.data),
            None => Err(RvmError::SegmentNotMapped(segment_id)),
        }
    }

    pub fn segment_data_mut(&mut self, segment_id: SegmentId) -> Result<&mut [u8], RvmError> {
        match self.segment_table.by_id_mut(segment_id) {
            Some(segment) => Ok(&mut segment.data),
            None => Err(RvmError::SegmentNotMapped(segment_id)),
        }
    }

    fn append_committed_ranges(&self, transaction: &Transaction) -> Result<(), RvmError> {
        let log_path = rvm_files::log_file_path(self.directory.as_path());
        let mut log_file = RvmFile::open(log_path.as_path(), RvmFileMode::AppendOnly)
            .map_err(|e| RvmError::CannotWriteLogRecord(e))?;

        if log_file.size() == 0 {
            log_file.write(&serialize_log_header())
                .map_err(|e| RvmError::CannotWriteLogRecord(e))?;
        }

        for undo_record in &transaction.undo_records {
            //The post-image is re-read from the segment at commit time
            let segment = match self.segment_table.by_name(&undo_record.segment_name) {
                Some(segment) => segment,
                None => {
                    logger().debug(&format!("commit_trans: segment {} no longer exists", undo_record.segment_name));
                    continue;
                }
            };
            let end = undo_record.offset + undo_record.data.len();
            let record = LogRecord {
                segment_name: undo_record.segment_name.clone(),
                offset: undo_record.offset,
                data: segment.data[undo_record.offset..end].to_vec(),
            };
            log_file.write(&record.serialize())
                .map_err(|e| RvmError::CannotWriteLogRecord(e))?;
        }

        if matches!(self.options.durability_level, DurabilityLevel::Strong) {
            log_file.fsync()
                .map_err(|e| RvmError::CannotWriteLogRecord(e))?;
        }

        Ok(())
    }
}
