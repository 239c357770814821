use std::cmp::max;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy)]
pub enum RvmFileMode {
    RandomWrites,
    AppendOnly,
    ReadOnly,
}

pub struct RvmFile {
    file: File,
    path: PathBuf,

    size_bytes: usize,
    mode: RvmFileMode,
}

impl RvmFile {
    pub fn create(path: &Path, data: &[u8], mode: RvmFileMode) -> Result<RvmFile, std::io::Error> {
        let file: File = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .read(true)
            .open(path)?;

        let mut file = RvmFile {
            path: path.to_path_buf(),
            size_bytes: 0,
            file,
            mode,
        };
        file.write(data)?;
        Ok(file)
    }

    //AppendOnly creates the file if absent, the other modes require it to exist
    pub fn open(path: &Path, mode: RvmFileMode) -> Result<RvmFile, std::io::Error> {
        let is_append_only = matches!(mode, RvmFileMode::AppendOnly);
        let is_read_only = matches!(mode, RvmFileMode::ReadOnly);
        let file: File = OpenOptions::new()
            .create(is_append_only)
            .append(is_append_only)
            .write(!is_read_only)
            .read(true)
            .open(path)?;
        let metadata = file.metadata()?;

        Ok(RvmFile {
            size_bytes: metadata.len() as usize,
            path: path.to_path_buf(),
            file,
            mode,
        })
    }

    pub fn read_all(&mut self) -> Result<Vec<u8>, std::io::Error> {
        let mut buff: Vec<u8> = Vec::with_capacity(self.size_bytes);
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_end(&mut buff)?;
        Ok(buff)
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<(), std::io::Error> {
        match self.mode {
            RvmFileMode::AppendOnly => self.size_bytes = self.size_bytes + bytes.len(),
            _ => self.size_bytes = max(self.size_bytes, bytes.len()),
        };

        self.file.write_all(bytes)
    }

    //Seeks from the file start, never from the current position
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<(), std::io::Error> {
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.file.write_all(bytes)?;
        self.size_bytes = max(self.size_bytes, offset + bytes.len());
        Ok(())
    }

    pub fn fsync(&self) -> Result<(), std::io::Error> {
        self.file.sync_all()
    }

    pub fn delete(&self) -> Result<(), std::io::Error> {
        std::fs::remove_file(self.path.as_path())
    }

    pub fn size(&self) -> usize {
        self.size_bytes
    }
}
