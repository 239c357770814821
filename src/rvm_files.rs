use std::fs;
use std::fs::DirBuilder;
use std::io::ErrorKind;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "log_file";
pub const SEGMENT_FILE_PREFIX: &str = "seg-";

pub fn log_file_path(directory: &Path) -> PathBuf {
    let mut path = directory.to_path_buf();
    path.push(LOG_FILE_NAME);
    path
}

pub fn segment_file_path(directory: &Path, segment_name: &str) -> PathBuf {
    let mut path = directory.to_path_buf();
    path.push(format!("{}{}", SEGMENT_FILE_PREFIX, segment_name));
    path
}

//Create the backing directory with owner-rwx if absent, then make sure it is usable
pub fn ensure_directory(directory: &Path) -> Result<(), std::io::Error> {
    if !directory.is_dir() {
        DirBuilder::new()
            .mode(0o700)
            .create(directory)?;
    }

    fs::read_dir(directory)?;
    Ok(())
}

pub fn remove_file_if_exists(path: &Path) -> Result<bool, std::io::Error> {
    match fs::remove_file(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn is_valid_segment_name(segment_name: &str) -> bool {
    !segment_name.is_empty() && !segment_name.contains(std::path::is_separator)
}

#[cfg(test)]
mod test {
    use crate::rvm_files::{is_valid_segment_name, log_file_path, segment_file_path};
    use std::path::Path;

    #[test]
    fn paths() {
        let directory = Path::new("backing");
        assert_eq!(log_file_path(directory), Path::new("backing/log_file"));
        assert_eq!(segment_file_path(directory, "accounts"), Path::new("backing/seg-accounts"));
    }

    #[test]
    fn segment_names() {
        assert!(is_valid_segment_name("testseg"));
        assert!(is_valid_segment_name("seg.0"));
        assert!(!is_valid_segment_name(""));
        assert!(!is_valid_segment_name("a/b"));
    }
}
