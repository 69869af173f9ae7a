//! Byte storage backends for SEG-Y files

use crate::error::{Result, SegyError};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Read only
    Read,
    /// Read and write an existing file
    ReadWrite,
    /// Create or truncate, then read and write
    Create,
}

impl OpenMode {
    /// Parse a classic mode string (`"r"`, `"r+"`, `"w"`, ...)
    pub fn parse(mode: &str) -> Result<Self> {
        match mode {
            "r" | "rb" => Ok(OpenMode::Read),
            "r+" | "r+b" | "rb+" => Ok(OpenMode::ReadWrite),
            "w" | "w+" | "wb" | "w+b" | "wb+" => Ok(OpenMode::Create),
            _ => Err(SegyError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unsupported open mode '{}'", mode),
            ))),
        }
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, OpenMode::Read)
    }
}

/// Positioned byte access to a backing store
pub trait ByteStore: Send {
    /// Fill `buf` from `offset`; a short store is an error
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;

    /// Write all of `data` at `offset`
    fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()>;

    /// Push buffered writes to the underlying medium
    fn flush(&mut self) -> Result<()>;

    /// Current size in bytes
    fn size(&self) -> Result<u64>;

    /// Grow or shrink to `len` bytes; new bytes are zero
    fn set_len(&mut self, len: u64) -> Result<()>;

    fn is_writable(&self) -> bool;
}

/// File system store
#[derive(Debug)]
pub struct FileStore {
    file: File,
    path: PathBuf,
    writable: bool,
}

impl FileStore {
    /// Open `path` in the given mode
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.read(true);
        match mode {
            OpenMode::Read => {}
            OpenMode::ReadWrite => {
                options.write(true);
            }
            OpenMode::Create => {
                options.write(true).create(true).truncate(true);
            }
        }
        let file = options.open(&path).map_err(SegyError::Io)?;
        Ok(Self {
            file,
            path,
            writable: mode.is_writable(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteStore for FileStore {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if !self.writable {
            return Err(SegyError::read_only());
        }
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.writable {
            self.file.flush()?;
            self.file.sync_data()?;
        }
        Ok(())
    }

    fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn set_len(&mut self, len: u64) -> Result<()> {
        if !self.writable {
            return Err(SegyError::read_only());
        }
        self.file.set_len(len)?;
        Ok(())
    }

    fn is_writable(&self) -> bool {
        self.writable
    }
}

/// In-memory store, mostly for tests and scratch volumes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Vec<u8>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            read_only: false,
        }
    }

    /// Reject all writes from now on
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn span(&self, offset: u64, len: usize) -> Result<std::ops::Range<usize>> {
        let start = usize::try_from(offset)
            .map_err(|_| SegyError::OutOfRange(format!("offset {} exceeds address space", offset)))?;
        Ok(start..start + len)
    }
}

impl ByteStore for MemoryStore {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let span = self.span(offset, buf.len())?;
        match self.data.get(span) {
            Some(bytes) => {
                buf.copy_from_slice(bytes);
                Ok(())
            }
            None => Err(SegyError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("read of {} bytes at {} past end of store", buf.len(), offset),
            ))),
        }
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if self.read_only {
            return Err(SegyError::read_only());
        }
        let span = self.span(offset, data.len())?;
        if span.end > self.data.len() {
            self.data.resize(span.end, 0);
        }
        self.data[span].copy_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn size(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn set_len(&mut self, len: u64) -> Result<()> {
        if self.read_only {
            return Err(SegyError::read_only());
        }
        let len = usize::try_from(len)
            .map_err(|_| SegyError::OutOfRange(format!("length {} exceeds address space", len)))?;
        self.data.resize(len, 0);
        Ok(())
    }

    fn is_writable(&self) -> bool {
        !self.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.sgy");

        let mut store = FileStore::open(&path, OpenMode::Create).unwrap();
        store.set_len(16).unwrap();
        store.write_at(4, b"SEGY").unwrap();
        store.flush().unwrap();
        assert_eq!(store.size().unwrap(), 16);
        drop(store);

        let mut store = FileStore::open(&path, OpenMode::Read).unwrap();
        let mut buf = [0u8; 6];
        store.read_at(3, &mut buf).unwrap();
        assert_eq!(&buf, b"\0SEGY\0");
        assert!(!store.is_writable());

        let err = store.write_at(0, b"x").unwrap_err();
        assert!(matches!(err, SegyError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied));

        let mut long = [0u8; 32];
        assert!(store.read_at(0, &mut long).is_err());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = FileStore::open(temp_dir.path().join("absent.sgy"), OpenMode::Read).unwrap_err();
        assert!(matches!(err, SegyError::Io(_)));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store.write_at(2, &[1, 2]).unwrap();
        assert_eq!(store.as_bytes(), &[0, 0, 1, 2]);

        let mut buf = [0u8; 2];
        store.read_at(2, &mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        assert!(store.read_at(3, &mut buf).is_err());

        let mut frozen = store.read_only();
        assert!(frozen.write_at(0, &[9]).is_err());
        assert!(frozen.set_len(0).is_err());
    }

    #[test]
    fn test_open_mode_parse() {
        assert_eq!(OpenMode::parse("r").unwrap(), OpenMode::Read);
        assert_eq!(OpenMode::parse("rb").unwrap(), OpenMode::Read);
        assert_eq!(OpenMode::parse("r+").unwrap(), OpenMode::ReadWrite);
        assert_eq!(OpenMode::parse("w").unwrap(), OpenMode::Create);
        assert!(matches!(OpenMode::parse("a"), Err(SegyError::Io(_))));
    }
}
