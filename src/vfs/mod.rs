//! The virtual file server.
//!
//! One open/read/seek/close contract over two backing families: service
//! descriptor documents materialized into memory at open time, and real
//! media files resolved through the catalog by the numeric id embedded in
//! the virtual path.

pub mod descriptors;

use crate::catalog::Catalog;
use dircast_common::{Error, Result};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Virtual path of the ContentDirectory service description.
pub const CDS_LOCATION: &str = "/web/cds.xml";
/// Virtual path of the ConnectionManager service description.
pub const CMS_LOCATION: &str = "/web/cms.xml";

const SERVICE_CONTENT_TYPE: &str = "text/xml";

/// Metadata for one virtual path.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub length: i64,
    pub mtime: SystemTime,
    pub is_directory: bool,
    pub is_readable: bool,
    /// Empty for disk media: the transport layer infers it from the
    /// extension. Generated documents report their own type.
    pub content_type: String,
}

/// Requested open mode. Only reads are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
}

enum Backing {
    Memory { contents: Vec<u8> },
    Disk { file: std::fs::File, path: PathBuf },
}

/// An open virtual file handle.
pub struct WebFile {
    /// The virtual path the handle was opened with.
    virtual_path: String,
    pos: u64,
    backing: Option<Backing>,
}

/// Describe a virtual path without opening it.
pub fn stat(catalog: Option<&Catalog>, path: &str) -> Result<FileInfo> {
    debug!("stat, filename: {}", path);

    if path == CDS_LOCATION {
        return Ok(memory_info(descriptors::content_directory_scpd().len()));
    }
    if path == CMS_LOCATION {
        return Ok(memory_info(descriptors::connection_manager_scpd().len()));
    }

    let disk_path = resolve_media(catalog, path)?;
    let meta = std::fs::metadata(&disk_path)?;

    Ok(FileInfo {
        length: meta.len() as i64,
        mtime: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        is_directory: meta.is_dir(),
        is_readable: is_readable(&disk_path),
        content_type: String::new(),
    })
}

/// Open a virtual path for reading.
///
/// Generated documents are rendered into a fresh buffer on every open;
/// disk media is opened read-only (and non-blocking on unix).
pub fn open(catalog: Option<&Catalog>, path: &str, mode: OpenMode) -> Result<WebFile> {
    debug!("open, filename: {}", path);

    if mode != OpenMode::Read {
        return Err(Error::invalid_argument("virtual files are read-only"));
    }

    if path == CDS_LOCATION {
        return Ok(WebFile::memory(path, descriptors::content_directory_scpd()));
    }
    if path == CMS_LOCATION {
        return Ok(WebFile::memory(path, descriptors::connection_manager_scpd()));
    }

    let disk_path = resolve_media(catalog, path)?;
    debug!("Fullpath: {:?}", disk_path);

    let mut opts = std::fs::OpenOptions::new();
    opts.read(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.custom_flags(nix::fcntl::OFlag::O_NONBLOCK.bits());
    }
    let file = opts.open(&disk_path)?;

    Ok(WebFile {
        virtual_path: path.to_string(),
        pos: 0,
        backing: Some(Backing::Disk {
            file,
            path: disk_path,
        }),
    })
}

impl WebFile {
    fn memory(virtual_path: &str, contents: String) -> Self {
        Self {
            virtual_path: virtual_path.to_string(),
            pos: 0,
            backing: Some(Backing::Memory {
                contents: contents.into_bytes(),
            }),
        }
    }

    /// The virtual path this handle was opened with.
    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    /// Read up to `buf.len()` bytes at the current position.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let backing = self.backing.as_mut().ok_or(Error::Closed)?;

        let n = match backing {
            Backing::Memory { contents } => {
                let remaining = contents.len().saturating_sub(self.pos as usize);
                let n = buf.len().min(remaining);
                buf[..n].copy_from_slice(&contents[self.pos as usize..self.pos as usize + n]);
                n
            }
            Backing::Disk { file, .. } => file.read(buf)?,
        };

        self.pos += n as u64;
        Ok(n)
    }

    /// Reposition the handle; returns the new absolute position.
    ///
    /// End-relative seeks on disk files re-stat the file first and then
    /// seek to the absolute result: the file may have grown or shrunk
    /// since the handle was opened, so the length captured at open time
    /// must never be trusted.
    pub fn seek(&mut self, from: SeekFrom) -> Result<u64> {
        let backing = self.backing.as_mut().ok_or(Error::Closed)?;

        let new_pos: i64 = match from {
            SeekFrom::Start(offset) => i64::try_from(offset)
                .map_err(|_| Error::invalid_argument("seek offset out of range"))?,
            SeekFrom::Current(offset) => (self.pos as i64)
                .checked_add(offset)
                .ok_or_else(|| Error::invalid_argument("seek offset out of range"))?,
            SeekFrom::End(offset) => {
                let len = match backing {
                    Backing::Memory { contents } => contents.len() as i64,
                    Backing::Disk { path, .. } => std::fs::metadata(path)?.len() as i64,
                };
                len.checked_add(offset)
                    .ok_or_else(|| Error::invalid_argument("seek offset out of range"))?
            }
        };

        if new_pos < 0 {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "seek before start of file",
            )));
        }

        match backing {
            Backing::Memory { contents } => {
                if new_pos as usize > contents.len() {
                    return Err(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "seek beyond end of buffer",
                    )));
                }
            }
            Backing::Disk { file, .. } => {
                file.seek(SeekFrom::Start(new_pos as u64))?;
            }
        }

        self.pos = new_pos as u64;
        Ok(self.pos)
    }

    /// Release the handle. Closing twice is an error, not a fault.
    pub fn close(&mut self) -> Result<()> {
        match self.backing.take() {
            Some(_) => Ok(()),
            None => Err(Error::Closed),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.backing.is_none()
    }
}

impl Read for WebFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        WebFile::read(self, buf).map_err(into_io_error)
    }
}

impl Seek for WebFile {
    fn seek(&mut self, from: SeekFrom) -> std::io::Result<u64> {
        WebFile::seek(self, from).map_err(into_io_error)
    }
}

fn into_io_error(err: Error) -> std::io::Error {
    match err {
        Error::Io(e) => e,
        other => std::io::Error::other(other.to_string()),
    }
}

fn memory_info(length: usize) -> FileInfo {
    FileInfo {
        length: length as i64,
        mtime: SystemTime::UNIX_EPOCH,
        is_directory: false,
        is_readable: true,
        content_type: SERVICE_CONTENT_TYPE.to_string(),
    }
}

/// Resolve a `/web/<id>` path to the entry's disk path.
fn resolve_media(catalog: Option<&Catalog>, path: &str) -> Result<PathBuf> {
    let id = path
        .rsplit_once('/')
        .and_then(|(_, tail)| tail.parse::<u32>().ok())
        .ok_or_else(|| Error::invalid_argument(format!("not a virtual file path: {path:?}")))?;

    let catalog = catalog.ok_or(Error::NoSuchObject(id))?;
    let entry = catalog.get(id).ok_or(Error::NoSuchObject(id))?;
    entry
        .path
        .clone()
        .ok_or_else(|| Error::no_such_object(id))
}

#[cfg(unix)]
fn is_readable(path: &Path) -> bool {
    nix::unistd::access(path, nix::unistd::AccessFlags::R_OK).is_ok()
}

#[cfg(not(unix))]
fn is_readable(_path: &Path) -> bool {
    true
}
