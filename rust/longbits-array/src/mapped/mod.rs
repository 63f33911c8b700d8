//! Word arrays persisted in memory-mapped files.
//!
//! A [`MappedLongArray`] maps its whole file (header included) read-write. The mapping
//! moves through an explicit state machine:
//!
//! ```text
//! Mapped(region) --resize--> Unmapped --set_len + map--> Mapped(region')
//! ```
//!
//! Every resize that changes the page-aligned file length drops the current mapping
//! before the file is resized and maps the file again before returning, so a stale
//! region is never read. Borrowed word slices cannot outlive a resize since `resize`
//! takes `&mut self`.
//!
//! Growing the file relies on the file system to zero-fill the extension. Shrinking
//! zeroes the dropped words that stay inside the retained last page, so a later
//! regrow reads zeroes as well.

pub mod bulk;
pub mod config;
pub mod format;

use std::{
    fs::{File, OpenOptions},
    io::Read,
    path::{Path, PathBuf},
};

use longbits_common::{Result, error::Error};
use memmap2::{MmapMut, MmapOptions};
use tempfile::TempPath;

use crate::long_array::{LongArray, LongArrayFactory, byte_len};

use config::{MappedArrayConfig, OpenMode};
use format::{FileHeader, HEADER_SIZE};

enum MapState {
    Unmapped,
    Mapped(MmapMut),
}

/// A word array stored in a memory-mapped file.
///
/// Zero-initialized: words added by `resize` read as zero.
pub struct MappedLongArray {
    path: PathBuf,
    /// `None` once closed.
    file: Option<File>,
    state: MapState,
    /// Number of words.
    count: u64,
    /// Current (page-aligned) length of the file in bytes.
    file_len: u64,
    delete_on_close: bool,
    flush_on_close: bool,
    /// Owner of a temporary file, removed when the array is dropped.
    temp: Option<TempPath>,
}

impl MappedLongArray {
    /// Opens or creates the file at `path` according to `config`.
    pub fn open(path: impl AsRef<Path>, config: &MappedArrayConfig) -> Result<MappedLongArray> {
        config.validate()?;
        let path = path.as_ref();
        let mut array = match config.mode {
            OpenMode::Load => Self::open_existing(path)?,
            OpenMode::Clear => Self::open_cleared(path, config.initial_size)?,
            OpenMode::LoadOrCreate if path.exists() => Self::open_existing(path)?,
            OpenMode::LoadOrCreate => Self::open_cleared(path, config.initial_size)?,
        };
        array.delete_on_close = config.delete_on_close;
        array.flush_on_close = config.flush_on_close;
        Ok(array)
    }

    /// Opens an existing file and validates its header.
    pub fn load(path: impl AsRef<Path>) -> Result<MappedLongArray> {
        Self::open(path, &MappedArrayConfig::load())
    }

    /// Creates (or truncates) the file at `path` with `size` zero words.
    pub fn create(path: impl AsRef<Path>, size: u64) -> Result<MappedLongArray> {
        Self::open(path, &MappedArrayConfig::clear(size))
    }

    /// Creates an array of `size` zero words in a temporary file inside `dir`.
    ///
    /// The file is removed when the array is dropped or destroyed.
    pub fn create_temp_in(dir: impl AsRef<Path>, size: u64) -> Result<MappedLongArray> {
        let dir = dir.as_ref();
        let temp = tempfile::Builder::new()
            .prefix("longbits-")
            .suffix(".lba")
            .tempfile_in(dir)
            .map_err(io_context("create temp file in", dir))?;
        let (file, temp_path) = temp.into_parts();
        let mut array = Self::init_cleared(file, temp_path.to_path_buf(), size)?;
        array.temp = Some(temp_path);
        Ok(array)
    }

    fn open_existing(path: &Path) -> Result<MappedLongArray> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(io_context("open", path))?;
        let actual_len = file
            .metadata()
            .map_err(io_context("read metadata of", path))?
            .len();
        if actual_len < HEADER_SIZE as u64 {
            return Err(Error::invalid_format(
                path.display().to_string(),
                format!("file holds {actual_len} bytes, shorter than the header"),
            ));
        }

        let mut header = [0u8; HEADER_SIZE];
        file.read_exact(&mut header)
            .map_err(io_context("read header of", path))?;
        let count = FileHeader::from_bytes(&header)?.validate()?;
        let required = format::data_len(count).map_err(|_| {
            Error::invalid_format(
                "header.count",
                format!("element count {count} exceeds the maximum file size"),
            )
        })?;
        if actual_len < required {
            return Err(Error::invalid_format(
                path.display().to_string(),
                format!("file holds {actual_len} bytes, header requires {required}"),
            ));
        }

        let file_len = longbits_page_alloc::align_to_page(actual_len);
        if file_len != actual_len {
            file.set_len(file_len)
                .map_err(io_context("pad to page size", path))?;
        }
        let mmap = map_file(&file, path)?;
        log::debug!("loaded mapped array '{}' ({count} words)", path.display());
        Ok(MappedLongArray {
            path: path.to_path_buf(),
            file: Some(file),
            state: MapState::Mapped(mmap),
            count,
            file_len,
            delete_on_close: false,
            flush_on_close: true,
            temp: None,
        })
    }

    fn open_cleared(path: &Path, size: u64) -> Result<MappedLongArray> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(io_context("create", path))?;
        Self::init_cleared(file, path.to_path_buf(), size)
    }

    fn init_cleared(file: File, path: PathBuf, size: u64) -> Result<MappedLongArray> {
        let file_len = format::file_len(size)?;
        file.set_len(file_len)
            .map_err(io_context("set length of", &path))?;
        let mmap = map_file(&file, &path)?;
        log::debug!("created mapped array '{}' ({size} words)", path.display());
        let mut array = MappedLongArray {
            path,
            file: Some(file),
            state: MapState::Mapped(mmap),
            count: size,
            file_len,
            delete_on_close: false,
            flush_on_close: true,
            temp: None,
        };
        array.write_header();
        Ok(array)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.state, MapState::Mapped(_))
    }

    /// Current length of the backing file in bytes (a multiple of the page size).
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Writes dirty pages of the mapping back to the file.
    pub fn flush(&self) -> Result<()> {
        match &self.state {
            MapState::Mapped(mmap) => mmap
                .flush()
                .map_err(io_context("flush", &self.path)),
            MapState::Unmapped => Ok(()),
        }
    }

    /// Closes the array and deletes its file.
    pub fn destroy(mut self) -> Result<()> {
        let closed = self.close();
        let removed = match self.temp.take() {
            Some(temp) => temp.close().map_err(io_context("remove", &self.path)),
            None if self.path.exists() => {
                std::fs::remove_file(&self.path).map_err(io_context("remove", &self.path))
            }
            None => Ok(()),
        };
        closed.and(removed)
    }

    fn mapping(&self) -> &MmapMut {
        match &self.state {
            MapState::Mapped(mmap) => mmap,
            MapState::Unmapped => panic!("mapped array '{}' is not mapped", self.path.display()),
        }
    }

    fn mapping_mut(&mut self) -> &mut MmapMut {
        match &mut self.state {
            MapState::Mapped(mmap) => mmap,
            MapState::Unmapped => panic!("mapped array '{}' is not mapped", self.path.display()),
        }
    }

    fn write_header(&mut self) {
        let header = FileHeader::new(self.count).to_bytes();
        self.mapping_mut()[..HEADER_SIZE].copy_from_slice(&header);
    }

    /// Resizes the file to `file_len` bytes and maps it again.
    fn remap(&mut self, file_len: u64) -> Result<()> {
        let Some(file) = &self.file else {
            return Err(Error::closed("mapped array"));
        };
        self.state = MapState::Unmapped;
        if let Err(e) = file.set_len(file_len) {
            match map_file(file, &self.path) {
                Ok(mmap) => self.state = MapState::Mapped(mmap),
                Err(remap_err) => log::warn!(
                    "failed to restore mapping of '{}': {remap_err}",
                    self.path.display()
                ),
            }
            return Err(Error::io(
                format!("resize '{}' to {file_len} bytes", self.path.display()),
                e,
            ));
        }
        self.state = MapState::Mapped(map_file(file, &self.path)?);
        self.file_len = file_len;
        log::debug!("remapped '{}' at {file_len} bytes", self.path.display());
        Ok(())
    }
}

impl LongArray for MappedLongArray {
    type Factory = MappedLongArrayFactory;

    #[inline]
    fn size(&self) -> u64 {
        self.count
    }

    #[inline]
    fn words(&self) -> &[u64] {
        let end = HEADER_SIZE + self.count as usize * 8;
        bytemuck::cast_slice(&self.mapping()[HEADER_SIZE..end])
    }

    #[inline]
    fn words_mut(&mut self) -> &mut [u64] {
        let end = HEADER_SIZE + self.count as usize * 8;
        bytemuck::cast_slice_mut(&mut self.mapping_mut()[HEADER_SIZE..end])
    }

    fn resize(&mut self, new_size: u64) -> Result<()> {
        if self.is_closed() {
            return Err(Error::closed("mapped array"));
        }
        if new_size == self.count {
            return Ok(());
        }
        byte_len(new_size)?;
        let file_len = format::file_len(new_size)?;
        if new_size < self.count {
            let retained = format::capacity_of(file_len).min(self.count) as usize;
            if retained > new_size as usize {
                self.words_mut()[new_size as usize..retained].fill(0);
            }
        }
        if file_len != self.file_len {
            self.remap(file_len)?;
        }
        self.count = new_size;
        self.write_header();
        Ok(())
    }

    fn is_zero_initialized(&self) -> bool {
        true
    }

    fn factory(&self) -> MappedLongArrayFactory {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        MappedLongArrayFactory { dir }
    }

    fn close(&mut self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        let flushed = if self.flush_on_close {
            self.flush()
        } else {
            Ok(())
        };
        self.state = MapState::Unmapped;
        self.file = None;
        log::debug!("closed mapped array '{}'", self.path.display());
        if self.delete_on_close && self.temp.is_none() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                log::warn!("failed to delete '{}': {e}", self.path.display());
            }
        }
        flushed
    }
}

impl Drop for MappedLongArray {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("failed to close mapped array '{}': {e}", self.path.display());
        }
    }
}

impl PartialEq for MappedLongArray {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_mapped(), other.is_mapped()) {
            (true, true) => self.words_equal(other),
            (mapped, other_mapped) => !mapped && !other_mapped && self.path == other.path,
        }
    }
}

impl Eq for MappedLongArray {}

impl std::hash::Hash for MappedLongArray {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.is_mapped() {
            self.words().hash(state);
        }
    }
}

impl std::fmt::Debug for MappedLongArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedLongArray")
            .field("path", &self.path)
            .field("count", &self.count)
            .field("file_len", &self.file_len)
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

/// Creates mapped arrays in temporary files inside `dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedLongArrayFactory {
    pub dir: PathBuf,
}

impl MappedLongArrayFactory {
    pub fn new(dir: impl Into<PathBuf>) -> MappedLongArrayFactory {
        MappedLongArrayFactory { dir: dir.into() }
    }
}

impl LongArrayFactory for MappedLongArrayFactory {
    type Array = MappedLongArray;

    fn create(&self, size: u64) -> Result<MappedLongArray> {
        MappedLongArray::create_temp_in(&self.dir, size)
    }
}

fn map_file(file: &File, path: &Path) -> Result<MmapMut> {
    // SAFETY: the mapping is owned by the array together with the file handle and is
    // dropped before the file is resized; external modification of the file while it
    // is mapped is not supported.
    unsafe { MmapOptions::new().map_mut(file) }.map_err(io_context("map", path))
}

pub(crate) fn io_context<'a>(
    operation: &'a str,
    path: &'a Path,
) -> impl FnOnce(std::io::Error) -> Error + 'a {
    move |e| Error::io(format!("{operation} '{}'", path.display()), e)
}
