//! On-disk layout of a mapped word array.
//!
//! ```text
//! offset 0:  u32 format marker (1)
//! offset 4:  u32 format version (1)
//! offset 8:  i64 element count
//! offset 16: count * u64 words
//! ```
//!
//! All fields use the platform's native byte order, the same order in which the
//! mapped words are read. The file length is padded to a multiple of the page size.

use longbits_common::{Result, error::Error, verify_data};
use longbits_page_alloc::align_to_page;

pub const FORMAT_MARKER: u32 = 1;
pub const FORMAT_VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 16;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FileHeader {
    pub marker: u32,
    pub version: u32,
    pub count: i64,
}

impl FileHeader {
    pub fn new(count: u64) -> FileHeader {
        FileHeader {
            marker: FORMAT_MARKER,
            version: FORMAT_VERSION,
            count: count as i64,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        bytemuck::cast(*self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<FileHeader> {
        verify_data!(header, bytes.len() >= HEADER_SIZE);
        Ok(bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]))
    }

    /// Checks marker, version and count, returning the element count.
    pub fn validate(&self) -> Result<u64> {
        if self.marker != FORMAT_MARKER {
            return Err(Error::invalid_format(
                "header.marker",
                format!("expected {FORMAT_MARKER}, found {}", self.marker),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(Error::invalid_format(
                "header.version",
                format!("expected {FORMAT_VERSION}, found {}", self.version),
            ));
        }
        if self.count < 0 {
            return Err(Error::invalid_format(
                "header.count",
                format!("negative element count {}", self.count),
            ));
        }
        Ok(self.count as u64)
    }
}

/// Number of bytes holding the header and `count` words.
pub fn data_len(count: u64) -> Result<u64> {
    count
        .checked_mul(8)
        .and_then(|bytes| bytes.checked_add(HEADER_SIZE as u64))
        .filter(|&len| len <= i64::MAX as u64)
        .ok_or_else(|| Error::invalid_arg("count", format!("{count} words do not fit a file")))
}

/// Page-aligned file length for `count` words.
pub fn file_len(count: u64) -> Result<u64> {
    Ok(align_to_page(data_len(count)?))
}

/// Number of words the data area of a `file_len` byte file can hold.
pub fn capacity_of(file_len: u64) -> u64 {
    file_len.saturating_sub(HEADER_SIZE as u64) / 8
}
