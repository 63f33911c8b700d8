//! Options for opening and bulk-writing mapped arrays.

use longbits_common::{Result, verify_arg};

use super::format;

/// Words buffered per write when streaming values into a file.
pub const DEFAULT_BATCH_WORDS: usize = 8192;

/// How an existing file is treated when a mapped array is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// The file must exist; its header is read and validated.
    #[default]
    Load,
    /// The file is created or truncated and a fresh header is written.
    Clear,
    /// `Load` when the file exists, `Clear` otherwise.
    LoadOrCreate,
}

/// Configuration for opening a [`MappedLongArray`](super::MappedLongArray).
#[derive(Debug, Clone)]
pub struct MappedArrayConfig {
    pub mode: OpenMode,
    /// Size in words of a cleared array.
    pub initial_size: u64,
    /// Remove the file when the array is closed or dropped.
    pub delete_on_close: bool,
    /// Flush dirty pages to disk when the array is closed.
    pub flush_on_close: bool,
}

impl Default for MappedArrayConfig {
    fn default() -> Self {
        Self {
            mode: OpenMode::Load,
            initial_size: 0,
            delete_on_close: false,
            flush_on_close: true,
        }
    }
}

impl MappedArrayConfig {
    pub fn load() -> MappedArrayConfig {
        MappedArrayConfig::default()
    }

    pub fn clear(initial_size: u64) -> MappedArrayConfig {
        MappedArrayConfig {
            mode: OpenMode::Clear,
            initial_size,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(
            initial_size,
            self.mode != OpenMode::Load || self.initial_size == 0
        );
        format::data_len(self.initial_size)?;
        Ok(())
    }
}

/// Configuration for streaming values into a new mapped array file.
#[derive(Debug, Clone)]
pub struct BulkSaveConfig {
    pub batch_words: usize,
    /// Sync file data and metadata to disk before returning.
    pub sync: bool,
}

impl Default for BulkSaveConfig {
    fn default() -> Self {
        Self {
            batch_words: DEFAULT_BATCH_WORDS,
            sync: true,
        }
    }
}

impl BulkSaveConfig {
    pub fn validate(&self) -> Result<()> {
        verify_arg!(batch_words, self.batch_words > 0);
        Ok(())
    }
}
