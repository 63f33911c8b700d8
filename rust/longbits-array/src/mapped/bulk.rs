//! Streaming construction of mapped array files.
//!
//! Values are written in fixed-size batches behind a placeholder header; the header is
//! rewritten with the final count once the source is exhausted. The source is never
//! materialized in memory.

use std::{
    fs::File,
    io::{BufWriter, Seek, SeekFrom, Write},
    path::Path,
};

use longbits_common::Result;
use longbits_page_alloc::align_to_page;

use super::{
    MappedLongArray,
    config::BulkSaveConfig,
    format::{self, FileHeader},
    io_context,
};

impl MappedLongArray {
    /// Writes `values` into a new file at `path` that can later be opened with
    /// [`MappedLongArray::load`].
    ///
    /// An existing file is replaced. On failure the partially written file is removed.
    ///
    /// Returns the number of words written.
    pub fn save_iter<I>(path: impl AsRef<Path>, values: I, config: &BulkSaveConfig) -> Result<u64>
    where
        I: IntoIterator<Item = u64>,
    {
        config.validate()?;
        let path = path.as_ref();
        let file = File::create(path).map_err(io_context("create", path))?;
        match write_stream(&file, path, values.into_iter(), config) {
            Ok(count) => {
                log::debug!("saved {count} words to '{}'", path.display());
                Ok(count)
            }
            Err(e) => {
                drop(file);
                if let Err(cleanup) = std::fs::remove_file(path) {
                    log::warn!(
                        "failed to remove partially written '{}': {cleanup}",
                        path.display()
                    );
                }
                Err(e)
            }
        }
    }

    /// Writes `words` into a new file at `path`.
    pub fn save_slice(path: impl AsRef<Path>, words: &[u64]) -> Result<u64> {
        Self::save_iter(path, words.iter().copied(), &BulkSaveConfig::default())
    }
}

fn write_stream(
    file: &File,
    path: &Path,
    values: impl Iterator<Item = u64>,
    config: &BulkSaveConfig,
) -> Result<u64> {
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&FileHeader::new(0).to_bytes())
        .map_err(io_context("write header to", path))?;

    let mut batch = Vec::with_capacity(config.batch_words);
    let mut count = 0u64;
    for value in values {
        batch.push(value);
        if batch.len() == config.batch_words {
            writer
                .write_all(bytemuck::cast_slice(&batch))
                .map_err(io_context("write to", path))?;
            count += batch.len() as u64;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        writer
            .write_all(bytemuck::cast_slice(&batch))
            .map_err(io_context("write to", path))?;
        count += batch.len() as u64;
    }

    let mut file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .map_err(io_context("flush", path))?;
    file.set_len(align_to_page(format::data_len(count)?))
        .map_err(io_context("pad", path))?;
    file.seek(SeekFrom::Start(0))
        .map_err(io_context("seek", path))?;
    file.write_all(&FileHeader::new(count).to_bytes())
        .map_err(io_context("rewrite header of", path))?;
    if config.sync {
        file.sync_all().map_err(io_context("sync", path))?;
    }
    Ok(count)
}
