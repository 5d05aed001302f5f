//! Async read-and-fold on tokio
//!
//! Same header, splitting, blank-line and error rules as [`crate::CsvFolder`].
//! The only suspension point is the next-line fetch, so a read can be
//! abandoned between lines by dropping the future.

use crate::config::FoldConfig;
use crate::error::{BoxError, CsvFoldError, Result};
use crate::reader::{processing_failed, CsvFolder, LineOutcome, LineProcessor};
use crate::source::{is_archive, is_gzip, not_a_file, read_archive_entry, read_gzip, unavailable};
use crate::types::Record;
use std::io::Cursor;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, trace};

async fn open_async(path: &Path) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| unavailable(path, e))?;
    let metadata = file.metadata().await.map_err(|e| unavailable(path, e))?;
    if metadata.is_dir() {
        return Err(unavailable(path, not_a_file()));
    }

    if is_gzip(path) || is_archive(path) {
        drop(file);
        // Decompression itself is synchronous
        let data = if is_gzip(path) {
            read_gzip(path)?
        } else {
            read_archive_entry(path)?
        };
        debug!(path = %path.display(), bytes = data.len(), "opened compressed source");
        Ok(Box::new(Cursor::new(data)))
    } else {
        debug!(path = %path.display(), "opened source");
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Async counterpart of [`CsvFolder::fold`]
pub async fn fold_async<A, E, F>(
    path: impl AsRef<Path>,
    config: &FoldConfig,
    init: A,
    mut reducer: F,
) -> Result<A>
where
    F: FnMut(A, Record) -> std::result::Result<A, E>,
    E: Into<BoxError>,
{
    let path = path.as_ref();
    let mut processor = LineProcessor::new(config)?;
    let mut reader = open_async(path).await?;

    let mut line = String::with_capacity(1024);
    let mut line_index: u64 = 0;
    let mut records: u64 = 0;
    let mut acc = init;

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| CsvFoldError::Read {
                path: path.to_path_buf(),
                line_index: line_index + 1,
                source: e,
            })?;
        if bytes_read == 0 {
            break;
        }
        line_index += 1;

        let text = line.strip_suffix('\n').unwrap_or(line.as_str());
        let text = text.strip_suffix('\r').unwrap_or(text);

        match processor.process(text)? {
            LineOutcome::Header => {}
            LineOutcome::Blank => trace!(line = line_index, "skipping blank line"),
            LineOutcome::Record(record) => {
                records += 1;
                acc = reducer(acc, record)
                    .map_err(|e| processing_failed(path, line_index, e.into()))?;
            }
        }
    }

    debug!(path = %path.display(), lines = line_index, records, "finished reading");
    Ok(acc)
}

/// Async counterpart of [`CsvFolder::fold_in_place`]
pub async fn fold_in_place_async<A, E, F>(
    path: impl AsRef<Path>,
    config: &FoldConfig,
    init: A,
    mut reducer: F,
) -> Result<A>
where
    F: FnMut(&mut A, Record) -> std::result::Result<(), E>,
    E: Into<BoxError>,
{
    fold_async(path, config, init, |mut acc, record| {
        reducer(&mut acc, record).map(|()| acc)
    })
    .await
}

impl CsvFolder {
    /// Async [`CsvFolder::fold`]
    pub async fn fold_async<A, E, F>(&self, init: A, reducer: F) -> Result<A>
    where
        F: FnMut(A, Record) -> std::result::Result<A, E>,
        E: Into<BoxError>,
    {
        fold_async(self.path(), self.config(), init, reducer).await
    }

    /// Async [`CsvFolder::fold_in_place`]
    pub async fn fold_in_place_async<A, E, F>(&self, init: A, reducer: F) -> Result<A>
    where
        F: FnMut(&mut A, Record) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        fold_in_place_async(self.path(), self.config(), init, reducer).await
    }
}
