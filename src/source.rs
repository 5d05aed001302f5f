//! Line source: file path to a pull-based sequence of text lines
//!
//! Plain files are read through a `BufReader` with one reused line buffer, so
//! memory stays proportional to the longest line. `.csv.gz` files are
//! decoded on the fly with flate2 and keep the same bound. Archives
//! (`.csv.zst`, `.csv.zip`) are decompressed through s-zip first; that path
//! holds the decompressed entry in memory.

use crate::error::{CsvFoldError, Result};
use flate2::read::MultiGzDecoder;
use s_zip::StreamingZipReader;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Pull-based sequence of lines from one file
///
/// LF and CRLF terminators are both stripped, as is a lone `\r` ending the
/// final line. A final line without a terminator is still yielded. Dropping the source abandons the read.
///
/// # Examples
///
/// ```no_run
/// use csvfold::LineSource;
///
/// let mut source = LineSource::open("data.csv").unwrap();
/// while let Some(line) = source.next_line().unwrap().map(str::to_owned) {
///     println!("{}: {}", source.line_index(), line);
/// }
/// ```
pub struct LineSource {
    path: PathBuf,
    reader: Box<dyn BufRead + Send>,
    line_buffer: String,
    line_index: u64,
    finished: bool,
}

impl LineSource {
    /// Open a file - auto-detects compression from the file extension
    ///
    /// Fails with [`CsvFoldError::SourceUnavailable`] before yielding any line
    /// when the path is missing, unreadable or a directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let file = File::open(path_ref).map_err(|e| unavailable(path_ref, e))?;
        let metadata = file.metadata().map_err(|e| unavailable(path_ref, e))?;
        if metadata.is_dir() {
            return Err(unavailable(path_ref, not_a_file()));
        }

        if is_gzip(path_ref) {
            debug!(path = %path_ref.display(), "opened gzip source");
            Ok(Self::from_reader(
                path_ref,
                BufReader::new(MultiGzDecoder::new(file)),
            ))
        } else if is_archive(path_ref) {
            drop(file);
            let data = read_archive_entry(path_ref)?;
            debug!(path = %path_ref.display(), bytes = data.len(), "opened compressed source");
            Ok(Self::from_reader(path_ref, Cursor::new(data)))
        } else {
            debug!(path = %path_ref.display(), "opened source");
            Ok(Self::from_reader(path_ref, BufReader::new(file)))
        }
    }

    /// Wrap an already open reader; `path` is only used for diagnostics
    pub fn from_reader<P, R>(path: P, reader: R) -> Self
    where
        P: Into<PathBuf>,
        R: BufRead + Send + 'static,
    {
        LineSource {
            path: path.into(),
            reader: Box::new(reader),
            line_buffer: String::with_capacity(1024),
            line_index: 0,
            finished: false,
        }
    }

    /// Path this source reads from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 1-based index of the last line returned, 0 before the first
    pub fn line_index(&self) -> u64 {
        self.line_index
    }

    /// Read the next line into the internal buffer
    ///
    /// Returns `Ok(None)` at end of input. Any read failure (I/O or invalid
    /// UTF-8) is fatal and ends the sequence.
    pub fn next_line(&mut self) -> Result<Option<&str>> {
        if self.finished {
            return Ok(None);
        }

        self.line_buffer.clear();
        let bytes_read = match self.reader.read_line(&mut self.line_buffer) {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                return Err(CsvFoldError::Read {
                    path: self.path.clone(),
                    line_index: self.line_index + 1,
                    source: e,
                });
            }
        };

        if bytes_read == 0 {
            self.finished = true;
            return Ok(None);
        }

        if self.line_buffer.ends_with('\n') {
            self.line_buffer.pop();
        }
        if self.line_buffer.ends_with('\r') {
            self.line_buffer.pop();
        }

        self.line_index += 1;
        Ok(Some(&self.line_buffer))
    }
}

impl Iterator for LineSource {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line.to_string())),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

pub(crate) fn unavailable(path: &Path, source: io::Error) -> CsvFoldError {
    CsvFoldError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

pub(crate) fn not_a_file() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "path is a directory, not a file")
}

/// True for `.csv.gz` paths, decoded as a gzip stream
pub fn is_gzip(path: &Path) -> bool {
    path.to_str().unwrap_or("").ends_with(".csv.gz")
}

/// True for `.csv.zst` / `.csv.zip` paths, read through the archive decoder
pub fn is_archive(path: &Path) -> bool {
    let path_str = path.to_str().unwrap_or("");
    path_str.ends_with(".csv.zst") || path_str.ends_with(".csv.zip")
}

/// True for any compressed source
pub fn is_compressed(path: &Path) -> bool {
    is_gzip(path) || is_archive(path)
}

/// Decode a whole gzip file; used where a blocking stream cannot be kept
#[cfg(feature = "async")]
pub(crate) fn read_gzip(path: &Path) -> Result<Vec<u8>> {
    use std::io::Read;

    let file = File::open(path).map_err(|e| unavailable(path, e))?;
    let mut data = Vec::new();
    MultiGzDecoder::new(file)
        .read_to_end(&mut data)
        .map_err(|e| CsvFoldError::Archive {
            path: path.to_path_buf(),
            message: format!("failed to decode gzip: {}", e),
        })?;
    Ok(data)
}

/// Decompress the first `.csv` entry of an archive, or its first entry
pub(crate) fn read_archive_entry(path: &Path) -> Result<Vec<u8>> {
    let archive_err = |message: String| CsvFoldError::Archive {
        path: path.to_path_buf(),
        message,
    };

    let mut zip = StreamingZipReader::open(path)
        .map_err(|e| archive_err(format!("failed to open archive: {}", e)))?;

    let entry_name = zip
        .entries()
        .iter()
        .find(|e| e.name.ends_with(".csv"))
        .or_else(|| zip.entries().first())
        .ok_or_else(|| archive_err("no CSV entry found in archive".to_string()))?
        .name
        .clone();

    zip.read_entry_by_name(&entry_name)
        .map_err(|e| archive_err(format!("failed to read entry '{}': {}", entry_name, e)))
}

/// List the `.csv` files directly inside `dir`, sorted by path
pub fn csv_files_in<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| unavailable(dir, e))? {
        let path = entry.map_err(|e| unavailable(dir, e))?.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
