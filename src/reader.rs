//! Read-and-fold driver
//!
//! Pulls lines from a [`LineSource`], resolves headers once, skips blank lines
//! and turns every other line into a [`Record`] for the caller's reducer.
//! Lines are processed strictly in file order and nothing beyond the current
//! line and record is buffered.

use crate::config::{FoldConfig, HeaderMode};
use crate::csv::{is_blank, FieldSplitter};
use crate::error::{BoxError, CsvFoldError, Result};
use crate::header::HeaderResolver;
use crate::source::LineSource;
use crate::types::{HeaderSet, Record};
use std::path::{Path, PathBuf};
use tracing::{debug, error, trace};

/// Read-and-fold entry point for one file
///
/// Configured with a builder, then consumed by one of the fold methods or
/// by [`CsvFolder::records`]. Every call opens the file afresh with its own
/// header set, line counter and accumulator.
///
/// # Examples
///
/// ```no_run
/// use csvfold::{CsvFolder, Record};
///
/// let rows: Vec<Record> = CsvFolder::new("data.csv")
///     .fold_default(|acc: &mut Vec<Record>, record| {
///         acc.push(record);
///         Ok::<_, std::convert::Infallible>(())
///     })
///     .unwrap();
/// ```
///
/// # Supplied headers
///
/// ```no_run
/// use csvfold::CsvFolder;
///
/// let total = CsvFolder::new("data.csv")
///     .delimiter(";")
///     .headers(["id", "value"])
///     .fold(0.0, |sum, record| {
///         let value: f64 = record.get("value").unwrap_or("0").parse()?;
///         Ok::<_, std::num::ParseFloatError>(sum + value)
///     })
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CsvFolder {
    path: PathBuf,
    config: FoldConfig,
}

impl CsvFolder {
    /// Create a folder for `path` with the default configuration
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        CsvFolder {
            path: path.into(),
            config: FoldConfig::default(),
        }
    }

    /// Set custom delimiter (builder pattern)
    pub fn delimiter(mut self, delimiter: &str) -> Self {
        self.config.delimiter = delimiter.to_string();
        self
    }

    /// Set custom quote character (builder pattern)
    pub fn quote_char(mut self, quote: char) -> Self {
        self.config.quote = quote;
        self
    }

    /// Use these column names instead of reading a header line
    pub fn headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.header_mode =
            HeaderMode::Supplied(headers.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: FoldConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &FoldConfig {
        &self.config
    }

    /// File this folder reads
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and return the pull-based record stream
    ///
    /// The configuration is validated before the file is touched.
    pub fn records(&self) -> Result<RecordIter> {
        self.config.validate()?;
        let source = LineSource::open(&self.path)?;
        RecordIter::from_source(source, &self.config)
    }

    /// Fold every record into an accumulator the reducer returns
    ///
    /// A reducer error aborts the read with
    /// [`CsvFoldError::RecordProcessingFailed`]; no partial accumulator is
    /// returned.
    pub fn fold<A, E, F>(&self, init: A, mut reducer: F) -> Result<A>
    where
        F: FnMut(A, Record) -> std::result::Result<A, E>,
        E: Into<BoxError>,
    {
        let mut records = self.records()?;
        let mut acc = init;
        while let Some(record) = records.next() {
            let record = record?;
            acc = reducer(acc, record)
                .map_err(|e| processing_failed(records.path(), records.line_index(), e.into()))?;
        }
        Ok(acc)
    }

    /// Fold every record into an accumulator the reducer mutates in place
    pub fn fold_in_place<A, E, F>(&self, init: A, mut reducer: F) -> Result<A>
    where
        F: FnMut(&mut A, Record) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        self.fold(init, |mut acc, record| {
            reducer(&mut acc, record).map(|()| acc)
        })
    }

    /// [`CsvFolder::fold_in_place`] seeded with `A::default()`
    pub fn fold_default<A, E, F>(&self, reducer: F) -> Result<A>
    where
        A: Default,
        F: FnMut(&mut A, Record) -> std::result::Result<(), E>,
        E: Into<BoxError>,
    {
        self.fold_in_place(A::default(), reducer)
    }
}

/// Wrap a reducer failure with the file and line it happened on
pub(crate) fn processing_failed(path: &Path, line_index: u64, source: BoxError) -> CsvFoldError {
    error!(
        path = %path.display(),
        line = line_index,
        error = %source,
        "error processing {} line {}",
        path.display(),
        line_index
    );
    CsvFoldError::RecordProcessingFailed {
        path: path.to_path_buf(),
        line_index,
        source,
    }
}

/// What one source line turned into
#[derive(Debug)]
pub(crate) enum LineOutcome {
    Header,
    Blank,
    Record(Record),
}

/// Per-read line state shared by the sync and async drivers
#[derive(Debug)]
pub(crate) struct LineProcessor {
    splitter: FieldSplitter,
    resolver: HeaderResolver,
}

impl LineProcessor {
    pub(crate) fn new(config: &FoldConfig) -> Result<Self> {
        config.validate()?;
        Ok(LineProcessor {
            splitter: FieldSplitter::new(config.delimiter.as_str(), config.quote),
            resolver: HeaderResolver::new(&config.header_mode, config.delimiter.as_str())?,
        })
    }

    pub(crate) fn headers(&self) -> Option<&HeaderSet> {
        self.resolver.headers()
    }

    pub(crate) fn process(&mut self, line: &str) -> Result<LineOutcome> {
        if self.resolver.offer(line)? {
            return Ok(LineOutcome::Header);
        }

        let fields = self.splitter.split(line);
        if is_blank(&fields) {
            return Ok(LineOutcome::Blank);
        }

        match self.resolver.headers() {
            Some(headers) => Ok(LineOutcome::Record(Record::from_fields(headers, fields))),
            None => Err(CsvFoldError::MissingHeaders),
        }
    }
}

/// Pull-based stream of records from one file
///
/// Produced by [`CsvFolder::records`]. Dropping it abandons the read.
pub struct RecordIter {
    source: LineSource,
    processor: LineProcessor,
    records_read: u64,
    blank_lines: u64,
    finished: bool,
}

impl RecordIter {
    /// Build a record stream over an already opened source
    pub fn from_source(source: LineSource, config: &FoldConfig) -> Result<Self> {
        Ok(RecordIter {
            processor: LineProcessor::new(config)?,
            source,
            records_read: 0,
            blank_lines: 0,
            finished: false,
        })
    }

    /// Path being read
    pub fn path(&self) -> &Path {
        self.source.path()
    }

    /// 1-based index of the last consumed line, header line included
    pub fn line_index(&self) -> u64 {
        self.source.line_index()
    }

    /// Resolved header set; `None` until the header line has been read
    pub fn headers(&self) -> Option<&HeaderSet> {
        self.processor.headers()
    }

    /// Number of records produced so far
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Number of blank lines skipped so far
    pub fn blank_lines(&self) -> u64 {
        self.blank_lines
    }
}

impl Iterator for RecordIter {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let line = match self.source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.finished = true;
                    debug!(
                        path = %self.source.path().display(),
                        lines = self.source.line_index(),
                        records = self.records_read,
                        blank = self.blank_lines,
                        "finished reading"
                    );
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            match self.processor.process(line) {
                Ok(LineOutcome::Header) => continue,
                Ok(LineOutcome::Blank) => {
                    self.blank_lines += 1;
                    trace!(line = self.source.line_index(), "skipping blank line");
                }
                Ok(LineOutcome::Record(record)) => {
                    self.records_read += 1;
                    return Some(Ok(record));
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
