//! # csvfold
//!
//! Streaming, memory-bounded CSV reader that folds header-keyed records into
//! a caller-owned accumulator.
//!
//! ## Features
//!
//! - **Streaming**: one line and one record in memory at a time
//! - **Quote-aware splitting**: delimiters inside `"..."` do not split a field
//! - **Header resolution**: from the first line, or supplied by the caller
//! - **Two reducer styles**: return a new accumulator, or mutate it in place
//! - **Attributed failures**: reducer errors carry the file and 1-based line
//! - **Compressed sources**: `.csv.gz` via flate2, `.csv.zst` / `.csv.zip` via s-zip
//! - **Multi-file folds**: independent per-file state, optional rayon pool
//! - **Async**: tokio-based fold behind the `async` feature
//!
//! ## Quick Start
//!
//! ```no_run
//! use csvfold::{CsvFolder, Record};
//!
//! // id,scale
//! // A,1
//! // B,2
//! let records: Vec<Record> = CsvFolder::new("data.csv")
//!     .fold_default(|acc: &mut Vec<Record>, record| {
//!         acc.push(record);
//!         Ok::<_, std::convert::Infallible>(())
//!     })
//!     .unwrap();
//!
//! assert_eq!(records[0].get("id"), Some("A"));
//! ```
//!
//! ## Supplied headers and a derived accumulator
//!
//! ```no_run
//! use csvfold::CsvFolder;
//!
//! let sum = CsvFolder::new("values.csv")
//!     .headers(["id", "value"])
//!     .fold(0i64, |sum, record| {
//!         let v: i64 = record.get("value").unwrap_or("0").parse()?;
//!         Ok::<_, std::num::ParseIntError>(sum + v)
//!     })
//!     .unwrap();
//! ```

pub mod batch;
pub mod config;
pub mod csv;
pub mod error;
pub mod header;
pub mod reader;
pub mod source;
pub mod types;

#[cfg(feature = "async")]
pub mod async_reader;

pub use batch::{fold_dir, fold_files, FileFold};
pub use config::{FoldConfig, HeaderMode, DEFAULT_DELIMITER, DEFAULT_QUOTE};
pub use csv::{split_fields, split_plain, FieldSplitter};
pub use error::{BoxError, CsvFoldError, Result};
pub use header::{HeaderResolver, HeaderState};
pub use reader::{CsvFolder, RecordIter};
pub use source::{csv_files_in, LineSource};
pub use types::{HeaderSet, Record};

#[cfg(feature = "async")]
pub use async_reader::{fold_async, fold_in_place_async};
