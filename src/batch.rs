//! Independent folds over many files
//!
//! Each file gets its own source, header set, line counter and accumulator.
//! With the `parallel` feature the files are folded on the rayon thread pool;
//! results always come back in input order.

use crate::config::FoldConfig;
use crate::error::{BoxError, Result};
use crate::reader::CsvFolder;
use crate::source::csv_files_in;
use crate::types::Record;
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of folding one file
pub type FileFold<A> = (PathBuf, Result<A>);

fn fold_one<A, E, I, F>(path: &Path, config: &FoldConfig, init: &I, reducer: &F) -> FileFold<A>
where
    I: Fn() -> A,
    F: Fn(&mut A, Record) -> std::result::Result<(), E>,
    E: Into<BoxError>,
{
    let result = CsvFolder::new(path)
        .with_config(config.clone())
        .fold_in_place(init(), reducer);
    (path.to_path_buf(), result)
}

/// Fold every file independently
///
/// `init` seeds a fresh accumulator per file. A failing file does not stop
/// the others; its error is returned in its slot.
#[cfg(not(feature = "parallel"))]
pub fn fold_files<P, A, E, I, F>(
    paths: &[P],
    config: &FoldConfig,
    init: I,
    reducer: F,
) -> Vec<FileFold<A>>
where
    P: AsRef<Path>,
    I: Fn() -> A,
    F: Fn(&mut A, Record) -> std::result::Result<(), E>,
    E: Into<BoxError>,
{
    debug!(files = paths.len(), "folding files sequentially");
    paths
        .iter()
        .map(|p| fold_one(p.as_ref(), config, &init, &reducer))
        .collect()
}

/// Fold every file independently on the rayon thread pool
///
/// `init` seeds a fresh accumulator per file. A failing file does not stop
/// the others; its error is returned in its slot.
#[cfg(feature = "parallel")]
pub fn fold_files<P, A, E, I, F>(
    paths: &[P],
    config: &FoldConfig,
    init: I,
    reducer: F,
) -> Vec<FileFold<A>>
where
    P: AsRef<Path> + Sync,
    A: Send,
    I: Fn() -> A + Sync,
    F: Fn(&mut A, Record) -> std::result::Result<(), E> + Sync,
    E: Into<BoxError>,
{
    debug!(files = paths.len(), "folding files in parallel");
    paths
        .par_iter()
        .map(|p| fold_one(p.as_ref(), config, &init, &reducer))
        .collect()
}

/// Fold every `.csv` file directly inside `dir`, in path order
#[cfg(not(feature = "parallel"))]
pub fn fold_dir<D, A, E, I, F>(
    dir: D,
    config: &FoldConfig,
    init: I,
    reducer: F,
) -> Result<Vec<FileFold<A>>>
where
    D: AsRef<Path>,
    I: Fn() -> A,
    F: Fn(&mut A, Record) -> std::result::Result<(), E>,
    E: Into<BoxError>,
{
    let files = csv_files_in(dir)?;
    Ok(fold_files(&files, config, init, reducer))
}

/// Fold every `.csv` file directly inside `dir`, in path order
#[cfg(feature = "parallel")]
pub fn fold_dir<D, A, E, I, F>(
    dir: D,
    config: &FoldConfig,
    init: I,
    reducer: F,
) -> Result<Vec<FileFold<A>>>
where
    D: AsRef<Path>,
    A: Send,
    I: Fn() -> A + Sync,
    F: Fn(&mut A, Record) -> std::result::Result<(), E> + Sync,
    E: Into<BoxError>,
{
    let files = csv_files_in(dir)?;
    Ok(fold_files(&files, config, init, reducer))
}
