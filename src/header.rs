//! Header resolution
//!
//! The header set of a read is resolved exactly once: up front from supplied
//! names, or from the first line pulled from the source. The transition is
//! one-way and happens before any record is built.

use crate::config::HeaderMode;
use crate::csv::split_plain;
use crate::error::Result;
use crate::types::HeaderSet;
use tracing::debug;

/// Resolution state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderState {
    /// Waiting for the header line
    Unresolved,
    /// Header set fixed for the rest of the read
    Resolved(HeaderSet),
}

/// `Unresolved -> Resolved` state machine for one read
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    delimiter: String,
    state: HeaderState,
}

impl HeaderResolver {
    /// Start resolution for a header mode
    ///
    /// Supplied names resolve immediately (and fail with
    /// [`crate::CsvFoldError::MissingHeaders`] when empty); first-line mode
    /// starts unresolved.
    pub fn new(mode: &HeaderMode, delimiter: impl Into<String>) -> Result<Self> {
        let state = match mode {
            HeaderMode::Supplied(names) => {
                let headers = HeaderSet::new(names.iter().cloned())?;
                debug!(columns = headers.len(), "using supplied headers");
                HeaderState::Resolved(headers)
            }
            HeaderMode::FromFirstLine => HeaderState::Unresolved,
        };

        Ok(HeaderResolver {
            delimiter: delimiter.into(),
            state,
        })
    }

    /// Current state
    pub fn state(&self) -> &HeaderState {
        &self.state
    }

    /// True once the header set is known
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, HeaderState::Resolved(_))
    }

    /// Resolved header set, if any
    pub fn headers(&self) -> Option<&HeaderSet> {
        match &self.state {
            HeaderState::Resolved(headers) => Some(headers),
            HeaderState::Unresolved => None,
        }
    }

    /// Offer a line pulled from the source
    ///
    /// Returns `true` when the line was consumed as the header line and must
    /// not become a record. Once resolved, every line is declined.
    pub fn offer(&mut self, line: &str) -> Result<bool> {
        if self.is_resolved() {
            return Ok(false);
        }

        let headers = HeaderSet::new(split_plain(line, &self.delimiter))?;
        debug!(headers = %headers, "resolved headers from first line");
        self.state = HeaderState::Resolved(headers);
        Ok(true)
    }
}
