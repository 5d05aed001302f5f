//! Quote-aware field splitting
//!
//! A field may be wrapped in one pair of quote characters. The delimiter only
//! separates fields while the scan is outside such a pair. Interior quotes are
//! never unescaped and a field cannot span lines.

/// Splits one line into trimmed, unquoted field values
#[derive(Debug, Clone)]
pub struct FieldSplitter {
    delimiter: String,
    quote_char: char,
}

impl FieldSplitter {
    /// Create a splitter with a custom delimiter and quote character
    ///
    /// The delimiter must be non-empty; callers validate it beforehand
    /// (see [`crate::FoldConfig::validate`]).
    pub fn new(delimiter: impl Into<String>, quote_char: char) -> Self {
        Self {
            delimiter: delimiter.into(),
            quote_char,
        }
    }

    /// Delimiter this splitter separates on
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Split a line into fields
    ///
    /// Single pass over the line with two states, `Unquoted` and `Quoted`.
    /// A quote character toggles the state; a delimiter seen while unquoted
    /// ends the current field.
    pub fn split(&self, line: &str) -> Vec<String> {
        let delim = self.delimiter.as_str();
        let mut fields = Vec::new();
        let mut in_quotes = false;
        let mut field_start = 0;
        let mut pos = 0;

        while pos < line.len() {
            let tail = &line[pos..];

            if !in_quotes && !delim.is_empty() && tail.starts_with(delim) {
                fields.push(self.clean(&line[field_start..pos]));
                pos += delim.len();
                field_start = pos;
                continue;
            }

            let Some(ch) = tail.chars().next() else {
                break;
            };
            if ch == self.quote_char {
                in_quotes = !in_quotes;
            }
            pos += ch.len_utf8();
        }

        fields.push(self.clean(&line[field_start..]));
        fields
    }

    /// Trim whitespace, then drop one leading and one trailing quote
    fn clean(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix(self.quote_char).unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix(self.quote_char).unwrap_or(trimmed);
        trimmed.to_string()
    }
}

/// Quote-aware split of `line` on `delimiter`
pub fn split_fields(line: &str, delimiter: &str, quote_char: char) -> Vec<String> {
    FieldSplitter::new(delimiter, quote_char).split(line)
}

/// Plain split used for header lines: no quote handling, no trimming
pub fn split_plain(line: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        return vec![line.to_string()];
    }
    line.split(delimiter).map(str::to_string).collect()
}

/// True when every field is empty after trimming
pub fn is_blank(fields: &[String]) -> bool {
    fields.iter().all(|f| f.trim().is_empty())
}
