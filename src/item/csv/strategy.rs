use serde::{Deserialize, Serialize};

/// Formatting parameters governing one read or write session.
///
/// A strategy is plain data: it only exposes the characters and flags the
/// tokenizer, the reader and the joiners consult. Two presets are provided,
/// [`CsvStrategy::DEFAULT`] and [`CsvStrategy::UK_DEFAULT`].
///
/// The strategy can be loaded from a configuration document; absent fields
/// fall back to the values of [`CsvStrategy::DEFAULT`].
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::strategy::CsvStrategy;
///
/// let strategy = CsvStrategy::new(',', '\'', '%', false, true);
/// assert_eq!(strategy.delimiter(), ',');
/// assert_eq!(strategy.quote(), '\'');
/// assert!(!strategy.skip_header());
///
/// let default = CsvStrategy::default();
/// assert_eq!(default, CsvStrategy::DEFAULT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvStrategy {
    delimiter: char,
    quote: char,
    comment_marker: char,
    skip_header: bool,
    ignore_empty_lines: bool,
}

impl CsvStrategy {
    /// Semicolon separated, `"` quoted, `#` comments, header skipped, empty lines ignored.
    pub const DEFAULT: CsvStrategy = CsvStrategy::new(';', '"', '#', true, true);

    /// Comma separated, `"` quoted, `#` comments, no header skip, empty lines ignored.
    pub const UK_DEFAULT: CsvStrategy = CsvStrategy::new(',', '"', '#', false, true);

    pub const fn new(
        delimiter: char,
        quote: char,
        comment_marker: char,
        skip_header: bool,
        ignore_empty_lines: bool,
    ) -> Self {
        Self {
            delimiter,
            quote,
            comment_marker,
            skip_header,
            ignore_empty_lines,
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn quote(&self) -> char {
        self.quote
    }

    pub fn comment_marker(&self) -> char {
        self.comment_marker
    }

    /// Whether the reader discards the first line before reading records.
    pub fn skip_header(&self) -> bool {
        self.skip_header
    }

    pub fn ignore_empty_lines(&self) -> bool {
        self.ignore_empty_lines
    }

    /// Returns true if `line` is a comment line for this strategy.
    pub fn is_comment(&self, line: &str) -> bool {
        line.starts_with(self.comment_marker)
    }
}

impl Default for CsvStrategy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
