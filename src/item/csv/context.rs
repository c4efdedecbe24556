use std::{collections::HashMap, fmt};

use log::warn;

use crate::error::BatchError;

/// The fields of one logical record, after tokenization and before conversion.
pub type Row = Vec<String>;

/// Identifies a column either by zero-based position or by header name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Column {
    Index(usize),
    Name(String),
}

impl From<usize> for Column {
    fn from(index: usize) -> Self {
        Column::Index(index)
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::Name(name.to_string())
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::Name(name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Index(index) => write!(f, "#{}", index),
            Column::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Maps header names to their zero-based position.
///
/// Built once from a header row and immutable afterwards. When a name
/// appears more than once, the first occurrence wins and the later ones are
/// only logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    names: Row,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(names: Row) -> Self {
        let mut positions = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if positions.contains_key(name) {
                warn!(
                    "Duplicate header name '{}' at position {}, keeping position {}",
                    name, position, positions[name]
                );
                continue;
            }
            positions.insert(name.clone(), position);
        }

        Self { names, positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Header names in column order, duplicates included.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for HeaderIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        HeaderIndex::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Lookup view over one row, used by row mappers.
///
/// The variant is chosen once per reader:
/// - `Positional` resolves [`Column::Index`] keys only
/// - `Named` additionally resolves [`Column::Name`] keys through a header,
///   when one was read
///
/// `has` is false for a missing or empty cell; this is how optional fields
/// are expressed.
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::context::{Column, HeaderIndex, ParsingContext};
///
/// let header: HeaderIndex = ["first", "last", "age"].into_iter().collect();
/// let row = vec!["Klaus".to_string(), "".to_string()];
/// let context = ParsingContext::named(row, Some(&header));
///
/// assert_eq!(context.get(&Column::from("first")).unwrap(), "Klaus");
/// assert!(!context.has(&Column::from("last")));
/// assert!(!context.has(&Column::from("age")));
/// assert!(context.get(&Column::from("email")).is_err());
/// ```
#[derive(Debug, Clone)]
pub enum ParsingContext<'a> {
    Positional {
        row: Row,
    },
    Named {
        row: Row,
        header: Option<&'a HeaderIndex>,
    },
}

impl<'a> ParsingContext<'a> {
    pub fn positional(row: Row) -> Self {
        ParsingContext::Positional { row }
    }

    pub fn named(row: Row, header: Option<&'a HeaderIndex>) -> Self {
        ParsingContext::Named { row, header }
    }

    fn position(&self, column: &Column) -> Result<usize, BatchError> {
        match (self, column) {
            (_, Column::Index(index)) => Ok(*index),
            (ParsingContext::Named { header: Some(header), .. }, Column::Name(name)) => header
                .position(name)
                .ok_or_else(|| BatchError::UnknownColumn(name.clone())),
            (_, Column::Name(name)) => Err(BatchError::MissingHeaderMetadata(name.clone())),
        }
    }

    /// Returns the cell of `column`.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when the row is shorter than the column position
    /// - `UnknownColumn` when the name is not part of the header
    /// - `MissingHeaderMetadata` when a name is used without a header
    pub fn get(&self, column: &Column) -> Result<&str, BatchError> {
        let index = self.position(column)?;
        let row = self.raw();
        row.get(index)
            .map(String::as_str)
            .ok_or(BatchError::IndexOutOfRange {
                index,
                size: row.len(),
            })
    }

    /// Returns true if `column` resolves to a present, non-empty cell.
    pub fn has(&self, column: &Column) -> bool {
        self.position(column)
            .ok()
            .and_then(|index| self.raw().get(index))
            .is_some_and(|cell| !cell.is_empty())
    }

    pub fn raw(&self) -> &Row {
        match self {
            ParsingContext::Positional { row } | ParsingContext::Named { row, .. } => row,
        }
    }

    pub fn into_raw(self) -> Row {
        match self {
            ParsingContext::Positional { row } | ParsingContext::Named { row, .. } => row,
        }
    }

    pub fn header(&self) -> Option<&'a HeaderIndex> {
        match self {
            ParsingContext::Named { header, .. } => *header,
            ParsingContext::Positional { .. } => None,
        }
    }
}
