use log::debug;

use crate::{core::item::ItemReader, error::BatchError};

/// Bidirectional, random-access view over another reader.
///
/// Every record pulled from the inner reader is appended to a buffer that
/// never shrinks, so moving backwards or re-reading an index never touches
/// the inner reader again. The cursor is the index of the last returned
/// record and starts before the first one.
///
/// The cache is a read-only projection: [`remove`](Self::remove),
/// [`set`](Self::set) and [`add`](Self::add) always fail with
/// [`BatchError::Unsupported`].
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::cached_reader::CachedCsvReader;
/// use spring_batch_csv::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// let reader = CsvItemReaderBuilder::raw()
///     .from_reader("h\na\nb\nc\n".as_bytes())
///     .unwrap();
/// let mut cached = CachedCsvReader::new(reader);
///
/// assert_eq!(cached.next().unwrap(), &vec!["a"]);
/// assert_eq!(cached.next().unwrap(), &vec!["b"]);
/// assert_eq!(cached.previous().unwrap(), &vec!["a"]);
/// assert_eq!(cached.get(2).unwrap(), &vec!["c"]);
/// assert_eq!(cached.len(), 3);
/// ```
pub struct CachedCsvReader<T, R> {
    reader: R,
    buffer: Vec<T>,
    // index of the last returned record, plus one
    next: usize,
    exhausted: bool,
}

impl<T, R: ItemReader<T>> CachedCsvReader<T, R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            next: 0,
            exhausted: false,
        }
    }

    fn pull(&mut self) -> Result<bool, BatchError> {
        if self.exhausted {
            return Ok(false);
        }
        match self.reader.read()? {
            Some(record) => {
                self.buffer.push(record);
                Ok(true)
            }
            None => {
                debug!("Inner reader exhausted after {} records", self.buffer.len());
                self.exhausted = true;
                Ok(false)
            }
        }
    }

    /// Returns true if a record follows the cursor, pulling at most one
    /// record from the inner reader to find out.
    pub fn has_next(&mut self) -> Result<bool, BatchError> {
        if self.next < self.buffer.len() {
            return Ok(true);
        }
        self.pull()
    }

    pub fn next(&mut self) -> Result<&T, BatchError> {
        if !self.has_next()? {
            return Err(BatchError::NoSuchElement {
                index: self.next as isize,
                buffered: self.buffer.len(),
            });
        }
        self.next += 1;
        Ok(&self.buffer[self.next - 1])
    }

    pub fn has_previous(&self) -> bool {
        self.next > 1
    }

    /// Moves the cursor back by one and returns the record it lands on.
    pub fn previous(&mut self) -> Result<&T, BatchError> {
        if !self.has_previous() {
            return Err(BatchError::NoSuchElement {
                index: self.next as isize - 2,
                buffered: self.buffer.len(),
            });
        }
        self.next -= 1;
        Ok(&self.buffer[self.next - 1])
    }

    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Index `previous` would return, `None` while the cursor is on the
    /// first record or before it.
    pub fn previous_index(&self) -> Option<usize> {
        self.next.checked_sub(2)
    }

    /// Returns the record at `index`, reading ahead as far as needed.
    ///
    /// The cursor does not move.
    ///
    /// # Errors
    /// `IndexOutOfRange` when the input ends before `index`.
    pub fn get(&mut self, index: usize) -> Result<&T, BatchError> {
        while self.buffer.len() <= index && self.pull()? {}

        let size = self.buffer.len();
        self.buffer
            .get(index)
            .ok_or(BatchError::IndexOutOfRange { index, size })
    }

    /// Number of records materialized so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn remove(&mut self) -> Result<(), BatchError> {
        Err(BatchError::Unsupported("remove"))
    }

    pub fn set(&mut self, _record: T) -> Result<(), BatchError> {
        Err(BatchError::Unsupported("set"))
    }

    pub fn add(&mut self, _record: T) -> Result<(), BatchError> {
        Err(BatchError::Unsupported("add"))
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
