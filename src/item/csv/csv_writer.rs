use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, error};

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    error::BatchError,
};

use super::{
    context::Row,
    joiner::{ColumnJoiner, QuotingColumnJoiner},
    mapper::{RawRowSerializer, RowSerializer},
    strategy::CsvStrategy,
};

#[cfg(windows)]
const LINE_TERMINATOR: &str = "\r\n";
#[cfg(not(windows))]
const LINE_TERMINATOR: &str = "\n";

/// Writes records of type `T` as delimited text.
///
/// Each record is turned into a row by the [`RowSerializer`], joined by the
/// [`ColumnJoiner`] and written with the line terminator appended. Output is
/// not buffered by the writer itself; wrap the sink in a [`BufWriter`] when
/// needed (`from_path` does).
pub struct CsvItemWriter<W: Write, T> {
    strategy: CsvStrategy,
    joiner: Box<dyn ColumnJoiner>,
    serializer: Box<dyn RowSerializer<T>>,
    line_terminator: String,
    output: RefCell<Option<W>>,
    lines_written: Cell<usize>,
}

impl<W: Write, T> CsvItemWriter<W, T> {
    fn write_line(&self, fields: &[String]) -> Result<(), BatchError> {
        let mut line = self.joiner.join(fields, &self.strategy);
        line.push_str(&self.line_terminator);

        let mut output = self.output.borrow_mut();
        let sink = output
            .as_mut()
            .ok_or_else(|| BatchError::InvalidState("the writer is closed".to_string()))?;
        sink.write_all(line.as_bytes())
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        self.lines_written.set(self.lines_written.get() + 1);
        Ok(())
    }

    /// Writes one record as one line.
    pub fn write(&self, item: &T) -> Result<(), BatchError> {
        let row = self.serializer.to_row(item)?;
        self.write_line(&row)
    }

    /// Writes records in order, stopping at the first failure.
    pub fn write_all<'a, I>(&self, items: I) -> Result<(), BatchError>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        for item in items {
            self.write(item)?;
        }
        Ok(())
    }

    /// Writes a header line, joined and quoted like any other row.
    pub fn write_header(&self, names: &[&str]) -> Result<(), BatchError> {
        let row: Row = names.iter().map(|name| name.to_string()).collect();
        self.write_line(&row)
    }

    pub fn flush(&self) -> Result<(), BatchError> {
        match self.output.borrow_mut().as_mut() {
            Some(sink) => sink
                .flush()
                .map_err(|error| BatchError::ItemWriter(error.to_string())),
            None => Ok(()),
        }
    }

    /// Flushes and releases the sink. Calling it again has no effect.
    pub fn close(&self) -> Result<(), BatchError> {
        self.flush()?;
        if self.output.borrow_mut().take().is_some() {
            debug!("Closed writer after {} lines", self.lines_written.get());
        }
        Ok(())
    }

    /// Flushes and returns the sink.
    ///
    /// # Errors
    /// `InvalidState` when the writer was closed.
    pub fn into_inner(self) -> Result<W, BatchError> {
        self.flush()?;
        self.output
            .into_inner()
            .ok_or_else(|| BatchError::InvalidState("the writer is closed".to_string()))
    }

    /// Number of lines written so far, header included.
    pub fn lines_written(&self) -> usize {
        self.lines_written.get()
    }
}

impl<W: Write, T> ItemWriter<T> for CsvItemWriter<W, T> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        self.write_all(items)
    }

    fn flush(&self) -> ItemWriterResult {
        CsvItemWriter::flush(self)
    }

    fn close(&self) -> ItemWriterResult {
        CsvItemWriter::close(self)
    }
}

/// A builder for configuring delimited-text writers.
///
/// # Default Configuration
///
/// - Strategy: [`CsvStrategy::DEFAULT`]
/// - Joiner: [`QuotingColumnJoiner`]
/// - Line terminator: `\r\n` on Windows, `\n` elsewhere
/// - No serializer (use [`CsvItemWriterBuilder::raw`] to write raw rows)
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::csv_writer::CsvItemWriterBuilder;
///
/// let writer = CsvItemWriterBuilder::raw()
///     .line_terminator("\n")
///     .from_writer(vec![])
///     .unwrap();
///
/// writer.write_header(&["city", "note"]).unwrap();
/// writer.write(&vec!["Boston".to_string(), "big; old".to_string()]).unwrap();
///
/// let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "city;note\nBoston;\"big; old\"\n");
/// ```
pub struct CsvItemWriterBuilder<T> {
    strategy: CsvStrategy,
    joiner: Box<dyn ColumnJoiner>,
    serializer: Option<Box<dyn RowSerializer<T>>>,
    line_terminator: String,
}

impl<T> Default for CsvItemWriterBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemWriterBuilder<Row> {
    /// Creates a builder writing raw rows.
    pub fn raw() -> Self {
        Self::new().serializer(RawRowSerializer)
    }
}

impl<T> CsvItemWriterBuilder<T> {
    pub fn new() -> Self {
        Self {
            strategy: CsvStrategy::DEFAULT,
            joiner: Box::new(QuotingColumnJoiner),
            serializer: None,
            line_terminator: LINE_TERMINATOR.to_string(),
        }
    }

    pub fn strategy(mut self, strategy: CsvStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn joiner<J: ColumnJoiner + 'static>(mut self, joiner: J) -> Self {
        self.joiner = Box::new(joiner);
        self
    }

    pub fn serializer<S: RowSerializer<T> + 'static>(mut self, serializer: S) -> Self {
        self.serializer = Some(Box::new(serializer));
        self
    }

    pub fn line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.line_terminator = terminator.into();
        self
    }

    /// # Errors
    /// `InvalidState` when no serializer was configured.
    pub fn from_writer<W: Write>(self, wtr: W) -> Result<CsvItemWriter<W, T>, BatchError> {
        let serializer = self.serializer.ok_or_else(|| {
            BatchError::InvalidState("a row serializer is required to build a writer".to_string())
        })?;

        Ok(CsvItemWriter {
            strategy: self.strategy,
            joiner: self.joiner,
            serializer,
            line_terminator: self.line_terminator,
            output: RefCell::new(Some(wtr)),
            lines_written: Cell::new(0),
        })
    }

    pub fn from_path<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<CsvItemWriter<BufWriter<File>, T>, BatchError> {
        let file_path = path.as_ref();
        let file = File::create(file_path).map_err(|e| {
            error!("Failed to create CSV file {}: {}", file_path.display(), e);
            BatchError::ItemWriter(format!(
                "Failed to create CSV file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        self.from_writer(BufWriter::new(file))
    }
}
