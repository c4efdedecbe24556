use std::{
    cell::RefCell,
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
};

use log::{debug, error};

use crate::{
    core::item::{ItemReader, ItemReaderResult},
    error::BatchError,
};

use super::{
    context::{HeaderIndex, ParsingContext, Row},
    mapper::{EntryFilter, RawRowMapper, RowMapper},
    strategy::CsvStrategy,
    tokenizer::{QuoteAwareTokenizer, Tokenizer},
};

/// A sequential source of physical lines.
///
/// Implemented for every [`BufRead`]: line terminators (`\n` or `\r\n`) are
/// stripped and `Ok(None)` marks the end of the input.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<B: BufRead> LineSource for B {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// Counts the continuation lines a tokenizer pulls.
struct CountingSource<'a> {
    inner: &'a mut dyn LineSource,
    count: &'a mut usize,
}

impl LineSource for CountingSource<'_> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let line = self.inner.next_line()?;
        if line.is_some() {
            *self.count += 1;
        }
        Ok(line)
    }
}

struct ReaderState {
    source: Option<Box<dyn LineSource>>,
    header: Option<HeaderIndex>,
    line_consumed: bool,
    exhausted: bool,
    line_number: usize,
}

impl ReaderState {
    fn source(&mut self) -> Result<&mut Box<dyn LineSource>, BatchError> {
        self.source
            .as_mut()
            .ok_or_else(|| BatchError::InvalidState("the reader is closed".to_string()))
    }

    fn next_line(&mut self) -> Result<Option<String>, BatchError> {
        let line = self.source()?.next_line()?;
        if line.is_some() {
            self.line_consumed = true;
            self.line_number += 1;
        }
        Ok(line)
    }

    fn tokenize(
        &mut self,
        tokenizer: &dyn Tokenizer,
        strategy: &CsvStrategy,
        line: &str,
    ) -> Result<Row, BatchError> {
        let start = self.line_number;
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| BatchError::InvalidState("the reader is closed".to_string()))?;
        let mut continuation = CountingSource {
            inner: source.as_mut(),
            count: &mut self.line_number,
        };

        tokenizer
            .tokenize(line, strategy, &mut continuation)
            .map_err(|error| match error {
                BatchError::MalformedRow(message) => {
                    BatchError::MalformedRow(format!("line {}: {}", start, message))
                }
                other => other,
            })
    }
}

/// Reads delimited text into records of type `T`.
///
/// The reader pulls physical lines from its source, skips the header line,
/// comment lines and (optionally) empty lines, tokenizes each row, maps it
/// with its [`RowMapper`] and hands out the records its [`EntryFilter`]
/// accepts.
///
/// Once the input is exhausted every further read returns `Ok(None)`. A row
/// that fails to tokenize or map is consumed: the error is returned and the
/// next read continues with the following row.
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::csv_reader::CsvItemReaderBuilder;
///
/// let data = "first;last;age\nHans;\"im \"\"Glück\"\"\";16\n# comment\n\nKlaus;Meyer;33\n";
///
/// let reader = CsvItemReaderBuilder::raw().from_reader(data.as_bytes()).unwrap();
/// let rows = reader.read_all().unwrap();
///
/// assert_eq!(rows, vec![
///     vec!["Hans", "im \"Glück\"", "16"],
///     vec!["Klaus", "Meyer", "33"],
/// ]);
/// ```
pub struct CsvItemReader<T> {
    strategy: CsvStrategy,
    tokenizer: Box<dyn Tokenizer>,
    mapper: Box<dyn RowMapper<T>>,
    filter: Option<Box<dyn EntryFilter<T>>>,
    named_columns: bool,
    state: RefCell<ReaderState>,
}

impl<T> CsvItemReader<T> {
    /// Reads the first row as header.
    ///
    /// Must be the first call on the reader. With named columns the header
    /// is used to resolve column names for every following row.
    ///
    /// # Errors
    /// `InvalidState` when a line was already consumed or the input is empty.
    pub fn read_header(&self) -> Result<Row, BatchError> {
        let mut state = self.state.borrow_mut();
        if state.line_consumed {
            return Err(BatchError::InvalidState(
                "the header must be read before any record".to_string(),
            ));
        }

        let line = state.next_line()?.ok_or_else(|| {
            BatchError::InvalidState("end of input reached while reading the header".to_string())
        })?;
        let header = state.tokenize(self.tokenizer.as_ref(), &self.strategy, &line)?;
        debug!("Read header: {:?}", header);

        if self.named_columns {
            state.header = Some(HeaderIndex::new(header.clone()));
        }
        Ok(header)
    }

    /// Reads the next accepted record, `Ok(None)` once the input is exhausted.
    pub fn read_next(&self) -> ItemReaderResult<T> {
        let mut state = self.state.borrow_mut();
        if state.exhausted {
            return Ok(None);
        }

        if self.strategy.skip_header() && !state.line_consumed {
            match state.next_line()? {
                Some(line) if self.named_columns => {
                    let header = state.tokenize(self.tokenizer.as_ref(), &self.strategy, &line)?;
                    debug!("Indexed skipped header: {:?}", header);
                    state.header = Some(HeaderIndex::new(header));
                }
                Some(_) => debug!("Skipped header line"),
                None => {
                    state.exhausted = true;
                    return Ok(None);
                }
            }
        }

        loop {
            let Some(line) = state.next_line()? else {
                debug!("End of input after {} lines", state.line_number);
                state.exhausted = true;
                return Ok(None);
            };

            if self.strategy.is_comment(&line)
                || (line.is_empty() && self.strategy.ignore_empty_lines())
            {
                debug!("Skipping line {}", state.line_number);
                continue;
            }

            let row = state.tokenize(self.tokenizer.as_ref(), &self.strategy, &line)?;
            let context = if self.named_columns {
                ParsingContext::named(row, state.header.as_ref())
            } else {
                ParsingContext::positional(row)
            };
            let record = self.mapper.map_row(&context)?;

            if let Some(filter) = &self.filter {
                if !filter.accept(&record) {
                    debug!("Record of line {} rejected by filter", state.line_number);
                    continue;
                }
            }

            return Ok(Some(record));
        }
    }

    /// Reads every remaining record, aborting on the first error.
    pub fn read_all(&self) -> Result<Vec<T>, BatchError> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Forward-only view over the remaining records.
    pub fn iter(&self) -> Records<'_, T> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Releases the underlying source. Later reads fail with `InvalidState`.
    pub fn close(&self) {
        let mut state = self.state.borrow_mut();
        if state.source.take().is_some() {
            debug!("Closed reader after {} lines", state.line_number);
        }
    }

    /// The header index, when the reader uses named columns and read one.
    pub fn header(&self) -> Option<HeaderIndex> {
        self.state.borrow().header.clone()
    }

    /// Number of physical lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.state.borrow().line_number
    }

    pub fn strategy(&self) -> &CsvStrategy {
        &self.strategy
    }
}

impl<T> ItemReader<T> for CsvItemReader<T> {
    fn read(&self) -> ItemReaderResult<T> {
        self.read_next()
    }
}

/// Pulls the next record for the iterators.
///
/// A closed reader or a failing source ends the sequence after its error was
/// yielded once. Row errors do not: the row is consumed and iteration goes on.
fn next_record<T>(reader: &CsvItemReader<T>, done: &mut bool) -> Option<Result<T, BatchError>> {
    if *done {
        return None;
    }
    match reader.read_next() {
        Ok(Some(record)) => Some(Ok(record)),
        Ok(None) => {
            *done = true;
            None
        }
        Err(error @ (BatchError::Io(_) | BatchError::InvalidState(_))) => {
            debug!("Ending iteration after: {}", error);
            *done = true;
            Some(Err(error))
        }
        Err(error) => Some(Err(error)),
    }
}

/// Iterator over the records of a borrowed [`CsvItemReader`].
///
/// Read failures are yielded as `Some(Err(_))`. The iterator ends with
/// `None` once the input is exhausted, and right after an I/O failure or a
/// read from a closed reader was yielded.
pub struct Records<'r, T> {
    reader: &'r CsvItemReader<T>,
    done: bool,
}

impl<T> Iterator for Records<'_, T> {
    type Item = Result<T, BatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        next_record(self.reader, &mut self.done)
    }
}

/// Iterator owning its [`CsvItemReader`], ending like [`Records`].
pub struct IntoRecords<T> {
    reader: CsvItemReader<T>,
    done: bool,
}

impl<T> Iterator for IntoRecords<T> {
    type Item = Result<T, BatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        next_record(&self.reader, &mut self.done)
    }
}

impl<T> IntoIterator for CsvItemReader<T> {
    type Item = Result<T, BatchError>;
    type IntoIter = IntoRecords<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoRecords {
            reader: self,
            done: false,
        }
    }
}

impl<'r, T> IntoIterator for &'r CsvItemReader<T> {
    type Item = Result<T, BatchError>;
    type IntoIter = Records<'r, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A builder for configuring delimited-text readers.
///
/// # Default Configuration
///
/// - Strategy: [`CsvStrategy::DEFAULT`]
/// - Tokenizer: [`QuoteAwareTokenizer`]
/// - Columns: positional
/// - No mapper (use [`CsvItemReaderBuilder::raw`] for raw rows) and no filter
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::csv_reader::CsvItemReaderBuilder;
/// use spring_batch_csv::item::csv::context::{Column, ParsingContext};
/// use spring_batch_csv::item::csv::strategy::CsvStrategy;
/// use spring_batch_csv::error::BatchError;
///
/// let data = "city,pop\nBoston,4628910\nConcord,42695\n";
///
/// let reader = CsvItemReaderBuilder::new()
///     .strategy(CsvStrategy::new(',', '"', '#', true, true))
///     .named_columns(true)
///     .mapper(|context: &ParsingContext<'_>| -> Result<String, BatchError> {
///         Ok(context.get(&Column::from("city"))?.to_uppercase())
///     })
///     .filter(|city: &String| city.starts_with('B'))
///     .from_reader(data.as_bytes())
///     .unwrap();
///
/// assert_eq!(reader.read_all().unwrap(), vec!["BOSTON"]);
/// ```
pub struct CsvItemReaderBuilder<T> {
    strategy: CsvStrategy,
    tokenizer: Box<dyn Tokenizer>,
    mapper: Option<Box<dyn RowMapper<T>>>,
    filter: Option<Box<dyn EntryFilter<T>>>,
    named_columns: bool,
}

impl<T> Default for CsvItemReaderBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvItemReaderBuilder<Row> {
    /// Creates a builder whose records are the raw rows.
    pub fn raw() -> Self {
        Self::new().mapper(RawRowMapper)
    }
}

impl<T> CsvItemReaderBuilder<T> {
    pub fn new() -> Self {
        Self {
            strategy: CsvStrategy::DEFAULT,
            tokenizer: Box::new(QuoteAwareTokenizer),
            mapper: None,
            filter: None,
            named_columns: false,
        }
    }

    pub fn strategy(mut self, strategy: CsvStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn tokenizer<K: Tokenizer + 'static>(mut self, tokenizer: K) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn mapper<M: RowMapper<T> + 'static>(mut self, mapper: M) -> Self {
        self.mapper = Some(Box::new(mapper));
        self
    }

    pub fn filter<F: EntryFilter<T> + 'static>(mut self, filter: F) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Resolves columns by header name.
    ///
    /// The header is taken from [`CsvItemReader::read_header`] or, when the
    /// strategy skips the header, from the skipped line.
    pub fn named_columns(mut self, yes: bool) -> Self {
        self.named_columns = yes;
        self
    }

    /// Creates a reader pulling lines from `source`.
    ///
    /// # Errors
    /// `InvalidState` when no mapper was configured.
    pub fn from_source<S: LineSource + 'static>(self, source: S) -> Result<CsvItemReader<T>, BatchError> {
        let mapper = self.mapper.ok_or_else(|| {
            BatchError::InvalidState("a row mapper is required to build a reader".to_string())
        })?;

        Ok(CsvItemReader {
            strategy: self.strategy,
            tokenizer: self.tokenizer,
            mapper,
            filter: self.filter,
            named_columns: self.named_columns,
            state: RefCell::new(ReaderState {
                source: Some(Box::new(source)),
                header: None,
                line_consumed: false,
                exhausted: false,
                line_number: 0,
            }),
        })
    }

    pub fn from_reader<R: Read + 'static>(self, rdr: R) -> Result<CsvItemReader<T>, BatchError> {
        self.from_source(BufReader::new(rdr))
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemReader<T>, BatchError> {
        let file_path = path.as_ref();
        let file = File::open(file_path).map_err(|e| {
            error!("Failed to open CSV file {}: {}", file_path.display(), e);
            BatchError::ItemReader(format!(
                "Failed to open CSV file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        self.from_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use super::{CsvItemReaderBuilder, LineSource};
    use crate::{
        core::item::ItemReader,
        error::BatchError,
        item::csv::{
            context::{Column, ParsingContext, Row},
            strategy::CsvStrategy,
            tokenizer::SimpleTokenizer,
        },
    };

    /// Yields its data once, then fails every read.
    struct FailingRead {
        data: &'static [u8],
    }

    impl Read for FailingRead {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::other("device unplugged"));
            }
            let n = buf.len().min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn line_source_should_strip_terminators() {
        let mut source: &[u8] = b"a\r\nb\n\nc";
        assert_eq!(source.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("c"));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn header_comments_and_empty_lines_should_be_skipped() {
        let data = "first;last;age\n# comment\nHans;\"im \"\"Glück\"\"\";16\n\nKlaus;Meyer;33\n";
        let reader = CsvItemReaderBuilder::raw().from_reader(data.as_bytes()).unwrap();

        assert_eq!(reader.read_next().unwrap(), Some(row(&["Hans", "im \"Glück\"", "16"])));
        assert_eq!(reader.read_next().unwrap(), Some(row(&["Klaus", "Meyer", "33"])));
        assert_eq!(reader.read_next().unwrap(), None);
        assert_eq!(reader.read_next().unwrap(), None);
        assert_eq!(reader.line_number(), 5);
    }

    #[test]
    fn empty_lines_should_yield_empty_rows_when_not_ignored() {
        let strategy = CsvStrategy::new(';', '"', '#', false, false);
        let reader = CsvItemReaderBuilder::raw()
            .strategy(strategy)
            .from_reader("a\n\nb".as_bytes())
            .unwrap();

        assert_eq!(
            reader.read_all().unwrap(),
            vec![row(&["a"]), Vec::new(), row(&["b"])]
        );
    }

    #[test]
    fn filter_should_consume_rejected_rows() {
        let reader = CsvItemReaderBuilder::raw()
            .strategy(CsvStrategy::UK_DEFAULT)
            .filter(|row: &Row| row[1] != "skip")
            .from_reader("1,keep\n2,skip\n3,keep\n4,skip".as_bytes())
            .unwrap();

        let ids: Vec<String> = reader
            .read_all()
            .unwrap()
            .into_iter()
            .map(|row| row[0].clone())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn explicit_header_read_should_replace_the_automatic_skip() {
        let reader = CsvItemReaderBuilder::raw()
            .from_reader("first;last\nHans;Meyer\n".as_bytes())
            .unwrap();

        assert_eq!(reader.read_header().unwrap(), row(&["first", "last"]));
        assert_eq!(reader.read_all().unwrap(), vec![row(&["Hans", "Meyer"])]);
    }

    #[test]
    fn header_should_not_be_readable_after_a_record() {
        let reader = CsvItemReaderBuilder::raw()
            .strategy(CsvStrategy::UK_DEFAULT)
            .from_reader("a,b\nc,d\n".as_bytes())
            .unwrap();

        reader.read_next().unwrap();
        assert!(matches!(reader.read_header(), Err(BatchError::InvalidState(_))));

        let empty = CsvItemReaderBuilder::raw().from_reader(io::empty()).unwrap();
        assert!(matches!(empty.read_header(), Err(BatchError::InvalidState(_))));
    }

    #[test]
    fn named_columns_should_use_the_header_read() {
        let mapper = |context: &ParsingContext<'_>| -> Result<String, BatchError> {
            Ok(format!(
                "{} {}",
                context.get(&Column::from("first"))?,
                context.get(&Column::from("last"))?
            ))
        };

        let explicit = CsvItemReaderBuilder::new()
            .strategy(CsvStrategy::UK_DEFAULT)
            .named_columns(true)
            .mapper(mapper)
            .from_reader("last,first\nMeyer,Klaus\n".as_bytes())
            .unwrap();
        explicit.read_header().unwrap();
        assert_eq!(explicit.read_all().unwrap(), vec!["Klaus Meyer"]);
        assert_eq!(explicit.header().unwrap().position("first"), Some(1));

        let skipped = CsvItemReaderBuilder::new()
            .named_columns(true)
            .mapper(mapper)
            .from_reader("last;first\nZola;Léo\n".as_bytes())
            .unwrap();
        assert_eq!(skipped.read_all().unwrap(), vec!["Léo Zola"]);

        let headless = CsvItemReaderBuilder::new()
            .strategy(CsvStrategy::UK_DEFAULT)
            .named_columns(true)
            .mapper(mapper)
            .from_reader("Meyer,Klaus\n".as_bytes())
            .unwrap();
        assert!(matches!(
            headless.read_next(),
            Err(BatchError::MissingHeaderMetadata(_))
        ));
    }

    #[test]
    fn quoted_newlines_should_be_part_of_the_field() {
        let data = "id;text\n1;\"line one\nline two\"\n2;plain\n";
        let reader = CsvItemReaderBuilder::raw().from_reader(data.as_bytes()).unwrap();

        assert_eq!(
            reader.read_all().unwrap(),
            vec![row(&["1", "line one\nline two"]), row(&["2", "plain"])]
        );
        assert_eq!(reader.line_number(), 4);
    }

    #[test]
    fn unterminated_quote_should_name_the_starting_line() {
        let reader = CsvItemReaderBuilder::raw()
            .from_reader("h\nok\n\"broken\nstill open".as_bytes())
            .unwrap();

        assert_eq!(reader.read_next().unwrap(), Some(row(&["ok"])));
        match reader.read_next() {
            Err(BatchError::MalformedRow(message)) => assert!(message.starts_with("line 3:")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(reader.read_next().unwrap(), None);
    }

    #[test]
    fn failed_row_should_not_stop_later_reads() {
        let reader = CsvItemReaderBuilder::new()
            .strategy(CsvStrategy::UK_DEFAULT)
            .mapper(|context: &ParsingContext<'_>| -> Result<u32, BatchError> {
                context
                    .get(&Column::Index(0))?
                    .parse::<u32>()
                    .map_err(|e| BatchError::ItemReader(e.to_string()))
            })
            .from_reader("1\nx\n3\n".as_bytes())
            .unwrap();

        assert_eq!(reader.read_next().unwrap(), Some(1));
        assert!(reader.read_next().is_err());
        assert_eq!(reader.read_next().unwrap(), Some(3));
    }

    #[test]
    fn iterator_should_surface_io_errors() {
        let reader = CsvItemReaderBuilder::raw()
            .strategy(CsvStrategy::UK_DEFAULT)
            .from_reader(FailingRead { data: b"a,b\n" })
            .unwrap();

        let mut records = reader.iter();
        assert_eq!(records.next().unwrap().unwrap(), row(&["a", "b"]));
        assert!(matches!(records.next(), Some(Err(BatchError::Io(_)))));
        assert!(records.next().is_none());
        assert!(records.next().is_none());
    }

    #[test]
    fn iterating_a_closed_reader_should_fail_once() {
        let reader = CsvItemReaderBuilder::raw().from_reader("h
a
b
".as_bytes()).unwrap();
        reader.close();

        let mut records = reader.iter();
        assert!(matches!(records.next(), Some(Err(BatchError::InvalidState(_)))));
        assert!(records.next().is_none());

        assert_eq!(reader.iter().count(), 1);
        assert_eq!(reader.into_iter().count(), 1);
    }

    #[test]
    fn iterator_should_continue_after_row_errors() {
        let reader = CsvItemReaderBuilder::new()
            .strategy(CsvStrategy::UK_DEFAULT)
            .mapper(|context: &ParsingContext<'_>| -> Result<u32, BatchError> {
                context
                    .get(&Column::Index(0))?
                    .parse::<u32>()
                    .map_err(|e| BatchError::ItemReader(e.to_string()))
            })
            .from_reader("1\nx\n3\n".as_bytes())
            .unwrap();

        let results: Vec<Result<u32, BatchError>> = reader.iter().collect();
        assert_eq!(results.len(), 3);
        assert_eq!(*results[0].as_ref().unwrap(), 1);
        assert!(matches!(results[1], Err(BatchError::ItemReader(_))));
        assert_eq!(*results[2].as_ref().unwrap(), 3);
    }

    #[test]
    fn iterator_should_end_with_none() {
        let reader = CsvItemReaderBuilder::raw()
            .tokenizer(SimpleTokenizer)
            .from_reader("h\na;b\nc;d".as_bytes())
            .unwrap();

        let rows: Vec<Row> = reader.into_iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);

        let reader = CsvItemReaderBuilder::raw().from_reader("h\n".as_bytes()).unwrap();
        let mut records = (&reader).into_iter();
        assert!(records.next().is_none());
        assert!(records.next().is_none());
    }

    #[test]
    fn close_should_be_idempotent() {
        let reader = CsvItemReaderBuilder::raw().from_reader("h\na\n".as_bytes()).unwrap();

        reader.close();
        reader.close();
        assert!(matches!(reader.read_next(), Err(BatchError::InvalidState(_))));

        let untouched = CsvItemReaderBuilder::raw().from_reader(io::empty()).unwrap();
        untouched.close();
    }

    #[test]
    fn builder_without_mapper_should_fail() {
        let result = CsvItemReaderBuilder::<u32>::new().from_reader(io::empty());
        assert!(matches!(result, Err(BatchError::InvalidState(_))));
    }

    #[test]
    fn reader_should_implement_item_reader() {
        let reader = CsvItemReaderBuilder::raw().from_reader("h\nx".as_bytes()).unwrap();
        let item_reader: &dyn ItemReader<Row> = &reader;

        assert_eq!(item_reader.read().unwrap(), Some(row(&["x"])));
        assert_eq!(item_reader.read().unwrap(), None);
    }
}
