use crate::error::BatchError;

/// Result of a single read: `Ok(None)` signals the end of the data.
pub type ItemReaderResult<R> = Result<Option<R>, BatchError>;

/// Result of writing a batch of items.
pub type ItemWriterResult = Result<(), BatchError>;

/// Retrieval of input, one item at a time.
pub trait ItemReader<R> {
    /// Reads the next item.
    ///
    /// # Returns
    /// - `Ok(Some(item))` when an item was read
    /// - `Ok(None)` once the source is exhausted, on every later call too
    /// - `Err(BatchError)` when the item could not be read or mapped
    fn read(&self) -> ItemReaderResult<R>;
}

/// Output of items, one batch at a time.
pub trait ItemWriter<W> {
    fn write(&self, items: &[W]) -> ItemWriterResult;

    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}
