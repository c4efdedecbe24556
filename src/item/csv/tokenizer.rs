use crate::error::BatchError;

use super::{context::Row, csv_reader::LineSource, strategy::CsvStrategy};

/// Splits one logical row into its fields.
///
/// A logical row may span several physical lines when a quoted field
/// contains line breaks: the tokenizer pulls the extra lines it needs from
/// `continuation`, which is the same source the reader reads rows from.
pub trait Tokenizer {
    fn tokenize(
        &self,
        line: &str,
        strategy: &CsvStrategy,
        continuation: &mut dyn LineSource,
    ) -> Result<Row, BatchError>;
}

/// Quote-aware tokenizer.
///
/// - an unquoted delimiter closes the current field
/// - an unquoted quote character opens a quoted span and is not emitted
/// - inside a quoted span, a doubled quote emits one literal quote
/// - inside a quoted span, a quote followed by anything else closes the span
/// - a physical line ending inside a quoted span contributes a `\n` to the
///   field and the next physical line is pulled from the continuation source
///
/// Fields are never trimmed or coalesced. An empty line yields no fields.
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::strategy::CsvStrategy;
/// use spring_batch_csv::item::csv::tokenizer::{QuoteAwareTokenizer, Tokenizer};
///
/// let mut rest: &[u8] = b"second line\";x";
/// let row = QuoteAwareTokenizer
///     .tokenize("a;\"first", &CsvStrategy::DEFAULT, &mut rest)
///     .unwrap();
///
/// assert_eq!(row, vec!["a", "first\nsecond line", "x"]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct QuoteAwareTokenizer;

impl Tokenizer for QuoteAwareTokenizer {
    fn tokenize(
        &self,
        line: &str,
        strategy: &CsvStrategy,
        continuation: &mut dyn LineSource,
    ) -> Result<Row, BatchError> {
        if line.is_empty() {
            return Ok(Vec::new());
        }

        let delimiter = strategy.delimiter();
        let quote = strategy.quote();

        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut current = line.to_owned();
        let mut physical_lines = 1;

        loop {
            let mut chars = current.chars().peekable();
            while let Some(c) = chars.next() {
                if quoted {
                    if c == quote {
                        if chars.peek() == Some(&quote) {
                            field.push(quote);
                            chars.next();
                        } else {
                            quoted = false;
                        }
                    } else {
                        field.push(c);
                    }
                } else if c == delimiter {
                    fields.push(std::mem::take(&mut field));
                } else if c == quote {
                    quoted = true;
                } else {
                    field.push(c);
                }
            }

            if !quoted {
                break;
            }

            field.push('\n');
            current = continuation.next_line()?.ok_or_else(|| {
                BatchError::MalformedRow(format!(
                    "end of input inside a quoted field after {} line(s)",
                    physical_lines
                ))
            })?;
            physical_lines += 1;
        }

        fields.push(field);
        Ok(fields)
    }
}

/// Tokenizer splitting on the delimiter only, for input known to contain no quoting.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleTokenizer;

impl Tokenizer for SimpleTokenizer {
    fn tokenize(
        &self,
        line: &str,
        strategy: &CsvStrategy,
        _continuation: &mut dyn LineSource,
    ) -> Result<Row, BatchError> {
        if line.is_empty() {
            return Ok(Vec::new());
        }
        Ok(line.split(strategy.delimiter()).map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use rand::distr::{Alphanumeric, SampleString};

    use super::{QuoteAwareTokenizer, SimpleTokenizer, Tokenizer};
    use crate::{error::BatchError, item::csv::strategy::CsvStrategy};

    fn tokenize(line: &str) -> Result<Vec<String>, BatchError> {
        let mut empty: &[u8] = b"";
        QuoteAwareTokenizer.tokenize(line, &CsvStrategy::DEFAULT, &mut empty)
    }

    #[test]
    fn empty_line_should_yield_no_fields() {
        for strategy in [CsvStrategy::DEFAULT, CsvStrategy::UK_DEFAULT] {
            let mut empty: &[u8] = b"";
            let row = QuoteAwareTokenizer
                .tokenize("", &strategy, &mut empty)
                .unwrap();
            assert!(row.is_empty());

            let row = SimpleTokenizer.tokenize("", &strategy, &mut empty).unwrap();
            assert!(row.is_empty());
        }
    }

    #[test]
    fn empty_fields_should_be_preserved() {
        assert_eq!(tokenize(";").unwrap(), vec!["", ""]);
        assert_eq!(tokenize("a;;b;").unwrap(), vec!["a", "", "b", ""]);
        assert_eq!(tokenize(" a ; b ").unwrap(), vec![" a ", " b "]);
    }

    #[test]
    fn quoted_delimiters_should_not_split() {
        assert_eq!(
            tokenize("Hans;\"Meyer;Schmidt\";16").unwrap(),
            vec!["Hans", "Meyer;Schmidt", "16"]
        );
    }

    #[test]
    fn doubled_quotes_should_be_unescaped() {
        assert_eq!(
            tokenize("Hans;\"im \"\"Glück\"\"\";16").unwrap(),
            vec!["Hans", "im \"Glück\"", "16"]
        );
        assert_eq!(tokenize("\"\"").unwrap(), vec![""]);
        assert_eq!(tokenize("\"\";x").unwrap(), vec!["", "x"]);
    }

    #[test]
    fn quote_inside_unquoted_field_should_open_a_quoted_span() {
        assert_eq!(tokenize("im \"Glück;ab\"er;2").unwrap(), vec!["im Glück;aber", "2"]);
    }

    #[test]
    fn quoted_field_should_span_physical_lines() {
        let mut rest: &[u8] = b"line two\nline three\";end\nnot consumed";
        let row = QuoteAwareTokenizer
            .tokenize("start;\"line one", &CsvStrategy::DEFAULT, &mut rest)
            .unwrap();

        assert_eq!(row, vec!["start", "line one\nline two\nline three", "end"]);
        assert_eq!(rest, b"not consumed");
    }

    #[test]
    fn unterminated_quote_should_fail() {
        let result = tokenize("a;\"never closed");
        assert!(matches!(result, Err(BatchError::MalformedRow(_))));
    }

    #[test]
    fn custom_strategy_characters_should_be_honoured() {
        let strategy = CsvStrategy::new('|', '\'', '%', false, false);
        let mut empty: &[u8] = b"";
        let row = QuoteAwareTokenizer
            .tokenize("a|'b|c'|'it''s'", &strategy, &mut empty)
            .unwrap();
        assert_eq!(row, vec!["a", "b|c", "it's"]);
    }

    #[test]
    fn simple_tokenizer_should_ignore_quotes() {
        let mut empty: &[u8] = b"";
        let row = SimpleTokenizer
            .tokenize("a;\"b;c\"", &CsvStrategy::DEFAULT, &mut empty)
            .unwrap();
        assert_eq!(row, vec!["a", "\"b", "c\""]);
    }

    #[test]
    fn field_count_should_be_delimiter_count_plus_one() {
        for _ in 0..500 {
            // digits become delimiters, everything else stays literal
            let line: String = Alphanumeric
                .sample_string(&mut rand::rng(), 32)
                .chars()
                .map(|c| if c.is_ascii_digit() { ';' } else { c })
                .collect();
            let delimiters = line.matches(';').count();

            assert_eq!(tokenize(&line).unwrap().len(), delimiters + 1, "line: {line:?}");
        }
    }
}
