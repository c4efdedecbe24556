use super::strategy::CsvStrategy;

/// Joins the fields of one row into a line, without terminator.
pub trait ColumnJoiner {
    fn join(&self, fields: &[String], strategy: &CsvStrategy) -> String;
}

/// RFC-4180 style joiner.
///
/// A field containing the delimiter, the quote character or a line break is
/// wrapped in quotes, with embedded quotes doubled. So is a first field
/// starting with the comment marker, otherwise the line would be skipped as a
/// comment on reading. Other fields are written as they are.
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::joiner::{ColumnJoiner, QuotingColumnJoiner};
/// use spring_batch_csv::item::csv::strategy::CsvStrategy;
///
/// let fields = vec!["Hans".to_string(), "im \"Glück\"".to_string(), "16".to_string()];
/// let line = QuotingColumnJoiner.join(&fields, &CsvStrategy::DEFAULT);
///
/// assert_eq!(line, "Hans;\"im \"\"Glück\"\"\";16");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct QuotingColumnJoiner;

impl QuotingColumnJoiner {
    fn needs_quoting(position: usize, field: &str, strategy: &CsvStrategy) -> bool {
        (position == 0 && field.starts_with(strategy.comment_marker()))
            || field.contains(|c: char| {
                c == strategy.delimiter() || c == strategy.quote() || c == '\n' || c == '\r'
            })
    }
}

impl ColumnJoiner for QuotingColumnJoiner {
    fn join(&self, fields: &[String], strategy: &CsvStrategy) -> String {
        let quote = strategy.quote();
        let escaped = format!("{quote}{quote}");

        let mut line = String::new();
        for (position, field) in fields.iter().enumerate() {
            if position > 0 {
                line.push(strategy.delimiter());
            }
            if Self::needs_quoting(position, field, strategy) {
                line.push(quote);
                line.push_str(&field.replace(quote, &escaped));
                line.push(quote);
            } else {
                line.push_str(field);
            }
        }
        line
    }
}

/// Joins fields with the delimiter and nothing else.
///
/// Only safe for values that never contain the delimiter, the quote
/// character or line breaks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleColumnJoiner;

impl ColumnJoiner for SimpleColumnJoiner {
    fn join(&self, fields: &[String], strategy: &CsvStrategy) -> String {
        fields.join(strategy.delimiter().encode_utf8(&mut [0; 4]))
    }
}
