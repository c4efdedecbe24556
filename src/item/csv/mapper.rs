use std::{fmt, sync::Arc};

use crate::error::BatchError;

use super::{
    context::{Column, HeaderIndex, ParsingContext, Row},
    converter::{Convertible, ConverterRegistry, TypeTag},
};

/// Maps one parsed row to a record.
pub trait RowMapper<T> {
    fn map_row(&self, context: &ParsingContext<'_>) -> Result<T, BatchError>;
}

impl<T, F> RowMapper<T> for F
where
    F: Fn(&ParsingContext<'_>) -> Result<T, BatchError>,
{
    fn map_row(&self, context: &ParsingContext<'_>) -> Result<T, BatchError> {
        self(context)
    }
}

/// Turns a record back into the fields of one row.
pub trait RowSerializer<T> {
    fn to_row(&self, item: &T) -> Result<Row, BatchError>;
}

impl<T, F> RowSerializer<T> for F
where
    F: Fn(&T) -> Result<Row, BatchError>,
{
    fn to_row(&self, item: &T) -> Result<Row, BatchError> {
        self(item)
    }
}

/// Decides whether a mapped record is handed to the caller.
pub trait EntryFilter<T> {
    fn accept(&self, item: &T) -> bool;
}

impl<T, F> EntryFilter<T> for F
where
    F: Fn(&T) -> bool,
{
    fn accept(&self, item: &T) -> bool {
        self(item)
    }
}

/// Raw-row fallback: records are the tokenized rows themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawRowMapper;

impl RowMapper<Row> for RawRowMapper {
    fn map_row(&self, context: &ParsingContext<'_>) -> Result<Row, BatchError> {
        Ok(context.raw().clone())
    }
}

/// Writes raw rows unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawRowSerializer;

impl RowSerializer<Row> for RawRowSerializer {
    fn to_row(&self, item: &Row) -> Result<Row, BatchError> {
        Ok(item.clone())
    }
}

type Assign<R> =
    Box<dyn Fn(&mut R, &ConverterRegistry, Result<Option<&str>, BatchError>) -> Result<(), BatchError>>;

/// Describes how one field of the record `R` maps to one column.
///
/// The value is converted by the registry converter of the setter's value
/// type, or of an explicit override given with [`FieldBinding::with_type`].
/// A formatter is only needed to write records back.
pub struct FieldBinding<R> {
    field: String,
    column: Column,
    optional: bool,
    type_tag: TypeTag,
    assign: Assign<R>,
    format: Option<Box<dyn Fn(&R) -> String>>,
}

impl<R: 'static> FieldBinding<R> {
    pub fn new<V, F>(field: impl Into<String>, column: impl Into<Column>, setter: F) -> Self
    where
        V: Convertible,
        F: Fn(&mut R, V) + 'static,
    {
        Self::with_type::<V, V, F>(field, column, setter)
    }

    /// Binds a field whose column is converted as `U`, then turned into the field type `V`.
    pub fn with_type<U, V, F>(field: impl Into<String>, column: impl Into<Column>, setter: F) -> Self
    where
        U: Convertible + Into<V>,
        V: 'static,
        F: Fn(&mut R, V) + 'static,
    {
        let assign: Assign<R> = Box::new(
            move |record: &mut R,
                  registry: &ConverterRegistry,
                  cell: Result<Option<&str>, BatchError>| {
                let converter = registry.resolve::<U>()?;
                if let Some(value) = cell? {
                    setter(record, converter.convert(Some(value))?.into());
                }
                Ok(())
            },
        );

        Self {
            field: field.into(),
            column: column.into(),
            optional: false,
            type_tag: U::type_tag(),
            assign,
            format: None,
        }
    }

    /// Absent or empty cells leave the field at its default instead of failing.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn formatter<F>(mut self, format: F) -> Self
    where
        F: Fn(&R) -> String + 'static,
    {
        self.format = Some(Box::new(format));
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    fn cell<'c>(&self, context: &'c ParsingContext<'_>) -> Result<Option<&'c str>, BatchError> {
        if context.has(&self.column) {
            return context.get(&self.column).map(Some);
        }

        match context.get(&self.column) {
            Err(error @ (BatchError::UnknownColumn(_) | BatchError::MissingHeaderMetadata(_))) => {
                Err(error)
            }
            _ if self.optional => Ok(None),
            _ => Err(BatchError::RequiredColumnMissing {
                field: self.field.clone(),
                column: self.column.to_string(),
            }),
        }
    }

    fn apply(
        &self,
        record: &mut R,
        context: &ParsingContext<'_>,
        registry: &ConverterRegistry,
    ) -> Result<(), BatchError> {
        (self.assign)(record, registry, self.cell(context))
    }
}

impl<R> fmt::Debug for FieldBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("column", &self.column)
            .field("optional", &self.optional)
            .field("type", &self.type_tag.name)
            .field("formatter", &self.format.is_some())
            .finish()
    }
}

/// A record type with a statically declared binding table.
pub trait CsvRecord: Default + Sized + 'static {
    fn bindings() -> Vec<FieldBinding<Self>>;
}

/// Maps rows to records of type `T` through a list of [`FieldBinding`]s, and back.
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::context::ParsingContext;
/// use spring_batch_csv::item::csv::converter::ConverterRegistry;
/// use spring_batch_csv::item::csv::mapper::{BindingMapper, FieldBinding};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Person {
///     first: String,
///     age: u8,
/// }
///
/// let mapper = BindingMapper::new(ConverterRegistry::new())
///     .bind(
///         FieldBinding::new("first", 0, |p: &mut Person, v: String| p.first = v)
///             .formatter(|p| p.first.clone()),
///     )
///     .bind(
///         FieldBinding::new("age", 2, |p: &mut Person, v: u8| p.age = v)
///             .formatter(|p| p.age.to_string()),
///     );
///
/// let row = vec!["Klaus".to_string(), "Meyer".to_string(), "33".to_string()];
/// let person = mapper.parse(&ParsingContext::positional(row)).unwrap();
/// assert_eq!(person, Person { first: "Klaus".to_string(), age: 33 });
///
/// assert_eq!(mapper.serialize(&person).unwrap(), vec!["Klaus", "", "33"]);
/// ```
pub struct BindingMapper<T> {
    bindings: Vec<FieldBinding<T>>,
    registry: Arc<ConverterRegistry>,
    header: Option<HeaderIndex>,
}

impl<T: Default + 'static> BindingMapper<T> {
    pub fn new(registry: impl Into<Arc<ConverterRegistry>>) -> Self {
        Self {
            bindings: Vec::new(),
            registry: registry.into(),
            header: None,
        }
    }

    /// Creates a mapper from the binding table declared by `T`.
    pub fn for_record(registry: impl Into<Arc<ConverterRegistry>>) -> Self
    where
        T: CsvRecord,
    {
        Self::new(registry).bindings(T::bindings())
    }

    pub fn bind(mut self, binding: FieldBinding<T>) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn bindings<I>(mut self, bindings: I) -> Self
    where
        I: IntoIterator<Item = FieldBinding<T>>,
    {
        self.bindings.extend(bindings);
        self
    }

    /// Sets the header used to place named columns when serializing.
    pub fn header<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = Some(names.into_iter().collect());
        self
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Builds one record from `context`, applying the bindings in declaration order.
    ///
    /// # Errors
    /// - `UnregisteredType` when a binding targets a type without converter
    /// - `RequiredColumnMissing` when a required cell is absent or empty
    /// - `Conversion` when a converter rejects a cell
    pub fn parse(&self, context: &ParsingContext<'_>) -> Result<T, BatchError> {
        let mut record = T::default();
        for binding in &self.bindings {
            binding.apply(&mut record, context, &self.registry)?;
        }
        Ok(record)
    }

    /// Writes the formatted fields of `item` at their column positions.
    ///
    /// Bindings without a formatter are skipped and unbound positions are
    /// left empty. With a header, rows are at least as wide as the header.
    pub fn serialize(&self, item: &T) -> Result<Row, BatchError> {
        let mut cells = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            let Some(format) = &binding.format else {
                continue;
            };
            cells.push((self.position(&binding.column)?, format(item)));
        }

        let width = cells
            .iter()
            .map(|(position, _)| position + 1)
            .max()
            .unwrap_or(0)
            .max(self.header.as_ref().map_or(0, HeaderIndex::len));

        let mut row = vec![String::new(); width];
        for (position, value) in cells {
            row[position] = value;
        }
        Ok(row)
    }

    fn position(&self, column: &Column) -> Result<usize, BatchError> {
        match column {
            Column::Index(index) => Ok(*index),
            Column::Name(name) => self
                .header
                .as_ref()
                .ok_or_else(|| BatchError::MissingHeaderMetadata(name.clone()))?
                .position(name)
                .ok_or_else(|| BatchError::UnknownColumn(name.clone())),
        }
    }
}

impl<T: Default + 'static> RowMapper<T> for BindingMapper<T> {
    fn map_row(&self, context: &ParsingContext<'_>) -> Result<T, BatchError> {
        self.parse(context)
    }
}

impl<T: Default + 'static> RowSerializer<T> for BindingMapper<T> {
    fn to_row(&self, item: &T) -> Result<Row, BatchError> {
        self.serialize(item)
    }
}

impl<T> fmt::Debug for BindingMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingMapper")
            .field("bindings", &self.bindings)
            .field("header", &self.header)
            .finish()
    }
}
