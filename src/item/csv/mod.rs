//! Delimited-text reading and writing with typed record binding.
//!
//! # Module Architecture
//!
//! A row travels through the following components:
//!
//! 1. **CsvStrategy**: the formatting parameters of a session (delimiter,
//!    quote character, comment marker, header and empty-line handling).
//!
//! 2. **Tokenizer**: splits a line into fields. The quote-aware tokenizer
//!    handles quoted delimiters, doubled quotes and fields spanning several
//!    physical lines.
//!
//! 3. **ParsingContext**: looks cells up by position or, once a header was
//!    read, by column name.
//!
//! 4. **ConverterRegistry**: turns cells into typed values. Built-in
//!    converters cover booleans, integers, floats, characters, text and
//!    dates; applications register their own.
//!
//! 5. **BindingMapper**: builds records from a static table of
//!    [`FieldBinding`](mapper::FieldBinding)s, and serializes them back.
//!
//! 6. **CsvItemReader** / **CachedCsvReader** / **CsvItemWriter**: the item
//!    readers and writers, configured with builders.
//!
//! The readers and writers implement the `ItemReader` and `ItemWriter`
//! traits from [`crate::core::item`].
//!
//! # Examples
//!
//! ## Reading records
//!
//! ```
//! use spring_batch_csv::item::csv::converter::ConverterRegistry;
//! use spring_batch_csv::item::csv::csv_reader::CsvItemReaderBuilder;
//! use spring_batch_csv::item::csv::mapper::{BindingMapper, CsvRecord, FieldBinding};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     first: String,
//!     last: String,
//!     age: u8,
//!     email: Option<String>,
//! }
//!
//! impl CsvRecord for Person {
//!     fn bindings() -> Vec<FieldBinding<Self>> {
//!         vec![
//!             FieldBinding::new("first", "first", |p: &mut Person, v: String| p.first = v),
//!             FieldBinding::new("last", "last", |p: &mut Person, v: String| p.last = v),
//!             FieldBinding::new("age", "age", |p: &mut Person, v: u8| p.age = v),
//!             FieldBinding::new("email", "email", |p: &mut Person, v: Option<String>| p.email = v)
//!                 .optional(),
//!         ]
//!     }
//! }
//!
//! let data = "\
//! first;last;age;email
//! Hans;\"im \"\"Glück\"\"\";16;
//! # inactive since 2019
//! Klaus;Meyer;33;klaus@example.com
//! ";
//!
//! let reader = CsvItemReaderBuilder::new()
//!     .named_columns(true)
//!     .mapper(BindingMapper::<Person>::for_record(ConverterRegistry::new()))
//!     .from_reader(data.as_bytes())
//!     .unwrap();
//!
//! let persons = reader.read_all().unwrap();
//! assert_eq!(persons.len(), 2);
//! assert_eq!(persons[0].last, "im \"Glück\"");
//! assert_eq!(persons[0].email, None);
//! assert_eq!(persons[1].age, 33);
//! assert_eq!(persons[1].email.as_deref(), Some("klaus@example.com"));
//! ```
//!
//! ## Writing records
//!
//! ```
//! use spring_batch_csv::item::csv::converter::ConverterRegistry;
//! use spring_batch_csv::item::csv::csv_writer::CsvItemWriterBuilder;
//! use spring_batch_csv::item::csv::mapper::{BindingMapper, FieldBinding};
//!
//! #[derive(Default)]
//! struct City {
//!     name: String,
//!     population: u32,
//! }
//!
//! let serializer = BindingMapper::new(ConverterRegistry::new())
//!     .bind(
//!         FieldBinding::new("name", 0, |c: &mut City, v: String| c.name = v)
//!             .formatter(|c| c.name.clone()),
//!     )
//!     .bind(
//!         FieldBinding::new("population", 1, |c: &mut City, v: u32| c.population = v)
//!             .formatter(|c| c.population.to_string()),
//!     );
//!
//! let writer = CsvItemWriterBuilder::new()
//!     .serializer(serializer)
//!     .line_terminator("\n")
//!     .from_writer(Vec::new())
//!     .unwrap();
//!
//! writer.write_header(&["name", "population"]).unwrap();
//! writer
//!     .write_all(&[
//!         City { name: "Boston".to_string(), population: 4628910 },
//!         City { name: "Concord; MA".to_string(), population: 42695 },
//!     ])
//!     .unwrap();
//!
//! let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(output, "name;population\nBoston;4628910\n\"Concord; MA\";42695\n");
//! ```

/// Bidirectional, random-access traversal over a reader.
pub mod cached_reader;

/// Cell lookup by position or header name.
pub mod context;

/// Typed value conversion.
pub mod converter;

/// Reading records from delimited text.
pub mod csv_reader;

/// Writing records as delimited text.
pub mod csv_writer;

pub mod joiner;

/// Record binding, row mappers, serializers and filters.
pub mod mapper;

pub mod strategy;

pub mod tokenizer;
