#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # Spring-Batch CSV

 A delimited-text engine for batch applications: it reads semicolon or comma
 separated data into typed records and writes records back, and plugs into
 batch pipelines through the `ItemReader` and `ItemWriter` traits.

 ## Core Concepts

- **Strategy:** the formatting parameters of one read or write session (delimiter, quote, comment marker, header skipping, empty-line handling). Two presets are provided: `CsvStrategy::DEFAULT` (`;`, header skipped) and `CsvStrategy::UK_DEFAULT` (`,`, no header).
- **Row:** the fields of one logical record after tokenization, before type conversion.
- **Field Binding:** how one record field maps to one column and type.
- **Parsing Context:** lookup of a row's cells by index or by header name.
- **Converter Registry:** extensible map from a type to its string-to-value conversion.
- **Cached Reader:** a reader wrapper adding bidirectional, random-access traversal.

 ## Getting Started

```rust
# use spring_batch_csv::{
#     core::item::ItemReader,
#     error::BatchError,
#     item::csv::{
#         converter::ConverterRegistry,
#         csv_reader::CsvItemReaderBuilder,
#         csv_writer::CsvItemWriterBuilder,
#         mapper::{BindingMapper, CsvRecord, FieldBinding},
#     },
# };
#[derive(Debug, Default, Clone, PartialEq)]
struct Car {
    year: u16,
    make: String,
    model: String,
}

impl CsvRecord for Car {
    fn bindings() -> Vec<FieldBinding<Self>> {
        vec![
            FieldBinding::new("year", 0, |c: &mut Car, v: u16| c.year = v)
                .formatter(|c| c.year.to_string()),
            FieldBinding::new("make", 1, |c: &mut Car, v: String| c.make = v)
                .formatter(|c| c.make.to_uppercase()),
            FieldBinding::new("model", 2, |c: &mut Car, v: String| c.model = v)
                .formatter(|c| c.model.clone()),
        ]
    }
}

fn main() -> Result<(), BatchError> {
    let csv = "year;make;model
1948;Porsche;356
1995;Peugeot;205
2021;Mazda;CX-30";

    let reader = CsvItemReaderBuilder::new()
        .mapper(BindingMapper::<Car>::for_record(ConverterRegistry::new()))
        .from_reader(csv.as_bytes())?;

    let writer = CsvItemWriterBuilder::new()
        .serializer(BindingMapper::<Car>::for_record(ConverterRegistry::new()))
        .line_terminator("\n")
        .from_writer(Vec::new())?;

    while let Some(car) = reader.read()? {
        writer.write(&car)?;
    }

    let output = String::from_utf8(writer.into_inner()?).unwrap();
    assert_eq!(output, "1948;PORSCHE;356\n1995;PEUGEOT;205\n2021;MAZDA;CX-30\n");

    Ok(())
}
```

 ## License
 Licensed under either of Apache License, Version 2.0 or MIT license at your option.
 */

/// Reader and writer seams
pub mod core;

/// Error types for reading, mapping and writing
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of items readers / writers
pub mod item;
