use std::io::{self, Read, Write};

use chrono::NaiveDate;
use mockall::mock;
use serde::{Deserialize, Serialize};

use spring_batch_csv::item::csv::{
    converter::ConverterRegistry,
    mapper::{BindingMapper, CsvRecord, FieldBinding},
};

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

mock! {
    pub Input {}
    impl Read for Input {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    }
}

pub const PERSON_HEADER: [&str; 5] = ["first", "last", "age", "birthday", "email"];

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub first: String,
    pub last: String,
    pub age: u8,
    pub birthday: Option<NaiveDate>,
    pub email: Option<String>,
}

impl Person {
    pub fn new(first: &str, last: &str, age: u8) -> Self {
        Person {
            first: first.to_string(),
            last: last.to_string(),
            age,
            ..Person::default()
        }
    }
}

impl CsvRecord for Person {
    fn bindings() -> Vec<FieldBinding<Self>> {
        vec![
            FieldBinding::new("first", "first", |p: &mut Person, v: String| p.first = v)
                .formatter(|p| p.first.clone()),
            FieldBinding::new("last", "last", |p: &mut Person, v: String| p.last = v)
                .formatter(|p| p.last.clone()),
            FieldBinding::new("age", "age", |p: &mut Person, v: u8| p.age = v)
                .formatter(|p| p.age.to_string()),
            FieldBinding::new("birthday", "birthday", |p: &mut Person, v: Option<NaiveDate>| {
                p.birthday = v
            })
            .optional()
            .formatter(|p| {
                p.birthday
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            }),
            FieldBinding::new("email", "email", |p: &mut Person, v: Option<String>| p.email = v)
                .optional()
                .formatter(|p| p.email.clone().unwrap_or_default()),
        ]
    }
}

/// Mapper for [`Person`] with its header, usable for reading and writing.
pub fn person_mapper() -> BindingMapper<Person> {
    BindingMapper::for_record(ConverterRegistry::new()).header(PERSON_HEADER)
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
