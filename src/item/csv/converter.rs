use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    marker::PhantomData,
    num::{ParseFloatError, ParseIntError},
    str::FromStr,
};

use chrono::NaiveDate;
use log::debug;

use crate::error::{BatchError, ConversionError};

/// A runtime type identifier with a readable name, used as registry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub id: TypeId,
    pub name: &'static str,
}

impl TypeTag {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

/// Types a field binding can target.
///
/// Implementing the trait with its defaults is all a custom type needs:
///
/// ```
/// use spring_batch_csv::item::csv::converter::Convertible;
///
/// struct Money(i64);
/// impl Convertible for Money {}
/// ```
///
/// `Option<T>` is implemented once for every `T` and resolves through the
/// converter of `T`, so absence is represented the same way for every type.
pub trait Convertible: Sized + 'static {
    /// Key under which the converter for this type is registered.
    fn type_tag() -> TypeTag {
        TypeTag::of::<Self>()
    }

    /// True for wrappers that only carry absence around a value type.
    fn is_nullable() -> bool {
        false
    }

    /// Recovers a typed value from the output of the registered converter.
    fn from_converted(value: Box<dyn Any>) -> Result<Self, Box<dyn Any>> {
        value.downcast::<Self>().map(|value| *value)
    }
}

impl<T: Convertible> Convertible for Option<T> {
    fn type_tag() -> TypeTag {
        T::type_tag()
    }

    fn is_nullable() -> bool {
        true
    }

    fn from_converted(value: Box<dyn Any>) -> Result<Self, Box<dyn Any>> {
        T::from_converted(value).map(Some)
    }
}

macro_rules! convertible {
    ($($ty:ty),* $(,)?) => {
        $(impl Convertible for $ty {})*
    };
}

convertible!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char,
    String, NaiveDate,
);

type ErasedConverter =
    Box<dyn Fn(Option<&str>) -> Result<Box<dyn Any>, ConversionError> + Send + Sync>;

/// Maps target types to string-to-value converters.
///
/// A registry is an explicit value owned by whoever builds the mapping
/// pipeline. It is seeded with converters for `bool`, the integer and
/// floating point families, `char`, `String` and [`NaiveDate`]; callers add
/// their own with [`ConverterRegistry::register`].
///
/// # Examples
///
/// ```
/// use spring_batch_csv::item::csv::converter::{Convertible, ConverterRegistry};
/// use spring_batch_csv::error::ConversionError;
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f64);
/// impl Convertible for Celsius {}
///
/// let mut registry = ConverterRegistry::new();
/// registry
///     .register(|value: Option<&str>| {
///         value
///             .and_then(|v| v.strip_suffix("°C"))
///             .and_then(|v| v.parse().ok())
///             .map(Celsius)
///             .ok_or_else(|| ConversionError::Custom(format!("not a temperature: {:?}", value)))
///     })
///     .unwrap();
///
/// let converter = registry.resolve::<Celsius>().unwrap();
/// assert_eq!(converter.convert(Some("21.5°C")).unwrap(), Celsius(21.5));
///
/// // nullable fields resolve through the same converter
/// let converter = registry.resolve::<Option<i32>>().unwrap();
/// assert_eq!(converter.convert(Some("42")).unwrap(), Some(42));
/// ```
pub struct ConverterRegistry {
    converters: HashMap<TypeId, (TypeTag, ErasedConverter)>,
}

impl ConverterRegistry {
    /// Creates a registry seeded with the built-in converters and an ISO date format.
    pub fn new() -> Self {
        Self::with_date_format(DateFormat::default())
    }

    /// Creates a registry seeded with the built-in converters, parsing dates with `format`.
    pub fn with_date_format(format: DateFormat) -> Self {
        let mut registry = Self::empty();

        registry.insert(to_bool);
        registry.insert(to_integer::<i8>);
        registry.insert(to_integer::<i16>);
        registry.insert(to_integer::<i32>);
        registry.insert(to_integer::<i64>);
        registry.insert(to_integer::<i128>);
        registry.insert(to_integer::<isize>);
        registry.insert(to_integer::<u8>);
        registry.insert(to_integer::<u16>);
        registry.insert(to_integer::<u32>);
        registry.insert(to_integer::<u64>);
        registry.insert(to_integer::<u128>);
        registry.insert(to_integer::<usize>);
        registry.insert(to_float::<f32>);
        registry.insert(to_float::<f64>);
        registry.insert(to_char);
        registry.insert(to_text);
        registry.insert(move |value: Option<&str>| format.parse(value));

        registry
    }

    /// Creates a registry without any converter.
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Registers the converter for `T`.
    ///
    /// # Errors
    /// - `NullableRegistration` when `T` is `Option<_>`: register the inner type
    /// - `DuplicateRegistration` when `T` already has a converter
    pub fn register<T, F>(&mut self, converter: F) -> Result<(), BatchError>
    where
        T: Convertible,
        F: Fn(Option<&str>) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        if T::is_nullable() {
            return Err(BatchError::NullableRegistration(type_name::<T>()));
        }

        let tag = T::type_tag();
        if self.converters.contains_key(&tag.id) {
            return Err(BatchError::DuplicateRegistration(tag.name));
        }

        self.insert(converter);
        debug!("Registered converter for {}", tag.name);
        Ok(())
    }

    /// Removes the converter for `T`.
    pub fn unregister<T: Convertible>(&mut self) -> Result<(), BatchError> {
        let tag = T::type_tag();
        match self.converters.remove(&tag.id) {
            Some(_) => {
                debug!("Unregistered converter for {}", tag.name);
                Ok(())
            }
            None => Err(BatchError::UnregisteredType(tag.name)),
        }
    }

    /// Returns the converter for `T`, substituting the inner type for `Option<_>`.
    pub fn resolve<T: Convertible>(&self) -> Result<Converter<'_, T>, BatchError> {
        let tag = T::type_tag();
        self.converters
            .get(&tag.id)
            .map(|(tag, convert)| Converter {
                convert,
                tag: *tag,
                _marker: PhantomData,
            })
            .ok_or(BatchError::UnregisteredType(tag.name))
    }

    pub fn contains<T: Convertible>(&self) -> bool {
        self.converters.contains_key(&T::type_tag().id)
    }

    fn insert<T, F>(&mut self, converter: F)
    where
        T: Convertible,
        F: Fn(Option<&str>) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        let tag = T::type_tag();
        let erased: ErasedConverter = Box::new(move |value: Option<&str>| {
            converter(value).map(|converted| Box::new(converted) as Box<dyn Any>)
        });
        self.converters.insert(tag.id, (tag, erased));
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.converters.values().map(|(tag, _)| tag.name))
            .finish()
    }
}

/// A converter resolved from a [`ConverterRegistry`] for the type `T`.
pub struct Converter<'a, T> {
    convert: &'a ErasedConverter,
    tag: TypeTag,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Convertible> Converter<'_, T> {
    pub fn convert(&self, value: Option<&str>) -> Result<T, BatchError> {
        let converted = (self.convert)(value)?;
        T::from_converted(converted).map_err(|_| BatchError::UnregisteredType(self.tag.name))
    }

    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }
}

/// `None` is false; `"true"` in any case or `"1"` is true; anything else is false.
pub fn to_bool(value: Option<&str>) -> Result<bool, ConversionError> {
    Ok(value.is_some_and(|value| value.eq_ignore_ascii_case("true") || value == "1"))
}

/// Base 10 integer parsing; `None` is rejected like an empty string.
pub fn to_integer<T>(value: Option<&str>) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseIntError>,
{
    let value = value.unwrap_or_default();
    value
        .parse()
        .map_err(|source| ConversionError::InvalidNumber {
            value: value.to_string(),
            source,
        })
}

/// Floating point parsing, exponent notation included; `None` is rejected.
pub fn to_float<T>(value: Option<&str>) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseFloatError>,
{
    let value = value.unwrap_or_default();
    value
        .parse()
        .map_err(|source| ConversionError::InvalidFloat {
            value: value.to_string(),
            source,
        })
}

/// The input must be exactly one character long.
pub fn to_char(value: Option<&str>) -> Result<char, ConversionError> {
    let mut chars = value.map(str::chars);
    match chars.as_mut().map(|chars| (chars.next(), chars.next())) {
        Some((Some(c), None)) => Ok(c),
        _ => Err(ConversionError::InvalidCharacter(value.map(String::from))),
    }
}

/// Identity; `None` becomes the empty string.
pub fn to_text(value: Option<&str>) -> Result<String, ConversionError> {
    Ok(value.unwrap_or_default().to_string())
}

/// A `chrono` format pattern used to parse and format dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn parse(&self, value: Option<&str>) -> Result<NaiveDate, ConversionError> {
        let value = value.unwrap_or_default();
        NaiveDate::parse_from_str(value, &self.pattern).map_err(|source| {
            ConversionError::InvalidDate {
                value: value.to_string(),
                source,
            }
        })
    }

    pub fn format(&self, date: &NaiveDate) -> String {
        date.format(&self.pattern).to_string()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::new("%Y-%m-%d")
    }
}
