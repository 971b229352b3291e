//! Serde deserializer implementation for parsed documents
//!
//! This module provides the serde integration, allowing configuration text
//! to be deserialized directly into Rust types using the standard serde
//! derive macros. Sections become maps (or structs), settings become fields.

use crate::error::{ConfError, SerdeError};
use crate::parser::{Parser, ParserConfig};
use crate::value::{Document, List, Section, Value};
use serde::de::value::StringDeserializer;
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};

/// Deserializer over a whole document: a map of section name to section
pub struct DocumentDeserializer {
    document: Document,
}

impl DocumentDeserializer {
    /// Creates a deserializer from an already parsed document
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Parses `input` with the given configuration and wraps the result
    pub fn from_str_with_config(input: &str, config: ParserConfig) -> Result<Self, ConfError> {
        let document = Parser::with_config(input, config).parse()?;
        Ok(Self::new(document))
    }
}

impl<'de> de::Deserializer<'de> for DocumentDeserializer {
    type Error = ConfError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(SectionsAccess {
            sections: self.document.into_iter(),
            current_section: None,
        })
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// Map access over the sections of a document
struct SectionsAccess {
    sections: indexmap::map::IntoIter<String, Section>,
    current_section: Option<Section>,
}

impl<'de> de::MapAccess<'de> for SectionsAccess {
    type Error = ConfError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.sections.next() {
            Some((name, section)) => {
                self.current_section = Some(section);
                let key: StringDeserializer<ConfError> = name.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current_section.take() {
            Some(section) => seed.deserialize(SectionDeserializer { section }),
            None => Err(ConfError::Serde(SerdeError::Custom(
                "No section available for map entry".to_string(),
            ))),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.sections.len())
    }
}

/// Deserializer for the settings of one section
struct SectionDeserializer {
    section: Section,
}

impl<'de> de::Deserializer<'de> for SectionDeserializer {
    type Error = ConfError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(EntriesAccess {
            entries: self.section.into_iter(),
            current_value: None,
        })
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// Map access over the settings of a section
struct EntriesAccess {
    entries: indexmap::map::IntoIter<String, Value>,
    current_value: Option<Value>,
}

impl<'de> de::MapAccess<'de> for EntriesAccess {
    type Error = ConfError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((key, value)) => {
                self.current_value = Some(value);
                let key: StringDeserializer<ConfError> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current_value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(ConfError::Serde(SerdeError::Custom(
                "No value available for map entry".to_string(),
            ))),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Sequence access for list values
struct ListAccess {
    items: smallvec::IntoIter<[Value; 4]>,
}

impl ListAccess {
    fn new(list: Box<List>) -> Self {
        Self {
            items: (*list).into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for ListAccess {
    type Error = ConfError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Deserializer for individual values
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Returns the number if it is whole and within `min..end`.
    ///
    /// `end` is exclusive: `MAX as f64` rounds up to a power of two for the
    /// 64-bit types, so an inclusive bound would let that value through.
    fn integral(&self, min: f64, end: f64) -> Option<f64> {
        match self.value {
            Value::Number(n) if n.fract() == 0.0 && n >= min && n < end => Some(n),
            _ => None,
        }
    }

    fn mismatch(&self, expected: &str) -> ConfError {
        ConfError::Serde(SerdeError::TypeMismatch {
            expected: expected.to_string(),
            found: match &self.value {
                Value::Number(n) => format!("number {n}"),
                other => other.type_name().to_string(),
            },
        })
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = ConfError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Number(n) => visitor.visit_f64(n),
            Value::String(s) => visitor.visit_string(s),
            Value::List(list) => visitor.visit_seq(ListAccess::new(list)),
        }
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.integral(i8::MIN as f64, i8::MAX as f64 + 1.0) {
            Some(n) => visitor.visit_i8(n as i8),
            None => Err(self.mismatch("i8")),
        }
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.integral(i16::MIN as f64, i16::MAX as f64 + 1.0) {
            Some(n) => visitor.visit_i16(n as i16),
            None => Err(self.mismatch("i16")),
        }
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.integral(i32::MIN as f64, i32::MAX as f64 + 1.0) {
            Some(n) => visitor.visit_i32(n as i32),
            None => Err(self.mismatch("i32")),
        }
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.integral(i64::MIN as f64, i64::MAX as f64 + 1.0) {
            Some(n) => visitor.visit_i64(n as i64),
            None => Err(self.mismatch("i64")),
        }
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.integral(u8::MIN as f64, u8::MAX as f64 + 1.0) {
            Some(n) => visitor.visit_u8(n as u8),
            None => Err(self.mismatch("u8")),
        }
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.integral(u16::MIN as f64, u16::MAX as f64 + 1.0) {
            Some(n) => visitor.visit_u16(n as u16),
            None => Err(self.mismatch("u16")),
        }
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.integral(u32::MIN as f64, u32::MAX as f64 + 1.0) {
            Some(n) => visitor.visit_u32(n as u32),
            None => Err(self.mismatch("u32")),
        }
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.integral(u64::MIN as f64, u64::MAX as f64 + 1.0) {
            Some(n) => visitor.visit_u64(n as u64),
            None => Err(self.mismatch("u64")),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::List(list) => visitor.visit_seq(ListAccess::new(list)),
            _ => Err(self.mismatch("list")),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // Only unit variants can be spelled as a string setting
        match self.value {
            Value::String(s) => {
                let variant: StringDeserializer<ConfError> = s.into_deserializer();
                visitor.visit_enum(variant)
            }
            _ => Err(self.mismatch("string naming an enum variant")),
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i128 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// Convenience function to deserialize configuration text into a Rust type
pub fn from_str<T>(s: &str) -> Result<T, ConfError>
where
    T: DeserializeOwned,
{
    from_str_with_config(s, ParserConfig::default())
}

/// Deserialize with a custom parser configuration
pub fn from_str_with_config<T>(s: &str, config: ParserConfig) -> Result<T, ConfError>
where
    T: DeserializeOwned,
{
    let deserializer = DocumentDeserializer::from_str_with_config(s, config)?;
    T::deserialize(deserializer)
}

/// Deserialize an already parsed document
pub fn from_document<T>(document: Document) -> Result<T, ConfError>
where
    T: DeserializeOwned,
{
    T::deserialize(DocumentDeserializer::new(document))
}
