//! Parsed configuration values
//!
//! A [`Document`] maps section names to [`Section`]s, and each section maps
//! setting names to a [`Value`].

use indexmap::IndexMap;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// A single setting value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Key declared without an assignment
    Null,
    Number(f64),
    String(String),
    /// Lists use Box<SmallVec> to keep `Value` small;
    /// up to four elements are stored inline
    List(Box<List>),
}

/// Ordered list elements
pub type List = SmallVec<[Value; 4]>;

/// Settings of one section, in declaration order
pub type Section = IndexMap<String, Value>;

impl Value {
    /// Returns true if the key was declared but never assigned
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if the value is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns the number if this is a Number variant
    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(n) = self {
            Some(*n)
        } else {
            None
        }
    }

    /// Returns a reference to the string if this is a String variant
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    /// Returns the list elements if this is a List variant
    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(list) = self {
            Some(list.as_slice())
        } else {
            None
        }
    }

    /// Returns a string representation of the value type for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Box::new(List::from_vec(items)))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            // Debug formatting of f64 always keeps a fractional part or exponent
            Value::Number(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// The full parse result: section name to settings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    sections: IndexMap<String, Section>,
}

impl Document {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the section with the given name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Looks up a single setting
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section)?.get(key)
    }

    /// Returns true if a section with this name exists
    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Iterates over section names and settings in declaration order
    pub fn sections(&self) -> indexmap::map::Iter<'_, String, Section> {
        self.sections.iter()
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if no section was declared
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Consumes the document, returning the underlying map
    pub fn into_inner(self) -> IndexMap<String, Section> {
        self.sections
    }

    /// Opens a section, discarding any previous contents under the same name
    pub(crate) fn reset_section(&mut self, name: &str) {
        self.sections.insert(name.to_string(), Section::new());
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }
}

impl From<IndexMap<String, Section>> for Document {
    fn from(sections: IndexMap<String, Section>) -> Self {
        Self { sections }
    }
}

impl IntoIterator for Document {
    type Item = (String, Section);
    type IntoIter = indexmap::map::IntoIter<String, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, section)) in self.sections.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name:?}: {{")?;
            for (j, (key, value)) in section.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key:?}: {value}")?;
            }
            f.write_str("}")?;
        }
        f.write_str("}")
    }
}
