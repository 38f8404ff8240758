use crate::{DynObject, ObjectError, Value};

/// Ordered member entries used to populate a new object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Descriptor(Vec<(String, Value)>);

impl Descriptor {
    pub fn new() -> Self {
        Descriptor(Vec::new())
    }

    /// Builder-style entry append
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.push((name.to_string(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Descriptor {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Descriptor(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Descriptor {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// What a new object is built from
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Seed {
    #[default]
    Empty,
    Prototype(DynObject),
    Descriptor(Descriptor),
}

impl From<DynObject> for Seed {
    fn from(prototype: DynObject) -> Self {
        Seed::Prototype(prototype)
    }
}

impl From<&DynObject> for Seed {
    fn from(prototype: &DynObject) -> Self {
        Seed::Prototype(prototype.clone())
    }
}

impl From<Descriptor> for Seed {
    fn from(descriptor: Descriptor) -> Self {
        Seed::Descriptor(descriptor)
    }
}

impl From<()> for Seed {
    fn from(_: ()) -> Self {
        Seed::Empty
    }
}

/// Objects seed a prototype and falsy values an empty object; any other
/// value can't be used to build one.
impl TryFrom<Value> for Seed {
    type Error = ObjectError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(prototype) => Ok(Seed::Prototype(prototype)),
            falsy if !falsy.is_truthy() => Ok(Seed::Empty),
            other => {
                Err(ObjectError::InvalidConstructorArgument {
                    actual: other.type_str().to_string(),
                })
            },
        }
    }
}
