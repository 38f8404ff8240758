use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::{BoundFunction, DynObject, ObjectError};

// Shared prototypes and bound closures can't survive a structural round
// trip, so both directions refuse outright.
fn forbidden(operation: &str) -> ObjectError {
    ObjectError::SerializationForbidden {
        operation: operation.to_string(),
    }
}

macro_rules! forbid_serde {
    ($($t:ty),* $(,)?) => {
        $(
            impl Serialize for $t {
                fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
                    Err(ser::Error::custom(forbidden("Serialization")))
                }
            }

            impl<'de> Deserialize<'de> for $t {
                fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
                    Err(de::Error::custom(forbidden("Unserialize")))
                }
            }
        )*
    };
}

forbid_serde!(DynObject, BoundFunction);
