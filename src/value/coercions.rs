use super::{BoundFunction, Closure, ObjectError, Value};
use crate::DynObject;

/******************************\
|* Rust types <-> Value types *|
\******************************/
// `From<rust_type> for Value` is infallible since each rust type maps onto
// exactly one variant. The other direction can't be, so it's a `TryFrom`
// that reports which variant it actually found.
macro_rules! impl_value_conversions {
    ($($t:ty, $v:ident);* $(;)?) => {
        $(
            impl TryFrom<&Value> for $t {
                type Error = ObjectError;

                fn try_from(value: &Value) -> Result<Self, Self::Error> {
                    if let Value::$v(native_val) = value {
                        Ok(native_val.clone())
                    } else {
                        Err(ObjectError::Conversion {
                            expected: stringify!($t).to_string(),
                            actual: value.type_str().to_string(),
                        })
                    }
                }
            }

            impl TryFrom<Value> for $t {
                type Error = ObjectError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    <$t>::try_from(&value)
                }
            }

            impl From<$t> for Value {
                fn from(val: $t) -> Self {
                    Value::$v(val)
                }
            }
        )*
    };
}

// The first element is the rust type, the second is the Value variant.
impl_value_conversions! {
    String, Str;
    f64, Float;
    isize, Int;
    bool, Bool;
    DynObject, Object;
    Closure, Closure;
    BoundFunction, Function;
}

// Narrower integers only go in; reading back always yields `isize`.
// Only widths that fit `isize` on every target are accepted.
macro_rules! impl_int_into_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(val: $t) -> Self {
                    Value::Int(isize::from(val))
                }
            }
        )*
    };
}

impl_int_into_value!(i8, i16, u8);

// Plain integer literals default to `i32`
#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::Int(val as isize)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Str(val.to_string())
    }
}

impl From<&DynObject> for Value {
    fn from(val: &DynObject) -> Self {
        Value::Object(val.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(val: Option<T>) -> Self {
        val.map_or(Value::Nil, Into::into)
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = ObjectError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        if let Value::Str(native_s) = value {
            Ok(native_s)
        } else {
            Err(ObjectError::Conversion {
                expected: "&str".to_string(),
                actual: value.type_str().to_string(),
            })
        }
    }
}
