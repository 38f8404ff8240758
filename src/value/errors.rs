use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObjectError {
    #[error("Object has no method '{name}'")]
    MethodNotFound { name: String },

    #[error(
        "DynObject expects a prototype, a descriptor or nothing, {actual} given"
    )]
    InvalidConstructorArgument { actual: String },

    #[error(
        "{operation} of 'DynObject' is not allowed due to its prototypical nature"
    )]
    SerializationForbidden { operation: String },

    #[error("The object bound to method '{name}' no longer exists")]
    DetachedReceiver { name: String },

    #[error("Can't convert value of type '{actual}' to rust type '{expected}'")]
    Conversion { expected: String, actual: String },

    /// Failures raised from inside a native closure
    #[error(transparent)]
    Native(#[from] anyhow::Error),
}

impl ObjectError {
    pub fn method_not_found(name: &str) -> Self {
        ObjectError::MethodNotFound {
            name: name.to_string(),
        }
    }

    /// Optional hooks treat exactly this kind as "not installed"
    pub fn is_method_not_found(&self) -> bool {
        matches!(self, ObjectError::MethodNotFound { .. })
    }
}

pub type ObjectResult<T> = Result<T, ObjectError>;
