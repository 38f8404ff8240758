pub mod object;
pub mod value;

pub use object::*;
pub use value::*;
