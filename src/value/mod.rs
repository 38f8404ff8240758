pub mod callables;
pub mod coercions;
pub mod errors;
pub mod values;

pub use callables::*;
pub use errors::*;
pub use values::*;
