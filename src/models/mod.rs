pub mod filters;
pub mod insights;
pub mod medicine;

pub use filters::*;
pub use insights::*;
pub use medicine::*;
