pub mod mode;
pub mod section;

pub use mode::*;
pub use section::*;
