pub mod columnar;
pub mod error;
pub mod json;
pub mod layout;

pub use columnar::*;
pub use error::*;
pub use json::*;
pub use layout::*;
