mod dataset;
mod error;
mod pair;
mod ports;
mod split;
mod turn;
mod types;

pub use dataset::*;
pub use error::*;
pub use pair::*;
pub use ports::*;
pub use split::*;
pub use turn::*;
pub use types::*;
