mod error;
mod file_split;
mod status;
mod wire;

pub use error::*;
pub use file_split::*;
pub use status::*;
