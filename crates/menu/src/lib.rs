mod grouper;
mod types;

pub use grouper::*;
pub use types::*;
