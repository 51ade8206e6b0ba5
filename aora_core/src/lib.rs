pub mod backend;
pub mod error;
pub mod model;

pub use backend::*;
pub use error::*;
pub use model::*;
