pub mod iso8601;
mod macros;
mod parsing;

pub use parsing::*;
