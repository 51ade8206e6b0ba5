pub mod api;
mod appwrite;
mod cache;
mod config;
mod safe;

pub use api::Aora;
pub use appwrite::*;
pub use cache::*;
pub use config::*;
pub use safe::*;
