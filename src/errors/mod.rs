pub mod types;

pub use types::{FetchError, ResolveError};
