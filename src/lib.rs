pub mod concat;
pub mod document;
pub mod errors;
pub mod ignore;
pub mod logger;
pub mod reporting;
pub mod resolver;
pub mod scanner;
pub mod sink;
pub mod trie;
pub mod utils;
pub mod walker;

pub use concat::{bundle_dependencies, concat_to_sink, ConcatConfig};
pub use errors::ConcatError;
pub use ignore::IgnorePatterns;
