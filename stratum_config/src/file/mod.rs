//! Reading configuration documents from disk into [`crate::SourceTree`]s.

mod format;
mod helpers;
mod ini;
mod loader;
mod parser;
#[cfg(feature = "yaml")]
mod yaml;

pub(crate) use helpers::read_utf8;

pub use format::FileFormat;
pub use loader::{FileLoader, SourceLoader, load_document};
pub use parser::parse_document;

#[cfg(test)]
mod tests;
