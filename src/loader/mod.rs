pub mod document;

pub use document::{DocumentFormat, load_document, parse_document};
