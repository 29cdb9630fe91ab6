//! Reading and writing macOS `.webloc` files, the property lists Finder
//! uses to store a single URL bookmark.

pub mod cli;
pub mod logging;
pub mod webloc;

pub use webloc::{WeblocDocument, decode, encode};
