//! txtreader
//!
//! Terminal reader for plain-text e-books: imports `.txt` files in UTF or GB
//! encodings, splits them into chapters, paginates chapters for the terminal
//! and remembers where the reader stopped.
//!
//! Pure core: [`text`] (chapter indexing, resolution, pagination).
//! Impure shell: [`import`], [`library`], [`position`], [`view`].

pub mod config;
pub mod import;
pub mod library;
pub mod logging;
pub mod model;
pub mod position;
pub mod session;
pub mod text;
pub mod view;
