//! authkeep-file - filesystem-backed session storage.
//!
//! [`FileStorage`] keeps each key in its own JSON file inside a directory,
//! the on-disk counterpart of a browser's local storage.

mod store;

pub use store::FileStorage;
