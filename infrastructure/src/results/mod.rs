//! Captured-output access for parse mode.

mod reader;

pub use reader::FsResultReader;
