//! Table operations, each file adding an `impl Database` block.

mod accounts;
mod entries;
mod nested_notes;
