//! Input adapters used by the command-line interface.

pub mod json;
