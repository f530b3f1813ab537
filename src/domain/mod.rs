//! Domain types and the ports the application layer is written against.

pub mod action;
pub mod ports;
pub mod reducer;
pub mod snapshot;
