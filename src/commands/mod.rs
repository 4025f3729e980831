//! Command-line command handlers for centinela.
//!
//! The interactive showcase lives in [`crate::showcase`]; everything else the
//! binary can do is a one-shot command implemented in its own submodule.

pub mod contact;
pub mod help;
pub mod simulate;
