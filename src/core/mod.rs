//! Core types & traits: protocol envelopes, tool contract, content model.

pub mod content;
pub mod error;
pub mod mcp;
pub mod tool;
