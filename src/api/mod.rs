pub mod discovery;
pub mod mcp;
