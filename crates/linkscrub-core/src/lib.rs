pub mod config;
pub mod logging;

// Pipeline modules.
pub mod extract;
pub mod filter;
pub mod pipeline;
pub mod probe;
pub mod resolve;
pub mod rewrite;
pub mod rules;
