//! User-facing surfaces: a stdin/stdout REPL and an HTTP API. Both call the
//! shared [`Assistant`](crate::assistant::Assistant) service.

pub mod cli;
pub mod http;

pub use cli::run_repl;
pub use http::{build_router, serve};
