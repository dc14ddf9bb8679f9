// Composition root for the archiving bounded context.
//
// Responsibilities:
// - Read config from environment.
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into use case handlers.
// - Expose the browser-triggered entry point.

pub mod config;
pub mod http;
pub mod state;
