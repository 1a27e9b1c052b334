// Application layer - the service facade any client (CLI, tests) talks to.
// The core performs no console output; every operation returns an owned
// payload or an AppError for the caller to render.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
