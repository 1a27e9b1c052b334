pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod registry;

pub use domain::*;
pub use registry::Directory;
