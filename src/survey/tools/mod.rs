pub mod cluster;
pub mod config;
pub mod derive;
pub mod error;
pub mod io;
pub mod merge;
pub mod model;
pub mod report;
pub mod validate;

pub use error::{Result, ToolError};
