pub mod config;
pub mod error;
pub mod exceptions;
pub mod executor;
pub mod io;
pub mod layout;
pub mod paths;
pub mod peek;
pub mod plan;
pub mod scan;
pub mod selection;

pub use error::{DfgError, Result};
