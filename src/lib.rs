pub mod api;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod plot;
pub mod report;

pub use error::{Error, Result};
