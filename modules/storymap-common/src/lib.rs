pub mod config;
pub mod error;
pub mod types;
pub mod validation;

pub use config::Config;
pub use error::{Result, StoryMapError, ValidationError};
pub use types::*;
pub use validation::*;
