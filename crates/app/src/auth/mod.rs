//! Authentication

mod config;
mod errors;
mod password;
mod service;
mod token;

pub use config::*;
pub use errors::*;
pub use password::*;
pub use service::*;
pub use token::*;
