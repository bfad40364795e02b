//! Users and tokens

mod errors;
mod handlers;

pub(crate) use handlers::*;
