//! Test support: per-test databases and service contexts.

mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
