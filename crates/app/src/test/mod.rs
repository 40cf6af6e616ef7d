//! Shared test support.

mod context;
mod helpers;

pub(crate) use context::TestContext;
pub(crate) use helpers::*;
