//! # cyimport-tbcs
//!
//! TestBench CS REST client and the reconciliation that creates or
//! updates remote epics, user stories, test cases and steps from the
//! parsed model. Cases carrying an external id are matched against the
//! remote directory and updated in place; everything else is created
//! fresh.

mod client;
mod reconciler;
mod types;

pub use client::{RemoteMatch, TbcsClient, TbcsConfig, STRUCTURED_TEST_CASE, TEST_STEP_BLOCK};
pub use reconciler::{reconcile, ImportReport};
