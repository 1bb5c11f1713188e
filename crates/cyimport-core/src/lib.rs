//! # cyimport-core
//!
//! Core types for the cyimport test-case importer.
//!
//! The importer turns cypress spec files into a hierarchical
//! test-management model and pushes it to TestBench CS:
//!
//! - An [`Epic`] is the top-level container, named by configuration.
//! - A [`UserStory`] maps 1:1 to a spec file with a `describe` block.
//! - A [`TestCase`] maps to one `it` block and carries a metadata patch.
//! - A [`TestStep`] maps to one `cy.log` line inside an `it` block.

mod error;
mod model;

pub use error::{CyImportError, Result};
pub use model::*;
