//! # cyimport-parser
//!
//! Turns a tree of cypress spec files into the importable model.
//!
//! The parser is deliberately not a JavaScript parser: it recognizes a
//! fixed set of line prefixes (`describe(`, `it(`, `cy.log(` and the
//! `TBCS_*` metadata markers) and ignores everything else.

mod classifier;
mod scanner;

pub use classifier::{classify, Directive, MetaKey};
pub use scanner::{scan, scan_file};

use std::path::Path;

use cyimport_core::{Epic, Result};

/// Parse every matching spec file under `root` into a single epic.
///
/// Story order matches the order files were scanned.
pub fn parse_specs(root: &Path, suffix: &str, epic_name: &str) -> Result<Epic> {
    let user_stories = scanner::scan(root, suffix)?;
    Ok(Epic {
        name: epic_name.to_string(),
        user_stories,
    })
}
