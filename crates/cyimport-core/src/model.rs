//! Parsed test asset model: Epic → UserStory → TestCase → TestStep
//!
//! The tree is built once per run by the scanner, consumed once by the
//! reconciler, and never persisted. Wire encodings live with the HTTP
//! client, not here.

use serde::{Deserialize, Serialize};

/// Top-level container for one import run, named by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    pub name: String,
    pub user_stories: Vec<UserStory>,
}

/// One spec file's top-level `describe` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    pub name: String,
    pub test_cases: Vec<TestCase>,
}

impl UserStory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            test_cases: Vec::new(),
        }
    }
}

/// One `it` block: ordered steps plus the metadata patch applied after
/// step creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub steps: Vec<TestStep>,
    pub details: TestCasePatch,
}

impl TestCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            details: TestCasePatch::default(),
        }
    }
}

/// One `cy.log` line recorded as a step description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub description: String,
}

/// Metadata applied to a test case as a partial update after its steps
/// are created. Last directive of a given kind within a case wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCasePatch {
    pub description: String,
    pub is_automated: bool,
    pub to_be_reviewed: bool,
    pub external_id: String,
}

impl Default for TestCasePatch {
    fn default() -> Self {
        Self {
            description: String::new(),
            is_automated: true,
            to_be_reviewed: true,
            external_id: String::new(),
        }
    }
}
