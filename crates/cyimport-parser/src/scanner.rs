//! Streaming scanner that turns spec files into user stories
//!
//! Each file is read line by line in a single pass, no backtracking.
//! A file maps to at most one [`UserStory`]: when a second `describe`
//! appears, the new story replaces the current one and only the
//! last-opened story is returned for that file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use cyimport_core::{CyImportError, Result, TestCase, TestStep, UserStory};
use walkdir::WalkDir;

use crate::classifier::{classify, Directive, MetaKey};

/// Scan every file under `root` whose path ends with `suffix`.
///
/// An unreadable file aborts the run; a malformed file is reported and
/// skipped so the remaining files still get scanned.
pub fn scan(root: &Path, suffix: &str) -> Result<Vec<UserStory>> {
    let mut stories = Vec::new();

    for file in spec_files(root, suffix) {
        tracing::debug!("scanning {}", file.display());
        match scan_file(&file) {
            Ok(Some(story)) => stories.push(story),
            Ok(None) => tracing::debug!("no describe block in {}", file.display()),
            Err(err @ CyImportError::MalformedSpec { .. }) => {
                tracing::warn!("skipping {}: {}", file.display(), err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(stories)
}

/// Matching files in directory-walk order. Suffix matching is
/// case-sensitive against the full path string.
fn spec_files(root: &Path, suffix: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.to_string_lossy().ends_with(suffix))
        .collect()
}

/// Scan a single spec file into its user story, if it opens one.
pub fn scan_file(path: &Path) -> Result<Option<UserStory>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut story: Option<UserStory> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(directive) = classify(line.trim_start()) else {
            continue;
        };

        match directive {
            Directive::GroupStart(title) => {
                // A replacement describe discards any open case state.
                story = Some(UserStory::new(title));
            }
            Directive::CaseStart(title) => {
                let Some(story) = story.as_mut() else {
                    return Err(CyImportError::MalformedSpec {
                        file: path.to_path_buf(),
                        line: idx + 1,
                        reason: "test case opened before any describe block".to_string(),
                    });
                };
                let name = format!("{} {}", story.name, title);
                story.test_cases.push(TestCase::new(name));
            }
            Directive::Meta(key, value) => {
                // Dropped silently when no case is open.
                if let Some(case) = open_case(&mut story) {
                    match key {
                        MetaKey::ExternalId => case.details.external_id = value,
                        MetaKey::Description => case.details.description = value,
                        MetaKey::Category => {}
                    }
                }
            }
            Directive::LogStep(text) => {
                // Dropped silently when no case is open.
                if let Some(case) = open_case(&mut story) {
                    case.steps.push(TestStep { description: text });
                }
            }
        }
    }

    Ok(story)
}

fn open_case(story: &mut Option<UserStory>) -> Option<&mut TestCase> {
    story.as_mut().and_then(|s| s.test_cases.last_mut())
}
