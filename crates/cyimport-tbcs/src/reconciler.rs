//! Create-or-update reconciliation of a parsed epic against TestBench CS
//!
//! Mutations run in strict depth-first order: epic, then each user
//! story, then each case with its steps. Failures are tolerated at
//! sibling granularity; only a missing ancestor identifier is fatal for
//! its subtree.

use cyimport_core::{CyImportError, Epic, Result, TestCase};

use crate::client::{TbcsClient, TEST_STEP_BLOCK};

/// Per-run tally of reconciliation outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Reconcile the whole epic against the remote workspace.
///
/// Failure to create the epic itself is fatal: every child create
/// references its identifier.
pub async fn reconcile(client: &TbcsClient, epic: &Epic) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    tracing::info!("creating epic '{}'", epic.name);
    let epic_id = client.create_epic(&epic.name).await?;
    if epic_id == 0 {
        return Err(CyImportError::MissingParentId(format!(
            "epic '{}'",
            epic.name
        )));
    }

    for story in &epic.user_stories {
        tracing::info!("creating user story '{}'", story.name);
        let user_story_id = match client.create_user_story(epic_id, &story.name).await {
            Ok(id) if id != 0 => id,
            Ok(_) => {
                tracing::error!(
                    "no identifier returned for user story '{}', skipping its test cases",
                    story.name
                );
                report.skipped += story.test_cases.len();
                continue;
            }
            Err(err) => {
                tracing::error!("failed to create user story '{}': {}", story.name, err);
                report.skipped += story.test_cases.len();
                continue;
            }
        };

        for case in &story.test_cases {
            if let Err(err) = reconcile_case(client, user_story_id, case, &mut report).await {
                tracing::error!("test case '{}' skipped: {}", case.name, err);
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// One case: lookup, clear-or-create, recreate steps, patch metadata.
async fn reconcile_case(
    client: &TbcsClient,
    user_story_id: u64,
    case: &TestCase,
    report: &mut ImportReport,
) -> Result<()> {
    let existing = lookup(client, case).await;

    let (test_case_id, updating) = match existing {
        Some(id) => {
            tracing::info!("updating test case '{}' ({})", case.name, id);
            clear_test_steps(client, id).await;
            (id, true)
        }
        None => {
            tracing::info!("creating test case '{}'", case.name);
            let id = client.create_test_case(user_story_id, &case.name).await?;
            if id == 0 {
                return Err(CyImportError::MissingParentId(format!(
                    "test case '{}'",
                    case.name
                )));
            }
            (id, false)
        }
    };

    for step in &case.steps {
        tracing::debug!("creating test step '{}'", step.description);
        if let Err(err) = client.create_test_step(test_case_id, &step.description).await {
            tracing::error!(
                "failed to create step '{}' of test case '{}': {}",
                step.description,
                case.name,
                err
            );
        }
    }

    // Applied unconditionally on both the update and create paths.
    match client
        .patch_test_case(test_case_id, &case.name, &case.details)
        .await
    {
        Ok(()) => {}
        Err(err @ CyImportError::Conflict { .. }) => tracing::error!("{}", err),
        Err(err) => tracing::error!("failed to update test case '{}': {}", case.name, err),
    }

    if updating {
        report.updated += 1;
    } else {
        report.created += 1;
    }
    Ok(())
}

/// Directory lookup; skipped when the case carries no external id. Any
/// lookup failure is reported and falls through to the create path.
async fn lookup(client: &TbcsClient, case: &TestCase) -> Option<u64> {
    let external_id = case.details.external_id.as_str();
    if external_id.is_empty() {
        return None;
    }

    match client.find_test_case(external_id).await {
        Ok(found) if found.found => Some(found.test_case_id),
        Ok(_) => None,
        Err(err) => {
            tracing::error!("lookup for external id '{}' failed: {}", external_id, err);
            None
        }
    }
}

/// Delete every step under the "Test" block of an existing remote case.
///
/// The step tree is fetched with a GET and each step removed one by
/// one; failures here are reported and the re-create path continues.
async fn clear_test_steps(client: &TbcsClient, test_case_id: u64) {
    let detail = match client.get_test_case(test_case_id).await {
        Ok(detail) => detail,
        Err(err) => {
            tracing::error!(
                "failed to fetch existing test case {}: {}",
                test_case_id,
                err
            );
            return;
        }
    };

    for block in &detail.test_sequence.test_step_blocks {
        if block.name != TEST_STEP_BLOCK {
            continue;
        }
        for step in &block.steps {
            if let Err(err) = client.delete_test_step(test_case_id, step.id).await {
                tracing::error!(
                    "failed to delete step {} of test case {}: {}",
                    step.id,
                    test_case_id,
                    err
                );
            }
        }
    }
}
