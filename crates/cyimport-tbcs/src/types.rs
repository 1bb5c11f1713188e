//! Wire types for the TestBench CS REST API

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub force: bool,
    #[serde(rename = "tenantName")]
    pub tenant: &'a str,
    #[serde(rename = "login")]
    pub user: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub session_token: String,
    #[serde(default)]
    pub tenant_id: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateEpicRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EpicCreatedResponse {
    #[serde(default)]
    pub epic_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateUserStoryRequest<'a> {
    pub epic_id: u64,
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserStoryCreatedResponse {
    #[serde(default)]
    pub user_story_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTestCaseRequest<'a> {
    pub user_story_id: u64,
    pub name: &'a str,
    pub test_case_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TestCaseCreatedResponse {
    #[serde(default)]
    pub test_case_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTestStepRequest<'a> {
    pub test_step_block: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TestStepCreatedResponse {
    #[serde(default)]
    pub test_step_id: u64,
}

/// PATCH body; description and external id are nested objects on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TestCasePatchRequest<'a> {
    pub description: TextValue<'a>,
    pub is_automated: bool,
    pub to_be_reviewed: bool,
    pub external_id: ExternalIdValue<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TextValue<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExternalIdValue<'a> {
    pub value: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PatchConflictResponse {
    #[serde(default)]
    #[allow(dead_code)]
    pub failure_type: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ElementsResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Element {
    #[serde(rename = "testCase", default)]
    pub test_case: TestCaseSummary,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TestCaseSummary {
    #[serde(default)]
    #[allow(dead_code)]
    pub name: String,
    #[serde(default)]
    pub tbid: String,
    #[serde(default)]
    pub id: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TestCaseDetailResponse {
    #[serde(default)]
    pub test_sequence: TestSequence,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TestSequence {
    #[serde(default)]
    pub test_step_blocks: Vec<TestStepBlock>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TestStepBlock {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<RemoteStep>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RemoteStep {
    #[serde(default)]
    pub id: u64,
}
