//! TestBench CS REST client
//!
//! Every call returns an explicit `Result`; callers decide what a
//! failure means for the rest of the run. Certificate checking is
//! scoped to this client's connector, never toggled process-wide.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use cyimport_core::{CyImportError, Result, TestCasePatch};

use crate::types::*;

/// Test case kind marker set on every created case.
pub const STRUCTURED_TEST_CASE: &str = "StructuredTestCase";

/// All authored steps live in this single named step block.
pub const TEST_STEP_BLOCK: &str = "Test";

const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Result of an external-id directory lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteMatch {
    pub found: bool,
    pub test_case_id: u64,
}

impl RemoteMatch {
    fn not_found() -> Self {
        Self {
            found: false,
            test_case_id: 0,
        }
    }
}

/// Connection settings for one TestBench CS workspace.
#[derive(Debug, Clone)]
pub struct TbcsConfig {
    /// Base URL, e.g. `https://cloud01-eu.testbench.com`
    pub host: String,
    pub tenant_name: String,
    pub product_id: u64,
    /// Accept self-signed certificates on the host.
    pub accept_invalid_certs: bool,
}

/// Session-scoped client; [`TbcsClient::login`] must succeed before any
/// other call is issued.
#[derive(Debug, Clone)]
pub struct TbcsClient {
    http: reqwest::Client,
    config: TbcsConfig,
    token: String,
    tenant_id: u64,
}

impl TbcsClient {
    pub fn new(config: TbcsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| CyImportError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            token: String::new(),
            tenant_id: 0,
        })
    }

    /// Open a session and capture the token carried by every later call.
    pub async fn login(&mut self, user: &str, password: &str) -> Result<()> {
        let url = format!("{}/api/tenants/login/session", self.config.host);
        let body = LoginRequest {
            force: true,
            tenant: &self.config.tenant_name,
            user,
            password,
        };

        tracing::info!("logging in to {} as {}", self.config.host, user);
        let response = self
            .http
            .post(&url)
            .header("Content-Type", CONTENT_TYPE)
            .json(&body)
            .send()
            .await
            .map_err(|e| CyImportError::Transport(format!("login request failed: {e}")))?;

        let status = response.status();
        let raw = read_body(response).await?;
        if status != StatusCode::CREATED {
            return Err(CyImportError::Login {
                status: status.as_u16(),
                body: raw,
            });
        }

        let parsed: LoginResponse = serde_json::from_str(&raw)?;
        self.token = parsed.session_token;
        self.tenant_id = parsed.tenant_id;
        Ok(())
    }

    pub async fn create_epic(&self, name: &str) -> Result<u64> {
        let response: EpicCreatedResponse = self
            .post_json(
                &self.url("/requirements/epics"),
                &CreateEpicRequest { name },
            )
            .await?;
        Ok(response.epic_id)
    }

    pub async fn create_user_story(&self, epic_id: u64, name: &str) -> Result<u64> {
        let response: UserStoryCreatedResponse = self
            .post_json(
                &self.url("/requirements/userStories"),
                &CreateUserStoryRequest { epic_id, name },
            )
            .await?;
        Ok(response.user_story_id)
    }

    /// Remote directory lookup by external id.
    ///
    /// A match requires at least one returned element whose `tbid` is
    /// non-empty; an empty `tbid` on the first element means not found.
    pub async fn find_test_case(&self, external_id: &str) -> Result<RemoteMatch> {
        let response = self
            .http
            .get(self.url("/elements"))
            .query(&[
                ("fieldValue", format!("externalId:equals:{external_id}")),
                ("types", "TestCase".to_string()),
            ])
            .header("Content-Type", CONTENT_TYPE)
            .header("Authorization", &self.token)
            .send()
            .await
            .map_err(|e| CyImportError::Transport(e.to_string()))?;

        let parsed: ElementsResponse = expect_json(response, StatusCode::OK).await?;
        match parsed.elements.first() {
            Some(element) if !element.test_case.tbid.is_empty() => Ok(RemoteMatch {
                found: true,
                test_case_id: element.test_case.id,
            }),
            _ => Ok(RemoteMatch::not_found()),
        }
    }

    pub async fn create_test_case(&self, user_story_id: u64, name: &str) -> Result<u64> {
        let response: TestCaseCreatedResponse = self
            .post_json(
                &self.url("/specifications/testCases"),
                &CreateTestCaseRequest {
                    user_story_id,
                    name,
                    test_case_type: STRUCTURED_TEST_CASE,
                },
            )
            .await?;
        Ok(response.test_case_id)
    }

    pub async fn create_test_step(&self, test_case_id: u64, description: &str) -> Result<u64> {
        let response: TestStepCreatedResponse = self
            .post_json(
                &self.url(&format!("/specifications/testCases/{test_case_id}/testSteps")),
                &CreateTestStepRequest {
                    test_step_block: TEST_STEP_BLOCK,
                    description,
                },
            )
            .await?;
        Ok(response.test_step_id)
    }

    /// Apply the metadata patch. A 409 carries a structured conflict
    /// message and maps to [`CyImportError::Conflict`].
    pub async fn patch_test_case(
        &self,
        test_case_id: u64,
        name: &str,
        patch: &TestCasePatch,
    ) -> Result<()> {
        let body = TestCasePatchRequest {
            description: TextValue {
                text: &patch.description,
            },
            is_automated: patch.is_automated,
            to_be_reviewed: patch.to_be_reviewed,
            external_id: ExternalIdValue {
                value: &patch.external_id,
            },
        };

        let response = self
            .http
            .patch(self.url(&format!("/specifications/testCases/{test_case_id}")))
            .header("Content-Type", CONTENT_TYPE)
            .header("Authorization", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CyImportError::Transport(e.to_string()))?;

        let status = response.status();
        let raw = read_body(response).await?;
        match status {
            StatusCode::OK => Ok(()),
            StatusCode::CONFLICT => {
                let conflict: PatchConflictResponse =
                    serde_json::from_str(&raw).unwrap_or_default();
                Err(CyImportError::Conflict {
                    test_case: name.to_string(),
                    message: conflict.message,
                })
            }
            status => Err(CyImportError::RemoteStatus {
                status: status.as_u16(),
                body: raw,
            }),
        }
    }

    /// Fetch the full case including its step blocks, used to clear
    /// existing steps before re-creating them.
    pub(crate) async fn get_test_case(&self, test_case_id: u64) -> Result<TestCaseDetailResponse> {
        let response = self
            .http
            .get(self.url(&format!("/specifications/testCases/{test_case_id}")))
            .header("Content-Type", CONTENT_TYPE)
            .header("Authorization", &self.token)
            .send()
            .await
            .map_err(|e| CyImportError::Transport(e.to_string()))?;

        expect_json(response, StatusCode::OK).await
    }

    pub async fn delete_test_step(&self, test_case_id: u64, test_step_id: u64) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!(
                "/specifications/testCases/{test_case_id}/testSteps/{test_step_id}"
            )))
            .header("Content-Type", CONTENT_TYPE)
            .header("Authorization", &self.token)
            .send()
            .await
            .map_err(|e| CyImportError::Transport(e.to_string()))?;

        let status = response.status();
        let raw = read_body(response).await?;
        if status != StatusCode::OK {
            return Err(CyImportError::RemoteStatus {
                status: status.as_u16(),
                body: raw,
            });
        }
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/api/tenants/{}/products/{}{}",
            self.config.host, self.tenant_id, self.config.product_id, path
        )
    }

    async fn post_json<I, O>(&self, url: &str, body: &I) -> Result<O>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .header("Content-Type", CONTENT_TYPE)
            .header("Authorization", &self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| CyImportError::Transport(e.to_string()))?;

        expect_json(response, StatusCode::CREATED).await
    }
}

async fn expect_json<O: DeserializeOwned>(
    response: reqwest::Response,
    expected: StatusCode,
) -> Result<O> {
    let status = response.status();
    let raw = read_body(response).await?;
    if status != expected {
        return Err(CyImportError::RemoteStatus {
            status: status.as_u16(),
            body: raw,
        });
    }
    Ok(serde_json::from_str(&raw)?)
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    response
        .text()
        .await
        .map_err(|e| CyImportError::Transport(format!("failed to read response body: {e}")))
}
