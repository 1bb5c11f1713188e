//! End-to-end reconciliation tests against a mocked TestBench CS.

use cyimport_core::{CyImportError, Epic, TestCase, TestStep, UserStory};
use cyimport_tbcs::{reconcile, TbcsClient, TbcsConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn logged_in_client(server: &MockServer) -> TbcsClient {
    Mock::given(method("POST"))
        .and(path("/api/tenants/login/session"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sessionToken": "tok-123",
            "tenantId": 7
        })))
        .mount(server)
        .await;

    let mut client = TbcsClient::new(TbcsConfig {
        host: server.uri(),
        tenant_name: "imbus".to_string(),
        product_id: 1,
        accept_invalid_certs: false,
    })
    .unwrap();
    client.login("admin", "password").await.unwrap();
    client
}

fn sample_epic(external_id: &str, steps: &[&str]) -> Epic {
    let mut case = TestCase::new("Login flow succeeds with valid creds");
    case.details.external_id = external_id.to_string();
    case.details.description = "checks the login".to_string();
    for step in steps {
        case.steps.push(TestStep {
            description: step.to_string(),
        });
    }

    let mut story = UserStory::new("Login flow");
    story.test_cases.push(case);

    Epic {
        name: "Cypress-Tests".to_string(),
        user_stories: vec![story],
    }
}

async fn mount_epic_and_story(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/requirements/epics"))
        .and(header("Authorization", "tok-123"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "eventId": 1,
            "epicId": 10
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/requirements/userStories"))
        .and(body_partial_json(json!({"epicId": 10, "name": "Login flow"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "eventId": 2,
            "userStoryId": 20
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_failure_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tenants/login/session"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let mut client = TbcsClient::new(TbcsConfig {
        host: server.uri(),
        tenant_name: "imbus".to_string(),
        product_id: 1,
        accept_invalid_certs: false,
    })
    .unwrap();

    let err = client.login("admin", "wrong").await.unwrap_err();
    match err {
        CyImportError::Login { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad credentials");
        }
        other => panic!("expected Login error, got {other:?}"),
    }
}

#[tokio::test]
async fn fresh_import_creates_the_full_tree() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;
    mount_epic_and_story(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/specifications/testCases"))
        .and(body_partial_json(json!({
            "userStoryId": 20,
            "testCaseType": "StructuredTestCase"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"testCaseId": 30})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/30/testSteps"))
        .and(body_partial_json(json!({"testStepBlock": "Test"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"testStepId": 40})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/30"))
        .and(body_partial_json(json!({
            "description": {"text": "checks the login"},
            "externalId": {"value": ""}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let epic = sample_epic("", &["enter username", "submit form"]);
    let report = reconcile(&client, &epic).await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 0);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn rerun_with_external_id_updates_in_place() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;
    mount_epic_and_story(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/tenants/7/products/1/elements"))
        .and(query_param("fieldValue", "externalId:equals:CY-LOGIN-01"))
        .and(query_param("types", "TestCase"))
        .and(header("Authorization", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [{"testCase": {"name": "old name", "tbid": "TC-77", "id": 77}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Steps in foreign blocks stay untouched; only the "Test" block is cleared.
    Mock::given(method("GET"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "testSequence": {"testStepBlocks": [
                {"name": "Preparation", "steps": [{"id": 1}]},
                {"name": "Test", "steps": [{"id": 5}, {"id": 6}]}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/77/testSteps/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/77/testSteps/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/77/testSteps/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    // No duplicate case is created on the update path.
    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/specifications/testCases"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"testCaseId": 99})))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/77/testSteps"))
        .and(body_partial_json(json!({"testStepBlock": "Test"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"testStepId": 41})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/77"))
        .and(body_partial_json(json!({"externalId": {"value": "CY-LOGIN-01"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let epic = sample_epic("CY-LOGIN-01", &["enter username"]);
    let report = reconcile(&client, &epic).await.unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(report.created, 0);
}

#[tokio::test]
async fn empty_tbid_match_takes_the_create_path() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;
    mount_epic_and_story(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/tenants/7/products/1/elements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [{"testCase": {"name": "ghost", "tbid": "", "id": 55}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/specifications/testCases"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"testCaseId": 30})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let epic = sample_epic("CY-LOGIN-01", &[]);
    let report = reconcile(&client, &epic).await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 0);
}

#[tokio::test]
async fn lookup_failure_falls_back_to_create() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;
    mount_epic_and_story(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/tenants/7/products/1/elements"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/specifications/testCases"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"testCaseId": 30})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let epic = sample_epic("CY-LOGIN-01", &[]);
    let report = reconcile(&client, &epic).await.unwrap();
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn patch_conflict_does_not_stop_the_run() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;
    mount_epic_and_story(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/specifications/testCases"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"testCaseId": 30})))
        .expect(2)
        .mount(&server)
        .await;

    // First patch conflicts, second one succeeds.
    Mock::given(method("PATCH"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/30"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "failureType": "VersionConflict",
            "message": "test case was modified remotely"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/tenants/7/products/1/specifications/testCases/30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut epic = sample_epic("", &[]);
    epic.user_stories[0]
        .test_cases
        .push(TestCase::new("Login flow second case"));

    let report = reconcile(&client, &epic).await.unwrap();
    assert_eq!(report.created, 2);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn missing_epic_id_is_fatal() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/requirements/epics"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"eventId": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let epic = sample_epic("", &[]);
    let err = reconcile(&client, &epic).await.unwrap_err();
    assert!(matches!(err, CyImportError::MissingParentId(_)));
}

#[tokio::test]
async fn user_story_failure_skips_its_cases() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/requirements/epics"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"epicId": 10})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/requirements/userStories"))
        .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tenants/7/products/1/specifications/testCases"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"testCaseId": 30})))
        .expect(0)
        .mount(&server)
        .await;

    let epic = sample_epic("", &[]);
    let report = reconcile(&client, &epic).await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.created, 0);
}
