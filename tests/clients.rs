//! Integration tests for client records: visibility, edits, assignment and
//! the archive-then-delete lifecycle.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use agencydesk_entity::user::Role;

use common::{Auth, TestApp};

async fn create_client(app: &TestApp, token: &str, body: serde_json::Value) -> i64 {
    let response = app
        .request("POST", "/api/clients", Some(body), Auth::Bearer(token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.data()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_smm_create_assigns_creator() {
    let app = TestApp::new();
    let (smm, token) = app.staff("smm@agency.test", Role::Smm).await;
    let (other, _) = app.staff("other@agency.test", Role::Smm).await;

    let response = app
        .request(
            "POST",
            "/api/clients",
            Some(json!({
                "name": "  Acme Coffee ",
                "industry": "Food",
                "assignedUserIds": [other.id]
            })),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let data = response.data();
    assert_eq!(data["name"], "Acme Coffee");
    assert_eq!(data["industry"], "Food");
    assert_eq!(data["assignedUserIds"], json!([smm.id]));
    assert_eq!(data["createdBy"], smm.id);
    assert_eq!(data["isArchived"], false);
}

#[tokio::test]
async fn test_create_requires_name() {
    let app = TestApp::new();
    let (_, token) = app.staff("smm@agency.test", Role::Smm).await;

    let response = app
        .request(
            "POST",
            "/api/clients",
            Some(json!({ "name": "   " })),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .request("POST", "/api/clients", Some(json!({})), Auth::Bearer(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_is_scoped_by_assignment() {
    let app = TestApp::new();
    let (_, smm_token) = app.staff("smm@agency.test", Role::Smm).await;
    let (_, other_token) = app.staff("other@agency.test", Role::Smm).await;
    let (_, admin_token) = app.staff("admin@agency.test", Role::Admin).await;

    let mine = create_client(&app, &smm_token, json!({ "name": "Mine" })).await;
    let theirs = create_client(&app, &other_token, json!({ "name": "Theirs" })).await;

    let response = app
        .request("GET", "/api/clients", None, Auth::Bearer(&smm_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["total"], 1);
    assert_eq!(data["items"][0]["id"], mine);

    let response = app
        .request(
            "GET",
            &format!("/api/clients/{theirs}"),
            None,
            Auth::Bearer(&smm_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");

    let response = app
        .request("GET", "/api/clients", None, Auth::Bearer(&admin_token))
        .await;
    assert_eq!(response.data()["total"], 2);
}

#[tokio::test]
async fn test_list_paginates() {
    let app = TestApp::new();
    let (_, token) = app.staff("admin@agency.test", Role::Admin).await;
    for i in 0..5 {
        create_client(&app, &token, json!({ "name": format!("Client {i}") })).await;
    }

    let response = app
        .request(
            "GET",
            "/api/clients?page=2&perPage=2",
            None,
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["total"], 5);
    assert_eq!(data["page"], 2);
    assert_eq!(data["perPage"], 2);
    assert_eq!(data["totalPages"], 3);
    assert_eq!(data["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_patch_sets_and_clears_fields() {
    let app = TestApp::new();
    let (_, token) = app.staff("smm@agency.test", Role::Smm).await;
    let id = create_client(
        &app,
        &token,
        json!({ "name": "Acme", "notes": "Call on Mondays", "website": "https://acme.test" }),
    )
    .await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/clients/{id}"),
            Some(json!({ "notes": null, "brandVoice": "Warm and playful" })),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["notes"], serde_json::Value::Null);
    assert_eq!(data["brandVoice"], "Warm and playful");
    assert_eq!(data["website"], "https://acme.test");
    assert_eq!(data["name"], "Acme");
}

#[tokio::test]
async fn test_patch_rejects_bad_bodies() {
    let app = TestApp::new();
    let (_, token) = app.staff("smm@agency.test", Role::Smm).await;
    let id = create_client(&app, &token, json!({ "name": "Acme" })).await;
    let path = format!("/api/clients/{id}");

    let unknown = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "isArchived": true })),
            Auth::Bearer(&token),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let empty = app
        .request("PATCH", &path, Some(json!({})), Auth::Bearer(&token))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let null_name = app
        .request("PATCH", &path, Some(json!({ "name": null })), Auth::Bearer(&token))
        .await;
    assert_eq!(null_name.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_assignees_are_admin_only() {
    let app = TestApp::new();
    let (smm, smm_token) = app.staff("smm@agency.test", Role::Smm).await;
    let (other, _) = app.staff("other@agency.test", Role::Smm).await;
    let (_, admin_token) = app.staff("admin@agency.test", Role::Admin).await;
    let id = create_client(&app, &smm_token, json!({ "name": "Acme" })).await;
    let path = format!("/api/clients/{id}/assignees");

    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({ "userIds": [other.id] })),
            Auth::Bearer(&smm_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({ "userIds": [other.id, smm.id, other.id] })),
            Auth::Bearer(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["assignedUserIds"], json!([smm.id, other.id]));

    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({ "userIds": [9999] })),
            Auth::Bearer(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Unassigning the creator removes their access.
    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({ "userIds": [other.id] })),
            Auth::Bearer(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let response = app
        .request("GET", &format!("/api/clients/{id}"), None, Auth::Bearer(&smm_token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_archive_lifecycle() {
    let app = TestApp::new();
    let (_, smm_token) = app.staff("smm@agency.test", Role::Smm).await;
    let (_, admin_token) = app.staff("admin@agency.test", Role::Admin).await;
    let id = create_client(&app, &smm_token, json!({ "name": "Acme" })).await;

    let response = app
        .request(
            "POST",
            &format!("/api/clients/{id}/archive"),
            None,
            Auth::Bearer(&smm_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "POST",
            &format!("/api/clients/{id}/archive"),
            None,
            Auth::Bearer(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["isArchived"], true);
    assert!(response.data()["archivedAt"].is_string());

    let again = app
        .request(
            "POST",
            &format!("/api/clients/{id}/archive"),
            None,
            Auth::Bearer(&admin_token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let hidden = app
        .request("GET", "/api/clients", None, Auth::Bearer(&smm_token))
        .await;
    assert_eq!(hidden.data()["total"], 0);

    let shown = app
        .request(
            "GET",
            "/api/clients?includeArchived=true",
            None,
            Auth::Bearer(&smm_token),
        )
        .await;
    assert_eq!(shown.data()["total"], 1);

    let edit = app
        .request(
            "PATCH",
            &format!("/api/clients/{id}"),
            Some(json!({ "name": "Renamed" })),
            Auth::Bearer(&smm_token),
        )
        .await;
    assert_eq!(edit.status, StatusCode::CONFLICT);

    let response = app
        .request(
            "POST",
            &format!("/api/clients/{id}/unarchive"),
            None,
            Auth::Bearer(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["isArchived"], false);
    assert!(response.data()["archivedAt"].is_null());

    let again = app
        .request(
            "POST",
            &format!("/api/clients/{id}/unarchive"),
            None,
            Auth::Bearer(&admin_token),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_requires_owner_and_archived_client() {
    let app = TestApp::new();
    let (_, admin_token) = app.staff("admin@agency.test", Role::Admin).await;
    let (_, owner_token) = app.staff("owner@agency.test", Role::SuperAdmin).await;
    let id = create_client(&app, &admin_token, json!({ "name": "Acme" })).await;
    let path = format!("/api/clients/{id}");

    let response = app
        .request("DELETE", &path, None, Auth::Bearer(&admin_token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("DELETE", &path, None, Auth::Bearer(&owner_token))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    app.request(
        "POST",
        &format!("{path}/archive"),
        None,
        Auth::Bearer(&owner_token),
    )
    .await;

    let response = app
        .request("DELETE", &path, None, Auth::Bearer(&owner_token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &path, None, Auth::Bearer(&owner_token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_client_routes_require_session_and_numeric_id() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/clients", None, Auth::None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let (_, token) = app.staff("admin@agency.test", Role::Admin).await;
    let response = app
        .request("GET", "/api/clients/abc", None, Auth::Bearer(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .request("GET", "/api/clients/4242", None, Auth::Bearer(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
