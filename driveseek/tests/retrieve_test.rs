//! End-to-end `/retrieve` behavior against a mocked Graph drive.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use driveseek::api::{create_router, AppState};
use driveseek::config::{Config, GraphConfig, RetrievalConfig, ServerConfig};

fn config_for(server: &MockServer) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_key: None,
        },
        graph: GraphConfig {
            tenant_id: "tenant-1".to_string(),
            client_id: "client-1".to_string(),
            client_secret: "secret-1".to_string(),
            site_id: "site-1".to_string(),
            drive_id: "drive-1".to_string(),
            base_url: format!("{}/v1.0", server.uri()),
            token_url: format!("{}/token", server.uri()),
            timeout_secs: 5,
        },
        retrieval: RetrievalConfig { concurrency: 4 },
    }
}

fn app_for(server: &MockServer) -> Router {
    create_router(AppState::new(config_for(server)).unwrap())
}

fn drive_path(rest: &str) -> String {
    format!("/v1.0/sites/site-1/drives/drive-1{rest}")
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

fn file_item(id: &str, name: &str, parent: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "webUrl": format!("https://contoso.example/{name}"),
        "lastModifiedDateTime": "2024-03-01T12:00:00Z",
        "parentReference": { "path": format!("/drives/drive-1/root:/{parent}") },
        "file": { "mimeType": "application/octet-stream" }
    })
}

async fn mount_folder(server: &MockServer, folder: &str, items: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(drive_path(&format!("/root:/{folder}:/children"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": items })))
        .mount(server)
        .await;
}

async fn mount_download(server: &MockServer, id: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(drive_path(&format!("/items/{id}/content"))))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

async fn post_retrieve(app: Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/retrieve")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn empty_query_is_rejected_without_any_remote_call() {
    let server = MockServer::start().await;
    let (status, json) = post_retrieve(app_for(&server), json!({ "query": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("query"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn zero_chunk_width_is_rejected_without_any_remote_call() {
    let server = MockServer::start().await;
    let (status, json) = post_retrieve(
        app_for(&server),
        json!({ "query": "vacation", "maxCharsPerChunk": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("maxCharsPerChunk"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn vacation_policy_scenario_ranks_the_matching_file() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_folder(
        &server,
        "HR/Policies",
        vec![
            file_item("item-policy", "policy.txt", "HR/Policies"),
            file_item("item-handbook", "handbook.pdf", "HR/Policies"),
        ],
    )
    .await;
    mount_download(
        &server,
        "item-policy",
        b"Our vacation policy allows 15 days",
    )
    .await;
    // Not a real PDF: extraction fails, the candidate is skipped, the batch
    // continues.
    mount_download(&server, "item-handbook", b"not a pdf at all").await;

    let (status, body) = post_retrieve(
        app_for(&server),
        json!({ "query": "vacation policy", "pathPrefix": "HR/Policies" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 1);
    assert!(snippets[0]["score"].as_u64().unwrap() >= 2);
    assert_eq!(snippets[0]["file"]["name"], "policy.txt");
    assert_eq!(snippets[0]["file"]["path"], "HR/Policies/policy.txt");
    assert_eq!(
        snippets[0]["text"].as_str().unwrap(),
        "Our vacation policy allows 15 days"
    );
    assert_eq!(
        body["combinedContext"].as_str().unwrap(),
        "Our vacation policy allows 15 days"
    );
    assert_eq!(body["files"].as_array().unwrap().len(), 1);
    assert_eq!(body["topK"], 6);
    assert!(body.get("fileText").is_none());
}

#[tokio::test]
async fn txt_only_file_types_exclude_other_formats() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_folder(
        &server,
        "Docs",
        vec![
            file_item("item-pdf", "matching.pdf", "Docs"),
            file_item("item-docx", "matching.docx", "Docs"),
            file_item("item-txt", "matching.txt", "Docs"),
        ],
    )
    .await;
    mount_download(&server, "item-txt", b"matching text body").await;

    let (status, body) = post_retrieve(
        app_for(&server),
        json!({
            "query": "matching",
            "pathPrefix": "Docs",
            "fileTypes": ["txt"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0]["file"]["name"], "matching.txt");
    // The excluded candidates were never downloaded.
    let downloads: usize = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with("/content"))
        .count();
    assert_eq!(downloads, 1);
}

#[tokio::test]
async fn zero_score_documents_are_emitted_while_top_k_is_unexhausted() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_folder(
        &server,
        "Notes",
        vec![
            file_item("item-miss", "unrelated.txt", "Notes"),
            file_item("item-hit", "relevant.txt", "Notes"),
        ],
    )
    .await;
    mount_download(&server, "item-miss", b"nothing to see here").await;
    mount_download(&server, "item-hit", b"quarterly forecast forecast").await;

    let (status, body) = post_retrieve(
        app_for(&server),
        json!({ "query": "forecast", "pathPrefix": "Notes" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0]["file"]["name"], "relevant.txt");
    assert_eq!(snippets[0]["score"], 2);
    assert_eq!(snippets[1]["file"]["name"], "unrelated.txt");
    assert_eq!(snippets[1]["score"], 0);
}

#[tokio::test]
async fn results_are_sorted_descending_and_truncated_to_top_k() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_folder(
        &server,
        "Reports",
        vec![
            file_item("item-one", "one.txt", "Reports"),
            file_item("item-three", "three.txt", "Reports"),
            file_item("item-two", "two.txt", "Reports"),
        ],
    )
    .await;
    mount_download(&server, "item-one", b"budget").await;
    mount_download(&server, "item-three", b"budget budget budget").await;
    mount_download(&server, "item-two", b"budget budget").await;

    let (status, body) = post_retrieve(
        app_for(&server),
        json!({ "query": "budget", "pathPrefix": "Reports", "topK": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0]["file"]["name"], "three.txt");
    assert_eq!(snippets[0]["score"], 3);
    assert_eq!(snippets[1]["file"]["name"], "two.txt");
    assert_eq!(snippets[1]["score"], 2);
    assert_eq!(body["topK"], 2);
}

#[tokio::test]
async fn combined_context_joins_snippets_with_the_fixed_separator() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_folder(
        &server,
        "Pair",
        vec![
            file_item("item-a", "a.txt", "Pair"),
            file_item("item-b", "b.txt", "Pair"),
        ],
    )
    .await;
    mount_download(&server, "item-a", b"alpha alpha").await;
    mount_download(&server, "item-b", b"alpha").await;

    let (_, body) = post_retrieve(
        app_for(&server),
        json!({ "query": "alpha", "pathPrefix": "Pair" }),
    )
    .await;

    assert_eq!(
        body["combinedContext"].as_str().unwrap(),
        "alpha alpha\n---\nalpha"
    );
}

#[tokio::test]
async fn include_file_text_attaches_the_top_ranked_document() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_folder(
        &server,
        "Single",
        vec![file_item("item-s", "s.txt", "Single")],
    )
    .await;
    mount_download(&server, "item-s", b"the full extracted text of the winner").await;

    let (_, body) = post_retrieve(
        app_for(&server),
        json!({
            "query": "winner",
            "pathPrefix": "Single",
            "includeFileText": true
        }),
    )
    .await;

    assert_eq!(
        body["fileText"].as_str().unwrap(),
        "the full extracted text of the winner"
    );
}

#[tokio::test]
async fn search_branch_is_used_without_a_path_prefix_and_folders_are_dropped() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(drive_path("/root/search(q='forecast')")))
        .and(query_param("$top", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "id": "folder-1", "name": "Forecasts", "folder": {} },
                file_item("item-f", "forecast.txt", "Reports")
            ]
        })))
        .mount(&server)
        .await;
    mount_download(&server, "item-f", b"forecast details").await;

    let (status, body) = post_retrieve(app_for(&server), json!({ "query": "forecast" })).await;

    assert_eq!(status, StatusCode::OK);
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0]["file"]["name"], "forecast.txt");
}

#[tokio::test]
async fn search_queries_with_reserved_characters_reach_upstream_intact() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    // A question mark in the query must stay inside the OData literal instead
    // of starting the query string.
    Mock::given(method("GET"))
        .and(path(drive_path(
            "/root/search(q='what%20is%20the%20vacation%20policy%3F')",
        )))
        .and(query_param("$top", "24"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [file_item("item-p", "policy.txt", "HR")]
        })))
        .mount(&server)
        .await;
    mount_download(&server, "item-p", b"the vacation policy is 15 days").await;

    let (status, body) = post_retrieve(
        app_for(&server),
        json!({ "query": "what is the vacation policy?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0]["file"]["name"], "policy.txt");
}

#[tokio::test]
async fn failed_download_skips_the_candidate_but_not_the_batch() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_folder(
        &server,
        "Mixed",
        vec![
            file_item("item-bad", "bad.txt", "Mixed"),
            file_item("item-good", "good.txt", "Mixed"),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path(drive_path("/items/item-bad/content")))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;
    mount_download(&server, "item-good", b"still works").await;

    let (status, body) = post_retrieve(
        app_for(&server),
        json!({ "query": "works", "pathPrefix": "Mixed" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0]["file"]["name"], "good.txt");
}

#[tokio::test]
async fn nested_folders_are_traversed_depth_first() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_folder(
        &server,
        "Top",
        vec![
            json!({ "id": "sub", "name": "Sub", "folder": {} }),
            file_item("item-top", "top.txt", "Top"),
        ],
    )
    .await;
    mount_folder(
        &server,
        "Top/Sub",
        vec![file_item("item-deep", "deep.txt", "Top/Sub")],
    )
    .await;
    mount_download(&server, "item-top", b"needle").await;
    mount_download(&server, "item-deep", b"needle needle").await;

    let (status, body) = post_retrieve(
        app_for(&server),
        json!({ "query": "needle", "pathPrefix": "Top" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snippets = body["snippets"].as_array().unwrap();
    assert_eq!(snippets.len(), 2);
    assert_eq!(snippets[0]["file"]["name"], "deep.txt");
    assert_eq!(snippets[0]["file"]["path"], "Top/Sub/deep.txt");
}
