use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Example, ExampleList};
use tower::ServiceExt;

const TOKEN: &str = "Bearer test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- health ---

#[tokio::test]
async fn health_needs_no_token() {
    let resp = app()
        .oneshot(Request::builder().uri("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/examples").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- list ---

#[tokio::test]
async fn list_examples_empty() {
    let resp = app().oneshot(request("GET", "/examples")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page: ExampleList = body_json(resp).await;
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

// --- create ---

#[tokio::test]
async fn create_example_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/examples", r#"{"name":"Widget"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let example: Example = body_json(resp).await;
    assert_eq!(example.name, "Widget");
    assert!(!example.id.is_empty());
    assert!(example.tags.is_empty());
}

#[tokio::test]
async fn create_example_blank_name_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/examples", r#"{"name":"  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_example_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/examples", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete on unknown ids ---

#[tokio::test]
async fn get_example_not_found() {
    let resp = app().oneshot(request("GET", "/examples/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_example_not_found() {
    let resp = app()
        .oneshot(json_request("PATCH", "/examples/missing", r#"{"name":"Nope"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_example_not_found() {
    let resp = app().oneshot(request("DELETE", "/examples/missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- paging and filtering ---

#[tokio::test]
async fn list_examples_pages_and_filters() {
    use tower::Service;

    let mut app = app().into_service();

    for (name, tag) in [("a", "red"), ("b", "blue"), ("c", "red")] {
        let body = format!(r#"{{"name":"{name}","tags":["{tag}"]}}"#);
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/examples", &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/examples?tag=red"))
        .await
        .unwrap();
    let page: ExampleList = body_json(resp).await;
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|e| e.tags == ["red"]));

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/examples?limit=2&offset=1"))
        .await
        .unwrap();
    let page: ExampleList = body_json(resp).await;
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/examples",
            r#"{"name":"Widget","description":"first","tags":["a"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Example = body_json(resp).await;
    let id = created.id.clone();

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/examples/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Example = body_json(resp).await;
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.name, "Widget");

    // partial update: name only
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/examples/{id}"),
            r#"{"name":"Gadget"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Example = body_json(resp).await;
    assert_eq!(updated.name, "Gadget");
    assert_eq!(updated.description.as_deref(), Some("first")); // unchanged
    assert_eq!(updated.tags, ["a"]); // unchanged

    // partial update: tags only
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/examples/{id}"),
            r#"{"tags":["b","c"]}"#,
        ))
        .await
        .unwrap();
    let updated: Example = body_json(resp).await;
    assert_eq!(updated.name, "Gadget"); // unchanged from previous update
    assert_eq!(updated.tags, ["b", "c"]);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("/examples/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = body_bytes(resp).await;
    assert!(body.is_empty());

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &format!("/examples/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/examples"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page: ExampleList = body_json(resp).await;
    assert!(page.items.is_empty());
}
