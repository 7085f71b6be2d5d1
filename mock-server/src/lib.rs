use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExampleList {
    pub items: Vec<Example>,
    pub total: usize,
}

#[derive(Deserialize)]
pub struct CreateExample {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateExample {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
    pub tag: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Example>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/health", get(health))
        .route("/examples", get(list_examples).post(create_example))
        .route(
            "/examples/{id}",
            get(get_example).patch(update_example).delete(delete_example),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Any non-empty bearer token is accepted.
fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();
    if token.is_empty() {
        tracing::debug!("rejecting request without bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_examples(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<ExampleList>, StatusCode> {
    authorize(&headers)?;
    let examples = db.read().await;
    let mut matching: Vec<Example> = examples
        .values()
        .filter(|e| query.tag.as_ref().map_or(true, |tag| e.tags.contains(tag)))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.id.cmp(&b.id));
    let total = matching.len();
    let items = matching
        .into_iter()
        .skip(query.offset)
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();
    Ok(Json(ExampleList { items, total }))
}

async fn create_example(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateExample>,
) -> Result<(StatusCode, Json<Example>), StatusCode> {
    authorize(&headers)?;
    if input.name.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let example = Example {
        id: Uuid::new_v4().simple().to_string(),
        name: input.name,
        description: input.description,
        tags: input.tags,
    };
    db.write().await.insert(example.id.clone(), example.clone());
    tracing::debug!(id = %example.id, "created example");
    Ok((StatusCode::CREATED, Json(example)))
}

async fn get_example(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Example>, StatusCode> {
    authorize(&headers)?;
    let examples = db.read().await;
    examples.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_example(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateExample>,
) -> Result<Json<Example>, StatusCode> {
    authorize(&headers)?;
    let mut examples = db.write().await;
    let example = examples.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        example.name = name;
    }
    if let Some(description) = input.description {
        example.description = Some(description);
    }
    if let Some(tags) = input.tags {
        example.tags = tags;
    }
    Ok(Json(example.clone()))
}

async fn delete_example(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    authorize(&headers)?;
    let mut examples = db.write().await;
    examples.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_serializes_without_empty_description() {
        let example = Example {
            id: "e1".to_string(),
            name: "Test".to_string(),
            description: None,
            tags: Vec::new(),
        };
        let json = serde_json::to_value(&example).unwrap();
        assert_eq!(json["id"], "e1");
        assert_eq!(json["name"], "Test");
        assert!(json.get("description").is_none());
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn create_example_defaults_tags_to_empty() {
        let input: CreateExample = serde_json::from_str(r#"{"name":"No tags"}"#).unwrap();
        assert_eq!(input.name, "No tags");
        assert!(input.tags.is_empty());
        assert!(input.description.is_none());
    }

    #[test]
    fn create_example_rejects_missing_name() {
        let result: Result<CreateExample, _> = serde_json::from_str(r#"{"tags":["a"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_example_all_fields_optional() {
        let input: UpdateExample = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.name.is_none());
        assert!(input.description.is_none());
        assert!(input.tags.is_none());
    }

    #[test]
    fn authorize_requires_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorize(&headers), Err(StatusCode::UNAUTHORIZED));
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(authorize(&headers), Err(StatusCode::UNAUTHORIZED));
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(authorize(&headers), Err(StatusCode::UNAUTHORIZED));
        headers.insert(header::AUTHORIZATION, "Bearer k".parse().unwrap());
        assert_eq!(authorize(&headers), Ok(()));
    }
}
