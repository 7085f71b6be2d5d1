use super::to_json;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::normalize::decode;
use crate::transport::TransportClient;
use crate::types::{CreateExample, Example, ExampleId, ExampleList, ListExamplesParams, UpdateExample};

/// Operations under `/examples`.
#[derive(Debug, Clone, Copy)]
pub struct Examples<'a> {
    transport: &'a TransportClient,
}

impl<'a> Examples<'a> {
    pub(crate) fn new(transport: &'a TransportClient) -> Self {
        Self { transport }
    }

    /// Fetches one example. An invalid id fails with `Validation` before
    /// any request is made; an unknown id fails with `HttpStatus` 404.
    pub async fn get_example(&self, id: impl AsRef<str>) -> Result<Example> {
        let id = ExampleId::new(id.as_ref())?;
        let response = self
            .transport
            .send(HttpMethod::Get, &item_path(&id), &[], None)
            .await?;
        decode(&response)
    }

    pub async fn list_examples(&self, params: &ListExamplesParams) -> Result<ExampleList> {
        let response = self
            .transport
            .send(HttpMethod::Get, "/examples", &params.to_query(), None)
            .await?;
        decode(&response)
    }

    pub async fn create_example(&self, input: &CreateExample) -> Result<Example> {
        let body = to_json(input)?;
        let response = self
            .transport
            .send(HttpMethod::Post, "/examples", &[], Some(body))
            .await?;
        decode(&response)
    }

    pub async fn update_example(&self, id: impl AsRef<str>, input: &UpdateExample) -> Result<Example> {
        let id = ExampleId::new(id.as_ref())?;
        let body = to_json(input)?;
        let response = self
            .transport
            .send(HttpMethod::Patch, &item_path(&id), &[], Some(body))
            .await?;
        decode(&response)
    }

    pub async fn delete_example(&self, id: impl AsRef<str>) -> Result<()> {
        let id = ExampleId::new(id.as_ref())?;
        self.transport
            .send(HttpMethod::Delete, &item_path(&id), &[], None)
            .await?;
        Ok(())
    }
}

fn item_path(id: &ExampleId) -> String {
    format!("/examples/{id}")
}
