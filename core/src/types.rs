//! Request and response models for the example API.
//!
//! # Design
//! Request models have private fields and are only obtainable through
//! constructors that run their validation rules, so a value that exists is a
//! value the server will accept. Response models are validated by
//! `normalize::decode` right after deserialization. These types mirror the
//! mock-server's schema but are defined independently; integration tests
//! catch schema drift.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, Result};

pub const MAX_ID_LEN: usize = 64;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_TAGS: usize = 16;
pub const MAX_TAG_LEN: usize = 32;
pub const MAX_PAGE_SIZE: u32 = 100;

// `validator`'s `length` bounds are `u64`; mirror the `usize` limits above.
const MAX_ID_LEN_U64: u64 = MAX_ID_LEN as u64;
const MAX_NAME_LEN_U64: u64 = MAX_NAME_LEN as u64;
const MAX_DESCRIPTION_LEN_U64: u64 = MAX_DESCRIPTION_LEN as u64;
const MAX_TAGS_U64: u64 = MAX_TAGS as u64;
const MAX_TAG_LEN_U64: u64 = MAX_TAG_LEN as u64;

/// Identifier of an example resource: 1 to 64 ASCII letters, digits, `-` or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExampleId(String);

impl ExampleId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.len() > MAX_ID_LEN {
            return Err(ApiError::validation(format!(
                "example id must be 1-{MAX_ID_LEN} characters, got {}",
                id.len()
            )));
        }
        if let Some(bad) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ApiError::validation(format!(
                "example id contains invalid character {bad:?}"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExampleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ExampleId {
    type Error = ApiError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

/// A single example resource returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Example {
    #[validate(length(min = 1, max = MAX_ID_LEN_U64))]
    pub id: String,
    #[serde(default)]
    #[validate(length(max = MAX_NAME_LEN_U64))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One page of examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExampleList {
    #[validate(nested)]
    pub items: Vec<Example>,
    pub total: u64,
}

/// Result of the health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct HealthStatus {
    #[validate(length(min = 1))]
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Payload for creating an example.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateExample {
    #[validate(length(min = 1, max = MAX_NAME_LEN_U64))]
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_DESCRIPTION_LEN_U64))]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[validate(length(max = MAX_TAGS_U64))]
    tags: Vec<String>,
}

impl CreateExample {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_details(name, None, Vec::new())
    }

    pub fn with_details(
        name: impl Into<String>,
        description: Option<String>,
        tags: Vec<String>,
    ) -> Result<Self> {
        let input = Self {
            name: name.into(),
            description,
            tags,
        };
        input.validate()?;
        validate_tags(&input.tags)?;
        Ok(input)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Partial update. Only the fields present in the JSON are applied; omitted
/// fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateExample {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_NAME_LEN_U64))]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_DESCRIPTION_LEN_U64))]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = MAX_TAGS_U64))]
    tags: Option<Vec<String>>,
}

impl UpdateExample {
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<Self> {
        let input = Self {
            name,
            description,
            tags,
        };
        if input.name.is_none() && input.description.is_none() && input.tags.is_none() {
            return Err(ApiError::validation("update must change at least one field"));
        }
        input.validate()?;
        if let Some(tags) = &input.tags {
            validate_tags(tags)?;
        }
        Ok(input)
    }

    pub fn rename(name: impl Into<String>) -> Result<Self> {
        Self::new(Some(name.into()), None, None)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }
}

/// Paging and filtering for `list_examples`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ListExamplesParams {
    #[validate(range(min = 1, max = MAX_PAGE_SIZE))]
    limit: Option<u32>,
    offset: u32,
    #[validate(length(min = 1, max = MAX_TAG_LEN_U64))]
    tag: Option<String>,
}

impl ListExamplesParams {
    pub fn new(limit: Option<u32>, offset: u32, tag: Option<String>) -> Result<Self> {
        let params = Self { limit, offset, tag };
        params.validate()?;
        Ok(params)
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if self.offset > 0 {
            query.push(("offset", self.offset.to_string()));
        }
        if let Some(tag) = &self.tag {
            query.push(("tag", tag.clone()));
        }
        query
    }
}

fn validate_tags(tags: &[String]) -> Result<()> {
    for tag in tags {
        if tag.is_empty() || tag.chars().count() > MAX_TAG_LEN {
            return Err(ApiError::validation(format!(
                "tag {tag:?} must be 1-{MAX_TAG_LEN} characters"
            )));
        }
    }
    Ok(())
}
