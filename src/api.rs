//! Template API collaborator: wire types and the HTTP adapter.
//!
//! The wire format is pixel-valued — `position` carries pixel coordinates
//! and the in-memory model carries normalized fractions. That boundary
//! conversion happens in [`crate::save`] (outbound) and
//! [`crate::reconcile`] (inbound); this module only moves bytes.
//!
//! [`TemplateApi`] is a trait so the save reconciler can be driven against
//! an in-memory fake in tests; [`HttpTemplateApi`] is the production
//! implementation over REST.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::field::{FieldId, FieldType};

/// Server-assigned template identity.
pub type TemplateId = i64;

/// Error from a template API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, TLS, decode).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),
}

/// Field geometry as transmitted: pixel-valued, page-numbered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// 1-based page number.
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A field record as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireField {
    /// Persisted identity; absent on create payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FieldId>,
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    pub position: WirePosition,
    /// Open-ended per-type options bag; may be partial in legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(default)]
    pub partner: String,
    #[serde(default)]
    pub display_order: i64,
}

/// A template with its raw field records, as returned by the full-info
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<WireField>,
}

/// Asynchronous template field API.
#[async_trait]
pub trait TemplateApi: Send + Sync {
    /// Persist a new field. The returned record carries the server id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    async fn create_field(
        &self,
        template_id: TemplateId,
        field: &WireField,
    ) -> Result<WireField, ApiError>;

    /// Replace a persisted field's mutable attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    async fn update_field(
        &self,
        template_id: TemplateId,
        field_id: FieldId,
        field: &WireField,
    ) -> Result<(), ApiError>;

    /// Delete a persisted field.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    async fn delete_field(&self, template_id: TemplateId, field_id: FieldId)
    -> Result<(), ApiError>;

    /// Fetch a template with its raw field records.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status.
    async fn template_full_info(&self, template_id: TemplateId) -> Result<TemplateInfo, ApiError>;
}

/// REST implementation of [`TemplateApi`].
pub struct HttpTemplateApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTemplateApi {
    /// Create an adapter rooted at `base_url` (trailing slash tolerated).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn fields_url(&self, template_id: TemplateId) -> String {
        format!("{}/api/templates/{template_id}/fields", self.base_url)
    }

    fn field_url(&self, template_id: TemplateId, field_id: FieldId) -> String {
        format!("{}/api/templates/{template_id}/fields/{field_id}", self.base_url)
    }
}

fn expect_success(resp: &reqwest::Response) -> Result<(), ApiError> {
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(ApiError::Status(resp.status().as_u16()))
    }
}

#[async_trait]
impl TemplateApi for HttpTemplateApi {
    async fn create_field(
        &self,
        template_id: TemplateId,
        field: &WireField,
    ) -> Result<WireField, ApiError> {
        let resp = self
            .client
            .post(self.fields_url(template_id))
            .json(field)
            .send()
            .await?;
        expect_success(&resp)?;
        Ok(resp.json::<WireField>().await?)
    }

    async fn update_field(
        &self,
        template_id: TemplateId,
        field_id: FieldId,
        field: &WireField,
    ) -> Result<(), ApiError> {
        let resp = self
            .client
            .put(self.field_url(template_id, field_id))
            .json(field)
            .send()
            .await?;
        expect_success(&resp)
    }

    async fn delete_field(
        &self,
        template_id: TemplateId,
        field_id: FieldId,
    ) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(self.field_url(template_id, field_id))
            .send()
            .await?;
        expect_success(&resp)
    }

    async fn template_full_info(&self, template_id: TemplateId) -> Result<TemplateInfo, ApiError> {
        let resp = self
            .client
            .get(format!("{}/api/templates/{template_id}", self.base_url))
            .send()
            .await?;
        expect_success(&resp)?;
        Ok(resp.json::<TemplateInfo>().await?)
    }
}
