//! Collaborator traits for the deposit form.
//!
//! The form talks to three things it does not own: an HTTP endpoint that
//! answers GET requests with JSON, the renderer that displays per-field
//! errors, and the renderer's template table. These traits are those seams.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::Result;
use crate::models::{FieldPath, FieldSignal, QueryParams};

/// HTTP GET returning a JSON body.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetch `url` with `params` encoded in the query string.
    async fn get_json(&self, url: &str, params: &QueryParams) -> Result<JsonValue>;
}

/// Resolves the form definition the renderer draws from.
#[async_trait]
pub trait SchemaLoader: Send + Sync {
    async fn load_schema(&self, url: &str) -> Result<JsonValue>;
}

#[async_trait]
impl<T: JsonFetcher + ?Sized> SchemaLoader for T {
    async fn load_schema(&self, url: &str) -> Result<JsonValue> {
        self.get_json(url, &QueryParams::new()).await
    }
}

/// Receives per-field error display and clear requests.
pub trait FieldErrorSink: Send + Sync {
    fn show_error(&self, field: &FieldPath, message: &str);

    fn clear_error(&self, field: &FieldPath);
}

impl FieldErrorSink for UnboundedSender<FieldSignal> {
    fn show_error(&self, field: &FieldPath, message: &str) {
        let signal = FieldSignal::Error {
            field: field.clone(),
            message: message.to_string(),
        };
        if self.send(signal).is_err() {
            tracing::debug!(field = %field, "Field signal receiver dropped");
        }
    }

    fn clear_error(&self, field: &FieldPath) {
        if self.send(FieldSignal::Clear { field: field.clone() }).is_err() {
            tracing::debug!(field = %field, "Field signal receiver dropped");
        }
    }
}

/// Per-decorator template table of the form renderer.
pub trait TemplateRegistry {
    fn set_template(&mut self, decorator: &str, template_url: String);
}

impl TemplateRegistry for BTreeMap<String, String> {
    fn set_template(&mut self, decorator: &str, template_url: String) {
        self.insert(decorator.to_string(), template_url);
    }
}
