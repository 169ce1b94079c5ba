//! Form session bound to one deposit.
//!
//! A [`FormSession`] owns everything whose lifetime is the form's: the
//! record slice being edited, the loaded form definition, the category
//! cache and the validation router. Lookups are exposed here so callers do
//! not have to wire sources to the fetcher themselves.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument};

use deposit_core::defaults::{FORM_CHANGE_HOOK, FORM_UPDATE_ON};
use deposit_core::{
    AuthorSuggestion, Category, Copyright, DepositRecord, FieldErrorSink, FieldPath, JsonFetcher,
    KeywordSuggestion, LicenseSuggestion, LookupOptions, Result, SchemaLoader, TemplateRegistry,
    TypeEntry, ValidationError,
};

use crate::authors::AuthorSource;
use crate::autocomplete::lookup;
use crate::categories::CategoryCatalog;
use crate::config::FormConfig;
use crate::keywords::KeywordSource;
use crate::licenses::LicenseSource;
use crate::validation::ValidationRouter;

/// Per-field model options handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOptions {
    pub update_on: String,
    pub allow_invalid: bool,
}

/// Defaults applied to every field the renderer draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefaults {
    pub readonly: bool,
    pub disable_success_state: bool,
    pub feedback: bool,
    /// Evaluated on every edit; routes to [`FormSession::on_form_key_changed`].
    pub on_change: String,
    pub ng_model_options: ModelOptions,
}

impl FormDefaults {
    pub fn for_record(record: &DepositRecord) -> Self {
        Self {
            readonly: record.published,
            disable_success_state: true,
            feedback: false,
            on_change: FORM_CHANGE_HOOK.to_string(),
            ng_model_options: ModelOptions {
                update_on: FORM_UPDATE_ON.to_string(),
                allow_invalid: true,
            },
        }
    }
}

/// Register custom renderer templates.
///
/// Each entry maps a template key to a file under `base`. The first `_` of
/// the key becomes `-` to form the decorator name. Nothing is registered
/// unless both a base and at least one template are given. Returns the
/// number of templates registered.
pub fn register_templates(
    base: Option<&str>,
    templates: &BTreeMap<String, String>,
    registry: &mut dyn TemplateRegistry,
) -> usize {
    let Some(base) = base.filter(|b| !b.is_empty()) else {
        return 0;
    };
    if templates.is_empty() {
        return 0;
    }

    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };

    for (key, file) in templates {
        let decorator = key.replacen('_', "-", 1);
        debug!(decorator = %decorator, file = %file, "Registering template");
        registry.set_template(&decorator, format!("{}{}", base, file));
    }
    templates.len()
}

/// Metadata form state for one deposit.
pub struct FormSession {
    fetcher: Arc<dyn JsonFetcher>,
    record: DepositRecord,
    default_copyright: Option<Copyright>,
    schema: Option<JsonValue>,
    categories: CategoryCatalog,
    validation: ValidationRouter,
}

impl FormSession {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        record: DepositRecord,
        config: &FormConfig,
        sink: Arc<dyn FieldErrorSink>,
    ) -> Self {
        let categories = CategoryCatalog::new(fetcher.clone(), &config.categories_url);
        let validation = ValidationRouter::new(
            record.id.clone(),
            config.no_validate_fields.iter().cloned(),
            sink,
        );
        Self {
            fetcher,
            record,
            default_copyright: None,
            schema: None,
            categories,
            validation,
        }
    }

    /// Copyright copied into the record when the user types its holder.
    pub fn with_default_copyright(mut self, copyright: Copyright) -> Self {
        self.default_copyright = Some(copyright);
        self
    }

    pub fn record(&self) -> &DepositRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut DepositRecord {
        &mut self.record
    }

    /// Resolve the form definition at `url` and keep it for the session.
    #[instrument(skip(self), fields(subsystem = "form", op = "load_form", deposit_id = %self.record.id))]
    pub async fn load_form(&mut self, url: &str) -> Result<&JsonValue> {
        let schema = self.fetcher.load_schema(url).await?;
        info!("Form definition loaded");
        let schema: &JsonValue = self.schema.insert(schema);
        Ok(schema)
    }

    /// Form definition, once [`load_form`](Self::load_form) has succeeded.
    pub fn schema(&self) -> Option<&JsonValue> {
        self.schema.as_ref()
    }

    pub fn form_defaults(&self) -> FormDefaults {
        FormDefaults::for_record(&self.record)
    }

    /// Apply the default copyright when `value` names its holder.
    ///
    /// Comparison ignores case. Returns `true` when the record was updated.
    pub fn check_copyright(&mut self, value: &str) -> bool {
        let Some(default) = &self.default_copyright else {
            return false;
        };
        if value.to_lowercase() != default.holder.to_lowercase() {
            return false;
        }
        debug!(holder = %default.holder, "Applying default copyright");
        self.record.copyright = Some(default.clone());
        true
    }

    pub async fn autocomplete_licenses(
        &self,
        options: &LookupOptions,
        query: &str,
    ) -> Result<Vec<LicenseSuggestion>> {
        lookup(self.fetcher.as_ref(), &LicenseSource, options, query).await
    }

    /// Keyword suggestions, including the keywords already on the record.
    pub async fn autocomplete_keywords(
        &self,
        options: &LookupOptions,
        query: &str,
    ) -> Result<Vec<KeywordSuggestion>> {
        let source = KeywordSource::new(&self.record.keywords);
        lookup(self.fetcher.as_ref(), &source, options, query).await
    }

    pub async fn autocomplete_authors(
        &self,
        options: &LookupOptions,
        query: &str,
    ) -> Result<Vec<AuthorSuggestion>> {
        lookup(self.fetcher.as_ref(), &AuthorSource, options, query).await
    }

    /// All categories, fetched once per session.
    pub async fn autocomplete_categories(&self) -> Result<Vec<Category>> {
        self.categories.categories().await
    }

    /// All types. Loads categories first when they have not been loaded.
    pub async fn autocomplete_types(&self) -> Result<Vec<TypeEntry>> {
        self.categories.types().await
    }

    pub fn categories(&self) -> &CategoryCatalog {
        &self.categories
    }

    pub fn validation(&self) -> &ValidationRouter {
        &self.validation
    }

    /// Relay a backend validation error; see [`ValidationRouter::on_validation_error`].
    pub fn on_validation_error(&self, deposit_id: &str, error: &ValidationError) -> bool {
        self.validation.on_validation_error(deposit_id, error)
    }

    /// Change hook for every field; clears that field's backend error.
    pub fn on_field_changed(&self, field: &FieldPath) -> bool {
        self.validation.on_field_changed(field)
    }

    /// Target of the renderer's `on_change` hook. `key` is the form key of
    /// the edited field, e.g. `["title", "title"]`.
    pub fn on_form_key_changed<S: AsRef<str>>(&self, key: &[S]) -> bool {
        self.on_field_changed(&FieldPath::from_segments(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deposit_core::{FieldSignal, QueryParams};
    use serde_json::json;
    use tokio::sync::mpsc;

    struct SchemaFetcher;

    #[async_trait]
    impl JsonFetcher for SchemaFetcher {
        async fn get_json(&self, url: &str, params: &QueryParams) -> Result<JsonValue> {
            assert!(params.is_empty());
            Ok(json!({"url": url, "form": ["title", "description"]}))
        }
    }

    fn session(record: DepositRecord) -> (FormSession, mpsc::UnboundedReceiver<FieldSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let config = FormConfig {
            no_validate_fields: vec!["_files".to_string()],
            ..Default::default()
        };
        (
            FormSession::new(Arc::new(SchemaFetcher), record, &config, Arc::new(tx)),
            rx,
        )
    }

    fn cern_copyright() -> Copyright {
        Copyright {
            holder: "CERN".to_string(),
            year: Some("2026".to_string()),
            url: Some("http://copyright.web.cern.ch".to_string()),
        }
    }

    #[test]
    fn test_register_templates_normalizes_base() {
        let templates = BTreeMap::from([
            ("ui_select".to_string(), "select.html".to_string()),
            ("text_area_x".to_string(), "textarea.html".to_string()),
        ]);
        let mut registry: BTreeMap<String, String> = BTreeMap::new();

        let count = register_templates(Some("/static/templates"), &templates, &mut registry);

        assert_eq!(count, 2);
        assert_eq!(registry["ui-select"], "/static/templates/select.html");
        assert_eq!(registry["text-area_x"], "/static/templates/textarea.html");
    }

    #[test]
    fn test_register_templates_keeps_trailing_slash() {
        let templates = BTreeMap::from([("fileupload".to_string(), "upload.html".to_string())]);
        let mut registry: BTreeMap<String, String> = BTreeMap::new();
        register_templates(Some("/t/"), &templates, &mut registry);
        assert_eq!(registry["fileupload"], "/t/upload.html");
    }

    #[test]
    fn test_register_templates_requires_base() {
        let templates = BTreeMap::from([("a".to_string(), "a.html".to_string())]);
        let mut registry: BTreeMap<String, String> = BTreeMap::new();
        assert_eq!(register_templates(None, &templates, &mut registry), 0);
        assert_eq!(register_templates(Some(""), &templates, &mut registry), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_form_defaults_readonly_when_published() {
        let mut record = DepositRecord::new("dep-1");
        assert!(!FormDefaults::for_record(&record).readonly);
        record.published = true;
        let defaults = FormDefaults::for_record(&record);
        assert!(defaults.readonly);

        let json = serde_json::to_value(&defaults).unwrap();
        assert_eq!(
            json,
            json!({
                "readonly": true,
                "disableSuccessState": true,
                "feedback": false,
                "onChange": "onFieldChanged(form.key)",
                "ngModelOptions": {"updateOn": "default blur", "allowInvalid": true}
            })
        );
    }

    #[test]
    fn test_check_copyright_matches_holder_ignoring_case() {
        let (session, _rx) = session(DepositRecord::new("dep-1"));
        let mut session = session.with_default_copyright(cern_copyright());

        assert!(!session.check_copyright("ATLAS"));
        assert_eq!(session.record().copyright, None);

        assert!(session.check_copyright("cern"));
        assert_eq!(session.record().copyright, Some(cern_copyright()));
    }

    #[test]
    fn test_check_copyright_without_default() {
        let (mut session, _rx) = session(DepositRecord::new("dep-1"));
        assert!(!session.check_copyright("CERN"));
    }

    #[tokio::test]
    async fn test_load_form_keeps_schema() {
        let (mut session, _rx) = session(DepositRecord::new("dep-1"));
        assert!(session.schema().is_none());

        let schema = session.load_form("http://x/form.json").await.unwrap();
        assert_eq!(schema["url"], "http://x/form.json");
        assert_eq!(session.schema().unwrap()["form"][0], "title");
    }

    #[tokio::test]
    async fn test_validation_flows_to_channel() {
        let (session, mut rx) = session(DepositRecord::new("dep-1"));
        let title = FieldPath::from("title");

        assert!(session.on_validation_error("dep-1", &ValidationError::new("title", "Required")));
        assert!(!session.on_validation_error("dep-1", &ValidationError::new("_files", "Missing")));
        assert!(session.on_field_changed(&title));

        assert_eq!(
            rx.recv().await,
            Some(FieldSignal::Error {
                field: title.clone(),
                message: "Required".to_string()
            })
        );
        assert_eq!(rx.recv().await, Some(FieldSignal::Clear { field: title }));
    }

    #[tokio::test]
    async fn test_empty_queries_resolve_without_fetching() {
        let (session, _rx) = session(DepositRecord::new("dep-1"));
        let options = LookupOptions::new("http://x/never");
        assert!(session.autocomplete_licenses(&options, "").await.unwrap().is_empty());
        assert!(session.autocomplete_keywords(&options, "").await.unwrap().is_empty());
        assert!(session.autocomplete_authors(&options, "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_change_hook_clears_error_by_form_key() {
        let (session, mut rx) = session(DepositRecord::new("dep-1"));
        assert_eq!(session.form_defaults().on_change, FORM_CHANGE_HOOK);

        session.on_validation_error("dep-1", &ValidationError::new("title.title", "Too short"));
        assert!(session.on_form_key_changed(&["title", "title"]));
        assert!(!session.on_form_key_changed(&["title", "title"]));

        rx.recv().await;
        assert_eq!(
            rx.recv().await,
            Some(FieldSignal::Clear {
                field: FieldPath::from("title.title")
            })
        );
    }
}
