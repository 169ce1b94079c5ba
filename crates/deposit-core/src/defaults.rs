//! Centralized default constants for the deposit form.
//!
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// AUTOCOMPLETE
// =============================================================================

/// Maximum number of suggestions returned by a single autocomplete lookup.
pub const SUGGESTION_LIMIT: usize = 10;

/// Query parameter carrying the text for the license suggester.
pub const LICENSE_PARAM: &str = "text";

/// Query parameter carrying the text for the keyword suggester.
pub const KEYWORD_PARAM: &str = "suggest-name";

/// Query parameter carrying the text for the author search.
pub const AUTHOR_PARAM: &str = "query";

/// Author record fields that carry external identifiers, with the source
/// name each one is reported under. Order is the order ids are emitted in.
pub const AUTHOR_ID_SOURCES: [(&str, &str); 3] = [
    ("cernccid", "cern"),
    ("recid", "cds"),
    ("inspireid", "inspire"),
];

// =============================================================================
// FORM
// =============================================================================

/// Events that make the renderer push a field's model value.
pub const FORM_UPDATE_ON: &str = "default blur";

/// Change hook expression the renderer evaluates on every field edit. Hosts
/// dispatch it to `FormSession::on_form_key_changed` with the field's key.
pub const FORM_CHANGE_HOOK: &str = "onFieldChanged(form.key)";

// =============================================================================
// ENVIRONMENT
// =============================================================================

pub const ENV_LICENSES_URL: &str = "DEPOSIT_LICENSES_URL";
pub const ENV_KEYWORDS_URL: &str = "DEPOSIT_KEYWORDS_URL";
pub const ENV_AUTHORS_URL: &str = "DEPOSIT_AUTHORS_URL";
pub const ENV_CATEGORIES_URL: &str = "DEPOSIT_CATEGORIES_URL";
pub const ENV_SCHEMA_URL: &str = "DEPOSIT_SCHEMA_URL";
pub const ENV_TEMPLATES_BASE: &str = "DEPOSIT_TEMPLATES_BASE";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "DEPOSIT_HTTP_TIMEOUT_SECS";
pub const ENV_NO_VALIDATE_FIELDS: &str = "DEPOSIT_NO_VALIDATE_FIELDS";

/// Base URL used when an endpoint is not configured.
pub const API_BASE_URL: &str = "http://localhost:5000";

/// Default license suggester endpoint.
pub const LICENSES_URL: &str = "http://localhost:5000/api/licenses/_suggest";

/// Default keyword suggester endpoint.
pub const KEYWORDS_URL: &str = "http://localhost:5000/api/keywords/_suggest";

/// Default author search endpoint.
pub const AUTHORS_URL: &str = "http://localhost:5000/api/authors";

/// Default category search endpoint.
pub const CATEGORIES_URL: &str = "http://localhost:5000/api/categories";

/// Default form schema endpoint.
pub const SCHEMA_URL: &str = "http://localhost:5000/schemas/deposits/records/form.json";
