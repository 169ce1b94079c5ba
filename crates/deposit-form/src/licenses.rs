//! License lookup against the license completion suggester.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use deposit_core::defaults::LICENSE_PARAM;
use deposit_core::{LicenseSuggestion, LookupOptions, QueryParams, Result};

use crate::autocomplete::{suggester_payloads, SuggestionSource};

#[derive(Deserialize)]
struct LicensePayload {
    id: String,
}

/// Suggests license identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LicenseSource;

impl SuggestionSource for LicenseSource {
    type Item = LicenseSuggestion;

    fn name(&self) -> &'static str {
        "licenses"
    }

    fn params(&self, query: &str, _options: &LookupOptions) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert(LICENSE_PARAM.to_string(), JsonValue::from(query));
        params
    }

    fn transform(&self, response: JsonValue, _query: &str) -> Result<Vec<LicenseSuggestion>> {
        let payloads: Vec<LicensePayload> = suggester_payloads(response, LICENSE_PARAM)?;
        Ok(payloads
            .into_iter()
            .map(|p| LicenseSuggestion::license(p.id))
            .collect())
    }
}
