//! Generic autocomplete adapter.
//!
//! Every lookup the form offers has the same life cycle: build query
//! parameters from the user's text, issue one GET, reshape the response
//! into suggestions, keep the first [`SUGGESTION_LIMIT`]. A
//! [`SuggestionSource`] supplies the two endpoint-specific steps and
//! [`lookup`] runs the rest.
//!
//! Requests are neither deduplicated nor cancelled. Two lookups in flight
//! can resolve in either order; callers that care must fence on their own.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

use deposit_core::defaults::SUGGESTION_LIMIT;
use deposit_core::{Error, JsonFetcher, LookupOptions, Named, QueryParams, Result, Suggestion};

/// Endpoint-specific half of an autocomplete lookup.
pub trait SuggestionSource: Send + Sync {
    type Item: Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Query parameters for `query`.
    fn params(&self, query: &str, options: &LookupOptions) -> QueryParams;

    /// Turn the endpoint's response into suggestions, before truncation.
    fn transform(&self, response: JsonValue, query: &str) -> Result<Vec<Self::Item>>;
}

/// Run one lookup for `query` against `options.url`.
///
/// An empty query resolves to an empty list without a request. Transport
/// and decode failures are returned as-is; there is no retry.
#[instrument(
    skip(fetcher, source, options),
    fields(subsystem = "autocomplete", component = source.name(), op = "lookup", url = %options.url)
)]
pub async fn lookup<S>(
    fetcher: &dyn JsonFetcher,
    source: &S,
    options: &LookupOptions,
    query: &str,
) -> Result<Vec<S::Item>>
where
    S: SuggestionSource + ?Sized,
{
    if query.is_empty() {
        debug!("Empty query, no request issued");
        return Ok(Vec::new());
    }

    let start = Instant::now();
    let params = source.params(query, options);
    let response = fetcher.get_json(&options.url, &params).await?;

    let mut suggestions = source.transform(response, query)?;
    suggestions.truncate(SUGGESTION_LIMIT);

    debug!(
        result_count = suggestions.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Lookup complete"
    );
    Ok(suggestions)
}

/// Put the suggestion derived from the user's own input first, unless a
/// suggestion with the same name (ignoring case) is already listed.
pub fn prepend_user_input<V: Named>(
    user_input: Option<Suggestion<V>>,
    suggestions: &mut Vec<Suggestion<V>>,
) {
    let Some(user_input) = user_input else {
        return;
    };
    let wanted = user_input.name().to_uppercase();
    if suggestions
        .iter()
        .any(|s| s.name().to_uppercase() == wanted)
    {
        return;
    }
    suggestions.insert(0, user_input);
}

#[derive(Deserialize)]
struct SuggesterEntry<P> {
    options: Vec<SuggesterOption<P>>,
}

#[derive(Deserialize)]
struct SuggesterOption<P> {
    payload: P,
}

/// Text of an identifier field: strings verbatim, other values as JSON
/// text. Null and the empty string mean no identifier.
pub(crate) fn id_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Payloads of the first entry of a completion suggester response,
/// `{"<key>": [{"options": [{"payload": ...}]}]}`.
pub(crate) fn suggester_payloads<P: DeserializeOwned>(
    mut response: JsonValue,
    key: &str,
) -> Result<Vec<P>> {
    let entries = response
        .get_mut(key)
        .map(JsonValue::take)
        .ok_or_else(|| Error::Serialization(format!("missing suggester `{}`", key)))?;
    let entries: Vec<SuggesterEntry<P>> = serde_json::from_value(entries)?;
    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| Error::Serialization(format!("suggester `{}` has no entries", key)))?;
    Ok(first.options.into_iter().map(|o| o.payload).collect())
}
