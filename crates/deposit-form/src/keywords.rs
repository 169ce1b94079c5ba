//! Keyword lookup against the keyword completion suggester.
//!
//! Server suggestions are followed by the keywords already on the record,
//! and the typed text itself is offered first as a free-text keyword when
//! nothing listed has that name. Truncation happens after both steps, so
//! the typed keyword always survives the cut.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use deposit_core::defaults::KEYWORD_PARAM;
use deposit_core::{Keyword, KeywordSuggestion, LookupOptions, QueryParams, Result, Suggestion};

use crate::autocomplete::{id_text, prepend_user_input, suggester_payloads, SuggestionSource};

#[derive(Deserialize)]
struct KeywordPayload {
    name: String,
    #[serde(default)]
    key_id: JsonValue,
}

/// Empty key ids count as no key.
fn keyword(name: String, key_id: Option<String>) -> Keyword {
    Keyword {
        name,
        key_id: key_id.filter(|k| !k.is_empty()),
    }
}

/// Suggests keywords, merging in the ones already selected on the record.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSource<'a> {
    selected: &'a [Keyword],
}

impl<'a> KeywordSource<'a> {
    pub fn new(selected: &'a [Keyword]) -> Self {
        Self { selected }
    }
}

impl SuggestionSource for KeywordSource<'_> {
    type Item = KeywordSuggestion;

    fn name(&self) -> &'static str {
        "keywords"
    }

    fn params(&self, query: &str, _options: &LookupOptions) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert(KEYWORD_PARAM.to_string(), JsonValue::from(query));
        params
    }

    fn transform(&self, response: JsonValue, query: &str) -> Result<Vec<KeywordSuggestion>> {
        let payloads: Vec<KeywordPayload> = suggester_payloads(response, KEYWORD_PARAM)?;

        let mut suggestions: Vec<KeywordSuggestion> = payloads
            .into_iter()
            .map(|p| keyword(p.name, id_text(&p.key_id)))
            .chain(
                self.selected
                    .iter()
                    .map(|k| keyword(k.name.clone(), k.key_id.clone())),
            )
            .map(Suggestion::from)
            .collect();

        prepend_user_input(Some(Keyword::new(query).into()), &mut suggestions);
        Ok(suggestions)
    }
}
