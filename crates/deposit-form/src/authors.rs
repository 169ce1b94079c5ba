//! Author lookup against the people search endpoint.
//!
//! Users can also type an author that the directory does not know, in the
//! form `Lastname, Firstname: Affiliation`. Such input is parsed into an
//! author of its own, searched for by name, and offered first when the
//! directory has nobody of that name.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use deposit_core::defaults::{AUTHOR_ID_SOURCES, AUTHOR_PARAM};
use deposit_core::{
    strip_commas, Author, AuthorId, AuthorSuggestion, LookupOptions, QueryParams, Result,
    Suggestion,
};

use crate::autocomplete::{id_text, prepend_user_input, SuggestionSource};

/// `Lastname, Firstname: Affiliation`, word characters only.
static AUTHOR_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z_]*,\s[0-9A-Za-z_]*):\s([0-9A-Za-z_]*)$")
        .expect("author query pattern is valid")
});

/// Parse free-text author input.
///
/// Returns `None` whenever the input does not have the
/// `Lastname, Firstname: Affiliation` shape or the affiliation is empty.
pub fn parse_author_query(query: &str) -> Option<Author> {
    let caps = AUTHOR_QUERY.captures(query)?;
    let full_name = caps.get(1)?.as_str();
    let affiliation = caps.get(2)?.as_str();
    if full_name.is_empty() || affiliation.is_empty() {
        return None;
    }
    Some(Author {
        name: full_name.to_string(),
        affiliations: Some(vec![affiliation.to_string()]),
        ..Default::default()
    })
}

/// Raw person record from the search endpoint.
#[derive(Debug, Deserialize)]
struct AuthorRecord {
    #[serde(default)]
    lastname: Option<String>,
    #[serde(default)]
    firstname: Option<String>,
    #[serde(default)]
    affiliation: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(flatten)]
    other: Map<String, JsonValue>,
}

impl AuthorRecord {
    fn into_author(self) -> Author {
        let name = format!(
            "{}, {}",
            self.lastname.unwrap_or_default(),
            self.firstname.unwrap_or_default()
        );

        let ids = AUTHOR_ID_SOURCES
            .iter()
            .filter_map(|(field, source)| {
                Some(AuthorId {
                    value: id_text(self.other.get(*field)?)?,
                    source: source.to_string(),
                })
            })
            .collect();

        Author {
            name,
            affiliations: self
                .affiliation
                .filter(|a| !a.is_empty())
                .map(|a| vec![a]),
            email: self.email.filter(|e| !e.is_empty()),
            ids: Some(ids),
        }
    }
}

/// Suggests authors from the people directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorSource;

impl SuggestionSource for AuthorSource {
    type Item = AuthorSuggestion;

    fn name(&self) -> &'static str {
        "authors"
    }

    fn params(&self, query: &str, options: &LookupOptions) -> QueryParams {
        let search = match parse_author_query(query) {
            Some(author) => author.name,
            None => query.to_string(),
        };

        let mut params = QueryParams::new();
        params.insert(AUTHOR_PARAM.to_string(), JsonValue::from(strip_commas(&search)));
        for (key, value) in &options.extra_params {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    fn transform(&self, response: JsonValue, query: &str) -> Result<Vec<AuthorSuggestion>> {
        let records: Vec<AuthorRecord> = serde_json::from_value(response)?;
        let mut suggestions: Vec<AuthorSuggestion> = records
            .into_iter()
            .map(|r| Suggestion::from(r.into_author()))
            .collect();

        for suggestion in &suggestions {
            tracing::trace!(name = %suggestion.value.name, ids = suggestion.value.ids.as_ref().map_or(0, Vec::len), "Author candidate");
        }

        prepend_user_input(parse_author_query(query).map(Suggestion::from), &mut suggestions);
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_author_query() {
        let author = parse_author_query("Smith, John: CERN").unwrap();
        assert_eq!(author.name, "Smith, John");
        assert_eq!(author.affiliations, Some(vec!["CERN".to_string()]));
        assert_eq!(author.ids, None);
    }

    #[test]
    fn test_parse_without_colon() {
        assert_eq!(parse_author_query("no colon here"), None);
    }

    #[test]
    fn test_parse_empty_affiliation() {
        assert_eq!(parse_author_query("Smith, John: "), None);
    }

    #[test]
    fn test_parse_rejects_extra_words() {
        assert_eq!(parse_author_query("Smith, John Paul: CERN"), None);
        assert_eq!(parse_author_query("Smith, John: CERN Geneva"), None);
    }

    #[test]
    fn test_params_plain_query_strips_commas() {
        let params = AuthorSource.params("Smith, J", &LookupOptions::new("/authors"));
        assert_eq!(JsonValue::Object(params), json!({"query": "Smith J"}));
    }

    #[test]
    fn test_params_structured_query_searches_name_only() {
        let params = AuthorSource.params("Smith, John: CERN", &LookupOptions::new("/authors"));
        assert_eq!(JsonValue::Object(params), json!({"query": "Smith John"}));
    }

    #[test]
    fn test_params_merge_extra_params() {
        let options = LookupOptions::new("/authors")
            .with_param("source", "cern")
            .with_param("size", 20);
        let params = AuthorSource.params("doe", &options);
        assert_eq!(
            JsonValue::Object(params),
            json!({"query": "doe", "source": "cern", "size": 20})
        );
    }

    #[test]
    fn test_record_maps_name_and_cern_id() {
        let suggestions = AuthorSource
            .transform(json!([{"lastname": "Doe", "firstname": "Jane", "cernccid": "123"}]), "doe")
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        let author = &suggestions[0].value;
        assert_eq!(author.name, "Doe, Jane");
        assert_eq!(
            author.ids,
            Some(vec![AuthorId {
                value: "123".to_string(),
                source: "cern".to_string()
            }])
        );
        assert_eq!(author.affiliations, None);
        assert_eq!(author.email, None);
        assert_eq!(suggestions[0].text, "Doe Jane");
    }

    #[test]
    fn test_record_ids_follow_fixed_order() {
        let suggestions = AuthorSource
            .transform(
                json!([{"lastname": "Doe", "inspireid": "INSPIRE-1", "recid": 2012, "cernccid": "9"}]),
                "doe",
            )
            .unwrap();
        let ids = suggestions[0].value.ids.as_deref().unwrap();
        let sources: Vec<&str> = ids.iter().map(|id| id.source.as_str()).collect();
        assert_eq!(sources, vec!["cern", "cds", "inspire"]);
        assert_eq!(ids[1].value, "2012");
    }

    #[test]
    fn test_record_missing_names_keep_separator() {
        let suggestions = AuthorSource
            .transform(json!([{"firstname": "Jane"}, {}]), "jane")
            .unwrap();
        assert_eq!(suggestions[0].value.name, ", Jane");
        assert_eq!(suggestions[1].value.name, ", ");
    }

    #[test]
    fn test_record_affiliation_and_email() {
        let suggestions = AuthorSource
            .transform(
                json!([{"lastname": "Doe", "firstname": "Jane", "affiliation": "CERN", "email": "jane@cern.ch"}]),
                "doe",
            )
            .unwrap();
        let author = &suggestions[0].value;
        assert_eq!(author.affiliations, Some(vec!["CERN".to_string()]));
        assert_eq!(author.email.as_deref(), Some("jane@cern.ch"));
    }

    #[test]
    fn test_structured_input_prepended_when_unknown() {
        let suggestions = AuthorSource
            .transform(json!([{"lastname": "Smith", "firstname": "Anna"}]), "Smith, John: CERN")
            .unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].value.name, "Smith, John");
        assert_eq!(suggestions[0].value.affiliations, Some(vec!["CERN".to_string()]));
    }

    #[test]
    fn test_structured_input_not_duplicated() {
        let suggestions = AuthorSource
            .transform(json!([{"lastname": "SMITH", "firstname": "JOHN"}]), "Smith, John: CERN")
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value.name, "SMITH, JOHN");
    }

    #[test]
    fn test_non_array_response_is_error() {
        assert!(AuthorSource.transform(json!({"hits": []}), "doe").is_err());
    }

    #[test]
    fn test_directory_author_without_ids_serializes_empty_list() {
        let suggestions = AuthorSource
            .transform(json!([{"lastname": "Doe", "firstname": "Jane", "cernccid": null}]), "doe")
            .unwrap();
        let json = serde_json::to_value(&suggestions[0].value).unwrap();
        assert_eq!(json, json!({"name": "Doe, Jane", "ids": []}));

        let typed = parse_author_query("Doe, Jane: CERN").unwrap();
        let json = serde_json::to_value(&typed).unwrap();
        assert_eq!(json, json!({"name": "Doe, Jane", "affiliations": ["CERN"]}));
    }
}
