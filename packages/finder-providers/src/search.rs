use finder_config::SearchBackend;
use finder_domain::{
	ProgramRecord,
	program::{SEARCH_FIELDS, SELECT_FIELDS},
};
use reqwest::Url;
use serde_json::Value;

use crate::{Error, Result};

/// Issues an any-match full-text query and returns the index's matches in rank order.
pub async fn search(
	backend: SearchBackend<'_>,
	keywords: &str,
	filter: Option<&str>,
) -> Result<Vec<ProgramRecord>> {
	let url = search_url(backend)?;
	let body = search_body(keywords, filter, backend.top);
	let res = crate::client(backend.timeout_ms)?
		.post(url)
		.headers(crate::api_key_headers(backend.api_key)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_search_response(json)
}

fn search_url(backend: SearchBackend<'_>) -> Result<Url> {
	let raw = format!("{}/indexes/{}/docs/search", backend.endpoint, backend.index);

	Url::parse_with_params(&raw, [("api-version", backend.api_version)])
		.map_err(|err| Error::InvalidConfig { message: format!("Invalid search URL {raw}: {err}.") })
}

pub fn search_body(keywords: &str, filter: Option<&str>, top: u32) -> Value {
	let mut body = serde_json::json!({
		"search": keywords,
		"queryType": "simple",
		"searchMode": "any",
		"top": top,
		"select": SELECT_FIELDS.join(","),
		"searchFields": SEARCH_FIELDS.join(","),
	});

	if let (Some(filter), Some(object)) = (filter, body.as_object_mut()) {
		object.insert("filter".to_string(), Value::String(filter.to_string()));
	}

	body
}

fn parse_search_response(json: Value) -> Result<Vec<ProgramRecord>> {
	let Some(value) = json.get("value") else {
		return Err(Error::InvalidResponse {
			message: "Search response is missing value array.".to_string(),
		});
	};

	Ok(serde_json::from_value(value.clone())?)
}
