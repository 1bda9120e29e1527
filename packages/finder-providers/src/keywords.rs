use finder_config::LlmProviderConfig;
use reqwest::Url;
use serde_json::Value;

use crate::{Error, Result};

/// Sends one chat completion and returns the reply as a single-spaced keyword string.
pub async fn extract_keywords(cfg: &LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let (Some(account_id), Some(api_token)) = (cfg.account_id.as_deref(), cfg.api_token.as_deref())
	else {
		return Err(Error::InvalidConfig {
			message: "Model account id and API token are required.".to_string(),
		});
	};
	let url = completion_url(&cfg.api_base, account_id, &cfg.model)?;
	let body = serde_json::json!({
		"messages": messages,
		"max_tokens": cfg.max_tokens,
		"temperature": cfg.temperature,
	});
	let res = crate::client(cfg.timeout_ms)?
		.post(url)
		.headers(crate::bearer_headers(api_token)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_keyword_response(&json)
}

fn completion_url(api_base: &str, account_id: &str, model: &str) -> Result<Url> {
	let raw = format!("{api_base}/{account_id}/ai/run/{model}");

	Url::parse(&raw)
		.map_err(|err| Error::InvalidConfig { message: format!("Invalid model URL {raw}: {err}.") })
}

fn parse_keyword_response(json: &Value) -> Result<String> {
	let text = json
		.pointer("/result/response")
		.or_else(|| json.pointer("/choices/0/message/content"))
		.and_then(Value::as_str)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Model response is missing completion text.".to_string(),
		})?;
	let keywords = text.split_whitespace().collect::<Vec<_>>().join(" ");

	if keywords.is_empty() {
		return Err(Error::InvalidResponse { message: "Model returned no keywords.".to_string() });
	}

	Ok(keywords)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hosted_model_response() {
		let json = serde_json::json!({
			"result": { "response": "  food pantry\nseniors  meals \n" },
			"success": true
		});

		assert_eq!(parse_keyword_response(&json).expect("parse failed"), "food pantry seniors meals");
	}

	#[test]
	fn parses_chat_completion_response() {
		let json = serde_json::json!({
			"choices": [{ "message": { "content": "housing rental assistance" } }]
		});

		assert_eq!(parse_keyword_response(&json).expect("parse failed"), "housing rental assistance");
	}

	#[test]
	fn blank_completion_is_an_error() {
		let json = serde_json::json!({ "result": { "response": "   " } });

		assert!(matches!(parse_keyword_response(&json), Err(Error::InvalidResponse { .. })));
	}

	#[test]
	fn model_path_is_appended_to_account() {
		let url = completion_url(
			"https://api.cloudflare.com/client/v4/accounts",
			"acct",
			"@cf/meta/llama-3.1-8b-instruct",
		)
		.expect("URL must parse.");

		assert_eq!(
			url.as_str(),
			"https://api.cloudflare.com/client/v4/accounts/acct/ai/run/@cf/meta/llama-3.1-8b-instruct"
		);
	}
}
