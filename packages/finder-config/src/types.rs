use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub catalog: Catalog,
	#[serde(default)]
	pub pipeline: Pipeline,
	#[serde(default)]
	pub providers: Providers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
	/// Upper bound for each external call made while answering one request.
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
	/// JSON reference catalog. The catalog compiled into the binary is used when unset.
	pub path: Option<PathBuf>,
}

/// Tunable limits of the query pipeline. Defaults match the values the hosted assistant has
/// always used.
#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
	#[serde(default = "default_max_message_chars")]
	pub max_message_chars: usize,
	#[serde(default = "default_history_limit")]
	pub history_limit: usize,
	/// Queries with at most this many words skip the model.
	#[serde(default = "default_short_query_max_words")]
	pub short_query_max_words: usize,
	#[serde(default = "default_max_expanded_terms")]
	pub max_expanded_terms: usize,
	#[serde(default = "default_max_cards")]
	pub max_cards: usize,
	#[serde(default = "default_card_description_chars")]
	pub card_description_chars: usize,
}
impl Default for Pipeline {
	fn default() -> Self {
		Self {
			max_message_chars: default_max_message_chars(),
			history_limit: default_history_limit(),
			short_query_max_words: default_short_query_max_words(),
			max_expanded_terms: default_max_expanded_terms(),
			max_cards: default_max_cards(),
			card_description_chars: default_card_description_chars(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Providers {
	#[serde(default)]
	pub llm: LlmProviderConfig,
	#[serde(default)]
	pub search: SearchProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	#[serde(default = "default_llm_api_base")]
	pub api_base: String,
	pub account_id: Option<String>,
	pub api_token: Option<String>,
	#[serde(default = "default_llm_model")]
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(default = "default_max_tokens")]
	pub max_tokens: u32,
	#[serde(default = "default_provider_timeout_ms")]
	pub timeout_ms: u64,
}
impl LlmProviderConfig {
	/// The model stage runs only when both credentials are present.
	pub fn is_configured(&self) -> bool {
		self.account_id.is_some() && self.api_token.is_some()
	}
}
impl Default for LlmProviderConfig {
	fn default() -> Self {
		Self {
			api_base: default_llm_api_base(),
			account_id: None,
			api_token: None,
			model: default_llm_model(),
			temperature: default_temperature(),
			max_tokens: default_max_tokens(),
			timeout_ms: default_provider_timeout_ms(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchProviderConfig {
	pub endpoint: Option<String>,
	pub api_key: Option<String>,
	pub index: Option<String>,
	#[serde(default = "default_search_api_version")]
	pub api_version: String,
	#[serde(default = "default_search_top")]
	pub top: u32,
	#[serde(default = "default_provider_timeout_ms")]
	pub timeout_ms: u64,
}
impl SearchProviderConfig {
	/// Borrows the connection settings when endpoint, key, and index are all set.
	pub fn backend(&self) -> Option<SearchBackend<'_>> {
		Some(SearchBackend {
			endpoint: self.endpoint.as_deref()?,
			api_key: self.api_key.as_deref()?,
			index: self.index.as_deref()?,
			api_version: &self.api_version,
			top: self.top,
			timeout_ms: self.timeout_ms,
		})
	}
}
impl Default for SearchProviderConfig {
	fn default() -> Self {
		Self {
			endpoint: None,
			api_key: None,
			index: None,
			api_version: default_search_api_version(),
			top: default_search_top(),
			timeout_ms: default_provider_timeout_ms(),
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct SearchBackend<'a> {
	pub endpoint: &'a str,
	pub api_key: &'a str,
	pub index: &'a str,
	pub api_version: &'a str,
	pub top: u32,
	pub timeout_ms: u64,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_request_timeout_ms() -> u64 {
	8_000
}

fn default_max_message_chars() -> usize {
	500
}

fn default_history_limit() -> usize {
	6
}

fn default_short_query_max_words() -> usize {
	3
}

fn default_max_expanded_terms() -> usize {
	30
}

fn default_max_cards() -> usize {
	5
}

fn default_card_description_chars() -> usize {
	150
}

fn default_llm_api_base() -> String {
	"https://api.cloudflare.com/client/v4/accounts".to_string()
}

fn default_llm_model() -> String {
	"@cf/meta/llama-3.1-8b-instruct".to_string()
}

fn default_temperature() -> f32 {
	0.1
}

fn default_max_tokens() -> u32 {
	50
}

fn default_provider_timeout_ms() -> u64 {
	5_000
}

fn default_search_api_version() -> String {
	"2023-11-01".to_string()
}

fn default_search_top() -> u32 {
	10
}
