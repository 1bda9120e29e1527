mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Catalog, Config, LlmProviderConfig, Pipeline, Providers, SearchBackend, SearchProviderConfig,
	Service,
};

use std::{env, fs, net::SocketAddr, path::Path};

pub const ENV_LLM_ACCOUNT_ID: &str = "FINDER_LLM_ACCOUNT_ID";
pub const ENV_LLM_API_TOKEN: &str = "FINDER_LLM_API_TOKEN";
pub const ENV_SEARCH_ENDPOINT: &str = "FINDER_SEARCH_ENDPOINT";
pub const ENV_SEARCH_API_KEY: &str = "FINDER_SEARCH_API_KEY";
pub const ENV_SEARCH_INDEX: &str = "FINDER_SEARCH_INDEX";

pub fn load(path: &Path) -> Result<Config> {
	load_with_env(path, |key| env::var(key).ok())
}

/// Loads a config file, layering credentials from `lookup` over the file values.
pub fn load_with_env<F>(path: &Path, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	apply_env_overrides(&mut cfg, lookup);
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn apply_env_overrides<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	let llm = &mut cfg.providers.llm;
	let search = &mut cfg.providers.search;

	for (key, slot) in [
		(ENV_LLM_ACCOUNT_ID, &mut llm.account_id),
		(ENV_LLM_API_TOKEN, &mut llm.api_token),
		(ENV_SEARCH_ENDPOINT, &mut search.endpoint),
		(ENV_SEARCH_API_KEY, &mut search.api_key),
		(ENV_SEARCH_INDEX, &mut search.index),
	] {
		if let Some(value) = lookup(key) {
			*slot = Some(value);
		}
	}
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::invalid("service.http_bind", "must be a socket address."));
	}
	if cfg.service.request_timeout_ms == 0 {
		return Err(Error::invalid("service.request_timeout_ms", "must be greater than zero."));
	}

	for (field, value) in [
		("pipeline.max_message_chars", cfg.pipeline.max_message_chars),
		("pipeline.short_query_max_words", cfg.pipeline.short_query_max_words),
		("pipeline.max_expanded_terms", cfg.pipeline.max_expanded_terms),
		("pipeline.max_cards", cfg.pipeline.max_cards),
		("pipeline.card_description_chars", cfg.pipeline.card_description_chars),
	] {
		if value == 0 {
			return Err(Error::invalid(field, "must be greater than zero."));
		}
	}

	let llm = &cfg.providers.llm;

	if !llm.temperature.is_finite() {
		return Err(Error::invalid("providers.llm.temperature", "must be a finite number."));
	}
	if !(0.0..=2.0).contains(&llm.temperature) {
		return Err(Error::invalid("providers.llm.temperature", "must be in the range 0.0-2.0."));
	}
	if llm.max_tokens == 0 {
		return Err(Error::invalid("providers.llm.max_tokens", "must be greater than zero."));
	}
	if llm.timeout_ms == 0 {
		return Err(Error::invalid("providers.llm.timeout_ms", "must be greater than zero."));
	}
	if llm.is_configured() && llm.model.trim().is_empty() {
		return Err(Error::invalid(
			"providers.llm.model",
			"must be non-empty when model credentials are set.",
		));
	}

	let search = &cfg.providers.search;

	if search.top == 0 {
		return Err(Error::invalid("providers.search.top", "must be greater than zero."));
	}
	if search.timeout_ms == 0 {
		return Err(Error::invalid("providers.search.timeout_ms", "must be greater than zero."));
	}
	if let Some(endpoint) = search.endpoint.as_deref()
		&& !(endpoint.starts_with("https://") || endpoint.starts_with("http://"))
	{
		return Err(Error::invalid("providers.search.endpoint", "must be an http(s) URL."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let llm = &mut cfg.providers.llm;
	let search = &mut cfg.providers.search;

	for slot in [
		&mut llm.account_id,
		&mut llm.api_token,
		&mut search.endpoint,
		&mut search.api_key,
		&mut search.index,
	] {
		blank_to_none(slot);
	}

	if let Some(endpoint) = search.endpoint.as_mut() {
		let trimmed = endpoint.trim_end_matches('/').len();

		endpoint.truncate(trimmed);
	}

	llm.api_base = llm.api_base.trim_end_matches('/').to_string();

	if cfg.catalog.path.as_ref().map(|path| path.as_os_str().is_empty()).unwrap_or(false) {
		cfg.catalog.path = None;
	}
}

fn blank_to_none(slot: &mut Option<String>) {
	let trimmed =
		slot.as_deref().map(str::trim).filter(|value| !value.is_empty()).map(str::to_string);

	*slot = trimmed;
}
