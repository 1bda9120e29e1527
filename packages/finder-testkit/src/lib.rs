//! Shared fixtures for pipeline and HTTP tests. Nothing here touches the network.

use finder_config::{
	Catalog, Config, LlmProviderConfig, Pipeline, Providers, SearchProviderConfig, Service,
};
use finder_domain::ProgramRecord;

/// Unroutable address for provider configs whose calls are always faked.
pub const DUMMY_ENDPOINT: &str = "http://127.0.0.1:1";

/// A config with both providers configured and default pipeline limits.
pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			request_timeout_ms: 1_000,
		},
		catalog: Catalog::default(),
		pipeline: Pipeline::default(),
		providers: Providers {
			llm: LlmProviderConfig {
				api_base: DUMMY_ENDPOINT.to_string(),
				account_id: Some("test-account".to_string()),
				api_token: Some("test-token".to_string()),
				model: "test-model".to_string(),
				temperature: 0.1,
				max_tokens: 50,
				timeout_ms: 1_000,
			},
			search: SearchProviderConfig {
				endpoint: Some(DUMMY_ENDPOINT.to_string()),
				api_key: Some("test-key".to_string()),
				index: Some("programs".to_string()),
				api_version: "2023-11-01".to_string(),
				top: 10,
				timeout_ms: 1_000,
			},
		},
	}
}

/// [`test_config`] without model credentials.
pub fn test_config_without_model() -> Config {
	let mut cfg = test_config();

	cfg.providers.llm.account_id = None;
	cfg.providers.llm.api_token = None;

	cfg
}

/// [`test_config`] without a search backend.
pub fn test_config_without_search() -> Config {
	let mut cfg = test_config();

	cfg.providers.search.endpoint = None;
	cfg.providers.search.api_key = None;

	cfg
}

/// `count` programs with ids `p-0..`, every description `description_chars` long.
pub fn program_records(count: usize, description_chars: usize) -> Vec<ProgramRecord> {
	(0..count)
		.map(|index| ProgramRecord {
			id: format!("p-{index}"),
			name: format!("Program {index}"),
			category: "Food".to_string(),
			description: "x".repeat(description_chars),
			groups: vec!["Seniors".to_string()],
			areas: vec!["Alameda County".to_string()],
			city: Some("Oakland".to_string()),
			website: Some(format!("https://example.org/programs/{index}")),
			phone: None,
		})
		.collect()
}
