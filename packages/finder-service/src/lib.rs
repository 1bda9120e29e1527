pub mod assist;
pub mod fallback;
pub mod keywords;
pub mod search;

mod error;

pub use assist::{AssistRequest, AssistResponse, ChatTurn};
pub use error::{Error, Result};
pub use fallback::{FallbackReason, Fetched};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde_json::Value;

use finder_config::{Config, LlmProviderConfig, SearchBackend};
use finder_domain::{ProgramRecord, ReferenceCatalog};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait KeywordProvider
where
	Self: Send + Sync,
{
	fn extract_keywords<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, finder_providers::Result<String>>;
}

pub trait SearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		backend: SearchBackend<'a>,
		keywords: &'a str,
		filter: Option<&'a str>,
	) -> BoxFuture<'a, finder_providers::Result<Vec<ProgramRecord>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub keywords: Arc<dyn KeywordProvider>,
	pub search: Arc<dyn SearchProvider>,
}
impl Providers {
	pub fn new(keywords: Arc<dyn KeywordProvider>, search: Arc<dyn SearchProvider>) -> Self {
		Self { keywords, search }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { keywords: provider.clone(), search: provider }
	}
}

/// Answers assistance queries. Holds only read-only state, so one instance serves every
/// request concurrently.
pub struct FinderService {
	pub cfg: Config,
	pub catalog: ReferenceCatalog,
	pub providers: Providers,
}
impl FinderService {
	pub fn new(cfg: Config) -> Self {
		let catalog = load_catalog(&cfg);

		Self { cfg, catalog, providers: Providers::default() }
	}

	pub fn with_parts(cfg: Config, catalog: ReferenceCatalog, providers: Providers) -> Self {
		Self { cfg, catalog, providers }
	}

	pub(crate) fn call_timeout(&self) -> Duration {
		Duration::from_millis(self.cfg.service.request_timeout_ms)
	}
}

struct DefaultProviders;
impl KeywordProvider for DefaultProviders {
	fn extract_keywords<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, finder_providers::Result<String>> {
		Box::pin(finder_providers::keywords::extract_keywords(cfg, messages))
	}
}
impl SearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		backend: SearchBackend<'a>,
		keywords: &'a str,
		filter: Option<&'a str>,
	) -> BoxFuture<'a, finder_providers::Result<Vec<ProgramRecord>>> {
		Box::pin(finder_providers::search::search(backend, keywords, filter))
	}
}

/// Loads the configured catalog, or the bundled one. Any failure leaves every table empty.
pub fn load_catalog(cfg: &Config) -> ReferenceCatalog {
	let (source, loaded) = match cfg.catalog.path.as_deref() {
		Some(path) => (path.display().to_string(), ReferenceCatalog::load(path)),
		None => ("bundled".to_string(), ReferenceCatalog::bundled()),
	};

	match loaded {
		Ok(catalog) => {
			tracing::info!(
				%source,
				common_queries = catalog.common_queries().len(),
				program_categories = catalog.program_categories().len(),
				eligibility_groups = catalog.eligibility_groups().len(),
				"Reference catalog loaded."
			);

			catalog
		},
		Err(err) => {
			tracing::warn!(
				%source,
				error = %err,
				"Reference catalog failed to load; continuing with empty tables."
			);

			ReferenceCatalog::empty()
		},
	}
}
