use finder_config::SearchBackend;
use finder_domain::{ProgramRecord, SearchFilter};

use crate::{Fetched, FinderService};

impl FinderService {
	/// Queries the index once. A failed or slow backend yields a fallback, never an error.
	pub async fn find_programs(
		&self,
		backend: SearchBackend<'_>,
		keywords: &str,
		filter: Option<&SearchFilter>,
	) -> Fetched<Vec<ProgramRecord>> {
		let filter = filter.map(SearchFilter::to_odata);
		let call = self.providers.search.search(backend, keywords, filter.as_deref());

		Fetched::settle(tokio::time::timeout(self.call_timeout(), call).await)
	}
}
