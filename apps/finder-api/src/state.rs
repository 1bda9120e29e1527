use std::sync::Arc;

use finder_service::FinderService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FinderService>,
}
impl AppState {
	pub fn new(config: finder_config::Config) -> Self {
		Self::from_service(FinderService::new(config))
	}

	pub fn from_service(service: FinderService) -> Self {
		Self { service: Arc::new(service) }
	}
}
