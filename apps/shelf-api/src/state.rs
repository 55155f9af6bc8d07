use std::sync::Arc;

use shelf_service::{Providers, ShelfService};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ShelfService>,
}
impl AppState {
	pub fn new(config: shelf_config::Config) -> color_eyre::Result<Self> {
		Self::with_providers(config, Providers::default())
	}

	pub fn with_providers(
		config: shelf_config::Config,
		providers: Providers,
	) -> color_eyre::Result<Self> {
		let service = ShelfService::with_providers(config, providers)?;

		Ok(Self { service: Arc::new(service) })
	}
}
