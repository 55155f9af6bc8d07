pub mod search;

mod error;

pub use error::{Error, Result};
pub use search::{
	Execution, RawSearchRequest, SearchRequest, SearchResponse,
	filter::{FilterField, FilterPredicate},
	query::{CompiledQuery, QueryCompiler, SearchClause},
};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use shelf_config::{Backend, Config, EmbeddingProviderConfig};
use shelf_domain::{ConstraintExtractor, Vocabulary};
use shelf_providers::{backend, embedding};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns one query text into one embedding vector.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<Vec<f32>>>;
}

/// Runs compiled queries against the retrieval backend.
pub trait SearchExecutor
where
	Self: Send + Sync,
{
	fn execute<'a>(
		&'a self,
		cfg: &'a Backend,
		query: &'a CompiledQuery,
	) -> BoxFuture<'a, Result<Execution>>;

	fn meta<'a>(&'a self, cfg: &'a Backend) -> BoxFuture<'a, Result<Value>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub executor: Arc<dyn SearchExecutor>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, executor: Arc<dyn SearchExecutor>) -> Self {
		Self { embedding, executor }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), executor: provider }
	}
}

pub struct ShelfService {
	pub cfg: Config,
	pub extractor: ConstraintExtractor,
	pub compiler: QueryCompiler,
	pub providers: Providers,
}
impl ShelfService {
	pub fn new(cfg: Config) -> Result<Self> {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Result<Self> {
		let vocabulary = cfg.vocabulary.as_ref().map(Vocabulary::from_config).unwrap_or_default();
		let extractor = ConstraintExtractor::new(&vocabulary).map_err(|err| Error::InvalidConfig {
			message: format!("Vocabulary does not compile: {err}"),
		})?;
		let compiler = QueryCompiler::new(cfg.backend.class_name.clone());

		Ok(Self { cfg, extractor, compiler, providers })
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, Result<Vec<f32>>> {
		Box::pin(async move {
			let texts = [text.to_string()];
			let vectors = embedding::embed(cfg, &texts).await.map_err(Error::from_embedding)?;

			vectors.into_iter().next().ok_or_else(|| Error::EmbeddingUnavailable {
				message: "Embedding provider returned no vectors.".to_string(),
			})
		})
	}
}
impl SearchExecutor for DefaultProviders {
	fn execute<'a>(
		&'a self,
		cfg: &'a Backend,
		query: &'a CompiledQuery,
	) -> BoxFuture<'a, Result<Execution>> {
		Box::pin(async move {
			let body = backend::graphql(cfg, query.as_str()).await.map_err(Error::from_backend)?;

			search::parse_execution(&body, query.class_name())
		})
	}

	fn meta<'a>(&'a self, cfg: &'a Backend) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move { backend::meta(cfg).await.map_err(Error::from_backend) })
	}
}
