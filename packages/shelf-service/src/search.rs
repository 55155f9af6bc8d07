pub mod filter;
pub mod query;

use std::time::Instant;

use serde_json::Value;

use shelf_domain::{
	ExtractedConstraints, Product, RankedRecord, Relevance, ResultSet, RetrievalMode, SearchFilters,
	SearchPlan, SearchToggle, mode, relevance,
};
use shelf_providers::backend;

use crate::{Error, Result, ShelfService};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub mode: SearchToggle,
	pub limit: Option<u32>,
}

/// Bypasses the mode controller: the caller names the retrieval mode and the filters directly.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawSearchRequest {
	pub query: String,
	pub mode: String,
	#[serde(default)]
	pub filters: SearchFilters,
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchResponse {
	pub mode: RetrievalMode,
	pub search_text: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub constraints: Option<ExtractedConstraints>,
	pub filters: SearchFilters,
	/// Rendered backend query, as sent.
	pub query: String,
	pub elapsed_ms: u64,
	pub threshold: f32,
	pub items: Vec<RankedRecord>,
	pub hidden: Vec<RankedRecord>,
	pub hidden_count: usize,
	/// Backend-reported query errors. Records returned alongside them are still served.
	pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Execution {
	pub records: Vec<RankedRecord>,
	pub raw_errors: Vec<String>,
}

impl ShelfService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let constraints = self.extractor.extract(&req.query);
		let plan = mode::plan(&req.query, &constraints, req.mode);

		self.run(plan, req.limit, Some(constraints)).await
	}

	pub async fn search_raw(&self, req: RawSearchRequest) -> Result<SearchResponse> {
		let mode: RetrievalMode = req.mode.parse()?;
		let plan = SearchPlan { search_text: req.query, mode, filters: req.filters };

		self.run(plan, req.limit, None).await
	}

	pub async fn meta(&self) -> Result<Value> {
		self.providers.executor.meta(&self.cfg.backend).await
	}

	async fn run(
		&self,
		plan: SearchPlan,
		limit: Option<u32>,
		constraints: Option<ExtractedConstraints>,
	) -> Result<SearchResponse> {
		let limit = limit.unwrap_or(self.cfg.search.default_limit);
		let vector = self.query_vector(&plan).await?;
		let compiled = self.compiler.compile(
			&plan.search_text,
			plan.mode,
			vector.as_deref(),
			&plan.filters,
			limit,
		)?;

		tracing::debug!(mode = %plan.mode, query = %compiled, "Compiled backend query.");

		let started = Instant::now();
		let execution = self
			.providers
			.executor
			.execute(&self.cfg.backend, &compiled)
			.await
			.inspect_err(|err| tracing::warn!(mode = %plan.mode, error = %err, "Search failed."))?;
		let elapsed_ms = started.elapsed().as_millis() as u64;
		let threshold = self.cfg.search.relevance_threshold;
		let ResultSet { visible, hidden } =
			relevance::apply(execution.records, plan.mode, threshold);

		tracing::info!(
			mode = %plan.mode,
			elapsed_ms,
			visible = visible.len(),
			hidden = hidden.len(),
			errors = execution.raw_errors.len(),
			"Search completed."
		);

		Ok(SearchResponse {
			mode: plan.mode,
			search_text: plan.search_text,
			constraints,
			filters: plan.filters,
			query: compiled.to_string(),
			elapsed_ms,
			threshold,
			items: visible,
			hidden_count: hidden.len(),
			hidden,
			errors: execution.raw_errors,
		})
	}

	/// Embeds the search text when the mode scores by vector. Without an embedding provider, or
	/// with nothing to embed, no vector is produced.
	async fn query_vector(&self, plan: &SearchPlan) -> Result<Option<Vec<f32>>> {
		if !plan.mode.needs_embedding() || plan.search_text.trim().is_empty() {
			return Ok(None);
		}

		let Some(cfg) = self.cfg.providers.embedding.as_ref() else {
			tracing::debug!(mode = %plan.mode, "No embedding provider configured.");

			return Ok(None);
		};

		self.providers.embedding.embed(cfg, &plan.search_text).await.map(Some)
	}
}

/// Reads `data.Get.<class_name>` and `errors[]` from a GraphQL response body.
pub fn parse_execution(body: &Value, class_name: &str) -> Result<Execution> {
	let raw_errors = backend::graphql_errors(body);
	let rows = body.get("data").and_then(|data| data.get("Get")).and_then(|get| get.get(class_name));
	let records = match rows {
		None | Some(Value::Null) => Vec::new(),
		Some(Value::Array(rows)) => rows.iter().map(parse_record).collect::<Result<Vec<_>>>()?,
		Some(_) => {
			return Err(Error::BackendQueryError {
				message: format!("Result for class {class_name} is not a list."),
			});
		},
	};

	Ok(Execution { records, raw_errors })
}

fn parse_record(row: &Value) -> Result<RankedRecord> {
	let Value::Object(fields) = row else {
		return Err(Error::BackendQueryError {
			message: "Result record is not an object.".to_string(),
		});
	};
	let text = |key: &str| fields.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
	let product = Product {
		name: text("name"),
		brand: text("brand"),
		color: text("color"),
		category: text("category"),
		price: fields.get("price").and_then(number),
		description: text("description"),
	};
	let additional = fields.get("_additional");
	let relevance = match additional.and_then(|extra| extra.get("score")).and_then(number) {
		Some(score) => Some(Relevance::Score(score as f32)),
		None => additional
			.and_then(|extra| extra.get("distance"))
			.and_then(number)
			.map(|distance| Relevance::Distance(distance as f32)),
	};

	Ok(RankedRecord { product, relevance })
}

// Scores arrive as strings from some backends.
fn number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}
