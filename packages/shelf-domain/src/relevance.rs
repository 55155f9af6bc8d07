use serde::{Deserialize, Serialize};

use crate::mode::RetrievalMode;

pub use shelf_config::DEFAULT_RELEVANCE_THRESHOLD;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub brand: String,
	#[serde(default)]
	pub color: String,
	#[serde(default)]
	pub category: String,
	#[serde(default)]
	pub price: Option<f64>,
	#[serde(default)]
	pub description: String,
}

/// Backend-reported relevance. Scores are normalized with higher being better; distances are raw
/// with lower being better.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Relevance {
	Score(f32),
	Distance(f32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedRecord {
	#[serde(flatten)]
	pub product: Product,
	pub relevance: Option<Relevance>,
}
impl RankedRecord {
	pub fn score(&self) -> Option<f32> {
		match self.relevance {
			Some(Relevance::Score(score)) => Some(score),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResultSet {
	pub visible: Vec<RankedRecord>,
	pub hidden: Vec<RankedRecord>,
}

/// Splits ranked records at `threshold`, keeping backend order within each side.
///
/// Only hybrid modes are cut, and only when every record carries a normalized score. Everything
/// else comes back visible.
pub fn apply(records: Vec<RankedRecord>, mode: RetrievalMode, threshold: f32) -> ResultSet {
	if !mode.is_hybrid() || !records.iter().all(|record| record.score().is_some()) {
		return ResultSet { visible: records, hidden: Vec::new() };
	}

	let (visible, hidden) = records
		.into_iter()
		.partition(|record| record.score().map(|score| score >= threshold).unwrap_or(false));

	ResultSet { visible, hidden }
}
