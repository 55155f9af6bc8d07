use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::constraints::ExtractedConstraints;

/// The caller-facing switch between the plain and the constraint-aware search experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchToggle {
	/// Raw text goes to hybrid scoring; extracted constraints are display-only.
	Standard,
	/// Clean text goes to hybrid scoring; extracted constraints become filters.
	Smart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
	Lexical,
	Vector,
	Hybrid,
	HybridFiltered,
}
impl RetrievalMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lexical => "lexical",
			Self::Vector => "vector",
			Self::Hybrid => "hybrid",
			Self::HybridFiltered => "hybrid_filtered",
		}
	}

	pub fn needs_embedding(self) -> bool {
		!matches!(self, Self::Lexical)
	}

	pub fn is_hybrid(self) -> bool {
		matches!(self, Self::Hybrid | Self::HybridFiltered)
	}
}
impl Display for RetrievalMode {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for RetrievalMode {
	type Err = ParseModeError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"lexical" | "bm25" => Ok(Self::Lexical),
			"vector" => Ok(Self::Vector),
			"hybrid" => Ok(Self::Hybrid),
			"hybrid_filtered" => Ok(Self::HybridFiltered),
			_ => Err(ParseModeError { name: raw.to_string() }),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseModeError {
	pub name: String,
}
impl Display for ParseModeError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"unknown retrieval mode '{}', expected one of lexical, vector, hybrid, hybrid_filtered",
			self.name
		)
	}
}
impl std::error::Error for ParseModeError {}

/// Structured constraints that may become filter predicates. Absent fields mean no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
}
impl SearchFilters {
	pub fn is_empty(&self) -> bool {
		self.price.is_none() && self.color.is_none() && self.category.is_none()
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPlan {
	pub search_text: String,
	pub mode: RetrievalMode,
	pub filters: SearchFilters,
}

pub fn plan(
	raw_text: &str,
	constraints: &ExtractedConstraints,
	toggle: SearchToggle,
) -> SearchPlan {
	match toggle {
		SearchToggle::Standard => SearchPlan {
			search_text: raw_text.to_string(),
			mode: RetrievalMode::Hybrid,
			filters: SearchFilters::default(),
		},
		SearchToggle::Smart => SearchPlan {
			search_text: constraints.clean_text.clone(),
			mode: RetrievalMode::HybridFiltered,
			filters: SearchFilters {
				price: constraints.price_ceiling,
				color: constraints.color.clone(),
				category: None,
			},
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn demo_constraints() -> ExtractedConstraints {
		ExtractedConstraints {
			clean_text: "iPhone".to_string(),
			price_ceiling: Some(500),
			color: Some("Blue".to_string()),
		}
	}

	#[test]
	fn standard_ignores_constraints() {
		let plan = plan("Blue iPhone below $500", &demo_constraints(), SearchToggle::Standard);

		assert_eq!(plan.mode, RetrievalMode::Hybrid);
		assert_eq!(plan.search_text, "Blue iPhone below $500");
		assert!(plan.filters.is_empty());
	}

	#[test]
	fn smart_turns_constraints_into_filters() {
		let plan = plan("Blue iPhone below $500", &demo_constraints(), SearchToggle::Smart);

		assert_eq!(plan.mode, RetrievalMode::HybridFiltered);
		assert_eq!(plan.search_text, "iPhone");
		assert_eq!(plan.filters.price, Some(500));
		assert_eq!(plan.filters.color.as_deref(), Some("Blue"));
		assert_eq!(plan.filters.category, None);
	}

	#[test]
	fn smart_omits_absent_constraints() {
		let constraints = ExtractedConstraints {
			clean_text: "headphones".to_string(),
			price_ceiling: None,
			color: None,
		};
		let plan = plan("headphones", &constraints, SearchToggle::Smart);

		assert!(plan.filters.is_empty());
	}

	#[test]
	fn parses_mode_names() {
		assert_eq!("lexical".parse::<RetrievalMode>(), Ok(RetrievalMode::Lexical));
		assert_eq!("BM25".parse::<RetrievalMode>(), Ok(RetrievalMode::Lexical));
		assert_eq!("hybrid_filtered".parse::<RetrievalMode>(), Ok(RetrievalMode::HybridFiltered));
		assert_eq!(
			"semantic".parse::<RetrievalMode>(),
			Err(ParseModeError { name: "semantic".to_string() })
		);
	}

	#[test]
	fn toggle_uses_snake_case_on_the_wire() {
		let toggle: SearchToggle = serde_json::from_str("\"smart\"").expect("Failed to parse.");

		assert_eq!(toggle, SearchToggle::Smart);
		assert!(serde_json::from_str::<SearchToggle>("\"fuzzy\"").is_err());
	}
}
