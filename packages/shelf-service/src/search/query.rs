use std::fmt::{Display, Formatter};

use shelf_domain::{RetrievalMode, SearchFilters};

use crate::{Error, Result, search::filter::FilterPredicate};

pub const RESULT_FIELDS: &str = "name brand color category price description";
pub const ADDITIONAL_FIELDS: &str = "_additional { score distance }";

const VECTOR_DECIMALS: usize = 6;

/// Scoring strategy of a compiled query. Each variant owns only the inputs it scores with.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchClause {
	Bm25 { query: String },
	NearVector { vector: Vec<f32> },
	Hybrid { query: String, vector: Option<Vec<f32>> },
}
impl SearchClause {
	fn render(&self, out: &mut String) {
		match self {
			Self::Bm25 { query } => {
				out.push_str("bm25: { query: ");
				out.push_str(&quote(query));
				out.push_str(" }");
			},
			Self::NearVector { vector } => {
				out.push_str("nearVector: { vector: ");
				render_vector(vector, out);
				out.push_str(" }");
			},
			Self::Hybrid { query, vector } => {
				out.push_str("hybrid: { query: ");
				out.push_str(&quote(query));

				if let Some(vector) = vector {
					out.push_str(", vector: ");
					render_vector(vector, out);
				}

				out.push_str(" }");
			},
		}
	}
}

/// A rendered GraphQL `Get` document plus the typed parts it was rendered from.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledQuery {
	class_name: String,
	mode: RetrievalMode,
	search: SearchClause,
	filter: Option<FilterPredicate>,
	limit: u32,
	text: String,
}
impl CompiledQuery {
	pub fn class_name(&self) -> &str {
		&self.class_name
	}

	pub fn mode(&self) -> RetrievalMode {
		self.mode
	}

	pub fn search(&self) -> &SearchClause {
		&self.search
	}

	pub fn filter(&self) -> Option<&FilterPredicate> {
		self.filter.as_ref()
	}

	pub fn limit(&self) -> u32 {
		self.limit
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}
}
impl Display for CompiledQuery {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.text)
	}
}

#[derive(Clone, Debug)]
pub struct QueryCompiler {
	class_name: String,
}
impl QueryCompiler {
	/// `class_name` must already be a valid GraphQL name; config validation guarantees it.
	pub fn new(class_name: impl Into<String>) -> Self {
		Self { class_name: class_name.into() }
	}

	pub fn compile(
		&self,
		search_text: &str,
		mode: RetrievalMode,
		vector: Option<&[f32]>,
		filters: &SearchFilters,
		limit: u32,
	) -> Result<CompiledQuery> {
		if let Some(vector) = vector
			&& vector.iter().any(|value| !value.is_finite())
		{
			return Err(Error::InvalidRequest {
				message: "Query vector contains a non-finite value.".to_string(),
			});
		}

		let vector = vector.filter(|vector| !vector.is_empty()).map(<[f32]>::to_vec);
		let (search, filter) = match mode {
			RetrievalMode::Lexical => (SearchClause::Bm25 { query: search_text.to_string() }, None),
			RetrievalMode::Vector => {
				let vector = vector.ok_or(Error::MissingVector)?;

				(SearchClause::NearVector { vector }, None)
			},
			RetrievalMode::Hybrid =>
				(SearchClause::Hybrid { query: search_text.to_string(), vector }, None),
			RetrievalMode::HybridFiltered => (
				SearchClause::Hybrid { query: search_text.to_string(), vector },
				FilterPredicate::from_filters(filters),
			),
		};
		let text = render(&self.class_name, &search, filter.as_ref(), limit);

		Ok(CompiledQuery { class_name: self.class_name.clone(), mode, search, filter, limit, text })
	}
}
impl Default for QueryCompiler {
	fn default() -> Self {
		Self::new("Product")
	}
}

/// Renders `value` as a double-quoted GraphQL string literal. Every text value in a compiled query
/// goes through here.
pub fn quote(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 2);

	out.push('"');

	for ch in value.chars() {
		match ch {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			ch if ch.is_control() => {
				out.push_str(&format!("\\u{:04X}", ch as u32));
			},
			ch => out.push(ch),
		}
	}

	out.push('"');

	out
}

fn render_vector(vector: &[f32], out: &mut String) {
	out.push('[');

	for (i, value) in vector.iter().enumerate() {
		if i > 0 {
			out.push_str(", ");
		}

		out.push_str(&format!("{value:.VECTOR_DECIMALS$}"));
	}

	out.push(']');
}

fn render(
	class_name: &str,
	search: &SearchClause,
	filter: Option<&FilterPredicate>,
	limit: u32,
) -> String {
	let mut out = String::with_capacity(256);

	out.push_str("{\n  Get {\n    ");
	out.push_str(class_name);
	out.push_str("(\n      ");
	search.render(&mut out);
	out.push('\n');

	if let Some(filter) = filter {
		out.push_str("      where: ");
		filter.render(&mut out);
		out.push('\n');
	}

	out.push_str(&format!(
		"      limit: {limit}\n    ) {{\n      {RESULT_FIELDS}\n      {ADDITIONAL_FIELDS}\n    }}\n  }}\n}}"
	));

	out
}

#[cfg(test)]
mod tests {
	use shelf_domain::{RetrievalMode, SearchFilters};

	use crate::{
		Error,
		search::query::{QueryCompiler, SearchClause, quote},
	};

	#[test]
	fn lexical_query_layout() {
		let compiled = QueryCompiler::default()
			.compile("iPhone", RetrievalMode::Lexical, None, &SearchFilters::default(), 12)
			.expect("Compile failed.");

		assert_eq!(
			compiled.as_str(),
			"{\n  Get {\n    Product(\n      bm25: { query: \"iPhone\" }\n      limit: 12\n    ) {\n      name brand color category price description\n      _additional { score distance }\n    }\n  }\n}"
		);
	}

	#[test]
	fn lexical_ignores_vector() {
		let vector = [0.5_f32, 0.25];
		let compiled = QueryCompiler::default()
			.compile("iPhone", RetrievalMode::Lexical, Some(&vector[..]), &SearchFilters::default(), 5)
			.expect("Compile failed.");

		assert_eq!(compiled.search(), &SearchClause::Bm25 { query: "iPhone".to_string() });
		assert!(!compiled.as_str().contains("vector"));
	}

	#[test]
	fn vector_mode_renders_fixed_precision() {
		let vector = [0.1_f32, -2.0, 1.0 / 3.0];
		let compiled = QueryCompiler::default()
			.compile("ignored", RetrievalMode::Vector, Some(&vector[..]), &SearchFilters::default(), 3)
			.expect("Compile failed.");

		assert!(
			compiled
				.as_str()
				.contains("nearVector: { vector: [0.100000, -2.000000, 0.333333] }")
		);
		assert!(!compiled.as_str().contains("ignored"));
	}

	#[test]
	fn vector_mode_requires_a_vector() {
		let compiler = QueryCompiler::default();
		let filters = SearchFilters::default();

		assert!(matches!(
			compiler.compile("q", RetrievalMode::Vector, None, &filters, 3),
			Err(Error::MissingVector)
		));
		assert!(matches!(
			compiler.compile("q", RetrievalMode::Vector, Some(&[][..]), &filters, 3),
			Err(Error::MissingVector)
		));
	}

	#[test]
	fn non_finite_vectors_are_rejected() {
		let vector = [0.1_f32, f32::NAN];

		assert!(matches!(
			QueryCompiler::default().compile(
				"q",
				RetrievalMode::Hybrid,
				Some(&vector[..]),
				&SearchFilters::default(),
				3
			),
			Err(Error::InvalidRequest { .. })
		));
	}

	#[test]
	fn hybrid_degrades_to_keyword_only_without_vector() {
		let compiled = QueryCompiler::default()
			.compile("iPhone", RetrievalMode::Hybrid, None, &SearchFilters::default(), 12)
			.expect("Compile failed.");

		assert!(compiled.as_str().contains("hybrid: { query: \"iPhone\" }\n"));
	}

	#[test]
	fn hybrid_never_filters() {
		let filters =
			SearchFilters { price: Some(500), color: Some("Blue".to_string()), category: None };
		let compiled = QueryCompiler::default()
			.compile("Blue iPhone below $500", RetrievalMode::Hybrid, Some(&[0.5][..]), &filters, 12)
			.expect("Compile failed.");

		assert!(compiled.filter().is_none());
		assert!(!compiled.as_str().contains("where:"));
		assert!(
			compiled
				.as_str()
				.contains("hybrid: { query: \"Blue iPhone below $500\", vector: [0.500000] }")
		);
	}

	#[test]
	fn hybrid_filtered_attaches_where_clause() {
		let filters =
			SearchFilters { price: Some(500), color: Some("Blue".to_string()), category: None };
		let compiled = QueryCompiler::new("Gadget")
			.compile("iPhone", RetrievalMode::HybridFiltered, None, &filters, 8)
			.expect("Compile failed.");

		assert!(compiled.as_str().contains("    Gadget(\n"));
		assert!(compiled.as_str().contains(
			"      where: { operator: And, operands: [{ path: [\"price\"], operator: LessThan, valueNumber: 500 }, { path: [\"color\"], operator: Equal, valueText: \"Blue\" }] }\n      limit: 8\n"
		));
	}

	#[test]
	fn hybrid_filtered_without_constraints_has_no_where_clause() {
		let compiled = QueryCompiler::default()
			.compile("iPhone", RetrievalMode::HybridFiltered, None, &SearchFilters::default(), 12)
			.expect("Compile failed.");

		assert!(compiled.filter().is_none());
		assert!(!compiled.as_str().contains("where:"));
	}

	#[test]
	fn limit_passes_through_unvalidated() {
		let compiled = QueryCompiler::default()
			.compile("x", RetrievalMode::Lexical, None, &SearchFilters::default(), 0)
			.expect("Compile failed.");

		assert_eq!(compiled.limit(), 0);
		assert!(compiled.as_str().contains("limit: 0\n"));
	}

	#[test]
	fn quote_escapes_literal_breakers() {
		assert_eq!(quote(r#"a"b"#), r#""a\"b""#);
		assert_eq!(quote(r"a\b"), r#""a\\b""#);
		assert_eq!(quote("a\nb\tc\r"), r#""a\nb\tc\r""#);
		assert_eq!(quote("bell\u{7}"), r#""bell\u0007""#);
		assert_eq!(quote("Café ✓"), "\"Café ✓\"");
	}

	#[test]
	fn injected_text_stays_inside_the_literal() {
		let hostile = "x\" }, where: { path: [\"price\"], operator: GreaterThan, valueNumber: 0 } #\\";
		let compiled = QueryCompiler::default()
			.compile(hostile, RetrievalMode::Lexical, None, &SearchFilters::default(), 1)
			.expect("Compile failed.");
		let text = compiled.as_str();

		assert!(!text.contains("\n      where:"));
		assert!(text.contains(&format!("bm25: {{ query: {} }}\n", quote(hostile))));
		assert!(text.contains("#\\\\\" }"));
	}
}
