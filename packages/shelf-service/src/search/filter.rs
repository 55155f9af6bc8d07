use shelf_domain::SearchFilters;

use crate::search::query::quote;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterField {
	Price,
	Color,
	Category,
}
impl FilterField {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Price => "price",
			Self::Color => "color",
			Self::Category => "category",
		}
	}
}

/// Conjunctive predicate tree attached to a filtered hybrid query.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterPredicate {
	And(Vec<FilterPredicate>),
	LessThan { field: FilterField, value: f64 },
	Equal { field: FilterField, value: String },
}
impl FilterPredicate {
	/// Builds leaves from present fields in price, color, category order. No leaves yields `None`,
	/// one leaf is returned bare, more are wrapped in `And`.
	pub fn from_filters(filters: &SearchFilters) -> Option<Self> {
		let mut leaves = Vec::with_capacity(3);

		if let Some(price) = filters.price {
			leaves.push(Self::LessThan { field: FilterField::Price, value: f64::from(price) });
		}
		if let Some(color) = non_blank(filters.color.as_deref()) {
			leaves.push(Self::Equal { field: FilterField::Color, value: color.to_string() });
		}
		if let Some(category) = non_blank(filters.category.as_deref()) {
			leaves.push(Self::Equal { field: FilterField::Category, value: category.to_string() });
		}

		match leaves.len() {
			0 => None,
			1 => leaves.pop(),
			_ => Some(Self::And(leaves)),
		}
	}

	pub(crate) fn render(&self, out: &mut String) {
		match self {
			Self::And(nodes) => {
				out.push_str("{ operator: And, operands: [");

				for (i, node) in nodes.iter().enumerate() {
					if i > 0 {
						out.push_str(", ");
					}

					node.render(out);
				}

				out.push_str("] }");
			},
			Self::LessThan { field, value } => {
				out.push_str(&format!(
					"{{ path: [{}], operator: LessThan, valueNumber: {value} }}",
					quote(field.as_str())
				));
			},
			Self::Equal { field, value } => {
				out.push_str(&format!(
					"{{ path: [{}], operator: Equal, valueText: {} }}",
					quote(field.as_str()),
					quote(value)
				));
			},
		}
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}
