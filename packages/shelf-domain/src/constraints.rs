use regex::Regex;
use serde::Serialize;

const DEFAULT_PRICE_PHRASES: &[&str] = &["below", "under", "less than", "<", "sous", "moins de"];
const DEFAULT_COLORS: &[&str] = &[
	"black",
	"white",
	"silver",
	"gray",
	"grey",
	"red",
	"blue",
	"green",
	"yellow",
	"orange",
	"purple",
	"pink",
	"gold",
	"rose gold",
	"brown",
	"navy",
	"teal",
	"midnight",
	"space gray",
	"starlight",
	"graphite",
	"sky blue",
	"bay blue",
	"titanium",
];

/// Phrase and color tables the extractor is compiled from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
	pub price_phrases: Vec<String>,
	pub colors: Vec<String>,
}
impl Vocabulary {
	pub fn from_config(cfg: &shelf_config::Vocabulary) -> Self {
		Self { price_phrases: cfg.price_phrases.clone(), colors: cfg.colors.clone() }
	}
}
impl Default for Vocabulary {
	fn default() -> Self {
		Self {
			price_phrases: DEFAULT_PRICE_PHRASES.iter().map(|phrase| phrase.to_string()).collect(),
			colors: DEFAULT_COLORS.iter().map(|color| color.to_string()).collect(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExtractedConstraints {
	pub clean_text: String,
	pub price_ceiling: Option<u32>,
	pub color: Option<String>,
}

/// Pulls a price ceiling and a known color out of free-text shopping queries.
#[derive(Clone, Debug)]
pub struct ConstraintExtractor {
	price: Option<Regex>,
	color: Option<Regex>,
}
impl ConstraintExtractor {
	pub fn new(vocabulary: &Vocabulary) -> Result<Self, regex::Error> {
		let price = alternation(&vocabulary.price_phrases)
			.map(|phrases| Regex::new(&format!(r"(?i)\s*(?:{phrases})\s*\$?(\d+)")))
			.transpose()?;
		let color = alternation(&vocabulary.colors)
			.map(|colors| Regex::new(&format!(r"(?i)\b(?:{colors})\b")))
			.transpose()?;

		Ok(Self { price, color })
	}

	pub fn extract(&self, text: &str) -> ExtractedConstraints {
		let (remaining, price_ceiling) = self.take_price(text);
		let (remaining, color) = self.take_color(&remaining);
		// Dropping the color can join a price phrase to its number.
		let (remaining, price_ceiling) = match price_ceiling {
			Some(price) => (remaining, Some(price)),
			None => self.take_price(&remaining),
		};

		ExtractedConstraints { clean_text: collapse_whitespace(&remaining), price_ceiling, color }
	}

	fn take_price(&self, text: &str) -> (String, Option<u32>) {
		let Some(captures) = self.price.as_ref().and_then(|price| price.captures(text)) else {
			return (text.to_string(), None);
		};
		let (Some(span), Some(digits)) = (captures.get(0), captures.get(1)) else {
			return (text.to_string(), None);
		};
		// Ceilings that overflow are not constraints.
		let Ok(price) = digits.as_str().parse::<u32>() else {
			return (text.to_string(), None);
		};

		(remove_span(text, span.start(), span.end()), Some(price))
	}

	fn take_color(&self, text: &str) -> (String, Option<String>) {
		match self.color.as_ref().and_then(|color| color.find(text)) {
			Some(found) =>
				(remove_span(text, found.start(), found.end()), Some(title_case(found.as_str()))),
			None => (text.to_string(), None),
		}
	}
}

/// Builds a case-insensitive alternation with longer entries first, so multi-word names win over
/// their single-word suffixes at the same position.
fn alternation(entries: &[String]) -> Option<String> {
	let mut sorted: Vec<&str> =
		entries.iter().map(|entry| entry.trim()).filter(|entry| !entry.is_empty()).collect();

	sorted.sort_by_key(|entry| std::cmp::Reverse(entry.chars().count()));

	if sorted.is_empty() {
		return None;
	}

	Some(
		sorted
			.into_iter()
			.map(|entry| {
				entry.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s+")
			})
			.collect::<Vec<_>>()
			.join("|"),
	)
}

fn remove_span(text: &str, start: usize, end: usize) -> String {
	let mut out = String::with_capacity(text.len());

	out.push_str(&text[..start]);
	out.push(' ');
	out.push_str(&text[end..]);

	out
}

fn collapse_whitespace(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn title_case(token: &str) -> String {
	token
		.split_whitespace()
		.map(|word| {
			let mut chars = word.chars();

			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<String>>()
		.join(" ")
}
