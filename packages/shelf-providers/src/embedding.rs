use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

pub async fn embed(
	cfg: &shelf_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let mut body = serde_json::json!({ "model": cfg.model, "input": texts });

	if let Some(dimensions) = cfg.dimensions {
		body["dimensions"] = Value::from(dimensions);
	}

	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json = crate::json_body(res).await?;
	let vectors = parse_embedding_response(json)?;

	validate_vectors(&vectors, texts.len(), cfg.dimensions)?;

	tracing::debug!(
		provider_id = %cfg.provider_id,
		count = vectors.len(),
		"Embedding request completed."
	);

	Ok(vectors)
}

/// Accepts both the OpenAI-style `{ "data": [{ "index", "embedding" }] }` body and the bare
/// `[[f32]]` body returned by text-embeddings-inference's `/embed` route.
fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	if let Some(rows) = json.as_array() {
		return rows.iter().map(parse_vector).collect();
	}

	let data = json.get("data").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse { message: "Embedding response is missing data array.".to_string() }
	})?;
	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item.get("embedding").ok_or_else(|| Error::InvalidResponse {
			message: "Embedding item missing embedding array.".to_string(),
		})?;

		indexed.push((index, parse_vector(embedding)?));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}

fn parse_vector(raw: &Value) -> Result<Vec<f32>> {
	let values = raw.as_array().ok_or_else(|| Error::InvalidResponse {
		message: "Embedding must be an array of numbers.".to_string(),
	})?;
	let mut vec = Vec::with_capacity(values.len());

	for value in values {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		})?;

		vec.push(number as f32);
	}

	Ok(vec)
}

fn validate_vectors(vectors: &[Vec<f32>], expected: usize, dimensions: Option<u32>) -> Result<()> {
	if vectors.len() != expected {
		return Err(Error::InvalidResponse {
			message: format!("Embedding provider returned {} vectors for {expected} inputs.", vectors.len()),
		});
	}

	for vector in vectors {
		if vector.is_empty() {
			return Err(Error::InvalidResponse {
				message: "Embedding provider returned an empty vector.".to_string(),
			});
		}
		if dimensions.is_some_and(|dim| vector.len() != dim as usize) {
			return Err(Error::InvalidResponse {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}
		if vector.iter().any(|value| !value.is_finite()) {
			return Err(Error::InvalidResponse {
				message: "Embedding vector contains a non-finite value.".to_string(),
			});
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_embeddings_in_index_order() {
		let json = serde_json::json!({
			"data": [
				{ "index": 1, "embedding": [2.0, 3.0] },
				{ "index": 0, "embedding": [0.5, 1.5] }
			]
		});
		let parsed = parse_embedding_response(json).expect("parse failed");

		assert_eq!(parsed, vec![vec![0.5, 1.5], vec![2.0, 3.0]]);
	}

	#[test]
	fn parses_bare_tei_arrays() {
		let json = serde_json::json!([[0.25, -0.5, 1.0]]);
		let parsed = parse_embedding_response(json).expect("parse failed");

		assert_eq!(parsed, vec![vec![0.25, -0.5, 1.0]]);
	}

	#[test]
	fn rejects_non_numeric_values() {
		let json = serde_json::json!({ "data": [{ "embedding": ["x"] }] });

		assert!(matches!(parse_embedding_response(json), Err(Error::InvalidResponse { .. })));
	}

	#[test]
	fn validates_count_and_dimensions() {
		let vectors = vec![vec![0.1, 0.2]];

		assert!(validate_vectors(&vectors, 1, Some(2)).is_ok());
		assert!(validate_vectors(&vectors, 1, None).is_ok());
		assert!(validate_vectors(&vectors, 2, None).is_err());
		assert!(validate_vectors(&vectors, 1, Some(3)).is_err());
		assert!(validate_vectors(&[Vec::new()], 1, None).is_err());
	}
}
