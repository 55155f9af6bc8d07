use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::Result;

const GRAPHQL_PATH: &str = "/v1/graphql";
const META_PATH: &str = "/v1/meta";

/// Posts a GraphQL document to the vector database and returns the raw response body.
///
/// GraphQL-level errors arrive with a success status and are left in the body for the caller.
pub async fn graphql(cfg: &shelf_config::Backend, query: &str) -> Result<Value> {
	let client = client(cfg)?;
	let res = client
		.post(format!("{}{GRAPHQL_PATH}", cfg.url))
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&serde_json::json!({ "query": query }))
		.send()
		.await?;

	crate::json_body(res).await
}

pub async fn meta(cfg: &shelf_config::Backend) -> Result<Value> {
	let client = client(cfg)?;
	let res = client
		.get(format!("{}{META_PATH}", cfg.url))
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.send()
		.await?;

	crate::json_body(res).await
}

/// Collects `errors[].message` from a GraphQL response body.
pub fn graphql_errors(body: &Value) -> Vec<String> {
	let Some(errors) = body.get("errors").and_then(Value::as_array) else {
		return Vec::new();
	};

	errors
		.iter()
		.map(|error| match error.get("message").and_then(Value::as_str) {
			Some(message) => message.to_string(),
			None => error.to_string(),
		})
		.collect()
}

fn client(cfg: &shelf_config::Backend) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?)
}
