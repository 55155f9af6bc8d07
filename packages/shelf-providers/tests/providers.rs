use reqwest::header::{AUTHORIZATION, HeaderName};
use serde_json::{Map, Value};

use shelf_providers::Error;

#[test]
fn builds_bearer_auth_header() {
	let headers =
		shelf_providers::auth_headers(Some("secret"), &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn omits_auth_header_without_key() {
	let headers = shelf_providers::auth_headers(None, &Map::new()).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
}

#[test]
fn forwards_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("X-Shelf-Tenant".to_string(), Value::String("demo".to_string()));

	let headers = shelf_providers::auth_headers(None, &defaults).expect("Failed to build headers.");
	let name = HeaderName::from_static("x-shelf-tenant");

	assert_eq!(headers.get(name).expect("Missing default header."), "demo");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("X-Retries".to_string(), Value::from(3));

	let err = shelf_providers::auth_headers(None, &defaults).expect_err("Expected config error.");

	assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[test]
fn classifies_client_errors_as_rejections() {
	assert!(Error::Status { status: 422, body: String::new() }.is_rejection());
	assert!(!Error::Status { status: 503, body: String::new() }.is_rejection());
	assert!(!Error::InvalidResponse { message: "bad".to_string() }.is_rejection());
}
