mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Backend, Config, DEFAULT_RELEVANCE_THRESHOLD, EmbeddingProviderConfig, Providers, Search, Service,
	Vocabulary,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.backend.url.trim().is_empty() {
		return Err(Error::Validation { message: "backend.url must be non-empty.".to_string() });
	}
	if !is_graphql_class_name(&cfg.backend.class_name) {
		return Err(Error::Validation {
			message: "backend.class_name must start with an uppercase ASCII letter and contain only ASCII letters, digits, or underscores."
				.to_string(),
		});
	}
	if cfg.backend.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "backend.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit == 0 {
		return Err(Error::Validation {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.relevance_threshold.is_finite() {
		return Err(Error::Validation {
			message: "search.relevance_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&cfg.search.relevance_threshold) {
		return Err(Error::Validation {
			message: "search.relevance_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}

	if let Some(embedding) = cfg.providers.embedding.as_ref() {
		for (label, value) in [
			("providers.embedding.api_base", &embedding.api_base),
			("providers.embedding.model", &embedding.model),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}

		if embedding.dimensions == Some(0) {
			return Err(Error::Validation {
				message: "providers.embedding.dimensions must be greater than zero.".to_string(),
			});
		}
		if embedding.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}
	if let Some(vocabulary) = cfg.vocabulary.as_ref() {
		for (label, entries) in [
			("vocabulary.price_phrases", &vocabulary.price_phrases),
			("vocabulary.colors", &vocabulary.colors),
		] {
			if entries.is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
			if entries.iter().any(|entry| entry.trim().is_empty()) {
				return Err(Error::Validation {
					message: format!("{label} must not contain blank entries."),
				});
			}
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.backend.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.backend.api_key = None;
	}

	cfg.backend.url = cfg.backend.url.trim_end_matches('/').to_string();

	if let Some(embedding) = cfg.providers.embedding.as_mut() {
		if embedding.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
			embedding.api_key = None;
		}

		embedding.api_base = embedding.api_base.trim_end_matches('/').to_string();
	}
}

fn is_graphql_class_name(name: &str) -> bool {
	let mut chars = name.chars();

	match chars.next() {
		Some(first) if first.is_ascii_uppercase() =>
			chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_'),
		_ => false,
	}
}
