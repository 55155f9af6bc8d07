use shelf_domain::ParseModeError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid mode: {message}")]
	InvalidMode { message: String },
	#[error("Vector mode requires a non-empty query vector.")]
	MissingVector,
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid config: {message}")]
	InvalidConfig { message: String },
	#[error("Embedding unavailable: {message}")]
	EmbeddingUnavailable { message: String },
	#[error("Backend unavailable: {message}")]
	BackendUnavailable { message: String },
	#[error("Backend query error: {message}")]
	BackendQueryError { message: String },
}
impl Error {
	/// Maps a backend transport failure onto the taxonomy. Rejections (4xx) mean the backend
	/// understood the request and refused it.
	pub fn from_backend(err: shelf_providers::Error) -> Self {
		if err.is_rejection() {
			Self::BackendQueryError { message: err.to_string() }
		} else {
			Self::BackendUnavailable { message: err.to_string() }
		}
	}

	pub fn from_embedding(err: shelf_providers::Error) -> Self {
		Self::EmbeddingUnavailable { message: err.to_string() }
	}
}

impl From<ParseModeError> for Error {
	fn from(err: ParseModeError) -> Self {
		Self::InvalidMode { message: err.to_string() }
	}
}
