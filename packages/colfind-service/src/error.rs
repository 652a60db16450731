pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Query must be non-empty.")]
	EmptyQuery,
	#[error("Invalid configuration: {message}")]
	InvalidConfig { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<colfind_storage::Error> for Error {
	fn from(err: colfind_storage::Error) -> Self {
		match err {
			colfind_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			colfind_storage::Error::InvalidArgument(message) => Self::InvalidConfig { message },
		}
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
