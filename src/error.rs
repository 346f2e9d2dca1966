/// Errors that could occur while reading or writing an APE tag.
#[derive(thiserror::Error, Debug)]
pub enum ApeError {
	/// Errors that arise while decoding or encoding tag data
	#[error("APE: {0}")]
	Ape(&'static str),
	/// Attempting to write an abnormally large amount of data
	#[error("An abnormally large amount of data was provided, and an overflow occurred")]
	TooMuchData,

	// Conversions for std Errors
	/// Unable to convert bytes to a String
	#[error(transparent)]
	FromUtf8(#[from] std::string::FromUtf8Error),
	/// Represents all cases of `std::io::Error`.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Result of tag operations.
pub type Result<T> = std::result::Result<T, ApeError>;
