// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    /// Rendering backend failure: a surface could not be allocated or text
    /// could not be shaped. Not recoverable within the overlay core.
    Backend(String),
    /// A toast request that cannot be accepted (both title and body empty,
    /// undecodable image bytes). The store is left untouched.
    InvalidInput(String),
    Io(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Backend(e) => write!(f, "Backend Error: {}", e),
            Error::InvalidInput(e) => write!(f, "Invalid Input: {}", e),
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_backend_error() {
        let err = Error::Backend("surface allocation failed".to_string());
        assert_eq!(
            format!("{}", err),
            "Backend Error: surface allocation failed"
        );
    }

    #[test]
    fn display_formats_invalid_input() {
        let err = Error::InvalidInput("empty toast".into());
        assert_eq!(format!("{}", err), "Invalid Input: empty toast");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }
}
