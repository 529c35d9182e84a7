use thiserror::Error;

/// Errors produced by the codecs in this crate.
///
/// Every operation reports failures through this type instead of panicking,
/// so a caller can render a message and keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required input was empty or blank.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// An encoded stream, run notation or frequency spec could not be parsed.
    #[error("invalid format: {0}")]
    Format(String),

    /// A message symbol has no interval in the probability model.
    #[error("unknown symbol {symbol:?} at position {position}")]
    UnknownSymbol { symbol: char, position: usize },

    /// A ratio was requested with a zero-sized operand.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    /// The coding interval collapsed below double precision.
    #[error("interval precision exhausted at position {position}")]
    PrecisionExhausted { position: usize },

    /// A codec was constructed with an invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn empty_input(what: impl Into<String>) -> Self {
        Error::EmptyInput(what.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    pub fn division_by_zero(operand: impl Into<String>) -> Self {
        Error::DivisionByZero(operand.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::empty_input("message").to_string(),
            "empty input: message"
        );
        assert_eq!(
            Error::UnknownSymbol {
                symbol: 'z',
                position: 3
            }
            .to_string(),
            "unknown symbol 'z' at position 3"
        );
        assert_eq!(
            Error::division_by_zero("compressed size").to_string(),
            "division by zero: compressed size"
        );
    }
}
