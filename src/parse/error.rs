//! Errors raised while building a parser vocabulary or parsing clue text

use thiserror::Error;

/// A recoverable failure from the clue parser
///
/// None of these leave the parser in a modified state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse-string '{0}' contains whitespace or a reserved character")]
    ReservedCharacter(String),

    #[error("parse-strings cannot be empty")]
    EmptyParseString,

    #[error("'{0}' is not a registered parse-string")]
    UnknownParseString(String),

    #[error("grouping symbol in an unexpected position")]
    MisplacedGroup,

    #[error("closing grouping symbol does not match the opening one")]
    MismatchedGroup,

    #[error("grouping symbol is never closed")]
    UnmatchedGroup,

    #[error("operator in an unexpected position")]
    MisplacedOperator,

    #[error("negation in an unexpected position")]
    MisplacedNegation,

    #[error("variable in an unexpected position")]
    MisplacedVariable,

    #[error("unrecognized variable '{0}'")]
    UnrecognizedVariable(String),

    #[error("clue ended unexpectedly")]
    UnexpectedEnd,
}

impl ParseError {
    /// True for errors about the structure of clue text rather than the vocabulary
    pub fn is_syntax_error(&self) -> bool {
        !matches!(
            self,
            ParseError::ReservedCharacter(_)
                | ParseError::EmptyParseString
                | ParseError::UnknownParseString(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_token() {
        let err = ParseError::UnrecognizedVariable("Lemon".to_string());
        assert_eq!(err.to_string(), "unrecognized variable 'Lemon'");

        let err = ParseError::ReservedCharacter("a+b".to_string());
        assert!(err.to_string().contains("'a+b'"));
    }

    #[test]
    fn test_syntax_error_classification() {
        assert!(ParseError::MismatchedGroup.is_syntax_error());
        assert!(ParseError::UnrecognizedVariable("x".into()).is_syntax_error());
        assert!(!ParseError::EmptyParseString.is_syntax_error());
        assert!(!ParseError::UnknownParseString("x".into()).is_syntax_error());
    }
}
