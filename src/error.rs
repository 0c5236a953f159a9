use thiserror::Error;

/// Errors surfaced by the extraction entry points.
///
/// Validation failures abort the call before any matching occurs; a call
/// never partially fails once matching has started.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The term list held no usable term after splitting and trimming.
    #[error("term list is empty")]
    EmptyTermList,
    /// `min > max`, or either bound is not a finite number.
    #[error("invalid bounds: [{min}, {max}]")]
    InvalidBounds { min: f64, max: f64 },
    /// The enum list is empty or contains an empty entry.
    #[error("malformed enum list: {0}")]
    MalformedEnumList(String),
    /// Options are inconsistent (e.g. a zero-width search window).
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    /// A term could not be turned into a matcher.
    #[error("term {term:?} could not be compiled: {source}")]
    TermCompile {
        term: String,
        #[source]
        source: regex::Error,
    },
    /// JSON encoding or decoding of a response or options failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_term_list() {
        let err = ExtractionError::EmptyTermList;
        assert_eq!(err.to_string(), "term list is empty");
    }

    #[test]
    fn error_invalid_bounds() {
        let err = ExtractionError::InvalidBounds { min: 10.0, max: 1.0 };
        assert!(err.to_string().contains("invalid bounds"));
        assert!(err.to_string().contains("[10, 1]"));
    }

    #[test]
    fn error_malformed_enum_list() {
        let err = ExtractionError::MalformedEnumList("entry 2 is empty".into());
        assert!(err.to_string().contains("malformed enum list"));
        assert!(err.to_string().contains("entry 2 is empty"));
    }

    #[test]
    fn error_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: ExtractionError = json_err.into();
        assert!(err.to_string().contains("serialization failed"));
    }

    #[test]
    fn error_debug_formatting() {
        let err = ExtractionError::InvalidOptions("max_gap must be positive".into());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("InvalidOptions"));
        assert!(debug_str.contains("max_gap"));
    }
}
