#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{field} must be non-negative, got {value}")]
    InvalidArgument { field: &'static str, value: i64 },

    #[error("{field} is null")]
    NullReference { field: &'static str },

    #[error("Malformed file split payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("Malformed extraFileInfo, expected base64: {0}")]
    MalformedExtraFileInfo(#[source] base64::DecodeError),

    #[error("Split of '{path}' is stale: {reason}")]
    StaleSplit { path: String, reason: String },
}

impl Error {
    /// Name of the offending field, when the error is attributable to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::InvalidArgument { field, .. } | Error::NullReference { field } => Some(*field),
            Error::MalformedExtraFileInfo(_) => Some("extraFileInfo"),
            Error::MalformedPayload(_) | Error::StaleSplit { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_invalid_argument_message_names_field() {
        let fixture = Error::InvalidArgument { field: "fileSize", value: -3 };
        let actual = fixture.to_string();
        let expected = "fileSize must be non-negative, got -3";
        assert_eq!(actual, expected);
        assert_eq!(fixture.field(), Some("fileSize"));
    }

    #[test]
    fn test_null_reference_message_names_field() {
        let fixture = Error::NullReference { field: "path" };
        assert_eq!(fixture.to_string(), "path is null");
        assert_eq!(fixture.field(), Some("path"));
    }

    #[test]
    fn test_stale_split_has_no_field() {
        let fixture = Error::StaleSplit {
            path: "/data/t.orc".to_string(),
            reason: "file size changed".to_string(),
        };
        assert_eq!(
            fixture.to_string(),
            "Split of '/data/t.orc' is stale: file size changed"
        );
        assert_eq!(fixture.field(), None);
    }
}
