use serde::{Deserialize, Serialize};

/// User-facing picker errors. These never leave the picker as panics;
/// they are rendered in the error region and auto-dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    /// The item is already in the selected list
    DuplicateSelection,
    /// Add pressed with nothing chosen in the dropdown
    EmptySelection,
    /// The id is not present in the available list
    NotFound,
}

impl PickerError {
    pub fn message(&self) -> &'static str {
        match self {
            PickerError::DuplicateSelection => "This application has already been added",
            PickerError::EmptySelection => "Select an application first",
            PickerError::NotFound => "Application not found",
        }
    }
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Classification of provider (server) failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Owner or invoice unknown to the provider
    NotFound,
    /// Permission denied
    Forbidden,
    /// 5xx or transport failure
    ServerError,
    /// Response shape unexpected (expected field missing)
    Malformed,
}

impl ProviderErrorKind {
    /// Map an HTTP status code onto the taxonomy
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ProviderErrorKind::NotFound,
            401 | 403 => ProviderErrorKind::Forbidden,
            _ => ProviderErrorKind::ServerError,
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProviderErrorKind::NotFound => "not found",
            ProviderErrorKind::Forbidden => "permission denied",
            ProviderErrorKind::ServerError => "server error",
            ProviderErrorKind::Malformed => "unexpected response",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ProviderErrorKind::from_status(404), ProviderErrorKind::NotFound);
        assert_eq!(ProviderErrorKind::from_status(403), ProviderErrorKind::Forbidden);
        assert_eq!(ProviderErrorKind::from_status(401), ProviderErrorKind::Forbidden);
        assert_eq!(ProviderErrorKind::from_status(500), ProviderErrorKind::ServerError);
        assert_eq!(ProviderErrorKind::from_status(502), ProviderErrorKind::ServerError);
    }
}
