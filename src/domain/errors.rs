//! Errors raised at the link store boundary.

/// Write-time validation failures.
///
/// Returned synchronously to the authoring caller with enough detail
/// to correct the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid target URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("slug '{0}' is already in use")]
    DuplicateSlug(String),

    #[error("rotation weight for '{url}' must be positive, got {weight}")]
    NonPositiveWeight { url: String, weight: i64 },

    #[error("rotation weight for '{url}' is too large, got {weight}")]
    WeightTooLarge { url: String, weight: i64 },

    #[error("malformed expiry timestamp '{0}'")]
    MalformedExpiry(String),

    #[error("invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: &'static str },

    #[error("rotation requires at least one variant")]
    EmptyRotation,

    #[error("either target_url or rotation is required")]
    MissingTarget,

    #[error("target_url and rotation cannot both be set")]
    AmbiguousTarget,
}

impl ValidationError {
    /// Stable machine-readable name of the failed rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::DuplicateSlug(_) => "duplicate_slug",
            Self::NonPositiveWeight { .. } => "non_positive_weight",
            Self::WeightTooLarge { .. } => "weight_too_large",
            Self::MalformedExpiry(_) => "malformed_expiry",
            Self::InvalidSlug { .. } => "invalid_slug",
            Self::EmptyRotation => "empty_rotation",
            Self::MissingTarget => "missing_target",
            Self::AmbiguousTarget => "ambiguous_target",
        }
    }
}

/// Errors returned by link repositories and the link service.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("link not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages_name_the_input() {
        let err = ValidationError::NonPositiveWeight {
            url: "https://a.example".to_string(),
            weight: 0,
        };
        assert!(err.to_string().contains("https://a.example"));
        assert_eq!(err.rule(), "non_positive_weight");

        let err = ValidationError::DuplicateSlug("promo".to_string());
        assert_eq!(err.to_string(), "slug 'promo' is already in use");
    }

    #[test]
    fn test_store_error_wraps_validation() {
        let err: StoreError = ValidationError::EmptyRotation.into();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::EmptyRotation)
        ));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::NotFound));
    }
}
