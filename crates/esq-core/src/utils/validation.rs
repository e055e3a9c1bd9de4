//! Configuration value checks.

use crate::error::ConfigError;

/// A host URL must carry an explicit http or https scheme and a host part.
pub fn validate_url(field: &str, url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        field: field.to_string(),
        value: url.to_string(),
        reason: reason.to_string(),
    };

    if url.is_empty() {
        return Err(invalid("URL cannot be empty"));
    }

    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| invalid("URL must start with http:// or https://"))?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(invalid("URL is missing a host"));
    }

    Ok(())
}

/// `default_size` must be positive and no larger than `max_size`.
pub fn validate_page_sizes(default_size: usize, max_size: usize) -> Result<(), ConfigError> {
    if max_size == 0 {
        return Err(ConfigError::InvalidValue {
            field: "query.max_size".to_string(),
            value: max_size.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    if default_size == 0 {
        return Err(ConfigError::InvalidValue {
            field: "query.default_size".to_string(),
            value: default_size.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    if default_size > max_size {
        return Err(ConfigError::InvalidValue {
            field: "query.default_size".to_string(),
            value: default_size.to_string(),
            reason: format!("must not exceed query.max_size ({})", max_size),
        });
    }
    Ok(())
}
