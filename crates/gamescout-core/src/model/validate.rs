/// Field validation for manually entered games.
///
/// Rejects bad input at the point of entry rather than letting it into
/// the catalog — the store runs these checks in `upsert_game`.
use thiserror::Error;

/// Maximum accepted title length.
pub const MAX_TITLE_LEN: usize = 255;

/// A rejected field on a manually entered or edited game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("title too long (max {MAX_TITLE_LEN} characters)")]
    TitleTooLong,
    #[error("year must be a number between 1970 and 2030")]
    InvalidYear,
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("launch path cannot be empty")]
    EmptyPath,
}

/// Title: non-empty after trimming, at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<(), FieldError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(FieldError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(FieldError::TitleTooLong);
    }
    Ok(())
}

/// Year: optional (empty string), otherwise a number in 1970..=2030.
pub fn validate_year(year: &str) -> Result<(), FieldError> {
    if year.is_empty() {
        return Ok(());
    }
    match year.parse::<u32>() {
        Ok(y) if (1970..=2030).contains(&y) => Ok(()),
        _ => Err(FieldError::InvalidYear),
    }
}

/// URL: http(s) scheme with a non-empty host component.
pub fn validate_url(url: &str) -> Result<(), FieldError> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| FieldError::InvalidUrl(url.to_string()))?;
    let host = rest.split('/').next().unwrap_or("");
    if host.is_empty() || !host.contains('.') {
        return Err(FieldError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_bounded() {
        assert_eq!(validate_title("   "), Err(FieldError::EmptyTitle));
        assert_eq!(validate_title("Doom"), Ok(()));
        assert_eq!(
            validate_title(&"x".repeat(256)),
            Err(FieldError::TitleTooLong)
        );
    }

    #[test]
    fn year_is_optional_but_bounded() {
        assert_eq!(validate_year(""), Ok(()));
        assert_eq!(validate_year("1998"), Ok(()));
        assert_eq!(validate_year("1969"), Err(FieldError::InvalidYear));
        assert_eq!(validate_year("soon"), Err(FieldError::InvalidYear));
    }

    #[test]
    fn urls_require_http_scheme_and_host() {
        assert_eq!(validate_url("https://example.com/play"), Ok(()));
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("https:///play").is_err());
    }
}
