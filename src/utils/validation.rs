use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 輸出檔名只允許單一檔名，不可跳出輸出目錄
pub fn validate_filename(field_name: &str, filename: &str, allowed_extensions: &[&str]) -> Result<()> {
    validate_path(field_name, filename)?;

    let path = std::path::Path::new(filename);
    if path.components().count() != 1 || path.file_name().is_none() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: "Must be a plain file name without directories".to_string(),
        });
    }

    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(extension) if allowed_set.contains(extension) => Ok(()),
        Some(extension) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("url", "https://dol.ny.gov/statistics-laussaxls").is_ok());
        assert!(validate_url("url", "http://example.com").is_ok());
        assert!(validate_url("url", "").is_err());
        assert!(validate_url("url", "invalid-url").is_err());
        assert!(validate_url("url", "ftp://example.com/data.zip").is_err());
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("filename", "nychist.csv", &["csv"]).is_ok());
        assert!(validate_filename("filename", "nychist.xlsx", &["csv"]).is_err());
        assert!(validate_filename("filename", "nychist", &["csv"]).is_err());
        assert!(validate_filename("filename", "../escape.csv", &["csv"]).is_err());
        assert!(validate_filename("filename", "nested/file.csv", &["csv"]).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("download_selector", "a[download]").is_ok());
        assert!(validate_non_empty_string("download_selector", "   ").is_err());
    }
}
