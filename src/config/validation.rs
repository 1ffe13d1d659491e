use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Database and catalog paths cannot be empty
/// - Database path must not point at an existing directory
/// - If log file path is provided, it cannot be empty
/// - Log file path parent directory must exist or be creatable
pub fn validate_config(
    database_path: &str,
    catalog_path: &str,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    if database_path.trim().is_empty() {
        return Err(AppError::config_error("Database path cannot be empty"));
    }
    if Path::new(database_path).is_dir() {
        return Err(AppError::config_error(format!(
            "Database path '{database_path}' is a directory"
        )));
    }
    if catalog_path.trim().is_empty() {
        return Err(AppError::config_error("Catalog path cannot be empty"));
    }

    if let Some(log_path) = log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
