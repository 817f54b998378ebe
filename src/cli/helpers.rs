//! Shared helper functions for CLI commands
//!
//! Source selection, structured output and small text utilities used by
//! several command modules.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, SampleSource, StoreError, TransactionSource, TransactionStore};

/// Number of generated rows served by the sample source
pub const SAMPLE_ROWS: usize = crate::core::sample::DEFAULT_COUNT;

/// Pick the data source for a command
///
/// `--sample` forces generated data. Otherwise the configured store is
/// opened; when it is unavailable, sample data is served with a warning
/// unless `--no-fallback` or `sample_fallback: false` says otherwise.
pub fn open_source(global: &GlobalOpts, config: &Config) -> Result<Box<dyn TransactionSource>> {
    if global.sample {
        return Ok(Box::new(SampleSource::generate(config.sample_seed(), SAMPLE_ROWS)?));
    }

    let path = global.db.clone().unwrap_or_else(|| config.database_path());
    match TransactionStore::open(&path) {
        Ok(store) => Ok(Box::new(store)),
        Err(err @ StoreError::Unavailable { .. }) => {
            if global.no_fallback || !config.sample_fallback() {
                return Err(err.into());
            }
            log::warn!("{}; serving sample data instead", err);
            Ok(Box::new(SampleSource::generate(config.sample_seed(), SAMPLE_ROWS)?))
        }
        Err(err) => Err(err.into()),
    }
}

/// Print a whole response as JSON or YAML
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(value).into_diagnostic()?),
        _ => println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?),
    }
    Ok(())
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Display an optional text field, "-" when missing
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}
