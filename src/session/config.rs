//! Session configuration.

use crate::analysis::DEFAULT_PARALLEL_THRESHOLD;
use crate::cli::output::OutputFormat;
use crate::error::{Error, Result};

/// Default buffer size per job (1 GiB).
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024 * 1024;

/// Identity used when none is supplied.
pub const DEFAULT_IDENTITY: &str = "user";

/// Settings for one interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Name shown in the prompt.
    pub identity: String,
    /// Bytes allocated by each job.
    pub buffer_size: usize,
    /// Buffer size at which analysis switches to rayon.
    pub parallel_threshold: usize,
    /// Base seed for reproducible buffers; entropy when `None`.
    pub seed: Option<u64>,
    /// Job report format.
    pub format: OutputFormat,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            identity: DEFAULT_IDENTITY.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            seed: None,
            format: OutputFormat::Text,
        }
    }
}

/// Parses a byte size such as `4096`, `64KiB`, `512M` or `1gib`.
///
/// Units are binary and case-insensitive: `B`, `K`/`KiB`, `M`/`MiB`,
/// `G`/`GiB`.
///
/// # Errors
///
/// Returns [`Error::Config`] for malformed input or a size that overflows
/// `usize`.
///
/// # Examples
///
/// ```
/// use bytefreq::session::config::parse_size;
///
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1g").unwrap(), 1 << 30);
/// ```
pub fn parse_size(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let invalid = |reason: &str| Error::Config {
        message: format!("invalid size '{input}': {reason}"),
    };

    if digits.is_empty() {
        return Err(invalid("expected a number"));
    }
    let value: usize = digits.parse().map_err(|_| invalid("number too large"))?;

    let multiplier: usize = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kib" => 1 << 10,
        "m" | "mib" => 1 << 20,
        "g" | "gib" => 1 << 30,
        other => return Err(invalid(&format!("unknown unit '{other}'"))),
    };

    value
        .checked_mul(multiplier)
        .ok_or_else(|| invalid("size overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.buffer_size, 1_073_741_824);
        assert_eq!(config.identity, "user");
        assert!(config.seed.is_none());
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_size_errors() {
        assert!(parse_size("").is_err());
        assert!(parse_size("KiB").is_err());
        assert!(parse_size("12 TB").is_err());
        assert!(parse_size("-1").is_err());
        assert!(parse_size("99999999999999999999999").is_err());
    }

    #[test]
    fn test_parse_size_error_is_config() {
        let err = parse_size("abc").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("abc"));
    }
}
