//! Value parsers for CLI arguments
//!
//! Each function is used as a clap `value_parser`, so errors are plain
//! strings shown next to the offending flag.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

const MAX_ROLLBACK_STEPS: u32 = 100;
const MAX_HOSTNAME_LEN: usize = 253;

/// Port in 1-65535.
pub fn validate_port(value: &str) -> Result<u16, String> {
    let port: u16 = value
        .trim()
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535, got: '{}'", value))?;

    if port == 0 {
        return Err("Port 0 is not allowed. Use a port between 1 and 65535.".to_string());
    }

    Ok(port)
}

/// An IP address, `localhost`, or a DNS hostname.
pub fn validate_host_address(value: &str) -> Result<String, String> {
    let host = value.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }

    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }

    // Dotted digits that failed to parse as an IP are a mistyped address
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address: '{}'", value));
    }

    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "Host name is too long (maximum {} characters)",
            MAX_HOSTNAME_LEN
        ));
    }

    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };

    if !host.split('.').all(valid_label) {
        return Err(format!("Invalid host name: '{}'", value));
    }

    Ok(host.to_string())
}

/// An existing, readable file.
pub fn validate_config_file_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", value));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", value));
    }

    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", value, e))
}

/// Rollback step count in 1-100.
pub fn validate_rollback_steps(value: &str) -> Result<u32, String> {
    let steps: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("Rollback steps must be a positive number, got: '{}'", value))?;

    if steps == 0 || steps > MAX_ROLLBACK_STEPS {
        return Err(format!(
            "Rollback steps must be between 1 and {}, got: {}",
            MAX_ROLLBACK_STEPS, steps
        ));
    }

    Ok(steps)
}
