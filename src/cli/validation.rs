//! Argument validators wired into clap via `value_parser`.
//!
//! clap checks types and flag conflicts; these functions add the checks
//! that have to look at the value itself, so a bad argument fails at
//! parse time with a message naming the offending value.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

/// Most migrations the CLI will revert in one invocation.
pub const MAX_ROLLBACK_STEPS: u32 = 100;

/// Accepts any TCP port except 0.
pub fn validate_port(raw: &str) -> Result<u16, String> {
    match raw.parse::<u16>() {
        Ok(0) => Err("port 0 cannot be listened on".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!("'{}' is not a port number (expected 1-65535)", raw)),
    }
}

/// Accepts a path that points at an existing file.
pub fn validate_config_file_path(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);
    match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => Ok(path),
        Ok(_) => Err(format!("configuration path '{}' is not a file", raw)),
        Err(e) => Err(format!("cannot read configuration file '{}': {}", raw, e)),
    }
}

/// Accepts a rollback step count between 1 and [`MAX_ROLLBACK_STEPS`].
pub fn validate_rollback_steps(raw: &str) -> Result<u32, String> {
    let steps = raw
        .parse::<u32>()
        .map_err(|_| format!("'{}' is not a number of migrations", raw))?;
    if steps == 0 {
        return Err("rolling back 0 migrations does nothing".to_string());
    }
    if steps > MAX_ROLLBACK_STEPS {
        return Err(format!(
            "refusing to roll back more than {} migrations at once",
            MAX_ROLLBACK_STEPS
        ));
    }
    Ok(steps)
}

/// Accepts an IP address or a plausible hostname.
pub fn validate_host_address(raw: &str) -> Result<String, String> {
    let host = raw.trim();
    if host.is_empty() {
        return Err("host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    if host.chars().any(|c| c.is_whitespace()) {
        return Err(format!("host address '{}' contains whitespace", raw));
    }
    // All digits and dots but unparseable above means a malformed IPv4.
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("'{}' is not a valid IPv4 address", raw));
    }
    if host.len() > 253 {
        return Err("host name exceeds the 253 character DNS limit".to_string());
    }
    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_bounds() {
        assert_eq!(validate_port("1"), Ok(1));
        assert_eq!(validate_port("3000"), Ok(3000));
        assert_eq!(validate_port("65535"), Ok(65535));
        assert!(validate_port("0").is_err());
        assert!(validate_port("65536").is_err());
        assert!(validate_port("http").is_err());
    }

    #[test]
    fn test_host_accepts_ips_and_hostnames() {
        for host in ["127.0.0.1", "0.0.0.0", "::1", "localhost", "relay.internal"] {
            assert!(validate_host_address(host).is_ok(), "{host} should parse");
        }
    }

    #[test]
    fn test_host_rejects_malformed_input() {
        for host in ["", "   ", "bad host", "999.999.999.999", "10.0.0"] {
            assert!(
                validate_host_address(host).is_err(),
                "{host:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_host_is_trimmed() {
        assert_eq!(
            validate_host_address(" localhost "),
            Ok("localhost".to_string())
        );
    }

    #[test]
    fn test_rollback_steps_range() {
        assert_eq!(validate_rollback_steps("1"), Ok(1));
        assert_eq!(validate_rollback_steps("100"), Ok(100));
        assert!(validate_rollback_steps("0").is_err());
        assert!(validate_rollback_steps("101").is_err());
        assert!(validate_rollback_steps("two").is_err());
    }

    #[test]
    fn test_config_path_must_be_a_readable_file() {
        assert!(validate_config_file_path("/definitely/missing.toml").is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());

        let file = dir.path().join("local.toml");
        std::fs::write(&file, "[server]\nport = 3000\n").unwrap();
        assert!(validate_config_file_path(file.to_str().unwrap()).is_ok());
    }
}
