// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Host/plugin version compatibility (spec §3.2, §4.E).

use thiserror::Error;

/// Host version string that bypasses every constraint check.
pub const DEV_HOST_VERSION: &str = "dev";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version constraint {constraint:?}: {source}")]
    BadConstraint { constraint: String, source: semver::Error },
    #[error("invalid host version {version:?}: {source}")]
    BadHostVersion { version: String, source: semver::Error },
    #[error(
        "version incompatible: plugin requires {required}, host is {host}"
    )]
    Incompatible { required: String, host: String },
}

/// Check that `host_version` satisfies `required`, per spec §3.2 / §8
/// scenario 3.
///
/// A `None` constraint is always accepted. Host version `"dev"` bypasses
/// every check (including a malformed constraint).
pub fn check_compatible(
    required: Option<&str>,
    host_version: &str,
) -> Result<(), VersionError> {
    let Some(required) = required else { return Ok(()) };
    if host_version == DEV_HOST_VERSION {
        return Ok(());
    }
    let req = semver::VersionReq::parse(required).map_err(|source| {
        VersionError::BadConstraint { constraint: required.to_string(), source }
    })?;
    let host = semver::Version::parse(host_version).map_err(|source| {
        VersionError::BadHostVersion { version: host_version.to_string(), source }
    })?;
    if req.matches(&host) {
        Ok(())
    } else {
        Err(VersionError::Incompatible {
            required: required.to_string(),
            host: host_version.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_constraint_always_accepted() {
        assert!(check_compatible(None, "1.0.0").is_ok());
    }

    #[test]
    fn dev_host_bypasses_constraint() {
        assert!(check_compatible(Some("^2.0.0"), "dev").is_ok());
    }

    #[test]
    fn matching_constraint_accepted() {
        assert!(check_compatible(Some("^1.0.0"), "1.2.3").is_ok());
    }

    #[test]
    fn mismatched_constraint_rejected() {
        let err = check_compatible(Some("^2.0.0"), "1.0.0").unwrap_err();
        assert!(err.to_string().contains("version incompatible"));
    }

    #[test]
    fn malformed_constraint_is_an_error_not_a_panic() {
        assert!(matches!(
            check_compatible(Some("not-a-constraint"), "1.0.0"),
            Err(VersionError::BadConstraint { .. })
        ));
    }

    #[test]
    fn dev_host_bypasses_even_malformed_constraint() {
        assert!(check_compatible(Some("not-a-constraint"), "dev").is_ok());
    }
}
