//! Explicit version tags.
//!
//! A release can only be fetched by an exact tag. Ranges, wildcards and
//! aliases such as `latest` are rejected before anything touches the network.

use anyhow::Result;
use std::fmt;

use crate::error::SetupError;

/// A version tag that names exactly one release (e.g. `v0.0.3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitVersion {
    tag: String,
}

impl ExplicitVersion {
    /// Validates a version input.
    ///
    /// The input is trimmed, then any run of leading `=` and `v` characters is
    /// ignored; what remains must be a full `MAJOR.MINOR.PATCH` version with
    /// optional pre-release and build metadata. The tag is kept as typed
    /// (minus surrounding whitespace) because release tags are matched verbatim.
    pub fn parse(input: &str) -> Result<Self, SetupError> {
        let tag = input.trim();
        if tag.is_empty() {
            return Err(SetupError::MissingVersion);
        }

        let cleaned = tag.trim_start_matches(['=', 'v']);
        semver::Version::parse(cleaned)
            .map_err(|_| SetupError::InvalidVersion(tag.to_string()))?;

        Ok(Self {
            tag: tag.to_string(),
        })
    }

    /// Parses an optional input, treating `None` as a missing version.
    pub fn from_input(input: Option<&str>) -> Result<Self> {
        match input {
            Some(value) => Ok(Self::parse(value)?),
            None => Err(SetupError::MissingVersion.into()),
        }
    }

    /// The tag used for the release lookup, as typed.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ExplicitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_explicit_versions() {
        for input in [
            "v0.0.3",
            "0.0.3",
            "1.2.3-rc.1",
            "v1.2.3+build.5",
            "=v2.0.0",
            " v1.0.0 ",
            "vv1.2.3",
            "==1.2.3",
            "v=1.2.3",
        ] {
            let v = ExplicitVersion::parse(input).unwrap();
            assert_eq!(v.tag(), input.trim());
        }
    }

    #[test]
    fn test_tag_is_kept_as_typed() {
        let v = ExplicitVersion::parse("==v0.0.3").unwrap();
        assert_eq!(v.tag(), "==v0.0.3");
        assert_eq!(v.to_string(), "==v0.0.3");
    }

    #[test]
    fn test_rejects_ranges_and_aliases() {
        for input in [
            "latest", "1.x", "1.2", "^1.2.3", "~1.2.3", ">=1.0.0", "v1", "1.2.3.4", "V1.2.3",
        ] {
            assert_eq!(
                ExplicitVersion::parse(input),
                Err(SetupError::InvalidVersion(input.to_string())),
                "{input}"
            );
        }
    }

    #[test]
    fn test_blank_is_missing() {
        assert_eq!(ExplicitVersion::parse(""), Err(SetupError::MissingVersion));
        assert_eq!(ExplicitVersion::parse("   "), Err(SetupError::MissingVersion));

        let err = ExplicitVersion::from_input(None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SetupError>(),
            Some(&SetupError::MissingVersion)
        );
    }
}
