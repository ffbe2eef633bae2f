// every teardrops_version this crate reads, oldest first
const FORMAT_VERSIONS: &[&str] = &[CURRENT_FORMAT_VERSION];

const CURRENT_FORMAT_VERSION: &str = "0.1";

/// How an asset's `teardrops_version` relates to the version this crate writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStatus {
    /// Written by this version of the format.
    Current,
    /// Written by an older version that still reads the same way.
    Outdated {
        /// The version found in the asset.
        found: String,
        /// The version it is upgraded to.
        current: &'static str,
    },
    /// Not a version this crate knows, most likely from a newer Teardrops.
    Unknown,
}

/// The `teardrops_version` written into new assets.
pub fn current_format_version() -> &'static str {
    CURRENT_FORMAT_VERSION
}

/// Returns `true` if assets written with `version` can be read.
pub fn is_known_version(version: &str) -> bool {
    FORMAT_VERSIONS.contains(&version)
}

/// Classifies an asset's `teardrops_version`.
pub fn validate_version(version: &str) -> VersionStatus {
    if version == CURRENT_FORMAT_VERSION {
        VersionStatus::Current
    } else if is_known_version(version) {
        VersionStatus::Outdated {
            found: version.to_string(),
            current: CURRENT_FORMAT_VERSION,
        }
    } else {
        VersionStatus::Unknown
    }
}
