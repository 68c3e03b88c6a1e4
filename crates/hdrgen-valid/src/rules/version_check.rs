use semver::Version;

use hdrgen_spec::parser::CONFIG_FILE_NAME;
use hdrgen_spec::types::config::HdrgenConfig;
use hdrgen_spec::types::error::{ErrorEntry, ValidationReport, E_VERSION_MISMATCH};

const SUPPORTED_VERSION: Version = Version::new(1, 0, 0);

/// Check that the project config version is supported.
pub fn check(config: &HdrgenConfig, report: &mut ValidationReport) {
    match Version::parse(&config.version) {
        Ok(version) => {
            if version.major != SUPPORTED_VERSION.major || version.minor != SUPPORTED_VERSION.minor {
                report.push(
                    ErrorEntry::error(
                        E_VERSION_MISMATCH,
                        format!(
                            "Unsupported config version '{}'. Expected compatible with {}",
                            config.version, SUPPORTED_VERSION
                        ),
                        CONFIG_FILE_NAME,
                        "$.version",
                    )
                    .with_suggestion("Set 'version' to '1.0.0'"),
                );
            }
        }
        Err(_) => {
            report.push(
                ErrorEntry::error(
                    E_VERSION_MISMATCH,
                    format!("Invalid semver version: '{}'", config.version),
                    CONFIG_FILE_NAME,
                    "$.version",
                )
                .with_suggestion("Version must be valid semver (e.g., '1.0.0')"),
            );
        }
    }
}
