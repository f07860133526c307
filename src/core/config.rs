//! Step configuration parsed from the `CO_DATA` token string

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while turning `CO_DATA` into a [`StepConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("CO_DATA value is null")]
    Empty,

    #[error("release parameter is required for the release action")]
    MissingRelease,

    #[error("invalid release [{0}], expected <domain>/<namespace>/<repository>/<tag>")]
    InvalidRelease(String),
}

/// Parsed step configuration
///
/// Every field is optional: the parser only records what it was given.
/// Whether the combination makes sense is decided by the stage that uses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepConfig {
    /// Repository URI to clone (`coredns=`)
    pub repository: Option<String>,

    /// Requested action (`action=`), resolved into an [`Action`] at dispatch
    pub action: Option<String>,

    /// Release target descriptor (`release=`)
    pub release: Option<String>,

    /// Tokens whose key was not recognized, in input order
    pub unknown_keys: Vec<String>,
}

impl StepConfig {
    /// Parse a whitespace-separated list of `key=value` tokens
    ///
    /// Each token is split on its first `=`, so values may themselves contain
    /// `=`. Later occurrences of a key overwrite earlier ones. A token with no
    /// `=` is treated like any other unrecognized key.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut tokens = input.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err(ConfigError::Empty);
        }

        let mut config = StepConfig::default();
        for token in tokens {
            match token.split_once('=') {
                Some(("coredns", value)) => config.repository = Some(value.to_string()),
                Some(("action", value)) => config.action = Some(value.to_string()),
                Some(("release", value)) => config.release = Some(value.to_string()),
                _ => config.unknown_keys.push(token.to_string()),
            }
        }

        Ok(config)
    }

    /// Resolve the release descriptor into its four components
    pub fn release_target(&self) -> Result<ReleaseTarget, ConfigError> {
        match self.release.as_deref() {
            Some(release) => release.parse(),
            None => Err(ConfigError::MissingRelease),
        }
    }
}

/// Action requested by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `make coredns`
    Build,
    /// `make test`
    Test,
    /// Build, then upload the binary
    Release,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" => Ok(Action::Build),
            "test" => Ok(Action::Test),
            "release" => Ok(Action::Release),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Build => "build",
            Action::Test => "test",
            Action::Release => "release",
        };
        f.write_str(name)
    }
}

/// Upload destination, `<domain>/<namespace>/<repository>/<tag>`
///
/// e.g. `hub.opshub.sh/containerops/cncf-demo/demo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub domain: String,
    pub namespace: String,
    pub repository: String,
    pub tag: String,
}

impl ReleaseTarget {
    /// Artifact URI for `filename` under this target, using `scheme`
    ///
    /// Components are inserted verbatim. Nothing is percent-encoded.
    pub fn artifact_uri(&self, scheme: &str, filename: &str) -> String {
        format!(
            "{}://{}/binary/v1/{}/{}/binary/{}/{}",
            scheme, self.domain, self.namespace, self.repository, filename, self.tag
        )
    }
}

impl FromStr for ReleaseTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [domain, namespace, repository, tag]
                if parts.iter().all(|part| !part.is_empty()) =>
            {
                Ok(ReleaseTarget {
                    domain: domain.to_string(),
                    namespace: namespace.to_string(),
                    repository: repository.to_string(),
                    tag: tag.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRelease(s.to_string())),
        }
    }
}
