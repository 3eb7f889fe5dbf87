use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Identifier of a tracked resource (its URL).
pub type ResourceId = String;

/// Persisted mapping of tracked resource -> last known digest.
///
/// An empty digest is a valid placeholder meaning "never successfully
/// hashed"; it is not the same as the key being absent.
pub type DigestState = BTreeMap<ResourceId, String>;

/// Digests computed during a single run, one entry per resource that did not
/// fail.
pub type DigestRecord = BTreeMap<ResourceId, String>;

/// Resources whose freshly computed digest differs from the stored one,
/// mapped to the new digest.
pub type ChangeSet = BTreeMap<ResourceId, String>;

/// Digest algorithm used to fingerprint page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
    Blake3,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Sha512
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "blake3" => Ok(HashAlgorithm::Blake3),
            other => Err(format!(
                "invalid digest algorithm: {other} (expected \"sha256\", \"sha512\" or \"blake3\")"
            )),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake3 => "blake3",
        };
        f.write_str(name)
    }
}

/// Which notifier receives the change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// No side effect; changes are only counted.
    None,
    /// Changed URLs are written to stdout.
    Print,
    /// Changed URLs are emitted as log events.
    Log,
    /// Changed URLs are mailed over SMTP.
    Mail,
}

impl Default for NotifierKind {
    fn default() -> Self {
        NotifierKind::None
    }
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(NotifierKind::None),
            "print" => Ok(NotifierKind::Print),
            "log" => Ok(NotifierKind::Log),
            "mail" | "smtp" => Ok(NotifierKind::Mail),
            other => Err(format!(
                "invalid notifier: {other} (expected \"none\", \"print\", \"log\" or \"mail\")"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_parse_case_insensitively() {
        assert_eq!("SHA512".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512));
        assert_eq!("sha-256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!(" blake3 ".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Blake3));
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn algorithm_display_matches_config_names() {
        for alg in [HashAlgorithm::Sha256, HashAlgorithm::Sha512, HashAlgorithm::Blake3] {
            assert_eq!(alg.to_string().parse::<HashAlgorithm>(), Ok(alg));
        }
    }

    #[test]
    fn notifier_kind_accepts_smtp_alias() {
        assert_eq!("smtp".parse::<NotifierKind>(), Ok(NotifierKind::Mail));
        assert_eq!(NotifierKind::default(), NotifierKind::None);
        assert!("pager".parse::<NotifierKind>().is_err());
    }
}
