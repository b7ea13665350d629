//! Source catalogue
//!
//! Every hostname source the orchestrator knows how to call, with the stable
//! name used on the command line and in configuration, and the default name
//! of the remote function that wraps it.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A subdomain intelligence source (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// crt.sh certificate transparency database
    CrtSh,
    /// Local amass enumeration run
    Amass,
    /// AlienVault OTX passive DNS
    AlienVault,
    /// Sublist3r search API
    Sublist3r,
    /// Censys certificate search
    Censys,
}

impl SourceKind {
    /// All sources, in catalogue order
    pub const ALL: [SourceKind; 5] = [
        SourceKind::CrtSh,
        SourceKind::Amass,
        SourceKind::AlienVault,
        SourceKind::Sublist3r,
        SourceKind::Censys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::CrtSh => "crtsh",
            SourceKind::Amass => "amass",
            SourceKind::AlienVault => "alienvault",
            SourceKind::Sublist3r => "sublist3r",
            SourceKind::Censys => "censys",
        }
    }

    /// Default name of the remote function wrapping this source
    pub fn default_function_name(&self) -> &'static str {
        match self {
            SourceKind::CrtSh => "CrtShFunction",
            SourceKind::Amass => "AmassEnumFunction",
            SourceKind::AlienVault => "AlienVaultFunction",
            SourceKind::Sublist3r => "Sublist3rFunction",
            SourceKind::Censys => "CensysFunction",
        }
    }

    /// Sources enabled when nothing is configured.
    ///
    /// Amass runs for up to fourteen minutes, so it is opt-in.
    pub fn default_enabled() -> Vec<SourceKind> {
        Self::ALL
            .into_iter()
            .filter(|k| *k != SourceKind::Amass)
            .collect()
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crtsh" | "crt.sh" | "crt-sh" => Ok(SourceKind::CrtSh),
            "amass" => Ok(SourceKind::Amass),
            "alienvault" | "otx" => Ok(SourceKind::AlienVault),
            "sublist3r" => Ok(SourceKind::Sublist3r),
            "censys" => Ok(SourceKind::Censys),
            other => Err(DomainError::UnknownSource(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_names() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.as_str().parse::<SourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("crt.sh".parse::<SourceKind>().unwrap(), SourceKind::CrtSh);
        assert_eq!("OTX".parse::<SourceKind>().unwrap(), SourceKind::AlienVault);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            "shodan".parse::<SourceKind>(),
            Err(DomainError::UnknownSource(name)) if name == "shodan"
        ));
    }

    #[test]
    fn test_default_enabled_excludes_amass() {
        let enabled = SourceKind::default_enabled();
        assert_eq!(enabled.len(), 4);
        assert!(!enabled.contains(&SourceKind::Amass));
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&SourceKind::AlienVault).unwrap();
        assert_eq!(json, "\"alienvault\"");
    }
}
