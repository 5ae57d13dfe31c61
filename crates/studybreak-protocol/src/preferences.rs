//! User preference payloads

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How strongly fatigue should weigh on recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FatigueSensitivity {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for FatigueSensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for FatigueSensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "invalid fatigue sensitivity '{}': expected low, medium or high",
                other
            )),
        }
    }
}

/// Which kind of action the user leans towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakBias {
    #[default]
    Study,
    Short,
    Long,
}

impl std::fmt::Display for BreakBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Study => write!(f, "study"),
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
        }
    }
}

impl FromStr for BreakBias {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "study" => Ok(Self::Study),
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            other => Err(format!(
                "invalid break bias '{}': expected study, short or long",
                other
            )),
        }
    }
}

/// Body of GET/POST `/api/preferences`
///
/// Missing fields fall back to `medium` / `study`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub fatigue_sensitivity: FatigueSensitivity,
    #[serde(default)]
    pub break_bias: BreakBias,
}

impl Preferences {
    pub fn new(fatigue_sensitivity: FatigueSensitivity, break_bias: BreakBias) -> Self {
        Self {
            fatigue_sensitivity,
            break_bias,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_missing_fields() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs.fatigue_sensitivity, FatigueSensitivity::Medium);
        assert_eq!(prefs.break_bias, BreakBias::Study);
    }

    #[test]
    fn test_wire_format_is_lowercase() {
        let prefs = Preferences::new(FatigueSensitivity::High, BreakBias::Long);
        let json = serde_json::to_value(prefs).unwrap();
        assert_eq!(json["fatigue_sensitivity"], "high");
        assert_eq!(json["break_bias"], "long");
    }

    #[test]
    fn test_parse_from_cli_input() {
        assert_eq!(
            "LOW".parse::<FatigueSensitivity>().unwrap(),
            FatigueSensitivity::Low
        );
        assert_eq!("short".parse::<BreakBias>().unwrap(), BreakBias::Short);
        assert!("extreme".parse::<FatigueSensitivity>().is_err());
        assert!("nap".parse::<BreakBias>().is_err());
    }
}
