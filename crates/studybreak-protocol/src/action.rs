//! Enumerated action space proposed by the decision service

use serde::{Deserialize, Serialize};

/// Length of a recommended break
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakLength {
    Short,
    Long,
}

impl std::fmt::Display for BreakLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// Action identifier as sent on the wire
pub type ActionId = u32;

/// Classified action
///
/// Ids 0-2 are the actions the service currently knows about. Anything else is
/// carried through as `Other` so newer backends keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Keep studying
    Continue,
    /// Take a short break
    ShortBreak,
    /// Take a long break
    LongBreak,
    /// Action id this client has no classification for
    Other(ActionId),
}

impl ActionKind {
    pub const CONTINUE_ID: ActionId = 0;
    pub const SHORT_BREAK_ID: ActionId = 1;
    pub const LONG_BREAK_ID: ActionId = 2;

    pub fn from_id(id: ActionId) -> Self {
        match id {
            Self::CONTINUE_ID => Self::Continue,
            Self::SHORT_BREAK_ID => Self::ShortBreak,
            Self::LONG_BREAK_ID => Self::LongBreak,
            other => Self::Other(other),
        }
    }

    pub fn id(&self) -> ActionId {
        match self {
            Self::Continue => Self::CONTINUE_ID,
            Self::ShortBreak => Self::SHORT_BREAK_ID,
            Self::LongBreak => Self::LONG_BREAK_ID,
            Self::Other(id) => *id,
        }
    }

    /// Break length for break actions, `None` otherwise
    pub fn break_length(&self) -> Option<BreakLength> {
        match self {
            Self::ShortBreak => Some(BreakLength::Short),
            Self::LongBreak => Some(BreakLength::Long),
            Self::Continue | Self::Other(_) => None,
        }
    }

    /// Display label used by history views
    pub fn label(&self) -> String {
        match self {
            Self::Continue => "Continue Studying".to_string(),
            Self::ShortBreak => "Short Break".to_string(),
            Self::LongBreak => "Long Break".to_string(),
            Self::Other(id) => format!("Action {}", id),
        }
    }
}

impl From<ActionId> for ActionKind {
    fn from(id: ActionId) -> Self {
        Self::from_id(id)
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids() {
        assert_eq!(ActionKind::from_id(0), ActionKind::Continue);
        assert_eq!(ActionKind::from_id(1), ActionKind::ShortBreak);
        assert_eq!(ActionKind::from_id(2), ActionKind::LongBreak);
    }

    #[test]
    fn test_unknown_id_is_preserved() {
        let kind = ActionKind::from_id(7);
        assert_eq!(kind, ActionKind::Other(7));
        assert_eq!(kind.id(), 7);
        assert_eq!(kind.break_length(), None);
    }

    #[test]
    fn test_break_length() {
        assert_eq!(ActionKind::Continue.break_length(), None);
        assert_eq!(
            ActionKind::ShortBreak.break_length(),
            Some(BreakLength::Short)
        );
        assert_eq!(ActionKind::LongBreak.break_length(), Some(BreakLength::Long));
        assert_eq!(BreakLength::Long.to_string(), "long");
    }
}
