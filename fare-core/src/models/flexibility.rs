use serde::{Deserialize, Serialize};

/// Fare flexibility selected for the change.
///
/// Only [`Flexibility::NotFlexible`] activates the airline penalty and
/// service fee fields and adds them to the total. [`Flexibility::Unset`]
/// is the "Select" placeholder and behaves like [`Flexibility::Flexible`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flexibility {
    Flexible,
    NotFlexible,
    #[default]
    Unset,
}

impl Flexibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flexible => "Yes",
            Self::NotFlexible => "No",
            Self::Unset => "Select",
        }
    }

    /// Parses a selector value. Accepts the form labels ("Yes", "No",
    /// "Select", "Default") as well as "flexible"/"not-flexible"/"unset",
    /// case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "flexible" => Some(Self::Flexible),
            "no" | "n" | "not-flexible" | "not_flexible" => Some(Self::NotFlexible),
            "select" | "default" | "unset" | "" => Some(Self::Unset),
            _ => None,
        }
    }

    /// Whether the airline penalty and service fee apply.
    pub fn surcharge_active(&self) -> bool {
        matches!(self, Self::NotFlexible)
    }
}

impl TryFrom<&str> for Flexibility {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value).ok_or_else(|| format!("unknown flexibility '{value}'"))
    }
}
