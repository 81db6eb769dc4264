use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Tyre compound category.
///
/// Labels from lap data are matched case-insensitively, anything unrecognised
/// becomes `Unknown`, which the lap-time model treats with neutral defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl Compound {
    /// Compounds offered when the lap data names none.
    pub const DRY_SET: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Soft => "SOFT",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Intermediate => "INTERMEDIATE",
            Self::Wet => "WET",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Degradation used when a fitted coefficient is out of bounds.
    pub fn default_degradation(&self) -> f64 {
        match self {
            Self::Soft => 0.15,
            Self::Medium => 0.08,
            Self::Hard => 0.03,
            Self::Intermediate => 0.05,
            _ => 0.08,
        }
    }

    /// Offset used when a fitted coefficient is out of bounds.
    pub fn default_offset(&self) -> f64 {
        match self {
            Self::Soft => -1.5,
            Self::Medium => 0.0,
            Self::Hard => 1.5,
            Self::Intermediate => -0.5,
            _ => 0.0,
        }
    }
}

impl FromStr for Compound {
    type Err = ();

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_uppercase().as_str() {
            "SOFT" => Ok(Self::Soft),
            "MEDIUM" => Ok(Self::Medium),
            "HARD" => Ok(Self::Hard),
            "INTERMEDIATE" => Ok(Self::Intermediate),
            "WET" => Ok(Self::Wet),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(()),
        }
    }
}

impl From<String> for Compound {
    fn from(label: String) -> Self {
        label.parse().unwrap_or_else(|_| {
            log::warn!("unrecognised compound label {:?}, treating as UNKNOWN", label);
            Self::Unknown
        })
    }
}

impl From<Compound> for String {
    fn from(compound: Compound) -> Self {
        compound.label().to_string()
    }
}

impl Display for Compound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("soft".parse::<Compound>(), Ok(Compound::Soft));
        assert_eq!(" Hard ".parse::<Compound>(), Ok(Compound::Hard));
        assert_eq!("INTERMEDIATE".parse::<Compound>(), Ok(Compound::Intermediate));
        assert_eq!("slick".parse::<Compound>(), Err(()));
    }

    #[test]
    fn unrecognised_label_becomes_unknown() {
        assert_eq!(Compound::from("TEST_UNKNOWN".to_string()), Compound::Unknown);
        assert_eq!(Compound::from("medium".to_string()), Compound::Medium);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(Compound::Intermediate.to_string(), "INTERMEDIATE");
    }
}
