use crate::core::errors::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dry tire compounds the pace models were fitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
}

impl Compound {
    pub const ALL: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    pub fn label(&self) -> &'static str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
        }
    }

    /// max_modelled_age returns the highest tire age (laps) for which pace predictions are
    /// trusted. Older tires are evaluated at this age.
    pub fn max_modelled_age(&self) -> u32 {
        match self {
            Compound::Soft => 25,
            Compound::Medium => 35,
            Compound::Hard => 50,
        }
    }
}

impl FromStr for Compound {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SOFT" => Ok(Compound::Soft),
            "MEDIUM" => Ok(Compound::Medium),
            "HARD" => Ok(Compound::Hard),
            _ => Err(SimError::UnknownCompound {
                label: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// * `compound` - Compound of the mounted tireset
/// * `age` - (laps) Laps completed on the tireset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TireState {
    pub compound: Compound,
    pub age: u32,
}

impl TireState {
    pub fn new(compound: Compound, age: u32) -> TireState {
        TireState { compound, age }
    }

    /// drive_lap increases the tire age by one lap.
    pub fn drive_lap(&mut self) {
        self.age += 1;
    }

    /// fit_new mounts a fresh set of the given compound during a pit stop.
    pub fn fit_new(&mut self, compound: Compound) {
        self.compound = compound;
        self.age = 0;
    }
}
