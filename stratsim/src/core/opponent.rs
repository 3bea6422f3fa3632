use crate::core::circuit::CircuitContext;
use crate::core::errors::SimError;
use crate::core::pace::PacePredictor;
use crate::core::stint::PaceSequence;
use crate::core::tire::{Compound, TireState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Step index on which a covering opponent boxes: one lap after our pit decision.
const COVER_PIT_STEP: usize = 1;

/// ReactivePolicy describes how the opponent answers our pit stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactivePolicy {
    /// Box on the lap after our stop.
    Cover,
    /// Never box within the horizon.
    StayOut,
}

impl FromStr for ReactivePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cover" => Ok(ReactivePolicy::Cover),
            "stay_out" | "stayout" => Ok(ReactivePolicy::StayOut),
            _ => anyhow::bail!("Unknown opponent policy {:?} (expected cover or stay-out)", s),
        }
    }
}

impl fmt::Display for ReactivePolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReactivePolicy::Cover => write!(f, "cover"),
            ReactivePolicy::StayOut => write!(f, "stay-out"),
        }
    }
}

/// project_opponent_stint projects the pace of the opponent. The first entry is the lap on the
/// current tireset without pit loss. Depending on the policy the opponent either keeps driving
/// on the aging set or pits on step 1 (pit loss added to that lap) and continues on a fresh set of
/// compound_after_pit from step 2 on.
pub fn project_opponent_stint(
    predictor: &PacePredictor,
    start_tire: &TireState,
    start_lap: u32,
    horizon_laps: u32,
    context: &CircuitContext,
    policy: ReactivePolicy,
    compound_after_pit: Compound,
) -> Result<PaceSequence, SimError> {
    context.check_window(start_lap, horizon_laps)?;

    let laps = context.projected_laps(start_lap, horizon_laps);
    let mut paces = PaceSequence::with_capacity(laps.clone().count() + 1);
    paces.push(predictor.predict_pace(start_tire.compound, start_tire.age, start_lap)?);

    let mut tireset = start_tire.clone();

    for (step, lap) in (1..).zip(laps) {
        tireset.drive_lap();
        let mut t_lap = predictor.predict_pace(tireset.compound, tireset.age, lap)?;

        if policy == ReactivePolicy::Cover && step == COVER_PIT_STEP {
            t_lap += context.pit_loss;
            tireset.fit_new(compound_after_pit);
            debug!(lap, compound = %compound_after_pit, "opponent covers");
        }

        debug!(lap, %policy, compound = %tireset.compound, age = tireset.age, t_lap, "opponent lap");
        paces.push(t_lap);
    }

    Ok(paces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pace::LabelEncoder;
    use approx::assert_relative_eq;

    /// Encodes the features into the lap time: code * 1000 + age, lap number ignored.
    fn code_age(features: [u32; 3]) -> f64 {
        (features[0] * 1000 + features[1]) as f64
    }

    #[test]
    fn stay_out_keeps_aging_without_pit_loss() {
        let encoder = LabelEncoder::default();
        let predictor = PacePredictor::new(&code_age, &encoder);
        let context = CircuitContext::new(57, 22.5);
        let start = TireState::new(Compound::Hard, 15);

        let paces = project_opponent_stint(
            &predictor,
            &start,
            40,
            8,
            &context,
            ReactivePolicy::StayOut,
            Compound::Medium,
        )
        .unwrap();

        let expected: Vec<f64> = (15..=23).map(|age| age as f64).collect();
        assert_eq!(paces, expected);
    }

    #[test]
    fn cover_pits_on_step_one() {
        let encoder = LabelEncoder::default();
        let predictor = PacePredictor::new(&code_age, &encoder);
        let context = CircuitContext::new(57, 22.5);
        let start = TireState::new(Compound::Hard, 15);

        let paces = project_opponent_stint(
            &predictor,
            &start,
            40,
            4,
            &context,
            ReactivePolicy::Cover,
            Compound::Medium,
        )
        .unwrap();

        assert_eq!(paces.len(), 5);
        assert_relative_eq!(paces[0], 15.0);
        // old HARD set at age 16 plus pit loss
        assert_relative_eq!(paces[1], 16.0 + 22.5);
        // fresh MEDIUM (code 1) from age 1 on
        assert_relative_eq!(paces[2], 1001.0);
        assert_relative_eq!(paces[3], 1002.0);
        assert_relative_eq!(paces[4], 1003.0);
    }

    #[test]
    fn cover_with_one_lap_left_never_reaches_new_tires() {
        let encoder = LabelEncoder::default();
        let predictor = PacePredictor::new(&code_age, &encoder);
        let context = CircuitContext::new(57, 22.5);
        let start = TireState::new(Compound::Hard, 15);

        let paces = project_opponent_stint(
            &predictor,
            &start,
            56,
            8,
            &context,
            ReactivePolicy::Cover,
            Compound::Soft,
        )
        .unwrap();
        assert_eq!(paces, vec![15.0, 16.0 + 22.5]);
    }

    #[test]
    fn parses_policies() {
        assert_eq!("Cover".parse::<ReactivePolicy>().unwrap(), ReactivePolicy::Cover);
        assert_eq!("stay-out".parse::<ReactivePolicy>().unwrap(), ReactivePolicy::StayOut);
        assert_eq!("STAY_OUT".parse::<ReactivePolicy>().unwrap(), ReactivePolicy::StayOut);
        assert!("undercut".parse::<ReactivePolicy>().is_err());
    }
}
