use crate::core::circuit::CircuitContext;
use crate::core::errors::SimError;
use crate::core::pace::PacePredictor;
use crate::core::tire::{Compound, TireState};
use tracing::debug;

/// Predicted lap times (s) of one car, index 0 being the lap on which the pit decision is taken.
pub type PaceSequence = Vec<f64>;

/// project_stint projects the pace of a car that boxes right now. The first entry is the in-lap
/// on the current tireset including the pit loss, the following entries are the laps on a fresh
/// set of compound_after_pit. The sequence ends at the horizon or at the end of the race.
pub fn project_stint(
    predictor: &PacePredictor,
    start_tire: &TireState,
    start_lap: u32,
    horizon_laps: u32,
    context: &CircuitContext,
    compound_after_pit: Compound,
) -> Result<PaceSequence, SimError> {
    context.check_window(start_lap, horizon_laps)?;

    let laps = context.projected_laps(start_lap, horizon_laps);
    let mut paces = PaceSequence::with_capacity(laps.clone().count() + 1);

    // in-lap on the old set, pit stop at the end of it
    let t_inlap = predictor.predict_pace(start_tire.compound, start_tire.age, start_lap)?;
    debug!(lap = start_lap, compound = %start_tire.compound, age = start_tire.age, t_inlap, "in-lap");
    paces.push(t_inlap + context.pit_loss);

    let mut tireset = start_tire.clone();
    tireset.fit_new(compound_after_pit);

    for lap in laps {
        tireset.drive_lap();
        let t_lap = predictor.predict_pace(tireset.compound, tireset.age, lap)?;
        debug!(lap, compound = %tireset.compound, age = tireset.age, t_lap, "projected lap");
        paces.push(t_lap);
    }

    Ok(paces)
}
