use crate::post::sim_result::SimulationResult;
use helpers::general::{cumsum, first_idx_where};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Overtake,
    Defended,
}

/// ManeuverClass labels the run by the relative pace on the decision lap: UNDERCUT if our
/// decision lap is slower than the opponent's, OVERCUT otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ManeuverClass {
    Undercut,
    Overcut,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Overtake => write!(f, "Overtake"),
            Outcome::Defended => write!(f, "Defended"),
        }
    }
}

impl fmt::Display for ManeuverClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ManeuverClass::Undercut => write!(f, "Undercut"),
            ManeuverClass::Overcut => write!(f, "Overcut"),
        }
    }
}

/// integrate turns both pace sequences into cumulative race times and the gap between them.
///
/// * `my_paces` - Lap times of our car, index 0 on start_lap
/// * `opp_paces` - Lap times of the opponent, index 0 on start_lap
/// * `initial_gap` - (s) Time we are behind the opponent before start_lap
/// * `start_lap` - Lap number of index 0
///
/// Both sequences are cut to the shorter one. A positive gap means we are ahead.
pub fn integrate(
    my_paces: &[f64],
    opp_paces: &[f64],
    initial_gap: f64,
    start_lap: u32,
) -> SimulationResult {
    let no_laps = my_paces.len().min(opp_paces.len());
    let my_paces = &my_paces[..no_laps];
    let opp_paces = &opp_paces[..no_laps];

    let racetimes_me = cumsum(my_paces, initial_gap);
    let racetimes_opp = cumsum(opp_paces, 0.0);
    let gap_history: Vec<f64> = racetimes_opp
        .iter()
        .zip(racetimes_me.iter())
        .map(|(t_opp, t_me)| t_opp - t_me)
        .collect();
    let lap_idxs: Vec<u32> = (start_lap..).take(no_laps).collect();

    let outcome = match gap_history.last() {
        Some(&final_gap) if final_gap > 0.0 => Outcome::Overtake,
        _ => Outcome::Defended,
    };

    let catch_lap = match outcome {
        Outcome::Overtake => {
            first_idx_where(&gap_history, |&gap| gap > 0.0).map(|idx| lap_idxs[idx])
        }
        Outcome::Defended => None,
    };

    let maneuver = match (my_paces.first(), opp_paces.first()) {
        (Some(t_me), Some(t_opp)) if t_me > t_opp => ManeuverClass::Undercut,
        _ => ManeuverClass::Overcut,
    };

    SimulationResult {
        lap_idxs,
        racetimes_me,
        racetimes_opp,
        gap_history,
        outcome,
        catch_lap,
        maneuver,
    }
}
