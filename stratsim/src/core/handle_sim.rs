use crate::core::circuit::CircuitContext;
use crate::core::errors::SimError;
use crate::core::gap::integrate;
use crate::core::opponent::{project_opponent_stint, ReactivePolicy};
use crate::core::pace::ArtifactStore;
use crate::core::stint::project_stint;
use crate::core::tire::{Compound, TireState};
use crate::post::sim_result::SimulationResult;
use serde::{Deserialize, Serialize};
use tracing::info;

/// * `current_lap` - Lap on which the pit decision is taken
/// * `gap_to_reference` - (s) Time we are behind the opponent (positive = behind)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RaceState {
    pub current_lap: u32,
    pub gap_to_reference: f64,
}

/// * `tire` - Tireset currently mounted
/// * `pit_to` - Compound fitted during the stop on the decision lap
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PrimaryPlan {
    pub tire: TireState,
    pub pit_to: Compound,
}

/// * `tire` - Tireset currently mounted
/// * `policy` - Reaction to our pit stop
/// * `pit_to` - Compound fitted when covering, defaults to our compound
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OpponentPlan {
    pub tire: TireState,
    pub policy: ReactivePolicy,
    #[serde(default)]
    pub pit_to: Option<Compound>,
}

/// simulate evaluates whether pitting on the current lap gets our car ahead of the opponent
/// within the horizon. The pace model of the circuit must be available before anything is
/// projected.
pub fn simulate(
    store: &ArtifactStore,
    circuit: &str,
    context: &CircuitContext,
    my_plan: &PrimaryPlan,
    opp_plan: &OpponentPlan,
    race_state: &RaceState,
    horizon_laps: u32,
) -> Result<SimulationResult, SimError> {
    let predictor = store.predictor(circuit)?;

    let current_lap = race_state.current_lap;
    context.check_window(current_lap, horizon_laps)?;

    let my_paces = project_stint(
        &predictor,
        &my_plan.tire,
        current_lap,
        horizon_laps,
        context,
        my_plan.pit_to,
    )?;
    let opp_paces = project_opponent_stint(
        &predictor,
        &opp_plan.tire,
        current_lap,
        horizon_laps,
        context,
        opp_plan.policy,
        opp_plan.pit_to.unwrap_or(my_plan.pit_to),
    )?;

    let result = integrate(
        &my_paces,
        &opp_paces,
        race_state.gap_to_reference,
        current_lap,
    );

    info!(
        circuit,
        current_lap,
        laps = result.len(),
        outcome = %result.outcome,
        final_gap = result.final_gap().unwrap_or(0.0),
        catch_lap = ?result.catch_lap,
        maneuver = %result.maneuver,
        "simulation finished"
    );

    Ok(result)
}
