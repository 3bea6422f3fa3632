use thiserror::Error;

/// SimError covers every way a strategy simulation can be refused by the engine. All variants are
/// reported synchronously; nothing is retried since the computation is deterministic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("No pace model available for circuit {circuit}")]
    ModelUnavailable { circuit: String },

    #[error("Unknown tire compound {label:?} (expected SOFT, MEDIUM or HARD)")]
    UnknownCompound { label: String },

    #[error(
        "Invalid simulation horizon: {horizon_laps} laps from lap {current_lap} of {tot_no_laps}"
    )]
    InvalidHorizon {
        horizon_laps: u32,
        current_lap: u32,
        tot_no_laps: u32,
    },
}
