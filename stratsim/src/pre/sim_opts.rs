use crate::core::handle_sim::{OpponentPlan, PrimaryPlan, RaceState};
use crate::core::opponent::ReactivePolicy;
use crate::core::tire::{Compound, TireState};
use crate::pre::read_sim_pars::SimPars;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "stratsim",
    about = "Predicts whether pitting now gets a car ahead of its rival within a few laps"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging (per-lap pace predictions)
    #[clap(short, long)]
    pub debug: bool,

    /// Export PNG charts of the gap history and the race trace into output/
    #[clap(long)]
    pub plot: bool,

    // FILES ---------------------------------------------------------------------------------------
    /// Set path to a scenario file (JSON), replaces all scenario options below
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Add a pace model file (JSON) fitted for one circuit, can be given multiple times
    #[clap(short, long = "model-path")]
    pub model_paths: Vec<PathBuf>,

    /// Set path to the compound encoder file (JSON), defaults to HARD=0, MEDIUM=1, SOFT=2
    #[clap(short, long)]
    pub encoder_path: Option<PathBuf>,

    /// Write the gap history to this CSV file
    #[clap(long)]
    pub csv_path: Option<PathBuf>,

    // SCENARIO ------------------------------------------------------------------------------------
    /// Circuit name (Bahrain, Saudi Arabia, Italy, Japan)
    #[clap(short, long, default_value = "Bahrain")]
    pub circuit: String,

    /// Compound currently mounted on our car
    #[clap(long, default_value = "SOFT")]
    pub my_tire: Compound,

    /// (laps) Age of our tires
    #[clap(long, default_value = "25")]
    pub my_age: u32,

    /// Compound we pit to
    #[clap(long, default_value = "MEDIUM")]
    pub pit_to: Compound,

    /// Compound currently mounted on the opponent's car
    #[clap(long, default_value = "HARD")]
    pub opp_tire: Compound,

    /// (laps) Age of the opponent's tires
    #[clap(long, default_value = "15")]
    pub opp_age: u32,

    /// Opponent reaction: cover (pit next lap) or stay-out
    #[clap(long, default_value = "cover")]
    pub opp_policy: ReactivePolicy,

    /// Compound the opponent pits to when covering, defaults to ours
    #[clap(long)]
    pub opp_pit_to: Option<Compound>,

    /// (s) Gap to the opponent, positive if we are behind
    #[clap(long, default_value = "18.0", allow_hyphen_values = true)]
    pub gap: f64,

    /// Lap on which we decide to box
    #[clap(long, default_value = "40")]
    pub current_lap: u32,

    /// (laps) Simulation horizon after the decision lap
    #[clap(long, default_value = "8")]
    pub horizon: u32,

    /// (s) Pit loss, defaults to the circuit value
    #[clap(long)]
    pub pit_loss: Option<f64>,
}

impl SimOpts {
    /// to_sim_pars builds the scenario from the command line options.
    pub fn to_sim_pars(&self) -> SimPars {
        SimPars {
            circuit: self.circuit.to_owned(),
            circuit_pars: None,
            my_car: PrimaryPlan {
                tire: TireState::new(self.my_tire, self.my_age),
                pit_to: self.pit_to,
            },
            opponent: OpponentPlan {
                tire: TireState::new(self.opp_tire, self.opp_age),
                policy: self.opp_policy,
                pit_to: self.opp_pit_to,
            },
            race_state: RaceState {
                current_lap: self.current_lap,
                gap_to_reference: self.gap,
            },
            horizon_laps: self.horizon,
            pit_loss: self.pit_loss,
        }
    }
}
