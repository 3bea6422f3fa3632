use crate::core::circuit::{find_circuit, CircuitPars};
use crate::core::handle_sim::{simulate, OpponentPlan, PrimaryPlan, RaceState};
use crate::core::pace::{ArtifactStore, LabelEncoder};
use crate::core::pace_model::PaceModel;
use crate::post::sim_result::SimulationResult;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// SimPars is used to store all parameters of a single strategy simulation.
///
/// * `circuit` - Name of the circuit, used for the model lookup (also with own circuit_pars)
/// * `circuit_pars` - (Optional) circuit definition, replaces the built-in one
/// * `pit_loss` - (Optional) (s) pit loss, defaults to the circuit value
#[derive(Debug, Deserialize, Clone)]
pub struct SimPars {
    pub circuit: String,
    #[serde(default)]
    pub circuit_pars: Option<CircuitPars>,
    pub my_car: PrimaryPlan,
    pub opponent: OpponentPlan,
    pub race_state: RaceState,
    pub horizon_laps: u32,
    #[serde(default)]
    pub pit_loss: Option<f64>,
}

impl SimPars {
    /// resolve_circuit returns the circuit parameters of the scenario and checks them.
    pub fn resolve_circuit(&self) -> anyhow::Result<CircuitPars> {
        let circuit_pars = match &self.circuit_pars {
            Some(circuit_pars) => circuit_pars.to_owned(),
            None => find_circuit(&self.circuit)
                .ok_or_else(|| anyhow::anyhow!("Unknown circuit {}!", self.circuit))?,
        };

        if circuit_pars.tot_no_laps == 0 {
            anyhow::bail!("Circuit {} must have at least one lap!", circuit_pars.name);
        }
        let pit_loss = self.pit_loss.unwrap_or(circuit_pars.pit_loss);
        if pit_loss.is_nan() || pit_loss <= 0.0 {
            anyhow::bail!("Pit loss must be positive, got {}s!", pit_loss);
        }

        Ok(circuit_pars)
    }

    /// run simulates the scenario with the pace model stored for `circuit`.
    pub fn run(&self, store: &ArtifactStore) -> anyhow::Result<SimulationResult> {
        let context = self.resolve_circuit()?.context(self.pit_loss);
        let result = simulate(
            store,
            &self.circuit,
            &context,
            &self.my_car,
            &self.opponent,
            &self.race_state,
            self.horizon_laps,
        )?;
        Ok(result)
    }
}

/// ModelFile is a serialized regression artifact together with the circuit it was fitted for.
#[derive(Debug, Deserialize, Clone)]
pub struct ModelFile {
    pub circuit: String,
    pub model: PaceModel,
}

fn read_json<T: DeserializeOwned>(filepath: &Path, what: &str) -> anyhow::Result<T> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!("Failed to open {} {}!", what, filepath.display()))?;
    let pars = serde_json::from_reader(&fh)
        .context(format!("Failed to parse {} {}!", what, filepath.display()))?;
    Ok(pars)
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    read_json(filepath, "parameter file")
}

/// read_model_file reads a regression artifact exported for one circuit.
pub fn read_model_file(filepath: &Path) -> anyhow::Result<ModelFile> {
    read_json(filepath, "model file")
}

/// read_encoder reads the compound encoder, e.g. {"classes": ["HARD", "MEDIUM", "SOFT"]}.
pub fn read_encoder(filepath: &Path) -> anyhow::Result<LabelEncoder> {
    read_json(filepath, "encoder file")
}
