//! Pace prediction on top of the externally fitted artifacts.
//!
//! The engine never looks inside the regression artifact or the compound encoder. Both are
//! handed in per circuit through an [`ArtifactStore`] and only ever read.

use crate::core::errors::SimError;
use crate::core::tire::Compound;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// LapTimeRegressor maps the feature vector `[encoded compound, tire age, lap number]` onto a
/// predicted lap time in seconds.
pub trait LapTimeRegressor {
    fn predict(&self, features: [u32; 3]) -> f64;
}

impl<F> LapTimeRegressor for F
where
    F: Fn([u32; 3]) -> f64,
{
    fn predict(&self, features: [u32; 3]) -> f64 {
        self(features)
    }
}

/// CompoundEncoder translates a compound label into the numeric code the regressor was fitted on.
pub trait CompoundEncoder {
    fn encode(&self, label: &str) -> Result<u32, SimError>;
}

/// LabelEncoder assigns every known label its index within the sorted class list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(labels: I) -> LabelEncoder
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_uppercase())
            .collect();
        classes.sort();
        classes.dedup();
        LabelEncoder { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl Default for LabelEncoder {
    /// Fitted on the three dry compounds: HARD=0, MEDIUM=1, SOFT=2.
    fn default() -> Self {
        LabelEncoder::fit(Compound::ALL.iter().map(|c| c.label()))
    }
}

impl CompoundEncoder for LabelEncoder {
    fn encode(&self, label: &str) -> Result<u32, SimError> {
        self.classes
            .iter()
            .position(|class| class == label)
            .map(|idx| idx as u32)
            .ok_or_else(|| SimError::UnknownCompound {
                label: label.to_owned(),
            })
    }
}

/// clamp_tire_age limits the tire age to the oldest age the models are trusted for.
pub fn clamp_tire_age(compound: Compound, tire_age: u32) -> u32 {
    tire_age.min(compound.max_modelled_age())
}

/// PacePredictor bundles the regression artifact and the compound encoder of one circuit.
#[derive(Clone, Copy)]
pub struct PacePredictor<'a> {
    regressor: &'a dyn LapTimeRegressor,
    encoder: &'a dyn CompoundEncoder,
}

impl<'a> PacePredictor<'a> {
    pub fn new(
        regressor: &'a dyn LapTimeRegressor,
        encoder: &'a dyn CompoundEncoder,
    ) -> PacePredictor<'a> {
        PacePredictor { regressor, encoder }
    }

    /// predict_pace returns the predicted lap time (s) for the given tire state on the given lap.
    pub fn predict_pace(
        &self,
        compound: Compound,
        tire_age: u32,
        lap_number: u32,
    ) -> Result<f64, SimError> {
        debug_assert!(lap_number >= 1, "lap numbers start at 1");

        let encoded = self.encoder.encode(compound.label())?;
        let age = clamp_tire_age(compound, tire_age);
        if age < tire_age {
            debug!(%compound, tire_age, clamped_to = age, "tire age beyond modelled range");
        }

        Ok(self.regressor.predict([encoded, age, lap_number]))
    }

    /// predict_pace_label is the string based variant of predict_pace.
    pub fn predict_pace_label(
        &self,
        label: &str,
        tire_age: u32,
        lap_number: u32,
    ) -> Result<f64, SimError> {
        let compound: Compound = label.parse()?;
        self.predict_pace(compound, tire_age, lap_number)
    }
}

type BoxedRegressor = Box<dyn LapTimeRegressor + Send + Sync>;
type BoxedEncoder = Box<dyn CompoundEncoder + Send + Sync>;

/// ArtifactStore holds one regression artifact per circuit and the compound encoder shared by
/// all circuits. Circuit names are matched case-insensitively.
#[derive(Default)]
pub struct ArtifactStore {
    models: HashMap<String, BoxedRegressor>,
    encoder: Option<BoxedEncoder>,
}

impl ArtifactStore {
    pub fn new() -> ArtifactStore {
        ArtifactStore::default()
    }

    pub fn with_encoder<E>(mut self, encoder: E) -> ArtifactStore
    where
        E: CompoundEncoder + Send + Sync + 'static,
    {
        self.set_encoder(encoder);
        self
    }

    pub fn set_encoder<E>(&mut self, encoder: E)
    where
        E: CompoundEncoder + Send + Sync + 'static,
    {
        self.encoder = Some(Box::new(encoder));
    }

    /// insert_model registers the regression artifact of a circuit, replacing an older one.
    pub fn insert_model<M>(&mut self, circuit: &str, model: M)
    where
        M: LapTimeRegressor + Send + Sync + 'static,
    {
        self.models.insert(circuit_key(circuit), Box::new(model));
    }

    pub fn has_model(&self, circuit: &str) -> bool {
        self.models.contains_key(&circuit_key(circuit))
    }

    /// predictor returns the pace predictor of a circuit. Both artifacts must be present.
    pub fn predictor(&self, circuit: &str) -> Result<PacePredictor<'_>, SimError> {
        let unavailable = || SimError::ModelUnavailable {
            circuit: circuit.to_owned(),
        };
        let regressor = self.models.get(&circuit_key(circuit)).ok_or_else(unavailable)?;
        let encoder = self.encoder.as_ref().ok_or_else(unavailable)?;

        Ok(PacePredictor::new(&**regressor, &**encoder))
    }
}

impl fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut circuits: Vec<&String> = self.models.keys().collect();
        circuits.sort();
        f.debug_struct("ArtifactStore")
            .field("circuits", &circuits)
            .field("encoder", &self.encoder.is_some())
            .finish()
    }
}

fn circuit_key(circuit: &str) -> String {
    circuit.trim().to_lowercase()
}
