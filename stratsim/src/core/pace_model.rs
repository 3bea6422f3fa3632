use crate::core::pace::LapTimeRegressor;
use anyhow::Context;
use serde::Deserialize;
use std::convert::TryFrom;

const MAX_CLIFF_PENALTY: f64 = 25.0; // (s) maximum lap time loss caused by the tire cliff
const NO_FEATURES: usize = 3;

/// PaceModel is the serialized form of a fitted regression artifact.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaceModel {
    Forest(ForestModel),
    Degradation(DegradationModel),
}

impl PaceModel {
    /// check_codes verifies that the model knows every encoded compound it will be asked for.
    pub fn check_codes(&self, codes: &[u32]) -> anyhow::Result<()> {
        match self {
            PaceModel::Forest(_) => Ok(()),
            PaceModel::Degradation(model) => {
                for &code in codes {
                    if model.compound_pars(code).is_none() {
                        anyhow::bail!("Degradation model has no parameters for compound code {}!", code);
                    }
                }
                Ok(())
            }
        }
    }
}

impl LapTimeRegressor for PaceModel {
    fn predict(&self, features: [u32; 3]) -> f64 {
        match self {
            PaceModel::Forest(model) => model.predict(features),
            PaceModel::Degradation(model) => model.predict(features),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// TREE ENSEMBLE ------------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------

/// A split node sends the sample left if `features[feature] <= threshold`. A node without
/// feature is a leaf and returns `value`.
#[derive(Debug, Deserialize, Clone)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: Option<usize>,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TreePars {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForestPars {
    pub trees: Vec<TreePars>,
}

/// ForestModel averages the outputs of an exported regression tree ensemble. Construction
/// validates the node layout, children always come after their parent.
#[derive(Debug, Deserialize, Clone)]
#[serde(try_from = "ForestPars")]
pub struct ForestModel {
    trees: Vec<Vec<TreeNode>>,
}

impl TryFrom<ForestPars> for ForestModel {
    type Error = anyhow::Error;

    fn try_from(pars: ForestPars) -> anyhow::Result<Self> {
        if pars.trees.is_empty() {
            anyhow::bail!("Forest model contains no trees!");
        }

        for (tree_idx, tree) in pars.trees.iter().enumerate() {
            check_tree(&tree.nodes).context(format!("Tree {} is malformed!", tree_idx))?;
        }

        Ok(ForestModel {
            trees: pars.trees.into_iter().map(|tree| tree.nodes).collect(),
        })
    }
}

fn check_tree(nodes: &[TreeNode]) -> anyhow::Result<()> {
    if nodes.is_empty() {
        anyhow::bail!("Tree contains no nodes");
    }

    for (idx, node) in nodes.iter().enumerate() {
        if let Some(feature) = node.feature {
            if feature >= NO_FEATURES {
                anyhow::bail!("Node {} splits on unknown feature {}", idx, feature);
            }
            for &child in [node.left, node.right].iter() {
                if child <= idx || child >= nodes.len() {
                    anyhow::bail!("Node {} points to invalid child {}", idx, child);
                }
            }
        }
    }
    Ok(())
}

impl ForestModel {
    pub fn predict(&self, features: [u32; 3]) -> f64 {
        let t_sum: f64 = self
            .trees
            .iter()
            .map(|nodes| predict_tree(nodes, &features))
            .sum();
        t_sum / self.trees.len() as f64
    }
}

fn predict_tree(nodes: &[TreeNode], features: &[u32; 3]) -> f64 {
    let mut idx = 0;
    loop {
        let node = &nodes[idx];
        match node.feature {
            None => return node.value,
            Some(feature) => {
                idx = if features[feature] as f64 <= node.threshold {
                    node.left
                } else {
                    node.right
                }
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
// DEGRADATION MODEL --------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------

/// * `code` - Encoded compound the parameters belong to
/// * `base_offset` - (s) Pace offset of a fresh set (negative for faster compounds)
/// * `k_1_lin` - (s/lap) Linear degradation parameter
/// * `cliff_age` - (laps) Tire age after which the quadratic cliff term kicks in
/// * `k_2_cliff` - (s/lap^2) Cliff degradation parameter
#[derive(Debug, Deserialize, Clone)]
pub struct CompoundDegrPars {
    pub code: u32,
    pub base_offset: f64,
    pub k_1_lin: f64,
    pub cliff_age: f64,
    pub k_2_cliff: f64,
}

/// * `t_base` - (s) Race pace on a fresh reference set at the start of the race
/// * `t_fuel_per_lap` - (s/lap) Lap time change per lap due to fuel burn (negative)
/// * `compounds` - Degradation parameters per encoded compound
#[derive(Debug, Deserialize, Clone)]
pub struct DegradationModel {
    pub t_base: f64,
    pub t_fuel_per_lap: f64,
    pub compounds: Vec<CompoundDegrPars>,
}

impl DegradationModel {
    pub fn compound_pars(&self, code: u32) -> Option<&CompoundDegrPars> {
        self.compounds.iter().find(|pars| pars.code == code)
    }

    /// predict returns t_base + t_fuel_per_lap * lap + base_offset + k_1_lin * age plus the capped
    /// cliff penalty k_2_cliff * (age - cliff_age)^2. Unknown codes get the neutral pace.
    pub fn predict(&self, features: [u32; 3]) -> f64 {
        let [code, age, lap] = features;
        let t_neutral = self.t_base + self.t_fuel_per_lap * lap as f64;

        let pars = match self.compound_pars(code) {
            Some(pars) => pars,
            None => return t_neutral,
        };

        let age = age as f64;
        let cliff_penalty = if age > pars.cliff_age {
            (pars.k_2_cliff * (age - pars.cliff_age).powi(2)).min(MAX_CLIFF_PENALTY)
        } else {
            0.0
        };

        t_neutral + pars.base_offset + pars.k_1_lin * age + cliff_penalty
    }
}
