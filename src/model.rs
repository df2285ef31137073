//! Fixed scoring presets for the cluster-informed strategy.
//!
//! The presets are hand-tuned weight tuples. Nothing here is trained or
//! updated at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear weights applied to a territory's normalized features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    pub distance_weight: f64,
    pub success_weight: f64,
    pub time_weight: f64,
    pub skill_weight: f64,
}

/// Named weight presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelPreset {
    DistanceOptimizer,
    SuccessPredictor,
    #[default]
    TerritoryClusterer,
}

impl ModelPreset {
    pub const ALL: [ModelPreset; 3] = [
        ModelPreset::DistanceOptimizer,
        ModelPreset::SuccessPredictor,
        ModelPreset::TerritoryClusterer,
    ];

    pub const fn weights(&self) -> ModelWeights {
        match self {
            ModelPreset::DistanceOptimizer => ModelWeights {
                distance_weight: 0.5,
                success_weight: 0.2,
                time_weight: 0.2,
                skill_weight: 0.1,
            },
            ModelPreset::SuccessPredictor => ModelWeights {
                distance_weight: 0.15,
                success_weight: 0.55,
                time_weight: 0.1,
                skill_weight: 0.2,
            },
            ModelPreset::TerritoryClusterer => ModelWeights {
                distance_weight: 0.3,
                success_weight: 0.3,
                time_weight: 0.2,
                skill_weight: 0.2,
            },
        }
    }

    /// Reported accuracy of the preset. A published figure, not measured here.
    pub const fn reported_accuracy(&self) -> f64 {
        match self {
            ModelPreset::DistanceOptimizer => 0.82,
            ModelPreset::SuccessPredictor => 0.87,
            ModelPreset::TerritoryClusterer => 0.79,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ModelPreset::DistanceOptimizer => "distance-optimizer",
            ModelPreset::SuccessPredictor => "success-predictor",
            ModelPreset::TerritoryClusterer => "territory-clusterer",
        }
    }
}

impl fmt::Display for ModelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ModelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| format!("unknown model preset '{}'", s))
    }
}
