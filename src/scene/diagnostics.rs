//! Sink for non-fatal setup failures.
//!
//! Marker and model placement are best-effort: a failure leaves the map without
//! the glyph but does not stop the rest of the setup. Each failure is logged at
//! warn level and kept here so callers can inspect it afterwards.

use std::fmt;

use serde::Serialize;

/// The setup call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetupStep {
    TerrainSource,
    TerrainExaggeration,
    CameraPose,
    MarkerImage,
    MarkerSource,
    MarkerLayer,
    ModelAsset,
    ModelSource,
    ModelLayer,
}

impl SetupStep {
    pub fn as_str(self) -> &'static str {
        match self {
            SetupStep::TerrainSource => "terrain-source",
            SetupStep::TerrainExaggeration => "terrain-exaggeration",
            SetupStep::CameraPose => "camera-pose",
            SetupStep::MarkerImage => "marker-image",
            SetupStep::MarkerSource => "marker-source",
            SetupStep::MarkerLayer => "marker-layer",
            SetupStep::ModelAsset => "model-asset",
            SetupStep::ModelSource => "model-source",
            SetupStep::ModelLayer => "model-layer",
        }
    }
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub step: SetupStep,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: SetupStep, error: &dyn fmt::Display) {
        log::warn!("scene setup: {} failed: {}", step, error);
        self.entries.push(Diagnostic {
            step,
            message: error.to_string(),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Drop every entry. Called at the start of each setup run.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_step(&self, step: SetupStep) -> bool {
        self.entries.iter().any(|d| d.step == step)
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_takes_and_clears() {
        let mut d = Diagnostics::new();
        d.record(SetupStep::ModelAsset, &"A320.glb missing");
        d.record(SetupStep::MarkerLayer, &"duplicate");

        assert_eq!(d.len(), 2);
        assert!(d.has_step(SetupStep::ModelAsset));
        assert_eq!(d.entries()[1].step, SetupStep::MarkerLayer);

        let taken = d.take();
        assert_eq!(taken[0].message, "A320.glb missing");
        assert!(d.is_empty());

        d.record(SetupStep::CameraPose, &"pitch out of range");
        d.clear();
        assert!(d.is_empty());
        assert!(!d.has_step(SetupStep::CameraPose));
    }

    #[test]
    fn step_names_match_serialization() {
        let json = serde_json::to_value(SetupStep::TerrainExaggeration).unwrap();
        assert_eq!(json, SetupStep::TerrainExaggeration.as_str());
    }
}
