//! Metrics, candidate snapshots, and the persisted validation artifact.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use super::{MIN_WIN_RATE, ReelTriple, TARGET_RTP};

/// Aggregate outcome of a batch of spins (exact or sampled).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Spins (or enumerated stop combinations) scored.
    pub spins: u64,
    /// Total amount wagered.
    pub total_bet: f64,
    /// Total amount paid out.
    pub total_return: f64,
    /// Fraction of spins with strictly positive payout.
    pub win_rate: f64,
    /// Return to player: total_return / total_bet.
    pub rtp: f64,
}

impl Metrics {
    /// Build from raw accumulators.
    pub fn from_totals(spins: u64, wins: u64, total_return: f64, bet_amount: f64) -> Self {
        let total_bet = spins as f64 * bet_amount;
        let win_rate = if spins > 0 {
            wins as f64 / spins as f64
        } else {
            0.0
        };
        let rtp = if total_bet > 0.0 {
            total_return / total_bet
        } else {
            0.0
        };
        Self {
            spins,
            total_bet,
            total_return,
            win_rate,
            rtp,
        }
    }

    /// Whether these metrics meet the targets with the given RTP tolerance.
    pub fn meets(&self, target_rtp: f64, min_win_rate: f64, tolerance: f64) -> bool {
        (self.rtp - target_rtp).abs() <= tolerance && self.win_rate >= min_win_rate
    }

    /// Copy rounded for display.
    pub fn rounded(&self, rate_digits: i32, return_digits: i32) -> Self {
        Self {
            spins: self.spins,
            total_bet: self.total_bet,
            total_return: round_to(self.total_return, return_digits),
            win_rate: round_to(self.win_rate, rate_digits),
            rtp: round_to(self.rtp, rate_digits),
        }
    }
}

/// Round to a number of decimal digits.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// A reel triple together with its most recently evaluated metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub reels: ReelTriple,
    pub metrics: Metrics,
}

/// Target echo stored alongside validated reels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    pub rtp: f64,
    pub min_win_rate: f64,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            rtp: TARGET_RTP,
            min_win_rate: MIN_WIN_RATE,
        }
    }
}

/// Persisted search result for reuse and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationArtifact {
    pub reels: ReelTriple,
    pub validation: Metrics,
    pub requirements: Requirements,
}

impl ValidationArtifact {
    /// Build from exactly validated reels; metrics are rounded for display.
    pub fn new(reels: ReelTriple, exact: &Metrics) -> Self {
        Self {
            reels,
            validation: exact.rounded(4, 2),
            requirements: Requirements::default(),
        }
    }

    /// Write as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ArtifactError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a previously saved artifact.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A reels file: either a full artifact or a bare reel payload.
///
/// The shape is picked by the presence of a top-level `reels` key, so a
/// malformed reel reports its own error.
#[derive(Debug, Clone)]
pub enum ReelsFile {
    Artifact(ValidationArtifact),
    Bare(ReelTriple),
}

impl<'de> Deserialize<'de> for ReelsFile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("reels").is_some() {
            ValidationArtifact::deserialize(value)
                .map(ReelsFile::Artifact)
                .map_err(D::Error::custom)
        } else {
            ReelTriple::deserialize(value)
                .map(ReelsFile::Bare)
                .map_err(D::Error::custom)
        }
    }
}

impl ReelsFile {
    /// Load reels from a JSON file in either shape.
    pub fn load_reels<P: AsRef<Path>>(path: P) -> Result<ReelTriple, ArtifactError> {
        let content = fs::read_to_string(path)?;
        let file: ReelsFile = serde_json::from_str(&content)?;
        Ok(file.into_reels())
    }

    pub fn into_reels(self) -> ReelTriple {
        match self {
            ReelsFile::Artifact(artifact) => artifact.reels,
            ReelsFile::Bare(reels) => reels,
        }
    }
}

/// Artifact I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Artifact JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_reels() -> ReelTriple {
        ReelTriple::from_symbols(vec![vec![0, 0, 1], vec![2, 2], vec![3, 4, 4, 0]]).unwrap()
    }

    #[test]
    fn test_from_totals() {
        let m = Metrics::from_totals(12, 9, 3.0, 1.0);
        assert_eq!(m.total_bet, 12.0);
        assert_eq!(m.win_rate, 0.75);
        assert_eq!(m.rtp, 0.25);

        let empty = Metrics::from_totals(0, 0, 0.0, 1.0);
        assert_eq!(empty.win_rate, 0.0);
        assert_eq!(empty.rtp, 0.0);
    }

    #[test]
    fn test_meets() {
        let m = Metrics::from_totals(100, 60, 95.0, 1.0);
        assert!(m.meets(0.95, 0.55, 1e-6));
        assert!(!m.meets(0.95, 0.65, 1e-6));
        assert!(!m.meets(0.90, 0.55, 1e-6));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(0.951234, 4), 0.9512);
        assert_eq!(round_to(123.456, 2), 123.46);
        let m = Metrics::from_totals(3, 2, 2.0, 1.0).rounded(4, 2);
        assert_eq!(m.win_rate, 0.6667);
        assert_eq!(m.rtp, 0.6667);
    }

    #[test]
    fn test_artifact_shape() {
        let exact = Metrics::from_totals(24, 14, 22.8, 1.0);
        let artifact = ValidationArtifact::new(sample_reels(), &exact);
        let json = serde_json::to_value(&artifact).unwrap();

        assert_eq!(json["reels"]["reel_1"], serde_json::json!([0, 0, 1]));
        assert_eq!(json["validation"]["spins"], 24);
        assert_eq!(json["validation"]["rtp"], 0.95);
        assert_eq!(json["requirements"]["rtp"], 0.95);
        assert_eq!(json["requirements"]["min_win_rate"], 0.55);
    }

    #[test]
    fn test_artifact_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reels_config.json");

        let exact = Metrics::from_totals(24, 14, 22.8, 1.0);
        let artifact = ValidationArtifact::new(sample_reels(), &exact);
        artifact.save(&path).unwrap();

        let loaded = ValidationArtifact::load(&path).unwrap();
        assert_eq!(loaded, artifact);

        // Both file shapes yield the reels
        assert_eq!(ReelsFile::load_reels(&path).unwrap(), sample_reels());
        let bare = dir.path().join("bare.json");
        fs::write(&bare, serde_json::to_string(&sample_reels()).unwrap()).unwrap();
        assert_eq!(ReelsFile::load_reels(&bare).unwrap(), sample_reels());
    }

    #[test]
    fn test_empty_reel_in_file_names_the_reel() {
        let dir = tempdir().unwrap();

        let bare = dir.path().join("bare.json");
        fs::write(&bare, r#"{"reel_1": [0, 1], "reel_2": [], "reel_3": [2]}"#).unwrap();
        let err = ReelsFile::load_reels(&bare).unwrap_err();
        assert!(matches!(err, ArtifactError::Json(_)));
        assert!(
            err.to_string().contains("Reel 2 must contain at least one symbol"),
            "{err}"
        );

        let artifact = dir.path().join("artifact.json");
        let mut json = serde_json::to_value(ValidationArtifact::new(
            sample_reels(),
            &Metrics::from_totals(24, 14, 22.8, 1.0),
        ))
        .unwrap();
        json["reels"]["reel_3"] = serde_json::json!([]);
        fs::write(&artifact, json.to_string()).unwrap();
        let err = ReelsFile::load_reels(&artifact).unwrap_err();
        assert!(
            err.to_string().contains("Reel 3 must contain at least one symbol"),
            "{err}"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = ValidationArtifact::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io(_)));
    }
}
