// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores everything inference needs, one file each:
//
//   artifacts/
//     issuer_encoder.bin     ← LabelEncoder over issuer names
//     industry_encoder.bin   ← LabelEncoder over industries
//     rating_encoder.bin     ← LabelEncoder over final ratings
//     rating_model.bin       ← fitted RandomForest
//     train_config.json      ← hyperparameters of the run (not
//                              needed by inference)
//
// Each .bin file is a bincode-encoded envelope:
//
//   { kind: "issuer_encoder", format_version: 1, payload: ... }
//
// The header is decoded and checked before the payload, so a file
// copied into the wrong slot or written by an incompatible build
// is reported as Incompatible instead of failing mid-decode.
//
// Loading is all-or-nothing: `load` returns a complete Artifacts
// value or the first error.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::ArtifactLoadError;
use crate::ml::{encoder::LabelEncoder, forest::RandomForest};

pub const ISSUER_ENCODER_FILE:   &str = "issuer_encoder.bin";
pub const INDUSTRY_ENCODER_FILE: &str = "industry_encoder.bin";
pub const RATING_ENCODER_FILE:   &str = "rating_encoder.bin";
pub const MODEL_FILE:            &str = "rating_model.bin";
pub const CONFIG_FILE:           &str = "train_config.json";

/// Bumped whenever the payload layout changes
pub const FORMAT_VERSION: u32 = 1;

/// The immutable set of fitted artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub issuer:   LabelEncoder,
    pub industry: LabelEncoder,
    pub rating:   LabelEncoder,
    pub model:    RandomForest,
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    kind:           &'a str,
    format_version: u32,
    payload:        &'a T,
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    kind:           String,
    format_version: u32,
}

#[derive(Deserialize)]
struct EnvelopeIn<T> {
    #[allow(dead_code)]
    kind:           String,
    #[allow(dead_code)]
    format_version: u32,
    payload:        T,
}

/// Reads and writes artifacts in one directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write all four artifacts, creating the directory if needed.
    pub fn save(&self, artifacts: &Artifacts) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", self.dir.display()))?;

        self.write(ISSUER_ENCODER_FILE,   "issuer_encoder",   &artifacts.issuer)?;
        self.write(INDUSTRY_ENCODER_FILE, "industry_encoder", &artifacts.industry)?;
        self.write(RATING_ENCODER_FILE,   "rating_encoder",   &artifacts.rating)?;
        self.write(MODEL_FILE,            "rating_model",     &artifacts.model)?;

        tracing::info!("Saved artifacts to '{}'", self.dir.display());
        Ok(())
    }

    /// Load all four artifacts or fail.
    pub fn load(&self) -> Result<Artifacts, ArtifactLoadError> {
        let artifacts = Artifacts {
            issuer:   self.read(ISSUER_ENCODER_FILE,   "issuer_encoder")?,
            industry: self.read(INDUSTRY_ENCODER_FILE, "industry_encoder")?,
            rating:   self.read(RATING_ENCODER_FILE,   "rating_encoder")?,
            model:    self.read(MODEL_FILE,            "rating_model")?,
        };
        if artifacts.rating.is_empty() {
            return Err(ArtifactLoadError::Incompatible {
                path:   self.dir.join(RATING_ENCODER_FILE),
                reason: "rating encoder has no classes to decode into".to_string(),
            });
        }

        tracing::info!(
            "Loaded artifacts from '{}': {} issuers, {} industries, {} ratings, {} trees",
            self.dir.display(),
            artifacts.issuer.len(),
            artifacts.industry.len(),
            artifacts.rating.len(),
            artifacts.model.tree_count(),
        );
        Ok(artifacts)
    }

    /// Save the training configuration as pretty JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration, if a run has written one.
    pub fn load_config(&self) -> Result<Option<TrainConfig>> {
        let path = self.dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        let cfg = serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse config '{}'", path.display()))?;
        Ok(Some(cfg))
    }

    fn write<T: Serialize>(&self, file: &str, kind: &str, payload: &T) -> Result<()> {
        let path  = self.dir.join(file);
        let bytes = bincode::serialize(&EnvelopeOut { kind, format_version: FORMAT_VERSION, payload })
            .with_context(|| format!("Cannot encode {kind}"))?;

        // Write beside the target and rename, so a crash never
        // leaves a truncated artifact in place
        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, &bytes)
            .with_context(|| format!("Cannot write '{}'", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Cannot move '{}' into place", path.display()))?;

        tracing::debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, file: &str, kind: &str) -> Result<T, ArtifactLoadError> {
        let path  = self.dir.join(file);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ArtifactLoadError::Missing { path });
            }
            Err(source) => return Err(ArtifactLoadError::Unreadable { path, source }),
        };

        let header: EnvelopeHeader = bincode::deserialize(&bytes).map_err(|e| {
            ArtifactLoadError::Incompatible { path: path.clone(), reason: format!("not an artifact file: {e}") }
        })?;
        if header.kind != kind {
            return Err(ArtifactLoadError::Incompatible {
                path,
                reason: format!("contains a {} where a {} was expected", header.kind, kind),
            });
        }
        if header.format_version != FORMAT_VERSION {
            return Err(ArtifactLoadError::Incompatible {
                path,
                reason: format!(
                    "format version {} is not supported (expected {})",
                    header.format_version, FORMAT_VERSION
                ),
            });
        }

        let envelope: EnvelopeIn<T> = bincode::deserialize(&bytes).map_err(|e| {
            ArtifactLoadError::Incompatible { path: path.clone(), reason: format!("corrupt {kind} payload: {e}") }
        })?;
        Ok(envelope.payload)
    }
}
