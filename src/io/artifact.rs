//! Read/write model artifacts.
//!
//! An artifact is a gzip stream holding two bincode values back to back:
//! the `ArtifactHeader` (small, checked first) and the `TrainedPipeline`.
//! Loading rejects headers from a different format version before touching
//! the pipeline payload.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::Field;
use crate::error::AppError;
use crate::fit::TrainedPipeline;

/// Current artifact layout version.
pub const FORMAT_VERSION: u32 = 1;

const TOOL: &str = "house-price";

/// Metadata stored in front of the pipeline payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub format_version: u32,
    pub tool: String,
    pub trained_at: DateTime<Utc>,
    pub train_rows: usize,
    pub feature_columns: Vec<Field>,
    pub label_column: Field,
}

impl ArtifactHeader {
    pub fn new(train_rows: usize) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            tool: TOOL.to_string(),
            trained_at: Utc::now(),
            train_rows,
            feature_columns: Field::FEATURES.to_vec(),
            label_column: Field::SalePrice,
        }
    }
}

/// A persisted model: header + fitted pipeline.
#[derive(Debug)]
pub struct ModelArtifact {
    pub header: ArtifactHeader,
    pub pipeline: TrainedPipeline,
}

impl ModelArtifact {
    pub fn new(pipeline: TrainedPipeline, train_rows: usize) -> Self {
        Self {
            header: ArtifactHeader::new(train_rows),
            pipeline,
        }
    }
}

/// Write an artifact, creating parent directories as needed.
pub fn save_model(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    info!(
        path = %path.display(),
        classes = artifact.pipeline.n_classes(),
        "Saving model"
    );

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::input(format!("Failed to create model directory '{}': {e}", parent.display()))
        })?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create model file '{}': {e}", path.display())))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());

    bincode::serialize_into(&mut encoder, &artifact.header)
        .map_err(|e| AppError::model(format!("Failed to serialize model header: {e}")))?;
    bincode::serialize_into(&mut encoder, &artifact.pipeline)
        .map_err(|e| AppError::model(format!("Failed to serialize model: {e}")))?;

    let mut writer = encoder
        .finish()
        .map_err(|e| AppError::input(format!("Failed to write model file '{}': {e}", path.display())))?;
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to write model file '{}': {e}", path.display())))?;

    debug!(path = %path.display(), "Model written");
    Ok(())
}

/// Read an artifact written by `save_model`.
pub fn load_model(path: &Path) -> Result<ModelArtifact, AppError> {
    info!(path = %path.display(), "Loading model");

    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open model file '{}': {e}", path.display())))?;
    let mut decoder = GzDecoder::new(BufReader::new(file));

    let header: ArtifactHeader = bincode::deserialize_from(&mut decoder)
        .map_err(|e| AppError::model(format!("Invalid model header in '{}': {e}", path.display())))?;
    if header.format_version != FORMAT_VERSION {
        return Err(AppError::model(format!(
            "Unsupported model format version {} (expected {FORMAT_VERSION}).",
            header.format_version
        )));
    }

    let pipeline: TrainedPipeline = bincode::deserialize_from(&mut decoder)
        .map_err(|e| AppError::model(format!("Invalid model payload in '{}': {e}", path.display())))?;

    debug!(
        trained_at = %header.trained_at,
        classes = pipeline.n_classes(),
        "Model loaded"
    );
    Ok(ModelArtifact { header, pipeline })
}
