//! Pipeline Artifact Persistence
//!
//! Layout: 4-byte magic, little-endian `u16` format version, postcard body.

use crate::pipeline::FittedPipeline;
use crate::InferenceError;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Leading bytes of every pipeline artifact
pub const ARTIFACT_MAGIC: [u8; 4] = *b"MFPL";

/// Current artifact format version
pub const FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = ARTIFACT_MAGIC.len() + 2;

/// Serialize a pipeline into artifact bytes
pub fn encode_pipeline(pipeline: &FittedPipeline) -> Result<Vec<u8>, InferenceError> {
    let body = postcard::to_allocvec(pipeline)?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
    bytes.extend_from_slice(&ARTIFACT_MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Deserialize artifact bytes, checking magic and version
pub fn decode_pipeline(bytes: &[u8]) -> Result<FittedPipeline, InferenceError> {
    if bytes.len() < HEADER_LEN || bytes[..ARTIFACT_MAGIC.len()] != ARTIFACT_MAGIC {
        return Err(InferenceError::ModelLoadError(
            "not a pipeline artifact (bad magic)".to_string(),
        ));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != FORMAT_VERSION {
        return Err(InferenceError::UnsupportedVersion {
            found: version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(postcard::from_bytes(&bytes[HEADER_LEN..])?)
}

/// Write a pipeline artifact, creating parent directories as needed
pub fn save_pipeline(pipeline: &FittedPipeline, path: &Path) -> Result<(), InferenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = encode_pipeline(pipeline)?;
    fs::write(path, &bytes)?;
    info!("Saved pipeline artifact to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Read a pipeline artifact
pub fn load_pipeline(path: &Path) -> Result<FittedPipeline, InferenceError> {
    let bytes = fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    decode_pipeline(&bytes)
}
