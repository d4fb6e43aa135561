//! Decoding of the version list handed over by the upstream deploy stage.
//!
//! The input artifact is normally a zip archive holding one JSON document, an
//! array of `{"FunctionName", "Version"}` objects. A bare JSON array is
//! accepted too so stages that upload the document directly keep working.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::contract::{FunctionVersionRecord, PipelineJob, S3Location};

const ZIP_MAGIC: &[u8] = b"PK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    MissingLocation,
    Fetch(String),
    Archive(String),
    MissingEntry(Option<String>),
    Malformed(String),
}

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLocation => f.write_str("Input artifact has no S3 location"),
            Self::Fetch(message) => write!(f, "Failed to fetch input artifact: {message}"),
            Self::Archive(message) => write!(f, "Input artifact is not a readable zip: {message}"),
            Self::MissingEntry(Some(name)) => {
                write!(f, "Input artifact does not contain entry '{name}'")
            }
            Self::MissingEntry(None) => f.write_str("Input artifact does not contain a JSON entry"),
            Self::Malformed(message) => write!(f, "Malformed function version list: {message}"),
        }
    }
}

impl std::error::Error for ArtifactError {}

pub fn input_artifact_location(job: &PipelineJob) -> Result<&S3Location, ArtifactError> {
    job.input_artifacts()
        .first()
        .and_then(|artifact| artifact.location.as_ref())
        .and_then(|location| location.s3_location.as_ref())
        .ok_or(ArtifactError::MissingLocation)
}

/// Decodes the version list from raw artifact bytes. `entry_name` selects the
/// archive entry; without it the first `.json` file wins.
pub fn decode_version_records(
    bytes: &[u8],
    entry_name: Option<&str>,
) -> Result<Vec<FunctionVersionRecord>, ArtifactError> {
    if !bytes.starts_with(ZIP_MAGIC) {
        return parse_records(bytes);
    }

    let document = read_archive_entry(bytes, entry_name)?;
    parse_records(&document)
}

fn read_archive_entry(bytes: &[u8], entry_name: Option<&str>) -> Result<Vec<u8>, ArtifactError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|error| ArtifactError::Archive(error.to_string()))?;

    let index = match entry_name {
        Some(name) => (0..archive.len()).find(|&index| {
            archive
                .by_index(index)
                .map(|file| file.name() == name)
                .unwrap_or(false)
        }),
        None => (0..archive.len()).find(|&index| {
            archive
                .by_index(index)
                .map(|file| !file.is_dir() && file.name().ends_with(".json"))
                .unwrap_or(false)
        }),
    }
    .ok_or_else(|| ArtifactError::MissingEntry(entry_name.map(str::to_string)))?;

    let mut file = archive
        .by_index(index)
        .map_err(|error| ArtifactError::Archive(error.to_string()))?;
    let mut document = Vec::new();
    file.read_to_end(&mut document)
        .map_err(|error| ArtifactError::Archive(error.to_string()))?;
    Ok(document)
}

fn parse_records(document: &[u8]) -> Result<Vec<FunctionVersionRecord>, ArtifactError> {
    serde_json::from_slice(document).map_err(|error| ArtifactError::Malformed(error.to_string()))
}
