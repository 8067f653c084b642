//! Format detection, file discovery, and deserialization of scenario files.
//!
//! Scenarios may be written in RON, JSON, or TOML; the format is chosen by
//! file extension.

use orbitfab_core::facility::FacilityType;
use orbitfab_core::recipe::RecipeId;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a scenario.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required scenario file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A facility type was configured more than once.
    #[error("facility '{facility}' listed twice in {file}")]
    DuplicateFacility { file: PathBuf, facility: FacilityType },

    /// A facility was bound to a recipe that runs elsewhere.
    #[error("recipe {recipe:?} cannot run on '{facility}' in {file}")]
    RecipeMismatch {
        file: PathBuf,
        facility: FacilityType,
        recipe: RecipeId,
    },

    /// A field holds a value outside its allowed range.
    #[error("invalid {field} in {file}: {detail}")]
    InvalidValue {
        file: PathBuf,
        field: &'static str,
        detail: String,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported scenario file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    pub const EXTENSIONS: [&'static str; 3] = ["ron", "toml", "json"];
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan `dir` for a scenario named `base_name` in any supported format.
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// more than one format exists for the same base name.
pub fn find_scenario(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in Format::EXTENSIONS {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_scenario`], but returns an error if no file is found.
pub fn require_scenario(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_scenario(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Deserialize already-read `content`. `path` is only used in errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    path: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
