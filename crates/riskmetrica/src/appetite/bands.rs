use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Slack applied at band boundaries so a score sitting exactly on a
/// threshold is not pushed into the next band by rounding.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Named appetite band covering scores up to and including `max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    pub max: f64,
    #[serde(default)]
    pub description: String,
}

impl Band {
    pub fn new(name: impl Into<String>, max: f64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max,
            description: description.into(),
        }
    }
}

/// Problems found in an operator-supplied band file. [`load_bands`] degrades
/// to the built-in bands instead; [`save_bands`] reports them so an edit is
/// never dropped silently.
#[derive(Debug, thiserror::Error)]
pub enum BandConfigError {
    #[error("failed to read band configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid band configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("band configuration has no `bands` list")]
    MissingBands,
    #[error("band list is empty")]
    Empty,
    #[error("band {index} has an empty name")]
    UnnamedBand { index: usize },
    #[error("band '{name}' has max {max}, expected a value within 0.0..=1.0")]
    MaxOutOfRange { name: String, max: f64 },
    #[error("band '{name}' (max {max}) is below the preceding bound {previous}")]
    Unordered { name: String, max: f64, previous: f64 },
    #[error("no band configuration path is set")]
    NoPath,
}

impl BandConfigError {
    /// True when the content itself was rejected, as opposed to the file
    /// being unreachable.
    pub fn is_invalid_content(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::NoPath)
    }
}

/// Ordered, non-empty list of bands. Construction checks that bounds lie in
/// [0, 1] and never decrease, so classification can rely on a last band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BandSet {
    bands: Vec<Band>,
}

impl BandSet {
    pub fn new(bands: Vec<Band>) -> Result<Self, BandConfigError> {
        if bands.is_empty() {
            return Err(BandConfigError::Empty);
        }

        let mut previous = f64::NEG_INFINITY;
        for (index, band) in bands.iter().enumerate() {
            if band.name.trim().is_empty() {
                return Err(BandConfigError::UnnamedBand { index });
            }
            if !(0.0..=1.0).contains(&band.max) {
                return Err(BandConfigError::MaxOutOfRange {
                    name: band.name.clone(),
                    max: band.max,
                });
            }
            if band.max < previous {
                return Err(BandConfigError::Unordered {
                    name: band.name.clone(),
                    max: band.max,
                    previous,
                });
            }
            previous = band.max;
        }

        Ok(Self { bands })
    }

    /// Parses a YAML document with a top-level `bands` list.
    pub fn from_yaml(raw: &str) -> Result<Self, BandConfigError> {
        let file: Option<BandFile> = serde_yaml::from_str(raw)?;
        let bands = file
            .and_then(|file| file.bands)
            .ok_or(BandConfigError::MissingBands)?;
        Self::new(bands)
    }

    pub fn from_path(path: &Path) -> Result<Self, BandConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// First band (in list order) whose `max` the score does not exceed,
    /// falling back to the last band for anything above every bound.
    pub fn classify(&self, score: f64) -> &Band {
        match self
            .bands
            .iter()
            .find(|band| score <= band.max + BOUNDARY_EPSILON)
        {
            Some(band) => band,
            None => &self.bands[self.bands.len() - 1],
        }
    }
}

impl Default for BandSet {
    fn default() -> Self {
        Self {
            bands: vec![
                Band::new(
                    "Averse",
                    0.33,
                    "Low appetite – prioritise capital preservation and compliance.",
                ),
                Band::new(
                    "Guarded",
                    0.5,
                    "Cautious appetite – selective risk-taking under tight controls.",
                ),
                Band::new(
                    "Balanced",
                    0.7,
                    "Measured appetite – risk accepted with proportionate returns.",
                ),
                Band::new(
                    "Seeking",
                    1.0,
                    "Higher appetite – pursue opportunities with strong oversight.",
                ),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for BandSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bands = Vec::<Band>::deserialize(deserializer)?;
        Self::new(bands).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
struct BandFile {
    #[serde(default)]
    bands: Option<Vec<Band>>,
}

/// Loads bands from `source`, using the built-in bands when no source is
/// given or the file cannot be read, parsed, or validated. Reads the file on
/// every call.
pub fn load_bands(source: Option<&Path>) -> BandSet {
    let Some(path) = source else {
        return BandSet::default();
    };

    if !path.exists() {
        debug!(path = %path.display(), "band configuration not found, using defaults");
        return BandSet::default();
    }

    match BandSet::from_path(path) {
        Ok(bands) => bands,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "falling back to default bands");
            BandSet::default()
        }
    }
}

/// Validates `raw` and only then replaces the band file at `path`, creating
/// its directory when missing. Rejected content leaves the file untouched.
pub fn save_bands(path: &Path, raw: &str) -> Result<BandSet, BandConfigError> {
    let bands = BandSet::from_yaml(raw)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, raw)?;
    info!(path = %path.display(), bands = bands.bands().len(), "band configuration updated");
    Ok(bands)
}
