use metrics_exporter_prometheus::PrometheusHandle;
use riskmetrica::appetite::{AppetiteCalculator, Guard};
use riskmetrica::assessments::{AssessmentService, FileAssessmentRepository};
use riskmetrica::config::StorageConfig;
use riskmetrica::error::AppError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Calculator reading bands from `bands_override` when given, else from the
/// configured path.
pub(crate) fn calculator(
    storage: &StorageConfig,
    bands_override: Option<PathBuf>,
) -> AppetiteCalculator {
    let path = bands_override.unwrap_or_else(|| storage.bands_path.clone());
    AppetiteCalculator::new(Some(path))
}

pub(crate) fn open_service(
    storage: &StorageConfig,
    bands_override: Option<PathBuf>,
) -> Result<AssessmentService<FileAssessmentRepository>, AppError> {
    let repository = FileAssessmentRepository::open(storage.assessments_dir())?;
    Ok(AssessmentService::new(
        Arc::new(repository),
        calculator(storage, bands_override),
    ))
}

/// Reads a JSON or YAML document, picking the parser from the extension.
pub(crate) fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|err| AppError::Input(format!("cannot read {}: {err}", path.display())))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str(&raw).map_err(|err| err.to_string())
    } else {
        serde_json::from_str(&raw).map_err(|err| err.to_string())
    };
    parsed.map_err(|message| AppError::Input(format!("{}: {message}", path.display())))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GuardFile {
    List(Vec<Guard>),
    Wrapped { guards: Vec<Guard> },
}

/// Guard definitions given either as a bare list or under a `guards` key.
pub(crate) fn read_guards(path: &Path) -> Result<Vec<Guard>, AppError> {
    Ok(match read_structured::<GuardFile>(path)? {
        GuardFile::List(guards) | GuardFile::Wrapped { guards } => guards,
    })
}
