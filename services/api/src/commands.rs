use crate::infra::{calculator, open_service, read_guards, read_structured};
use clap::{Args, ValueEnum};
use riskmetrica::appetite::{
    has_breach, AppetiteResult, AssessmentCategory, BandConfigError, BandSet, GuardEvaluation,
};
use riskmetrica::assessments::{
    render_guardrail_report, render_markdown, render_result_json, AssessmentDocument,
    AssessmentId, AssessmentSummary, EvaluationReport, EvaluationRequest, SessionError,
    WorkflowStatus,
};
use riskmetrica::config::AppConfig;
use riskmetrica::error::AppError;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// Context and dimensions as JSON or YAML (chosen by extension)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Band configuration to use instead of the configured file
    #[arg(long)]
    pub(crate) bands: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
    /// Guard definitions; overrides guards embedded in the input
    #[arg(long)]
    pub(crate) guards: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Only list assessments filed under this category
    #[arg(long)]
    pub(crate) category: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    pub(crate) id: String,
    #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
    pub(crate) format: ExportFormat,
}

#[derive(Args, Debug, Default)]
pub(crate) struct BandsArgs {
    /// Band configuration to inspect instead of the configured file
    #[arg(long)]
    pub(crate) bands: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BandsSetArgs {
    /// YAML file with a top-level `bands` list to install as the configured bands
    #[arg(long)]
    pub(crate) file: PathBuf,
}

pub(crate) fn run_calculate(config: &AppConfig, args: CalculateArgs) -> Result<(), AppError> {
    let CalculateArgs {
        input,
        bands,
        format,
        guards,
    } = args;

    let mut request: EvaluationRequest = read_structured(&input)?;
    if let Some(path) = guards {
        request.guards = Some(read_guards(&path)?);
    }

    let service = open_service(&config.storage, bands)?;
    let context = request.context.clone();
    let dimensions = request.dimensions.clone();
    let report = service.evaluate(request)?;
    info!(band = %report.result.band, input = %input.display(), "appetite calculated");

    let output = match format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Markdown => {
            let document = AssessmentDocument {
                id: None,
                title: String::new(),
                context,
                dimensions,
                result: Some(report.result),
                status: WorkflowStatus::Draft,
                approvers: String::new(),
                guards: Vec::new(),
                saved_at: None,
            };
            render_markdown(&document)?
        }
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub(crate) fn run_list(config: &AppConfig, args: ListArgs) -> Result<(), AppError> {
    let category = args
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?;
    let service = open_service(&config.storage, None)?;
    let summaries = service.list(category)?;
    print!("{}", render_summaries(&summaries));
    Ok(())
}

pub(crate) fn run_show(config: &AppConfig, args: ShowArgs) -> Result<(), AppError> {
    let id = parse_id(&args.id)?;
    let service = open_service(&config.storage, None)?;
    let document = service.get(&id)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

pub(crate) fn run_export(config: &AppConfig, args: ExportArgs) -> Result<(), AppError> {
    let id = parse_id(&args.id)?;
    let service = open_service(&config.storage, None)?;

    let output = match args.format {
        ExportFormat::Markdown => service.report(&id)?,
        ExportFormat::Json => {
            let document = service.get(&id)?;
            let result = document.result.as_ref().ok_or(SessionError::NotCalculated)?;
            render_result_json(result)?
        }
    };
    println!("{output}");
    Ok(())
}

pub(crate) fn run_bands_show(config: &AppConfig, args: BandsArgs) -> Result<(), AppError> {
    let calculator = calculator(&config.storage, args.bands);
    if let Some(path) = calculator.bands_path() {
        println!("Bands ({})", path.display());
    }
    print!("{}", render_bands(&calculator.bands()));
    Ok(())
}

pub(crate) fn run_bands_set(config: &AppConfig, args: BandsSetArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.file).map_err(|err| {
        AppError::Input(format!("cannot read {}: {err}", args.file.display()))
    })?;

    let bands = calculator(&config.storage, None)
        .store_bands(&raw)
        .map_err(|err| match err {
            BandConfigError::Io(err) => AppError::Io(err),
            err => AppError::Input(format!("{}: {err}", args.file.display())),
        })?;
    info!(source = %args.file.display(), bands = bands.bands().len(), "bands replaced");

    println!("Bands ({})", config.storage.bands_path.display());
    print!("{}", render_bands(&bands));
    Ok(())
}

pub(crate) fn parse_category(raw: &str) -> Result<AssessmentCategory, AppError> {
    AssessmentCategory::from_label(raw).ok_or_else(|| {
        let known: Vec<&str> = AssessmentCategory::ALL
            .iter()
            .map(|category| category.label())
            .collect();
        AppError::Input(format!(
            "unknown category '{raw}' (expected one of: {})",
            known.join(", ")
        ))
    })
}

fn parse_id(raw: &str) -> Result<AssessmentId, AppError> {
    raw.parse()
        .map_err(|err| AppError::Input(format!("'{raw}' is not an assessment id: {err}")))
}

pub(crate) fn render_result_text(result: &AppetiteResult) -> String {
    let mut out = format!(
        "Band: {}\nWeighted score: {:.4}\nStatement: {}\nContributions:\n",
        result.band, result.weighted_score, result.statement
    );
    for contribution in &result.contributions {
        out.push_str(&format!(
            "  - {:<24} score {:.2}  weight {:.2}  contribution {:.3}\n",
            contribution.name, contribution.score, contribution.weight, contribution.contribution
        ));
    }
    out
}

fn render_text(report: &EvaluationReport) -> String {
    let mut out = render_result_text(&report.result);
    out.push_str(&render_guardrail_section(&report.guardrails));
    out
}

pub(crate) fn render_guardrail_section(evaluations: &[GuardEvaluation]) -> String {
    let mut out = String::from("Guardrails:\n");
    if evaluations.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for line in render_guardrail_report(evaluations).lines() {
        out.push_str(&format!("  {line}\n"));
    }
    if has_breach(evaluations) {
        out.push_str("At least one guardrail is breached.\n");
    }
    out
}

fn render_summaries(summaries: &[AssessmentSummary]) -> String {
    if summaries.is_empty() {
        return "No saved assessments.\n".to_string();
    }
    let mut out = String::new();
    for summary in summaries {
        out.push_str(&format!(
            "{}  {}  {:<12}  {}\n",
            summary.id,
            summary.saved_at.format("%Y-%m-%d %H:%M:%S UTC"),
            summary.category.label(),
            summary.title
        ));
    }
    out
}

fn render_bands(bands: &BandSet) -> String {
    let mut out = String::new();
    for band in bands.bands() {
        out.push_str(&format!("- {:<10} <= {:.2}", band.name, band.max));
        if !band.description.is_empty() {
            out.push_str(&format!("  {}", band.description));
        }
        out.push('\n');
    }
    out
}
