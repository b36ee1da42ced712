use crate::commands::{render_guardrail_section, render_result_text};
use crate::infra::{calculator, open_service};
use clap::Args;
use riskmetrica::assessments::{render_markdown, AssessmentSession};
use riskmetrica::config::AppConfig;
use riskmetrica::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Persist the demo assessment to the configured data directory.
    #[arg(long)]
    pub(crate) save: bool,
}

/// Walks the seeded SME lending assessment through calculation, guardrail
/// checks and the board pack.
pub(crate) fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let calculator = calculator(&config.storage, None);
    let mut session = AssessmentSession::new();

    let document = session.current();
    println!("RiskMetrica demo: {}", document.display_title());
    println!(
        "- {} | {} | {} months | {}",
        document.context.organisation,
        document.context.risk_domain,
        document.context.time_horizon_months,
        document.context.category
    );
    println!("- Approvers: {}", document.approver_list().join(", "));
    println!("- Status: {}\n", document.status);

    let result = session.calculate(&calculator)?;
    print!("{}", render_result_text(result));

    let guardrails = session.evaluate_guardrails()?;
    print!("{}", render_guardrail_section(&guardrails));

    println!("\nBoard pack\n");
    print!("{}", render_markdown(session.current())?);

    if args.save {
        let service = open_service(&config.storage, None)?;
        let stored = service.save(session.into_document())?;
        if let Some(id) = stored.id {
            println!("\nSaved assessment {id}");
        }
    }

    Ok(())
}
