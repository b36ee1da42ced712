/// Renders the appetite statement for a calculated band and score.
///
/// The percentage is `score * 100` rounded to the nearest integer with ties
/// going to the even neighbour.
pub fn generate_statement(
    organisation: &str,
    objective: &str,
    domain: &str,
    horizon_months: u16,
    band: &str,
    score: f64,
) -> String {
    let pct = (score * 100.0).round_ties_even();
    format!(
        "{organisation} expresses a '{band}' risk appetite ({pct:.0}%) for {} over the next \
         {horizon_months} months, aligned to the objective: {objective}. \
         Risk-taking will be proportionate to returns and monitored.",
        domain.to_lowercase()
    )
}
