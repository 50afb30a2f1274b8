use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::scorer::{advice::DISCLAIMER, Contribution, RiskAssessment, RiskTier, ScoreBreakdown};

/// Format styles supported by the default renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Produce a report string from a `RiskAssessment` using the desired format.
pub fn render_assessment(
    assessment: &RiskAssessment,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => render_human(assessment, |_, label| label.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport::from(assessment))?),
    }
}

/// Human report with a caller-styled headline label (e.g. terminal colors).
pub fn render_human<F>(assessment: &RiskAssessment, style_label: F) -> anyhow::Result<String>
where
    F: Fn(RiskTier, &str) -> String,
{
    let mut out = String::new();
    let tier = assessment.risk_tier;
    writeln!(
        out,
        "Diabetes Risk: {:.1}% ({})",
        assessment.probability_percent,
        style_label(tier, tier.label())
    )?;
    writeln!(
        out,
        "Generated At: {}",
        assessment
            .generated_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    )?;
    writeln!(out)?;

    writeln!(out, "Contributions:")?;
    for contribution in &assessment.breakdown.contributions {
        writeln!(
            out,
            "  - {factor:<16} {points:>+6.1}",
            factor = contribution.factor.as_str(),
            points = contribution.points,
        )?;
    }
    writeln!(
        out,
        "\nWeighted sum: {:.1} • Jitter: {:+.1}",
        assessment.breakdown.weighted_sum, assessment.breakdown.jitter
    )?;

    writeln!(out, "\nRecommendations:")?;
    for (idx, advice) in assessment.recommendations.iter().enumerate() {
        writeln!(out, "  {}. {}", idx + 1, advice)?;
    }

    writeln!(out, "\n{DISCLAIMER}")?;
    Ok(out)
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    probability_percent: f64,
    risk_tier: RiskTier,
    label: &'static str,
    recommendations: &'a [String],
    generated_at: DateTime<Utc>,
    contributions: &'a [Contribution],
    breakdown: &'a ScoreBreakdown,
    disclaimer: &'static str,
}

impl<'a> From<&'a RiskAssessment> for JsonReport<'a> {
    fn from(assessment: &'a RiskAssessment) -> Self {
        Self {
            probability_percent: assessment.probability_percent,
            risk_tier: assessment.risk_tier,
            label: assessment.risk_tier.label(),
            recommendations: &assessment.recommendations,
            generated_at: assessment.generated_at,
            contributions: &assessment.breakdown.contributions,
            breakdown: &assessment.breakdown,
            disclaimer: DISCLAIMER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{HealthProfile, Sex};
    use crate::scorer::{Jitter, Scorer};
    use chrono::TimeZone;

    fn sample_assessment() -> RiskAssessment {
        let profile = HealthProfile::builder(58, Sex::Female)
            .smokes(true)
            .build()
            .unwrap();
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        Scorer::new().evaluate_at(&profile, Jitter::Off, generated_at)
    }

    #[test]
    fn human_report_contains_contributions() {
        let output = render_assessment(&sample_assessment(), OutputFormat::Human).unwrap();
        assert!(output.contains("Diabetes Risk: 38.0% (Medium risk)"));
        assert!(output.contains("smoking"));
        assert!(output.contains("Recommendations:"));
        assert!(output.contains(DISCLAIMER));
    }

    #[test]
    fn human_report_applies_label_style() {
        let output = render_human(&sample_assessment(), |tier, label| {
            format!("<{tier}>{label}</{tier}>")
        })
        .unwrap();
        assert!(output.contains("(<medium>Medium risk</medium>)"));
    }

    #[test]
    fn json_report_serializes() {
        let assessment = sample_assessment();
        let output = render_assessment(&assessment, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["probability_percent"], serde_json::json!(38.0));
        assert_eq!(value["risk_tier"], "medium");
        assert_eq!(value["generated_at"], "2024-03-01T09:30:00Z");
        assert!(value["recommendations"].is_array());
        assert_eq!(value["contributions"][0]["factor"], "base");
    }
}
