use super::RiskTier;

/// Shown under every report.
pub const DISCLAIMER: &str =
    "This tool is a health reference only and cannot replace a professional medical diagnosis.";

const LOW_RISK: &[&str] = &[
    "Keep up your current healthy habits.",
    "Stay physically active for at least 150 minutes per week.",
    "Re-check your risk factors once a year.",
];

const MEDIUM_RISK: &[&str] = &[
    "Improve your lifestyle: balanced diet, regular exercise and enough sleep.",
    "Monitor your blood glucose regularly.",
    "Discuss your risk factors with a doctor at your next check-up.",
];

const HIGH_RISK: &[&str] = &[
    "Consult a doctor promptly and arrange a comprehensive examination.",
    "Ask for a fasting glucose or HbA1c test.",
    "Address modifiable risks now: smoking, blood pressure, cholesterol and weight.",
];

pub fn recommendations(tier: RiskTier) -> &'static [&'static str] {
    match tier {
        RiskTier::Low => LOW_RISK,
        RiskTier::Medium => MEDIUM_RISK,
        RiskTier::High => HIGH_RISK,
    }
}
