use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::profile::{EducationLevel, FamilyHistory, HealthProfile, Sex};

pub mod advice;
pub mod jitter;

pub use jitter::{Jitter, ParseJitterError};

/// Lowest probability ever reported, in percent.
pub const PROBABILITY_FLOOR: f64 = 5.0;
/// Highest probability ever reported, in percent.
pub const PROBABILITY_CEILING: f64 = 95.0;
/// Largest jitter magnitude a configuration may request.
pub const MAX_JITTER_AMPLITUDE: f64 = 3.0;

/// Thresholds that map a probability percentage into a risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 25.0,
            high: 50.0,
        }
    }
}

/// Qualitative tiers shown next to the probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Map a probability percentage (5–95) into a tier.
    pub fn from_probability(percent: f64) -> Self {
        Self::from_probability_with_thresholds(percent, &RiskThresholds::default())
    }

    /// Map a probability percentage using caller-provided thresholds.
    pub fn from_probability_with_thresholds(percent: f64, thresholds: &RiskThresholds) -> Self {
        if percent >= thresholds.high {
            Self::High
        } else if percent >= thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }

    /// Headline label used by renderers.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low risk",
            RiskTier::Medium => "Medium risk",
            RiskTier::High => "High risk",
        }
    }

    /// Static advice attached to every assessment in this tier.
    pub fn recommendations(&self) -> &'static [&'static str] {
        advice::recommendations(*self)
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the age contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeModel {
    /// `(age - pivot) * slope` for ages above the pivot.
    Linear,
    /// Largest bonus among the steps whose `min_age` has been reached.
    Stepped,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeStep {
    pub min_age: u32,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeWeights {
    pub model: AgeModel,
    pub pivot: f64,
    pub slope: f64,
    pub steps: Vec<AgeStep>,
}

impl Default for AgeWeights {
    fn default() -> Self {
        Self {
            model: AgeModel::Linear,
            pivot: 40.0,
            slope: 0.5,
            steps: vec![
                AgeStep { min_age: 30, points: 5.0 },
                AgeStep { min_age: 40, points: 10.0 },
                AgeStep { min_age: 45, points: 15.0 },
                AgeStep { min_age: 50, points: 20.0 },
                AgeStep { min_age: 60, points: 25.0 },
            ],
        }
    }
}

impl AgeWeights {
    pub fn contribution(&self, age: u32) -> f64 {
        match self.model {
            AgeModel::Linear => {
                let years_over = f64::from(age) - self.pivot;
                if years_over > 0.0 {
                    years_over * self.slope
                } else {
                    0.0
                }
            }
            AgeModel::Stepped => self
                .steps
                .iter()
                .filter(|step| age >= step.min_age)
                .map(|step| step.points)
                .fold(0.0, f64::max),
        }
    }
}

/// `max(0, (reference_point - poverty_index) * coefficient)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PovertyWeights {
    pub reference_point: f64,
    pub coefficient: f64,
}

impl Default for PovertyWeights {
    fn default() -> Self {
        Self {
            reference_point: 2.5,
            coefficient: 3.0,
        }
    }
}

impl PovertyWeights {
    pub fn contribution(&self, poverty_index: f64) -> f64 {
        ((self.reference_point - poverty_index) * self.coefficient).max(0.0)
    }
}

/// Bonus applied once a measurement strictly exceeds `above`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementBand {
    pub above: f64,
    pub points: f64,
}

fn band_contribution(bands: &[MeasurementBand], value: f64) -> f64 {
    bands
        .iter()
        .filter(|band| value > band.above)
        .map(|band| band.points)
        .fold(0.0, f64::max)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyHistoryWeights {
    pub one_parent: f64,
    pub both_parents: f64,
}

impl Default for FamilyHistoryWeights {
    fn default() -> Self {
        Self {
            one_parent: 10.0,
            both_parents: 20.0,
        }
    }
}

/// Points added by each risk factor of the weighted-sum heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub base: f64,
    pub age: AgeWeights,
    pub male: f64,
    pub low_education: f64,
    pub poverty: PovertyWeights,
    pub uninsured: f64,
    pub irregular_activity: f64,
    pub insufficient_sleep: f64,
    pub heavy_alcohol: f64,
    pub smoker: f64,
    pub hypertension: f64,
    pub high_cholesterol: f64,
    pub fasting_glucose: Vec<MeasurementBand>,
    pub body_mass_index: Vec<MeasurementBand>,
    pub family_history: FamilyHistoryWeights,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            base: 15.0,
            age: AgeWeights::default(),
            male: 8.0,
            low_education: 10.0,
            poverty: PovertyWeights::default(),
            uninsured: 12.0,
            irregular_activity: 15.0,
            insufficient_sleep: 10.0,
            heavy_alcohol: 8.0,
            smoker: 14.0,
            hypertension: 18.0,
            high_cholesterol: 16.0,
            fasting_glucose: vec![
                MeasurementBand { above: 100.0, points: 20.0 },
                MeasurementBand { above: 140.0, points: 40.0 },
            ],
            body_mass_index: vec![
                MeasurementBand { above: 25.0, points: 15.0 },
                MeasurementBand { above: 30.0, points: 30.0 },
            ],
            family_history: FamilyHistoryWeights::default(),
        }
    }
}

impl ScoringWeights {
    /// Every tunable number as `(name, value, must_be_non_negative)`.
    pub fn entries(&self) -> Vec<(String, f64, bool)> {
        let mut entries = vec![
            ("base".to_string(), self.base, false),
            ("age.pivot".to_string(), self.age.pivot, false),
            ("age.slope".to_string(), self.age.slope, true),
        ];
        for (idx, step) in self.age.steps.iter().enumerate() {
            entries.push((format!("age.steps[{idx}].points"), step.points, true));
        }
        entries.extend([
            ("male".to_string(), self.male, true),
            ("low_education".to_string(), self.low_education, true),
            (
                "poverty.reference_point".to_string(),
                self.poverty.reference_point,
                false,
            ),
            (
                "poverty.coefficient".to_string(),
                self.poverty.coefficient,
                true,
            ),
            ("uninsured".to_string(), self.uninsured, true),
            (
                "irregular_activity".to_string(),
                self.irregular_activity,
                true,
            ),
            (
                "insufficient_sleep".to_string(),
                self.insufficient_sleep,
                true,
            ),
            ("heavy_alcohol".to_string(), self.heavy_alcohol, true),
            ("smoker".to_string(), self.smoker, true),
            ("hypertension".to_string(), self.hypertension, true),
            ("high_cholesterol".to_string(), self.high_cholesterol, true),
        ]);
        for (idx, band) in self.fasting_glucose.iter().enumerate() {
            entries.push((format!("fasting_glucose[{idx}].above"), band.above, false));
            entries.push((format!("fasting_glucose[{idx}].points"), band.points, true));
        }
        for (idx, band) in self.body_mass_index.iter().enumerate() {
            entries.push((format!("body_mass_index[{idx}].above"), band.above, false));
            entries.push((format!("body_mass_index[{idx}].points"), band.points, true));
        }
        entries.push((
            "family_history.one_parent".to_string(),
            self.family_history.one_parent,
            true,
        ));
        entries.push((
            "family_history.both_parents".to_string(),
            self.family_history.both_parents,
            true,
        ));
        entries
    }
}

/// Tunable configuration for the scoring heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub thresholds: RiskThresholds,
    /// Magnitude bound for seeded and caller-supplied jitter.
    pub jitter_amplitude: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: RiskThresholds::default(),
            jitter_amplitude: MAX_JITTER_AMPLITUDE,
        }
    }
}

impl ScoringConfig {
    /// Validate invariants that keep the score monotonic and bounded.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (name, value, non_negative) in self.weights.entries() {
            if !value.is_finite() {
                return Err(ConfigValidationError::NonFinite { name, value });
            }
            if non_negative && value < 0.0 {
                return Err(ConfigValidationError::NegativeWeight { name, value });
            }
        }
        if !(0.0..=MAX_JITTER_AMPLITUDE).contains(&self.jitter_amplitude) {
            return Err(ConfigValidationError::InvalidJitterAmplitude {
                value: self.jitter_amplitude,
            });
        }
        let RiskThresholds { medium, high } = self.thresholds;
        if !medium.is_finite() || !high.is_finite() || medium > high {
            return Err(ConfigValidationError::InvalidThresholds { medium, high });
        }
        Ok(())
    }
}

/// Errors emitted while validating a scoring configuration.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigValidationError {
    #[error("weight `{name}` must be finite (got {value})")]
    NonFinite { name: String, value: f64 },
    #[error("weight `{name}` must not be negative (got {value})")]
    NegativeWeight { name: String, value: f64 },
    #[error("jitter amplitude must be within 0.0..=3.0 (got {value})")]
    InvalidJitterAmplitude { value: f64 },
    #[error("thresholds must satisfy medium <= high (got medium {medium}, high {high})")]
    InvalidThresholds { medium: f64, high: f64 },
}

/// Input field that produced a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    Base,
    Age,
    Sex,
    Education,
    Poverty,
    Insurance,
    Activity,
    Sleep,
    Alcohol,
    Smoking,
    Hypertension,
    Cholesterol,
    FastingGlucose,
    BodyMassIndex,
    FamilyHistory,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::Base => "base",
            RiskFactor::Age => "age",
            RiskFactor::Sex => "sex",
            RiskFactor::Education => "education",
            RiskFactor::Poverty => "poverty",
            RiskFactor::Insurance => "insurance",
            RiskFactor::Activity => "activity",
            RiskFactor::Sleep => "sleep",
            RiskFactor::Alcohol => "alcohol",
            RiskFactor::Smoking => "smoking",
            RiskFactor::Hypertension => "hypertension",
            RiskFactor::Cholesterol => "cholesterol",
            RiskFactor::FastingGlucose => "fasting_glucose",
            RiskFactor::BodyMassIndex => "body_mass_index",
            RiskFactor::FamilyHistory => "family_history",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub factor: RiskFactor,
    pub points: f64,
}

/// Per-factor scoring metadata for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoreBreakdown {
    /// Sum of all contributions before jitter and clamping.
    pub weighted_sum: f64,
    pub jitter: f64,
    /// Base score first, then every non-zero factor in evaluation order.
    pub contributions: Vec<Contribution>,
}

impl ScoreBreakdown {
    pub fn unclamped_total(&self) -> f64 {
        self.weighted_sum + self.jitter
    }

    /// Clamp into `[5, 95]` and round to one decimal place.
    pub fn probability_percent(&self) -> f64 {
        let total = self.unclamped_total();
        let clamped = if total.is_nan() {
            PROBABILITY_FLOOR
        } else {
            total.clamp(PROBABILITY_FLOOR, PROBABILITY_CEILING)
        };
        (clamped * 10.0).round() / 10.0
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub probability_percent: f64,
    pub risk_tier: RiskTier,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub breakdown: ScoreBreakdown,
}

impl RiskAssessment {
    /// Construct an assessment while deriving the probability, tier and advice.
    pub fn from_breakdown(
        breakdown: ScoreBreakdown,
        thresholds: &RiskThresholds,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let probability_percent = breakdown.probability_percent();
        let risk_tier = RiskTier::from_probability_with_thresholds(probability_percent, thresholds);
        Self {
            probability_percent,
            risk_tier,
            recommendations: risk_tier
                .recommendations()
                .iter()
                .map(|advice| advice.to_string())
                .collect(),
            generated_at,
            breakdown,
        }
    }
}

/// Stateless evaluator bound to a validated [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Pre-clamp weighted sum with its per-factor contributions (no jitter).
    pub fn weighted_sum(&self, profile: &HealthProfile) -> ScoreBreakdown {
        let w = &self.config.weights;
        let mut contributions = vec![Contribution {
            factor: RiskFactor::Base,
            points: w.base,
        }];
        let mut add = |factor: RiskFactor, points: f64| {
            if points != 0.0 {
                contributions.push(Contribution { factor, points });
            }
        };

        add(RiskFactor::Age, w.age.contribution(profile.age));
        if profile.sex == Sex::Male {
            add(RiskFactor::Sex, w.male);
        }
        if profile.education_level == Some(EducationLevel::Low) {
            add(RiskFactor::Education, w.low_education);
        }
        if let Some(index) = profile.poverty_index {
            add(RiskFactor::Poverty, w.poverty.contribution(index));
        }
        if !profile.has_health_insurance {
            add(RiskFactor::Insurance, w.uninsured);
        }
        if !profile.has_regular_activity {
            add(RiskFactor::Activity, w.irregular_activity);
        }
        if profile.sleep_sufficient == Some(false) {
            add(RiskFactor::Sleep, w.insufficient_sleep);
        }
        if profile.heavy_alcohol_use == Some(true) {
            add(RiskFactor::Alcohol, w.heavy_alcohol);
        }
        if profile.smokes {
            add(RiskFactor::Smoking, w.smoker);
        }
        if profile.has_hypertension {
            add(RiskFactor::Hypertension, w.hypertension);
        }
        if profile.has_high_cholesterol {
            add(RiskFactor::Cholesterol, w.high_cholesterol);
        }
        if let Some(glucose) = profile.fasting_glucose {
            add(
                RiskFactor::FastingGlucose,
                band_contribution(&w.fasting_glucose, glucose),
            );
        }
        if let Some(bmi) = profile.body_mass_index {
            add(
                RiskFactor::BodyMassIndex,
                band_contribution(&w.body_mass_index, bmi),
            );
        }
        match profile.family_history {
            Some(FamilyHistory::OneParent) => {
                add(RiskFactor::FamilyHistory, w.family_history.one_parent)
            }
            Some(FamilyHistory::BothParents) => {
                add(RiskFactor::FamilyHistory, w.family_history.both_parents)
            }
            Some(FamilyHistory::None) | None => {}
        }

        let weighted_sum = contributions.iter().map(|c| c.points).sum();
        ScoreBreakdown {
            weighted_sum,
            jitter: 0.0,
            contributions,
        }
    }

    /// Weighted sum plus the resolved jitter offset.
    pub fn breakdown(&self, profile: &HealthProfile, jitter: Jitter) -> ScoreBreakdown {
        let mut breakdown = self.weighted_sum(profile);
        breakdown.jitter = jitter.resolve(profile, self.config.jitter_amplitude);
        breakdown
    }

    pub fn evaluate(&self, profile: &HealthProfile, jitter: Jitter) -> RiskAssessment {
        self.evaluate_at(profile, jitter, Utc::now())
    }

    /// Evaluate with an explicit timestamp, for reproducible output.
    #[instrument(name = "evaluate_profile", skip(self, profile, generated_at), fields(age = profile.age))]
    pub fn evaluate_at(
        &self,
        profile: &HealthProfile,
        jitter: Jitter,
        generated_at: DateTime<Utc>,
    ) -> RiskAssessment {
        let breakdown = self.breakdown(profile, jitter);
        let assessment =
            RiskAssessment::from_breakdown(breakdown, &self.config.thresholds, generated_at);
        debug!(
            weighted_sum = assessment.breakdown.weighted_sum,
            jitter = assessment.breakdown.jitter,
            probability = assessment.probability_percent,
            tier = %assessment.risk_tier,
            "profile evaluated"
        );
        assessment
    }
}

static DEFAULT_SCORER: Lazy<Scorer> = Lazy::new(Scorer::default);

/// Evaluate with the default scoring configuration.
pub fn evaluate(profile: &HealthProfile, jitter: Jitter) -> RiskAssessment {
    DEFAULT_SCORER.evaluate(profile, jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a() -> HealthProfile {
        HealthProfile::builder(45, Sex::Male)
            .education_level(EducationLevel::Higher)
            .poverty_index(2.5)
            .sleep_sufficient(true)
            .heavy_alcohol_use(false)
            .build()
            .unwrap()
    }

    #[test]
    fn risk_tier_thresholds() {
        assert_eq!(RiskTier::from_probability(5.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(24.9), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(25.0), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(49.9), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(50.0), RiskTier::High);
        assert_eq!(RiskTier::from_probability(95.0), RiskTier::High);
    }

    #[test]
    fn linear_age_only_counts_years_over_pivot() {
        let age = AgeWeights::default();
        assert_eq!(age.contribution(18), 0.0);
        assert_eq!(age.contribution(40), 0.0);
        assert!((age.contribution(45) - 2.5).abs() < 1e-9);
        assert!((age.contribution(100) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn stepped_age_takes_highest_reached_step() {
        let age = AgeWeights {
            model: AgeModel::Stepped,
            ..AgeWeights::default()
        };
        assert_eq!(age.contribution(29), 0.0);
        assert_eq!(age.contribution(30), 5.0);
        assert_eq!(age.contribution(47), 15.0);
        assert_eq!(age.contribution(60), 25.0);
        assert_eq!(age.contribution(90), 25.0);
    }

    #[test]
    fn poverty_contribution_is_never_negative() {
        let poverty = PovertyWeights::default();
        assert_eq!(poverty.contribution(2.5), 0.0);
        assert_eq!(poverty.contribution(5.0), 0.0);
        assert!((poverty.contribution(0.0) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn measurement_bands_are_strict() {
        let weights = ScoringWeights::default();
        assert_eq!(band_contribution(&weights.fasting_glucose, 100.0), 0.0);
        assert_eq!(band_contribution(&weights.fasting_glucose, 120.0), 20.0);
        assert_eq!(band_contribution(&weights.fasting_glucose, 140.0), 20.0);
        assert_eq!(band_contribution(&weights.fasting_glucose, 141.0), 40.0);
        assert_eq!(band_contribution(&weights.body_mass_index, 31.0), 30.0);
    }

    #[test]
    fn breakdown_lists_base_and_non_zero_factors() {
        let breakdown = Scorer::new().weighted_sum(&scenario_a());
        let factors: Vec<_> = breakdown.contributions.iter().map(|c| c.factor).collect();
        assert_eq!(
            factors,
            vec![RiskFactor::Base, RiskFactor::Age, RiskFactor::Sex]
        );
        assert!((breakdown.weighted_sum - 25.5).abs() < 1e-9);
    }

    #[test]
    fn evaluate_without_jitter_matches_weighted_sum() {
        let assessment = evaluate(&scenario_a(), Jitter::Off);
        assert_eq!(assessment.probability_percent, 25.5);
        assert_eq!(assessment.risk_tier, RiskTier::Medium);
        assert_eq!(
            assessment.recommendations.len(),
            RiskTier::Medium.recommendations().len()
        );
    }

    #[test]
    fn fixed_jitter_is_bounded_by_amplitude() {
        let scorer = Scorer::new();
        let assessment = scorer.evaluate(&scenario_a(), Jitter::Fixed(10.0));
        assert_eq!(assessment.breakdown.jitter, 3.0);
        assert_eq!(assessment.probability_percent, 28.5);

        let assessment = scorer.evaluate(&scenario_a(), Jitter::Fixed(-1.25));
        assert_eq!(assessment.probability_percent, 24.3);
        assert_eq!(assessment.risk_tier, RiskTier::Low);
    }

    #[test]
    fn probability_is_clamped_at_both_ends() {
        let high = ScoreBreakdown {
            weighted_sum: 180.0,
            jitter: 0.0,
            contributions: Vec::new(),
        };
        assert_eq!(high.probability_percent(), PROBABILITY_CEILING);

        let low = ScoreBreakdown {
            weighted_sum: -4.0,
            jitter: -3.0,
            contributions: Vec::new(),
        };
        assert_eq!(low.probability_percent(), PROBABILITY_FLOOR);
    }

    #[test]
    fn probability_rounds_to_one_decimal() {
        let breakdown = ScoreBreakdown {
            weighted_sum: 33.333,
            jitter: 0.0,
            contributions: Vec::new(),
        };
        assert_eq!(breakdown.probability_percent(), 33.3);
    }

    #[test]
    fn config_validation_rejects_negative_weight() {
        let mut config = ScoringConfig::default();
        config.weights.smoker = -1.0;
        let err = Scorer::with_config(config).expect_err("negative weight");
        assert_eq!(
            err,
            ConfigValidationError::NegativeWeight {
                name: "smoker".into(),
                value: -1.0
            }
        );
    }

    #[test]
    fn config_validation_rejects_bad_jitter_and_thresholds() {
        let config = ScoringConfig {
            jitter_amplitude: 4.0,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidJitterAmplitude { .. })
        ));

        let config = ScoringConfig {
            thresholds: RiskThresholds {
                medium: 60.0,
                high: 40.0,
            },
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn config_validation_allows_negative_base_and_reports_nan() {
        let mut config = ScoringConfig::default();
        config.weights.base = -10.0;
        assert!(config.validate().is_ok());

        config.weights.age.pivot = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NonFinite { name, .. }) if name == "age.pivot"
        ));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{ "weights": { "smoker": 20.0 }, "jitter_amplitude": 1.0 }"#)
                .unwrap();
        assert_eq!(config.weights.smoker, 20.0);
        assert_eq!(config.weights.hypertension, 18.0);
        assert_eq!(config.thresholds, RiskThresholds::default());
        assert_eq!(config.jitter_amplitude, 1.0);
    }
}
