pub mod profile;
pub mod report;
pub mod scorer;

pub use profile::{EducationLevel, FamilyHistory, HealthProfile, InvalidProfile, Sex};
pub use scorer::{
    evaluate, ConfigValidationError, Contribution, Jitter, RiskAssessment, RiskFactor,
    RiskThresholds, RiskTier, ScoreBreakdown, Scorer, ScoringConfig, ScoringWeights,
};
