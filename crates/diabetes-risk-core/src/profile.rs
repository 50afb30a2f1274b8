use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted age range in years (inclusive).
pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;
/// Accepted poverty index range (income-to-poverty ratio, inclusive).
pub const POVERTY_INDEX_RANGE: RangeInclusive<f64> = 0.0..=5.0;
/// Accepted fasting glucose range in mg/dL (inclusive).
pub const FASTING_GLUCOSE_RANGE: RangeInclusive<f64> = 70.0..=200.0;
/// Accepted body mass index range (inclusive).
pub const BODY_MASS_INDEX_RANGE: RangeInclusive<f64> = 15.0..=40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

/// Highest completed education bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EducationLevel {
    Higher,
    Middle,
    Low,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Higher => "higher",
            EducationLevel::Middle => "middle",
            EducationLevel::Low => "low",
        }
    }
}

/// Diabetes among biological parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FamilyHistory {
    None,
    OneParent,
    BothParents,
}

impl FamilyHistory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyHistory::None => "none",
            FamilyHistory::OneParent => "one_parent",
            FamilyHistory::BothParents => "both_parents",
        }
    }
}

macro_rules! impl_display_from_str {
    ($ty:ty, $field:literal, { $($($alias:literal)|+ => $variant:expr),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = InvalidProfile;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($($alias)|+ => Ok($variant),)+
                    _ => Err(InvalidProfile::UnknownVariant {
                        field: $field.into(),
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $ty {
            type Error = InvalidProfile;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

impl_display_from_str!(Sex, "sex", {
    "female" | "f" => Sex::Female,
    "male" | "m" => Sex::Male,
});

impl_display_from_str!(EducationLevel, "education level", {
    "higher" | "high" => EducationLevel::Higher,
    "middle" | "secondary" => EducationLevel::Middle,
    "low" | "primary" => EducationLevel::Low,
});

impl_display_from_str!(FamilyHistory, "family history", {
    "none" => FamilyHistory::None,
    "one_parent" | "one-parent" | "one" => FamilyHistory::OneParent,
    "both_parents" | "both-parents" | "both" => FamilyHistory::BothParents,
});

/// Self-reported inputs for one evaluation.
///
/// Optional fields are only collected by some intake forms; an absent value
/// never contributes to the score. Construct through [`HealthProfile::builder`]
/// or call [`HealthProfile::validate`] after deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthProfile {
    pub age: u32,
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_level: Option<EducationLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poverty_index: Option<f64>,
    pub has_health_insurance: bool,
    pub has_regular_activity: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_sufficient: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heavy_alcohol_use: Option<bool>,
    pub smokes: bool,
    pub has_hypertension: bool,
    pub has_high_cholesterol: bool,
    /// Fasting plasma glucose in mg/dL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fasting_glucose: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_mass_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_history: Option<FamilyHistory>,
}

impl HealthProfile {
    /// Start a profile with every risk factor at its favourable value.
    pub fn builder(age: u32, sex: Sex) -> HealthProfileBuilder {
        HealthProfileBuilder {
            profile: HealthProfile {
                age,
                sex,
                education_level: None,
                poverty_index: None,
                has_health_insurance: true,
                has_regular_activity: true,
                sleep_sufficient: None,
                heavy_alcohol_use: None,
                smokes: false,
                has_hypertension: false,
                has_high_cholesterol: false,
                fasting_glucose: None,
                body_mass_index: None,
                family_history: None,
            },
        }
    }

    /// Check every field against its documented domain.
    pub fn validate(&self) -> Result<(), InvalidProfile> {
        if !AGE_RANGE.contains(&self.age) {
            return Err(InvalidProfile::AgeOutOfRange { age: self.age });
        }
        check_range(
            self.poverty_index,
            &POVERTY_INDEX_RANGE,
            |value| InvalidProfile::PovertyIndexOutOfRange { value },
        )?;
        check_range(
            self.fasting_glucose,
            &FASTING_GLUCOSE_RANGE,
            |value| InvalidProfile::FastingGlucoseOutOfRange { value },
        )?;
        check_range(
            self.body_mass_index,
            &BODY_MASS_INDEX_RANGE,
            |value| InvalidProfile::BodyMassIndexOutOfRange { value },
        )?;
        Ok(())
    }
}

fn check_range(
    value: Option<f64>,
    range: &RangeInclusive<f64>,
    err: impl FnOnce(f64) -> InvalidProfile,
) -> Result<(), InvalidProfile> {
    match value {
        Some(value) if !range.contains(&value) => Err(err(value)),
        _ => Ok(()),
    }
}

/// Fluent constructor for [`HealthProfile`]; `build` validates.
#[derive(Debug, Clone)]
pub struct HealthProfileBuilder {
    profile: HealthProfile,
}

impl HealthProfileBuilder {
    pub fn education_level(mut self, level: EducationLevel) -> Self {
        self.profile.education_level = Some(level);
        self
    }

    pub fn poverty_index(mut self, index: f64) -> Self {
        self.profile.poverty_index = Some(index);
        self
    }

    pub fn health_insurance(mut self, insured: bool) -> Self {
        self.profile.has_health_insurance = insured;
        self
    }

    pub fn regular_activity(mut self, active: bool) -> Self {
        self.profile.has_regular_activity = active;
        self
    }

    pub fn sleep_sufficient(mut self, sufficient: bool) -> Self {
        self.profile.sleep_sufficient = Some(sufficient);
        self
    }

    pub fn heavy_alcohol_use(mut self, heavy: bool) -> Self {
        self.profile.heavy_alcohol_use = Some(heavy);
        self
    }

    pub fn smokes(mut self, smokes: bool) -> Self {
        self.profile.smokes = smokes;
        self
    }

    pub fn hypertension(mut self, hypertensive: bool) -> Self {
        self.profile.has_hypertension = hypertensive;
        self
    }

    pub fn high_cholesterol(mut self, high: bool) -> Self {
        self.profile.has_high_cholesterol = high;
        self
    }

    pub fn fasting_glucose(mut self, mg_dl: f64) -> Self {
        self.profile.fasting_glucose = Some(mg_dl);
        self
    }

    pub fn body_mass_index(mut self, bmi: f64) -> Self {
        self.profile.body_mass_index = Some(bmi);
        self
    }

    pub fn family_history(mut self, history: FamilyHistory) -> Self {
        self.profile.family_history = Some(history);
        self
    }

    pub fn build(self) -> Result<HealthProfile, InvalidProfile> {
        self.profile.validate()?;
        Ok(self.profile)
    }
}

/// Raised when a profile field falls outside its documented domain.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidProfile {
    #[error("age must be within 18..=100 (got {age})")]
    AgeOutOfRange { age: u32 },
    #[error("poverty index must be within 0.0..=5.0 (got {value})")]
    PovertyIndexOutOfRange { value: f64 },
    #[error("fasting glucose must be within 70.0..=200.0 mg/dL (got {value})")]
    FastingGlucoseOutOfRange { value: f64 },
    #[error("body mass index must be within 15.0..=40.0 (got {value})")]
    BodyMassIndexOutOfRange { value: f64 },
    #[error("unrecognized {field} value `{value}`")]
    UnknownVariant { field: String, value: String },
}
