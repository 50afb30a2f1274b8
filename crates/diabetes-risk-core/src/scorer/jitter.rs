//! Deterministic jitter derived from the profile itself.
//!
//! The seeded offset is a pure function of the profile: a SHA-256 digest over
//! a canonical field encoding, whose leading eight bytes are mapped onto
//! `[-amplitude, amplitude]`. Profiles that compare equal always receive the
//! identical offset, so `-0.0` is encoded as `0.0`.

use std::str::FromStr;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::profile::HealthProfile;

/// How the scorer perturbs the weighted sum before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Jitter {
    #[default]
    Off,
    /// Offset hashed from the profile.
    Seeded,
    /// Caller-supplied offset, clamped to the configured amplitude.
    Fixed(f64),
}

impl Jitter {
    /// Resolve to a concrete offset within `[-amplitude, amplitude]`.
    pub fn resolve(&self, profile: &HealthProfile, amplitude: f64) -> f64 {
        let amplitude = amplitude.abs();
        match *self {
            Jitter::Off => 0.0,
            Jitter::Seeded => seeded_offset(profile, amplitude),
            Jitter::Fixed(offset) if offset.is_finite() => offset.clamp(-amplitude, amplitude),
            Jitter::Fixed(_) => 0.0,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("jitter must be `off`, `seeded` or a number (got `{0}`)")]
pub struct ParseJitterError(pub String);

impl FromStr for Jitter {
    type Err = ParseJitterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Jitter::Off),
            "seeded" | "seed" => Ok(Jitter::Seeded),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Jitter::Fixed)
                .ok_or_else(|| ParseJitterError(s.to_string())),
        }
    }
}

/// SHA-256 over the canonical encoding of every profile field, in declaration order.
pub fn profile_digest(profile: &HealthProfile) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(profile.age.to_be_bytes());
    put_str(&mut hasher, Some(profile.sex.as_str()));
    put_str(&mut hasher, profile.education_level.map(|level| level.as_str()));
    put_f64(&mut hasher, profile.poverty_index);
    put_bool(&mut hasher, Some(profile.has_health_insurance));
    put_bool(&mut hasher, Some(profile.has_regular_activity));
    put_bool(&mut hasher, profile.sleep_sufficient);
    put_bool(&mut hasher, profile.heavy_alcohol_use);
    put_bool(&mut hasher, Some(profile.smokes));
    put_bool(&mut hasher, Some(profile.has_hypertension));
    put_bool(&mut hasher, Some(profile.has_high_cholesterol));
    put_f64(&mut hasher, profile.fasting_glucose);
    put_f64(&mut hasher, profile.body_mass_index);
    put_str(&mut hasher, profile.family_history.map(|history| history.as_str()));
    hasher.finalize().into()
}

fn put_str(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(value) => {
            hasher.update([1u8]);
            hasher.update((value.len() as u32).to_be_bytes());
            hasher.update(value.as_bytes());
        }
        None => hasher.update([0u8]),
    }
}

fn put_bool(hasher: &mut Sha256, value: Option<bool>) {
    hasher.update([match value {
        None => 0u8,
        Some(false) => 1,
        Some(true) => 2,
    }]);
}

fn put_f64(hasher: &mut Sha256, value: Option<f64>) {
    match value {
        Some(value) => {
            // `+ 0.0` folds -0.0 onto 0.0; NaN is collapsed to one bit pattern.
            let canonical = if value.is_nan() { f64::NAN } else { value + 0.0 };
            hasher.update([1u8]);
            hasher.update(canonical.to_bits().to_be_bytes());
        }
        None => hasher.update([0u8]),
    }
}

/// Offset in `[-amplitude, amplitude]` seeded from the profile digest.
pub fn seeded_offset(profile: &HealthProfile, amplitude: f64) -> f64 {
    let digest = profile_digest(profile);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let unit = u64::from_be_bytes(head) as f64 / u64::MAX as f64;
    (unit * 2.0 - 1.0) * amplitude
}
