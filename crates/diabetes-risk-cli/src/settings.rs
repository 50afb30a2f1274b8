use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use diabetes_risk_core::ScoringConfig;
use tracing::debug;

/// Environment overrides look like `DIABETES_RISK__WEIGHTS__SMOKER=20`.
pub const ENV_PREFIX: &str = "DIABETES_RISK";
const ENV_SEPARATOR: &str = "__";

/// Layer an optional config file under environment overrides, then validate.
///
/// Missing keys fall back to the built-in weights, so a file only needs the
/// values it changes.
pub fn load_scoring_config(path: Option<&Path>) -> Result<ScoringConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("scoring config file {} does not exist", path.display());
        }
        builder = builder.add_source(File::from(path));
    }
    let layered = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()
        .context("failed to assemble scoring configuration")?;

    let scoring: ScoringConfig = layered
        .try_deserialize()
        .context("scoring configuration has an invalid shape")?;
    scoring
        .validate()
        .context("scoring configuration failed validation")?;
    debug!(
        source = ?path,
        jitter_amplitude = scoring.jitter_amplitude,
        "scoring configuration loaded"
    );
    Ok(scoring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diabetes_risk_core::scorer::AgeModel;
    use once_cell::sync::Lazy;
    use std::{env, fs::write, path::PathBuf, sync::Mutex};

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const SMOKER_ENV: &str = "DIABETES_RISK__WEIGHTS__SMOKER";

    fn with_env_lock<F: FnOnce()>(func: F) {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(SMOKER_ENV);
        func();
        env::remove_var(SMOKER_ENV);
    }

    fn workspace_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    #[test]
    fn defaults_without_file() {
        with_env_lock(|| {
            let config = load_scoring_config(None).expect("defaults should load");
            assert_eq!(config, ScoringConfig::default());
        });
    }

    #[test]
    fn bundled_sample_matches_defaults() {
        with_env_lock(|| {
            let path = workspace_root().join("config/scoring.toml");
            let config = load_scoring_config(Some(&path)).expect("sample config should load");
            assert_eq!(config, ScoringConfig::default());
        });
    }

    #[test]
    fn partial_file_overrides_selected_weights() {
        with_env_lock(|| {
            let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
            write(
                file.path(),
                "jitter_amplitude = 1.5\n\n[weights]\nsmoker = 20.0\n\n[weights.age]\nmodel = \"stepped\"\n",
            )
            .unwrap();

            let config = load_scoring_config(Some(file.path())).unwrap();
            assert_eq!(config.weights.smoker, 20.0);
            assert_eq!(config.weights.age.model, AgeModel::Stepped);
            assert_eq!(config.weights.hypertension, 18.0);
            assert_eq!(config.jitter_amplitude, 1.5);
        });
    }

    #[test]
    fn environment_overrides_defaults() {
        with_env_lock(|| {
            env::set_var(SMOKER_ENV, "30");
            let config = load_scoring_config(None).unwrap();
            assert_eq!(config.weights.smoker, 30.0);
        });
    }

    #[test]
    fn rejects_invalid_values() {
        with_env_lock(|| {
            let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
            write(file.path(), "[weights]\nhypertension = -5.0\n").unwrap();
            let err = load_scoring_config(Some(file.path())).expect_err("negative weight");
            assert!(format!("{err:#}").contains("hypertension"));
        });
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_scoring_config(Some(Path::new("/nonexistent/scoring.toml")))
            .expect_err("missing file");
        assert!(err.to_string().contains("does not exist"));
    }
}
