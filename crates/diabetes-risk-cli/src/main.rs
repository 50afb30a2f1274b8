mod settings;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use diabetes_risk_core::{
    report::{render_assessment, render_human, OutputFormat},
    EducationLevel, FamilyHistory, HealthProfile, Jitter, RiskTier, Scorer, ScoringConfig, Sex,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "diabetes-risk",
    author,
    version,
    about = "Heuristic diabetes risk assessment"
)]
struct Cli {
    /// Scoring configuration file (TOML, YAML or JSON)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a health profile given as flags or as a profile file
    Assess(AssessArgs),
    /// Show the active scoring weights and thresholds
    Weights {
        /// Emit the configuration as JSON instead of human-readable text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// Read the profile from a YAML or JSON file instead of flags
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = [
            "age", "sex", "education", "poverty_index", "uninsured", "irregular_activity",
            "insufficient_sleep", "heavy_alcohol", "smoker", "hypertension",
            "high_cholesterol", "glucose", "bmi", "family_history",
        ]
    )]
    profile: Option<PathBuf>,

    /// Age in years (18-100)
    #[arg(long, required_unless_present = "profile")]
    age: Option<u32>,

    /// female or male
    #[arg(long, required_unless_present = "profile")]
    sex: Option<Sex>,

    /// higher, middle or low
    #[arg(long)]
    education: Option<EducationLevel>,

    /// Income-to-poverty ratio (0-5)
    #[arg(long, value_name = "RATIO")]
    poverty_index: Option<f64>,

    /// No health insurance
    #[arg(long)]
    uninsured: bool,

    /// No regular physical activity
    #[arg(long)]
    irregular_activity: bool,

    /// Usually sleeps less than needed
    #[arg(long)]
    insufficient_sleep: bool,

    /// Heavy alcohol use
    #[arg(long)]
    heavy_alcohol: bool,

    /// Current smoker
    #[arg(long)]
    smoker: bool,

    /// Diagnosed hypertension
    #[arg(long)]
    hypertension: bool,

    /// Diagnosed high cholesterol
    #[arg(long)]
    high_cholesterol: bool,

    /// Fasting glucose in mg/dL (70-200)
    #[arg(long, value_name = "MG_DL")]
    glucose: Option<f64>,

    /// Body mass index (15-40)
    #[arg(long)]
    bmi: Option<f64>,

    /// none, one_parent or both_parents
    #[arg(long)]
    family_history: Option<FamilyHistory>,

    /// off, seeded, or a fixed offset in points
    #[arg(long, default_value = "off", allow_hyphen_values = true)]
    jitter: Jitter,

    /// Emit the assessment as JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let scoring = settings::load_scoring_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Assess(args) => assess(scoring, &args)?,
        Commands::Weights { json } => print_weights(&scoring, json)?,
    }
    Ok(())
}

fn assess(scoring: ScoringConfig, args: &AssessArgs) -> Result<()> {
    let profile = match &args.profile {
        Some(path) => read_profile(path)?,
        None => profile_from_flags(args)?,
    };
    let scorer = Scorer::with_config(scoring)?;
    let assessment = scorer.evaluate(&profile, args.jitter);
    info!(
        probability = assessment.probability_percent,
        tier = %assessment.risk_tier,
        "assessment ready"
    );

    let rendered = if args.json {
        render_assessment(&assessment, OutputFormat::Json)?
    } else {
        render_human(&assessment, paint_label)?
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn profile_from_flags(args: &AssessArgs) -> Result<HealthProfile> {
    let (Some(age), Some(sex)) = (args.age, args.sex) else {
        anyhow::bail!("--age and --sex are required unless --profile is given");
    };
    let mut builder = HealthProfile::builder(age, sex)
        .health_insurance(!args.uninsured)
        .regular_activity(!args.irregular_activity)
        .smokes(args.smoker)
        .hypertension(args.hypertension)
        .high_cholesterol(args.high_cholesterol);
    if let Some(level) = args.education {
        builder = builder.education_level(level);
    }
    if let Some(index) = args.poverty_index {
        builder = builder.poverty_index(index);
    }
    if args.insufficient_sleep {
        builder = builder.sleep_sufficient(false);
    }
    if args.heavy_alcohol {
        builder = builder.heavy_alcohol_use(true);
    }
    if let Some(glucose) = args.glucose {
        builder = builder.fasting_glucose(glucose);
    }
    if let Some(bmi) = args.bmi {
        builder = builder.body_mass_index(bmi);
    }
    if let Some(history) = args.family_history {
        builder = builder.family_history(history);
    }
    Ok(builder.build()?)
}

fn read_profile(path: &Path) -> Result<HealthProfile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read profile from {}", path.display()))?;
    let profile: HealthProfile = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw)
            .with_context(|| format!("invalid JSON profile at {}", path.display()))?,
        _ => serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid YAML profile at {}", path.display()))?,
    };
    profile.validate()?;
    Ok(profile)
}

fn paint_label(tier: RiskTier, label: &str) -> String {
    match tier {
        RiskTier::Low => label.green().bold().to_string(),
        RiskTier::Medium => label.yellow().bold().to_string(),
        RiskTier::High => label.red().bold().to_string(),
    }
}

fn print_weights(scoring: &ScoringConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(scoring)?);
        return Ok(());
    }

    println!(
        "Age model: {:?} • Thresholds: medium {:.1}, high {:.1} • Jitter amplitude: {:.1}",
        scoring.weights.age.model,
        scoring.thresholds.medium,
        scoring.thresholds.high,
        scoring.jitter_amplitude
    );
    for (name, value, _) in scoring.weights.entries() {
        println!("- {name:<32} {value:>7.2}");
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
