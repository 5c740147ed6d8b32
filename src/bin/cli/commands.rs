//! Command execution for the qiming CLI.

use std::path::Path;

use anyhow::{bail, Context};
use owo_colors::OwoColorize;
use tracing::{debug, info};

use qiming_rs::core::pipeline::PoetrySource;
use qiming_rs::{NamingEngine, NamingRequest, PredueInfo, Preferences, QimingConfig};

use super::args::{
    OutputFormat, PredueArgs, RecommendArgs, ResolveArgs, SourceArgs, ValidateConfigArgs,
};
use super::output::{
    display_config_summary, display_predue_analysis, display_records, display_report, emit,
};

/// Load and validate configuration, falling back to defaults.
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<QimingConfig> {
    let config = match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            QimingConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => QimingConfig::default(),
    };
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn build_engine(sources: &SourceArgs) -> anyhow::Result<NamingEngine> {
    let engine = NamingEngine::from_files(sources.config.as_deref(), sources.data.as_deref())
        .context("Failed to initialize naming engine")?;
    Ok(engine)
}

/// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD` into a predue estimate.
pub fn parse_predue(value: &str, weeks: Option<u32>) -> anyhow::Result<PredueInfo> {
    let mut parts = value.trim().split('-');
    let mut field = |name: &str| -> anyhow::Result<Option<u32>> {
        parts
            .next()
            .map(|part| {
                part.parse::<u32>()
                    .with_context(|| format!("invalid {name} '{part}' in predue date '{value}'"))
            })
            .transpose()
    };

    let year = field("year")?.map(|y| y as i32);
    let month = field("month")?;
    let day = field("day")?;
    if year.is_none() {
        bail!("predue date '{value}' has no year");
    }
    Ok(PredueInfo {
        year,
        month,
        day,
        week_offset: weeks,
    })
}

fn build_request(args: &RecommendArgs) -> anyhow::Result<NamingRequest> {
    if let Some(path) = &args.request {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?;
        return NamingRequest::from_json(&content)
            .with_context(|| format!("Invalid request file {}", path.display()));
    }

    let (Some(surname), Some(gender)) = (&args.surname, args.gender) else {
        bail!("a family name and gender are required unless --request is given");
    };

    let mut request = NamingRequest::new(surname.clone(), gender);
    if let Some(birth) = &args.birth {
        request = request.with_birth(birth.clone());
    }
    if let Some(predue) = &args.predue {
        request = request.with_predue(parse_predue(predue, args.weeks)?);
    }

    let chars = |text: &Option<String>| -> Vec<char> {
        text.as_deref()
            .map(|t| t.chars().filter(|c| !c.is_whitespace() && *c != ',').collect())
            .unwrap_or_default()
    };
    Ok(request.with_preferences(Preferences {
        excluded_characters: chars(&args.exclude),
        required_characters: chars(&args.require),
        preferred_elements: args.prefer.clone(),
        poetry_source: args.poetry.as_ref().map(|text| PoetrySource {
            title: args.poetry_title.clone(),
            characters: text.chars().collect(),
        }),
        given_name_length: args.length.map(usize::from),
    }))
}

/// Run the naming pipeline and print the report.
pub async fn recommend_command(args: RecommendArgs) -> anyhow::Result<()> {
    let engine = build_engine(&args.sources)?;
    let request = build_request(&args)?;
    info!("Recommending names for {}", request.family_name);

    let mut report = engine.recommend(request).await?;
    if let Some(top) = args.top {
        report.candidates.truncate(top);
    }

    emit(&report, args.format, display_report)?;

    if !report.success {
        let reasons = if report.errors.is_empty() {
            &report.warnings
        } else {
            &report.errors
        };
        bail!("no names could be recommended: {}", reasons.join("; "));
    }
    Ok(())
}

/// Zodiac boundary analysis without naming.
pub async fn predue_command(args: PredueArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref())?;
    let engine = NamingEngine::new(config)?;

    let analysis = match (args.from, args.to) {
        (Some(from), Some(to)) => engine.analyze_predue_range(from, to)?,
        _ => engine.analyze_predue(&PredueInfo {
            year: args.year,
            month: args.month,
            day: args.day,
            week_offset: args.weeks,
        }),
    };

    emit(&analysis, args.format, display_predue_analysis)
}

/// Show how characters resolve against the data tables.
pub async fn resolve_command(args: ResolveArgs) -> anyhow::Result<()> {
    let engine = build_engine(&args.sources)?;
    let records = engine.resolve_characters(&args.characters);
    if records.is_empty() {
        bail!("no characters to resolve");
    }
    emit(&records, args.format, |records| display_records(records))
}

/// Print default configuration in YAML format
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default qiming configuration".dimmed());
    println!("{}", "# Save this to a file and customize as needed".dimmed());
    println!("{}", "# Usage: qiming recommend --config your-config.yml ...".dimmed());
    println!();

    let yaml_output = serde_yaml::to_string(&QimingConfig::default())?;
    println!("{}", yaml_output);

    Ok(())
}

/// Validate a configuration file
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "Validating configuration:".bright_blue().bold(),
        args.config.display().to_string().cyan()
    );
    println!();

    match load_configuration(Some(&args.config)) {
        Ok(config) => {
            println!("{}", "Configuration file is valid!".bright_green().bold());
            println!();
            display_config_summary(&config);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {:#}", "Configuration validation failed:".red(), e);
            eprintln!();
            eprintln!(
                "{}",
                "Tip: Use 'qiming print-default-config' to see valid format".dimmed()
            );
            bail!("invalid configuration: {}", args.config.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predue_date_forms() {
        let month = parse_predue("2026-02", Some(3)).unwrap();
        assert_eq!(month.year, Some(2026));
        assert_eq!(month.month, Some(2));
        assert_eq!(month.day, None);
        assert_eq!(month.week_offset, Some(3));

        let year = parse_predue("2026", None).unwrap();
        assert_eq!(year.month, None);

        assert!(parse_predue("2026-xx", None).is_err());
    }
}
