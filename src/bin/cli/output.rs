//! Output formatting for the qiming CLI.

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use qiming_rs::core::data::CharacterRecord;
use qiming_rs::core::pipeline::PluginStatus;
use qiming_rs::core::scoring::Grade;
use qiming_rs::{NamingReport, PredueAnalysis, QimingConfig};

use super::args::OutputFormat;

/// Print `value` as JSON or YAML, or hand it to `table` for human output.
pub fn emit<T: Serialize>(
    value: &T,
    format: OutputFormat,
    table: impl Fn(&T),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Table => table(value),
    }
    Ok(())
}

fn colored_grade(grade: Grade) -> String {
    let label = grade.to_string();
    match grade {
        Grade::APlus | Grade::A => label.bright_green().bold().to_string(),
        Grade::B => label.green().to_string(),
        Grade::C => label.yellow().to_string(),
        Grade::D => label.red().to_string(),
    }
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Display a naming report as tables
pub fn display_report(report: &NamingReport) {
    if report.success {
        println!("{}", "Naming Complete".bright_green().bold());
    } else {
        println!("{}", "Naming Incomplete".bright_red().bold());
    }
    println!(
        "{} {}   {} {:.1}ms",
        "Certainty:".bold(),
        report.certainty_level,
        "Time:".bold(),
        report.execution_time_ms
    );
    if let Some(summary) = &report.summary {
        println!("{}", summary.dimmed());
    }
    println!();

    #[derive(Tabled)]
    struct CandidateRow {
        #[tabled(rename = "#")]
        rank: usize,
        name: String,
        score: String,
        grade: String,
        elements: String,
        strokes: String,
        rationale: String,
    }

    let rows: Vec<CandidateRow> = report
        .candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| CandidateRow {
            rank: index + 1,
            name: candidate.full_name.clone(),
            score: format!("{:.1}", candidate.composite),
            grade: colored_grade(candidate.grade),
            elements: candidate
                .characters
                .iter()
                .map(|r| r.element.map_or('?', |e| e.as_char()))
                .collect(),
            strokes: candidate
                .characters
                .iter()
                .map(|r| fmt_opt(r.traditional_strokes))
                .collect::<Vec<_>>()
                .join("/"),
            rationale: candidate.rationale.clone(),
        })
        .collect();

    if rows.is_empty() {
        println!("{}", "No candidates".yellow());
    } else {
        let mut table = Table::new(rows);
        table.with(TableStyle::rounded());
        println!("{}", table);
    }
    println!();

    #[derive(Tabled)]
    struct PluginRow {
        layer: u8,
        plugin: String,
        status: String,
        confidence: String,
        time: String,
    }

    let plugin_rows: Vec<PluginRow> = report
        .plugin_results
        .values()
        .map(|result| PluginRow {
            layer: result.layer,
            plugin: result.plugin_id.to_string(),
            status: match result.status {
                PluginStatus::Success => "success".green().to_string(),
                PluginStatus::Skipped => "skipped".yellow().to_string(),
                PluginStatus::Failed => "failed".red().to_string(),
            },
            confidence: format!("{:.2}", result.confidence),
            time: format!("{:.2}ms", result.duration_ms),
        })
        .collect();
    let mut table = Table::new(plugin_rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    if !report.warnings.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in &report.warnings {
            println!("  - {}", warning);
        }
    }
    if !report.errors.is_empty() {
        println!();
        println!("{}", "Errors:".red().bold());
        for error in &report.errors {
            println!("  - {}", error);
        }
    }
}

/// Display a predue boundary analysis
pub fn display_predue_analysis(analysis: &PredueAnalysis) {
    println!("{}", "Predue Boundary Analysis".bright_blue().bold());
    println!();

    #[derive(Tabled)]
    struct Row {
        field: String,
        value: String,
    }

    let mut rows = vec![
        Row {
            field: "Outcome".to_string(),
            value: format!("{:?}", analysis.outcome),
        },
        Row {
            field: "Confidence".to_string(),
            value: format!("{:.2}", analysis.confidence),
        },
        Row {
            field: "Strategy".to_string(),
            value: format!("{:?}", analysis.strategy),
        },
        Row {
            field: "Centre".to_string(),
            value: fmt_opt(analysis.center),
        },
    ];
    if let Some(range) = &analysis.range {
        rows.push(Row {
            field: "Range".to_string(),
            value: format!(
                "{} .. {}",
                fmt_opt(range.start_date()),
                fmt_opt(range.end_date())
            ),
        });
    }
    if let Some(boundary) = &analysis.boundary {
        rows.push(Row {
            field: "Crossover".to_string(),
            value: boundary.crossover_date.to_string(),
        });
        rows.push(Row {
            field: "Crosses".to_string(),
            value: boundary.crosses.to_string(),
        });
    }
    for context in &analysis.contexts {
        rows.push(Row {
            field: format!("Zodiac {}", context.zodiac),
            value: format!("{:.0}%", context.probability * 100.0),
        });
    }

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    for warning in &analysis.warnings {
        println!("  {} {}", "note:".dimmed(), warning);
    }
}

/// Display resolved character records
pub fn display_records(records: &[Arc<CharacterRecord>]) {
    #[derive(Tabled)]
    struct RecordRow {
        character: char,
        pinyin: String,
        strokes: String,
        element: String,
        radical: String,
        meaning: String,
        confidence: String,
        status: String,
    }

    let rows: Vec<RecordRow> = records
        .iter()
        .map(|record| RecordRow {
            character: record.character,
            pinyin: match (&record.pinyin, record.tone) {
                (Some(pinyin), Some(tone)) => format!("{pinyin}{tone}"),
                (Some(pinyin), None) => pinyin.clone(),
                _ => "-".to_string(),
            },
            strokes: fmt_opt(record.traditional_strokes),
            element: match record.element {
                Some(element) if record.element_derived => format!("{element}*"),
                other => fmt_opt(other),
            },
            radical: record.radical.clone().unwrap_or_else(|| "-".to_string()),
            meaning: record
                .meaning_score
                .map_or_else(|| "-".to_string(), |m| format!("{m:.0}")),
            confidence: format!("{:.2}", record.confidence),
            status: format!("{:?}", record.status),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
}

/// Summarize the main configuration values
pub fn display_config_summary(config: &QimingConfig) {
    #[derive(Tabled)]
    struct ConfigRow {
        setting: String,
        value: String,
    }

    let weights = &config.scoring.weights;
    let rows = vec![
        ConfigRow {
            setting: "Time budget".to_string(),
            value: format!("{}ms", config.pipeline.timeout_ms),
        },
        ConfigRow {
            setting: "Top candidates".to_string(),
            value: config.pipeline.top_candidates.to_string(),
        },
        ConfigRow {
            setting: "Zodiac boundary model".to_string(),
            value: format!("{:?}", config.predue.boundary_model),
        },
        ConfigRow {
            setting: "Max pool size".to_string(),
            value: config.filtering.max_pool_size.to_string(),
        },
        ConfigRow {
            setting: "Given-name length".to_string(),
            value: config.combination.given_name_length.to_string(),
        },
        ConfigRow {
            setting: "Dimension weights".to_string(),
            value: format!("{:?}", weights),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
}
