use anyhow::{Context, Result};
use chrono::Local;
use pitchside::colors::TeamFilterRegistry;
use pitchside::config;
use pitchside::pipeline::{FramePipeline, PipelineSettings};
use pitchside::replay::{self, MatchSummary};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod progress;

/// Creates a timestamped output directory and returns its path
fn create_output_dir() -> Result<String> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let output_dir = format!("./runs/{}", timestamp);
    fs::create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pitchside=info")),
        )
        .init();

    let args: cli::Args = argh::from_env();

    let settings = match &args.settings {
        Some(path) => config::load_settings(path)
            .with_context(|| format!("Failed to load settings from {}", path))?,
        None => PipelineSettings::default(),
    };
    let filters = match &args.filters {
        Some(path) => config::load_team_filters(path)
            .with_context(|| format!("Failed to load team filters from {}", path))?,
        None => TeamFilterRegistry::with_defaults(),
    };
    info!("Team filters: {:?}", filters.team_names());

    let game = config::load_teams_from_config(&args.teams, args.fps)
        .with_context(|| format!("Failed to load teams from {}", args.teams))?;
    let frames = replay::read_frames(&args.frames)?;
    let base = Path::new(&args.frames).parent().unwrap_or(Path::new("."));

    let output_dir = create_output_dir()?;
    info!("Created output directory: {}", output_dir);

    let classifier = settings.classifier(filters);
    let mut pipeline = FramePipeline::new(classifier, game, settings);
    let mut progress = progress::ReplayProgress::new(frames.len() as u64, args.fps as f64, args.headless)?;

    let mut reports = BufWriter::new(File::create(format!("{}/frames.jsonl", output_dir))?);
    replay::run_replay(&mut pipeline, &frames, base, |report| {
        serde_json::to_writer(&mut reports, report)?;
        writeln!(reports)?;
        progress.update_frame(report.team_possession.as_deref());
        Ok(())
    })?;
    reports.flush()?;
    progress.finish();

    let summary = MatchSummary::from_match(pipeline.game());
    let summary_path = format!("{}/summary.json", output_dir);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

    for team in &summary.teams {
        info!(
            "{}: {} ({:.0}%), {} passes",
            team.name,
            team.possession_time,
            team.possession_percentage * 100.0,
            team.passes
        );
    }
    info!(
        "Summary of {} frames saved to: {}",
        progress.processed_frames(),
        summary_path
    );

    Ok(())
}
