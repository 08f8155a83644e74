//! sheetline - Entry Point

use clap::Parser;
use sheetline::layout::LayoutPolicy;
use sheetline::logging::LogTarget;
use sheetline::viewport::Timeline;
use std::path::PathBuf;
use tracing::info;

/// sheetline - lay out time-coded interval tracks and report the geometry
#[derive(Parser, Debug)]
#[command(name = "sheetline")]
#[command(version)]
#[command(about = "Temporal layout and viewport engine for time-coded annotation spreadsheets")]
pub struct Args {
    /// Path to JSONL interval file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Layout policy: weak, strong or ordinal
    #[arg(short, long)]
    pub policy: Option<LayoutPolicy>,

    /// Viewport width in pixels
    #[arg(short, long)]
    pub width: Option<f64>,

    /// Zoom level between 0 (everything) and 1 (closest)
    #[arg(short, long)]
    pub zoom: Option<f64>,

    /// Time the zoom keeps fixed on screen (defaults to the needle)
    #[arg(long, requires = "zoom")]
    pub center: Option<i64>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of the configured path
    #[arg(long, conflicts_with = "log_stderr")]
    pub log_file: Option<PathBuf>,

    /// Write logs to stderr
    #[arg(long)]
    pub log_stderr: bool,
}

impl Args {
    fn log_target(&self, configured: PathBuf) -> LogTarget {
        if self.log_stderr {
            return LogTarget::Stderr;
        }
        LogTarget::File(self.log_file.clone().unwrap_or(configured))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = sheetline::config::resolve(args.config.clone(), args.policy, args.width)?;

    sheetline::logging::init(&args.log_target(config.log_file_path.clone()))?;
    info!(config = ?config, "Configuration loaded and resolved");

    let lines = sheetline::source::read_lines(args.file.clone())?;
    let (records, errors) = sheetline::integration::process_lines(lines, 1);
    if !errors.is_empty() {
        eprintln!("sheetline: skipped {} malformed line(s)", errors.len());
    }

    let built = sheetline::integration::build_sheet(&records, config.default_cell_height)?;
    let input_tracks = built.input_tracks.clone();
    let track_ends: Vec<i64> = built.tracks.iter().map(|t| t.max_offset().unwrap_or(0)).collect();

    let mut sheet = built.into_state(config.policy, config.layout_params());
    sheet.relayout()?;

    let mut timeline = Timeline::new(config.view_width)?;
    for end in track_ends {
        timeline.register_track_end(end)?;
    }
    if let Some(level) = args.zoom {
        match args.center {
            Some(center) => timeline.controller().zoom_to(level, center)?,
            None => timeline.zoom_to_needle(level)?,
        };
    }

    let viewport = timeline.viewport();
    let report = sheetline::view::LayoutReport::new(&sheet, &input_tracks, &viewport);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", sheetline::view::render_viewport_summary(&viewport));
        print!("{}", sheetline::view::render_layout_table(&report));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let err = Args::try_parse_from(["sheetline", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let err = Args::try_parse_from(["sheetline", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["sheetline"]);
        assert_eq!(args.file, None);
        assert_eq!(args.policy, None);
        assert_eq!(args.width, None);
        assert_eq!(args.zoom, None);
        assert!(!args.json);
        assert!(!args.log_stderr);
    }

    #[test]
    fn test_policy_parses_case_insensitively() {
        let args = Args::parse_from(["sheetline", "--policy", "Strong"]);
        assert_eq!(args.policy, Some(LayoutPolicy::Strong));
    }

    #[test]
    fn test_unknown_policy_rejects() {
        let err = Args::try_parse_from(["sheetline", "--policy", "diagonal"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_center_requires_zoom() {
        assert!(Args::try_parse_from(["sheetline", "--center", "500"]).is_err());
        let args = Args::parse_from(["sheetline", "--zoom", "0.5", "--center", "500"]);
        assert_eq!(args.center, Some(500));
    }

    #[test]
    fn test_log_flags_conflict() {
        assert!(Args::try_parse_from(["sheetline", "--log-stderr", "--log-file", "x.log"]).is_err());
    }

    #[test]
    fn test_log_target_prefers_cli() {
        let configured = PathBuf::from("/tmp/configured.log");
        let args = Args::parse_from(["sheetline"]);
        assert_eq!(args.log_target(configured.clone()), LogTarget::File(configured.clone()));

        let args = Args::parse_from(["sheetline", "--log-file", "mine.log"]);
        assert_eq!(args.log_target(configured.clone()), LogTarget::File(PathBuf::from("mine.log")));

        let args = Args::parse_from(["sheetline", "--log-stderr"]);
        assert_eq!(args.log_target(configured), LogTarget::Stderr);
    }

    #[test]
    fn test_policy_flows_through_config_precedence_chain() {
        use sheetline::config::{apply_cli_overrides, apply_env_overrides, merge_config, ConfigFile};

        let config_file = ConfigFile {
            policy: Some(LayoutPolicy::Ordinal),
            ..ConfigFile::default()
        };
        let merged = merge_config(Some(config_file));
        assert_eq!(merged.policy, LayoutPolicy::Ordinal);

        let with_cli = apply_cli_overrides(apply_env_overrides(merged), Some(LayoutPolicy::Strong), Some(640.0));
        assert_eq!(with_cli.policy, LayoutPolicy::Strong);
        assert_eq!(with_cli.view_width, 640.0);
    }
}
