use camfilter::features::FeatureConfig;
use camfilter::image::io::{load_frame, save_frame};
use camfilter::{
    Category, DetectorConfig, FilterChain, ImageDetector, RansacConfig, Selection, TrackedQuad,
    TrackerConfig,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "CamFilter CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FeatureConfigJson {
    fast_threshold: u8,
    max_keypoints: usize,
}

impl Default for FeatureConfigJson {
    fn default() -> Self {
        let cfg = FeatureConfig::default();
        Self {
            fast_threshold: cfg.fast_threshold,
            max_keypoints: cfg.max_keypoints,
        }
    }
}

impl From<FeatureConfigJson> for FeatureConfig {
    fn from(value: FeatureConfigJson) -> Self {
        Self {
            fast_threshold: value.fast_threshold,
            max_keypoints: value.max_keypoints,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TrackerConfigJson {
    min_matches: usize,
    absent_distance: f32,
    ambiguous_distance: f32,
    good_match_ratio: f32,
}

impl Default for TrackerConfigJson {
    fn default() -> Self {
        let cfg = TrackerConfig::default();
        Self {
            min_matches: cfg.min_matches,
            absent_distance: cfg.absent_distance,
            ambiguous_distance: cfg.ambiguous_distance,
            good_match_ratio: cfg.good_match_ratio,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RansacConfigJson {
    reproj_threshold: f32,
    max_iterations: usize,
    confidence: f64,
    seed: u64,
}

impl Default for RansacConfigJson {
    fn default() -> Self {
        let cfg = RansacConfig::default();
        Self {
            reproj_threshold: cfg.reproj_threshold,
            max_iterations: cfg.max_iterations,
            confidence: cfg.confidence,
            seed: cfg.seed,
        }
    }
}

impl From<RansacConfigJson> for RansacConfig {
    fn from(value: RansacConfigJson) -> Self {
        Self {
            reproj_threshold: value.reproj_threshold,
            max_iterations: value.max_iterations,
            confidence: value.confidence,
            seed: value.seed,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    reference_paths: Vec<String>,
    frame_paths: Vec<String>,
    output_dir: Option<String>,
    report_path: Option<String>,
    selection: [usize; 4],
    next: Vec<String>,
    features: FeatureConfigJson,
    tracker: TrackerConfigJson,
    ransac: RansacConfigJson,
}

fn detector_config(
    features: FeatureConfigJson,
    tracker: TrackerConfigJson,
    ransac: RansacConfigJson,
) -> DetectorConfig {
    DetectorConfig {
        features: features.into(),
        tracker: TrackerConfig {
            min_matches: tracker.min_matches,
            absent_distance: tracker.absent_distance,
            ambiguous_distance: tracker.ambiguous_distance,
            good_match_ratio: tracker.good_match_ratio,
            ransac: ransac.into(),
        },
        ..DetectorConfig::default()
    }
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame_path: String,
    active: Vec<String>,
    transition: Option<&'static str>,
    tracked: Option<[[f32; 2]; 4]>,
    output_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct Output {
    references_loaded: usize,
    selection: [usize; 4],
    frames: Vec<FrameRecord>,
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Loads every reference that decodes; failures become one message each.
fn load_detectors(paths: &[String], cfg: &DetectorConfig) -> (Vec<ImageDetector>, Vec<String>) {
    let mut detectors = Vec::with_capacity(paths.len());
    let mut skipped = Vec::new();
    for path in paths {
        match ImageDetector::load(file_stem(path), path, cfg.clone()) {
            Ok(detector) => detectors.push(detector),
            Err(err) => skipped.push(format!("skipping reference {path}: {err}")),
        }
    }
    (detectors, skipped)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("camfilter=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.frame_paths.is_empty() {
        return Err("frame_paths must list at least one frame".into());
    }

    let mut categories = Vec::with_capacity(config.next.len());
    for name in &config.next {
        let category =
            Category::from_name(name).ok_or_else(|| format!("unknown category in next: {name}"))?;
        categories.push(category);
    }

    let detector_cfg = detector_config(config.features, config.tracker, config.ransac);
    let (detectors, skipped) = load_detectors(&config.reference_paths, &detector_cfg);
    for message in &skipped {
        eprintln!("{message}");
    }
    let references_loaded = detectors.len();

    let mut chain = FilterChain::standard(detectors);
    chain.restore(Selection {
        indices: config.selection,
    });
    for category in categories {
        chain.select_next(category);
    }

    if let Some(dir) = &config.output_dir {
        fs::create_dir_all(dir)?;
    }

    let mut frames = Vec::with_capacity(config.frame_paths.len());
    for frame_path in &config.frame_paths {
        let mut frame = load_frame(frame_path)?;
        chain.apply_in_place(&mut frame);

        let detector = chain.active(Category::Detection).as_detector();
        let transition = detector
            .and_then(|d| d.last_transition())
            .map(|t| t.as_str());
        let tracked = match detector.map(|d| d.tracked()) {
            Some(TrackedQuad::Present(quad)) => Some(quad.corners.map(|p| [p.x, p.y])),
            _ => None,
        };

        let output_path = match &config.output_dir {
            Some(dir) => {
                let out = Path::new(dir).join(format!("{}.png", file_stem(frame_path)));
                save_frame(&frame, &out)?;
                Some(out.to_string_lossy().into_owned())
            }
            None => None,
        };

        frames.push(FrameRecord {
            frame_path: frame_path.clone(),
            active: chain
                .active_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            transition,
            tracked,
            output_path,
        });
    }

    let output = Output {
        references_loaded,
        selection: chain.selection().indices,
        frames,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
