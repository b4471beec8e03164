use clap::Parser;
use objfind::image::io::{list_dir, load_color, load_dir, save};
use objfind::lowlevel::OrbConfig;
use objfind::{
    binary_masks, extract_objects_from_path, mask_comparison_grid, match_and_visualize,
    match_multiscale, Detection, FeatureMatchConfig, MaskConfig, MatchSummary, Metric,
    MultiScaleConfig, Raster, VocAnnotation,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "objfind CLI (JSON config driven)")]
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
    /// Enable tracing output (skipped inputs, per-template diagnostics).
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Task {
    #[default]
    Multiscale,
    Orb,
    Mask,
    Labels,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    Zncc,
    Ssd,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Zncc => Metric::Zncc,
            MetricConfig::Ssd => Metric::Ssd,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MultiScaleConfigJson {
    scale_range: (f64, f64),
    scale_steps: usize,
    threshold_value: u8,
    metric: MetricConfig,
    parallel: bool,
    min_var_i: f64,
    box_thickness: i32,
}

impl Default for MultiScaleConfigJson {
    fn default() -> Self {
        let cfg = MultiScaleConfig::default();
        Self {
            scale_range: cfg.scale_range,
            scale_steps: cfg.scale_steps,
            threshold_value: cfg.threshold_value,
            metric: MetricConfig::Zncc,
            parallel: cfg.parallel,
            min_var_i: cfg.min_var_i,
            box_thickness: cfg.box_thickness,
        }
    }
}

impl From<MultiScaleConfigJson> for MultiScaleConfig {
    fn from(value: MultiScaleConfigJson) -> Self {
        Self {
            scale_range: value.scale_range,
            scale_steps: value.scale_steps,
            threshold_value: value.threshold_value,
            metric: value.metric.into(),
            parallel: value.parallel,
            min_var_i: value.min_var_i,
            box_thickness: value.box_thickness,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OrbConfigJson {
    n_features: usize,
    scale_factor: f32,
    n_levels: usize,
    fast_threshold: u8,
    edge_threshold: usize,
    patch_size: usize,
    min_good_match_count: usize,
    ratio_test_thresh: f32,
    parallel: bool,
}

impl Default for OrbConfigJson {
    fn default() -> Self {
        let cfg = FeatureMatchConfig::default();
        Self {
            n_features: cfg.orb.n_features,
            scale_factor: cfg.orb.scale_factor,
            n_levels: cfg.orb.n_levels,
            fast_threshold: cfg.orb.fast_threshold,
            edge_threshold: cfg.orb.edge_threshold,
            patch_size: cfg.orb.patch_size,
            min_good_match_count: cfg.min_good_match_count,
            ratio_test_thresh: cfg.ratio_test_thresh,
            parallel: cfg.parallel,
        }
    }
}

impl From<OrbConfigJson> for FeatureMatchConfig {
    fn from(value: OrbConfigJson) -> Self {
        Self {
            orb: OrbConfig {
                n_features: value.n_features,
                scale_factor: value.scale_factor,
                n_levels: value.n_levels,
                fast_threshold: value.fast_threshold,
                edge_threshold: value.edge_threshold,
                patch_size: value.patch_size,
                ..OrbConfig::default()
            },
            min_good_match_count: value.min_good_match_count,
            ratio_test_thresh: value.ratio_test_thresh,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MaskConfigJson {
    threshold_value: u8,
    max_value: u8,
    inverted: bool,
    max_display: usize,
}

impl Default for MaskConfigJson {
    fn default() -> Self {
        let cfg = MaskConfig::default();
        Self {
            threshold_value: cfg.threshold_value,
            max_value: cfg.max_value,
            inverted: cfg.inverted,
            max_display: 5,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    task: Task,
    image_path: String,
    templates_dir: String,
    label_paths: Vec<String>,
    output_path: Option<String>,
    output_dir: Option<String>,
    multiscale: MultiScaleConfigJson,
    orb: OrbConfigJson,
    mask: MaskConfigJson,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    template: String,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    scale: f64,
    score: f32,
}

#[derive(Debug, Serialize)]
struct SummaryRecord {
    template: String,
    num_keypoints_template: usize,
    num_keypoints_image: usize,
    num_good_matches: usize,
}

#[derive(Debug, Serialize)]
struct MaskRecord {
    template: String,
    width: usize,
    height: usize,
    active_pixels: usize,
}

#[derive(Debug, Serialize)]
struct ObjectRecord {
    name: String,
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

#[derive(Debug, Serialize)]
struct LabelRecord {
    path: String,
    filename: Option<String>,
    objects: Vec<ObjectRecord>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "task", rename_all = "snake_case")]
enum Output {
    Multiscale {
        locations: Vec<(usize, usize)>,
        detections: Vec<DetectionRecord>,
    },
    Orb {
        matches: Vec<SummaryRecord>,
    },
    Mask {
        masks: Vec<Option<MaskRecord>>,
    },
    Labels {
        documents: Vec<LabelRecord>,
    },
}

fn file_name(paths: &[PathBuf], idx: usize) -> String {
    paths
        .get(idx)
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn require(value: &str, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    if value.is_empty() {
        return Err(format!("{what} must be set in the config").into());
    }
    Ok(())
}

fn save_into(
    dir: Option<&str>,
    name: &str,
    raster: &Raster,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = dir {
        fs::create_dir_all(dir)?;
        let path = Path::new(dir).join(name);
        save(&path, raster)?;
        tracing::info!(path = %path.display(), "saved image");
    }
    Ok(())
}

fn run_multiscale(config: Config) -> Result<Output, Box<dyn std::error::Error>> {
    require(&config.image_path, "image_path")?;
    require(&config.templates_dir, "templates_dir")?;
    let image = load_color(&config.image_path)?;
    let names = list_dir(&config.templates_dir)?;
    let templates = load_dir(&config.templates_dir)?;

    let cfg: MultiScaleConfig = config.multiscale.into();
    let out = match_multiscale(&image, &templates, &cfg)?;
    save_into(config.output_dir.as_deref(), "multiscale.png", &out.annotated)?;

    let record = |det: &Detection| DetectionRecord {
        template: file_name(&names, det.template_idx),
        x: det.x,
        y: det.y,
        width: det.width,
        height: det.height,
        scale: det.scale,
        score: det.score,
    };
    Ok(Output::Multiscale {
        locations: out.locations,
        detections: out.detections.iter().map(record).collect(),
    })
}

fn run_orb(config: Config) -> Result<Output, Box<dyn std::error::Error>> {
    require(&config.image_path, "image_path")?;
    require(&config.templates_dir, "templates_dir")?;
    let image = load_color(&config.image_path)?;
    let names = list_dir(&config.templates_dir)?;
    let templates = load_dir(&config.templates_dir)?;

    let cfg: FeatureMatchConfig = config.orb.into();
    let out = match_and_visualize(&image, &templates, &cfg)?;
    for (summary, vis) in out.summaries.iter().zip(&out.visualizations) {
        let name = format!("matches_{}.png", summary.template_idx);
        save_into(config.output_dir.as_deref(), &name, vis)?;
    }

    let record = |s: &MatchSummary| SummaryRecord {
        template: file_name(&names, s.template_idx),
        num_keypoints_template: s.num_keypoints_template,
        num_keypoints_image: s.num_keypoints_image,
        num_good_matches: s.num_good_matches,
    };
    Ok(Output::Orb {
        matches: out.summaries.iter().map(record).collect(),
    })
}

fn run_mask(config: Config) -> Result<Output, Box<dyn std::error::Error>> {
    require(&config.templates_dir, "templates_dir")?;
    let names = list_dir(&config.templates_dir)?;
    let templates = load_dir(&config.templates_dir)?;

    let cfg = MaskConfig {
        threshold_value: config.mask.threshold_value,
        max_value: config.mask.max_value,
        inverted: config.mask.inverted,
    };
    let masks: Vec<Option<Raster>> = binary_masks(&templates, cfg)
        .into_iter()
        .map(|mask| mask.map(Raster::from_gray))
        .collect();

    if !templates.is_empty() {
        let grid = mask_comparison_grid(&templates, &masks, config.mask.max_display)?;
        save_into(config.output_dir.as_deref(), "masks.png", &grid)?;
    }

    let records: Vec<Option<MaskRecord>> = masks
        .iter()
        .enumerate()
        .map(|(idx, mask)| {
            mask.as_ref().map(|mask| MaskRecord {
                template: file_name(&names, idx),
                width: mask.width(),
                height: mask.height(),
                active_pixels: mask.data().iter().filter(|&&v| v != 0).count(),
            })
        })
        .collect();
    Ok(Output::Mask { masks: records })
}

fn run_labels(config: Config) -> Result<Output, Box<dyn std::error::Error>> {
    if config.label_paths.is_empty() {
        return Err("label_paths must list at least one file".into());
    }
    let mut documents = Vec::with_capacity(config.label_paths.len());
    for path in &config.label_paths {
        let VocAnnotation { filename, objects } = extract_objects_from_path(path)?;
        documents.push(LabelRecord {
            path: path.clone(),
            filename,
            objects: objects
                .into_iter()
                .map(|obj| ObjectRecord {
                    name: obj.name,
                    xmin: obj.bbox.xmin,
                    ymin: obj.bbox.ymin,
                    xmax: obj.bbox.xmax,
                    ymax: obj.bbox.ymax,
                })
                .collect(),
        });
    }
    Ok(Output::Labels { documents })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("objfind=info".parse()?)
                    .add_directive("objfind_cli=info".parse()?),
            )
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
    let output_path = config.output_path.clone();
    tracing::info!(task = ?config.task, "running task");

    let output = match config.task {
        Task::Multiscale => run_multiscale(config)?,
        Task::Orb => run_orb(config)?,
        Task::Mask => run_mask(config)?,
        Task::Labels => run_labels(config)?,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match output_path {
        Some(path) => {
            fs::write(&path, json)?;
            tracing::info!(path = %path, "wrote result");
        }
        None => println!("{json}"),
    }

    Ok(())
}
