use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use edgemark::{DetectionParams, Pipeline};
use edgemark::service::{DirectInvocation, EventHandler, LocalObjectStore, ServiceConfig};

#[derive(Parser)]
#[command(name = "edgemark")]
#[command(about = "Detect feature boundaries in images and annotate them")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a single image file
    Process(ProcessArgs),
    /// Run one invocation against a directory-backed object store
    Invoke(InvokeArgs),
}

#[derive(Args)]
struct DetectionArgs {
    /// Hysteresis lower bound on gradient magnitude
    #[arg(long, default_value_t = 50.0)]
    low_threshold: f32,

    /// Hysteresis upper bound on gradient magnitude
    #[arg(long, default_value_t = 150.0)]
    high_threshold: f32,

    /// Contours must enclose more than this many square pixels
    #[arg(long, default_value_t = 100.0)]
    min_area: f64,
}

impl DetectionArgs {
    fn pipeline(&self) -> Pipeline {
        Pipeline::new(DetectionParams {
            low_threshold: self.low_threshold,
            high_threshold: self.high_threshold,
            min_contour_area: self.min_area,
            ..DetectionParams::default()
        })
    }
}

#[derive(Args)]
struct ProcessArgs {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Where to write the annotated JPEG (default: <stem>_processed.jpg next to the input)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the annotation list as JSON
    #[arg(long, value_name = "FILE")]
    annotations: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    #[command(flatten)]
    detection: DetectionArgs,
}

#[derive(Args)]
struct InvokeArgs {
    /// Root directory of the object store (<root>/<bucket>/<key>)
    #[arg(long, value_name = "DIR")]
    store_root: PathBuf,

    /// Event payload as a JSON file
    #[arg(long, value_name = "FILE", conflicts_with = "key")]
    event: Option<PathBuf>,

    /// Object key of the source image (builds a direct invocation)
    #[arg(long, required_unless_present = "event")]
    key: Option<String>,

    /// Correlation id reported back in the response
    #[arg(long, default_value = "cli")]
    image_id: String,

    /// Bucket name (default: $S3_BUCKET)
    #[arg(long)]
    bucket: Option<String>,

    #[command(flatten)]
    detection: DetectionArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    edgemark::init_tracing(cli.verbose);

    match cli.command {
        Command::Process(args) => run_process(args, cli.verbose),
        Command::Invoke(args) => run_invoke(args).await,
    }
}

fn run_process(args: ProcessArgs, verbose: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.image_path)
        .with_context(|| format!("Failed to read image {:?}", args.image_path))?;

    let mut pipeline = args.detection.pipeline();
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let result = pipeline.process(&bytes)?;

    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.image_path));
    std::fs::write(&output, &result.image)
        .with_context(|| format!("Failed to write {:?}", output))?;

    if let Some(path) = &args.annotations {
        let json = serde_json::to_string_pretty(&result.annotations)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    }

    println!("\n=== Edge Detection Results ===");
    println!("Total annotations: {}", result.annotations.len());
    println!("Annotated image: {}", output.display());
    if verbose {
        let params = pipeline.params();
        println!(
            "Thresholds: low {}, high {}, min area {}",
            params.low_threshold, params.high_threshold, params.min_contour_area
        );
    }

    if verbose && !result.annotations.is_empty() {
        println!("\nDetected boundaries:");
        for annotation in &result.annotations {
            println!(
                "  {} ({}) - {} vertices, confidence: {:.2}",
                annotation.label,
                annotation.id,
                annotation.coordinates.len(),
                annotation.confidence
            );
        }
    }

    Ok(())
}

async fn run_invoke(args: InvokeArgs) -> anyhow::Result<()> {
    let mut config = ServiceConfig::from_env();
    if args.bucket.is_some() {
        config.default_bucket = args.bucket.clone();
    }

    let payload = match (&args.event, &args.key) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read event {:?}", path))?;
            serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {:?}", path))?
        }
        (None, Some(key)) => serde_json::to_value(DirectInvocation::new(
            args.image_id.clone(),
            key.clone(),
            args.bucket.clone(),
        ))?,
        (None, None) => anyhow::bail!("Either --event or --key is required"),
    };

    let store = LocalObjectStore::new(&args.store_root, config.public_url());
    let handler = EventHandler::new(store, config).with_pipeline(args.detection.pipeline());
    let response = handler.handle(&payload).await;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        anyhow::bail!(
            "Invocation failed (store {}, default bucket {})",
            handler.store().root().display(),
            handler.config().default_bucket.as_deref().unwrap_or("<unset>")
        );
    }
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}_processed.jpg", stem))
}
