use clap::Parser;
use env_logger::Env;
use log::{debug, info, warn};

use triangulation::{
    formatter_for, CsvFormatter, JsonFormatter, OutputFormat, ReportFormatter, TargetCollection,
    TargetReport, TargetState, TriangulationConfig, TriangulationEngine,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Triangulate landmarks from stored bearings", long_about = None)]
struct Cli {
    /// Stored target collection (JSON)
    targets_path: String,

    /// Optional triangulation config file (JSON)
    #[arg(long = "config")]
    config_path: Option<String>,

    /// Override the outlier rejection multiplier
    #[arg(long = "outlierK")]
    outlier_k: Option<f64>,

    /// Only report this target
    #[arg(long = "target")]
    target_id: Option<String>,

    /// text, json or csv
    #[arg(long = "format", default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[arg(long = "loglevel", default_value_t = String::from("info"))]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level))
        .init();

    debug!("Started with settings: {:?}", cli);

    let mut config = match &cli.config_path {
        Some(path) => TriangulationConfig::load_from_file(path)?,
        None => TriangulationConfig::default(),
    };
    if let Some(k) = cli.outlier_k {
        config = config.with_outlier_k(k);
        config.validate()?;
    }

    let collection =
        TargetCollection::load_from_file(&cli.targets_path, TriangulationEngine::new(config))?;

    let reports: Vec<TargetReport> = collection
        .iter()
        .filter(|target| cli.target_id.as_deref().map_or(true, |id| id == target.id))
        .map(|target| {
            if target.state() == TargetState::Indeterminate {
                warn!("Target '{}' has only parallel bearings", target.id);
            }
            TargetReport::from_target(target)
        })
        .collect();

    if let Some(id) = &cli.target_id {
        if reports.is_empty() {
            return Err(format!("no target with id '{}'", id).into());
        }
    }

    match cli.format {
        OutputFormat::Json => println!("{}", JsonFormatter::new().format_reports(&reports)),
        OutputFormat::Csv => {
            // One header for the whole run
            let formatter = CsvFormatter { include_header: false };
            println!("{}", CsvFormatter::header());
            for report in &reports {
                print!("{}", formatter.format_report(report));
            }
        }
        OutputFormat::Text => {
            let formatter = formatter_for(OutputFormat::Text);
            for report in &reports {
                print!("{}", formatter.format_report(report));
            }
        }
    }

    info!("Reported {} of {} targets", reports.len(), collection.len());
    Ok(())
}
