//! Offline training entrypoint: runs one train/eval/activate cycle against
//! whatever real samples are on disk (topped up with synthetic data), without
//! going through the HTTP server or its debounce scheduler. Useful for
//! bootstrapping the first model version or forcing a retrain from a cron job.

use clap::Parser;

use serpentwatch::config::Config;
use serpentwatch::persistence::{ModelRegistry, Paths, TrainingStore};
use serpentwatch::training;

#[derive(Parser, Debug)]
#[command(name = "serpentwatch-trainer", about = "Train a cheat-probability model from recorded samples")]
struct Args {
    /// Only report the active model's metrics, don't train.
    #[arg(long)]
    status: bool,

    /// Activate the freshly trained version even if it doesn't clear the
    /// usual accuracy/F1 tolerance over the current active version.
    #[arg(long)]
    force_activate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    serpentwatch::init_logging();
    let args = Args::parse();

    let config = Config::from_env();
    let paths = Paths::new(config.persistence_root.clone());
    paths.ensure_exists()?;

    let model_registry = ModelRegistry::new(paths.models_dir())?;

    if args.status {
        match model_registry.active_id()? {
            Some(id) => {
                let bundle = model_registry.load(&id)?;
                println!("active model: {id}");
                println!("{:#?}", bundle.version.metrics);
            }
            None => println!("no active model yet"),
        }
        return Ok(());
    }

    let training_store = TrainingStore::new(paths.training_samples_log());
    let real_samples = training_store.read_all().await?;
    let samples = training::assemble_training_set(&real_samples, &config.training, serpentwatch::now_millis() as u64);
    log::info!("training on {} samples ({} real)", samples.len(), real_samples.len());

    let version_id = format!("v{}", serpentwatch::now_millis());
    let outcome = training::train(&config.training, &samples, version_id, serpentwatch::now_millis() as u64)?;

    let previous = model_registry
        .active_id()?
        .and_then(|id| model_registry.load(&id).ok());
    let activates = args.force_activate
        || training::should_activate(
            &outcome.bundle.version.metrics,
            previous.as_ref().map(|b| &b.version.metrics),
            &config.training,
        );

    model_registry.persist(&outcome.bundle)?;
    println!("trained {}: {:#?}", outcome.bundle.version.id, outcome.bundle.version.metrics);

    if activates {
        model_registry.activate(&outcome.bundle.version.id)?;
        println!("activated {}", outcome.bundle.version.id);
    } else {
        println!("did not clear activation tolerance against the current active version, left inactive");
    }

    Ok(())
}
