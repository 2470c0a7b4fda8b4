use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, warn};

use kmeans_multi::cluster::{save_report, ClusterEngine, ControlFile, Dataset};
use kmeans_multi::Result;

#[derive(Parser, Debug)]
#[command(name = "kmeans", version, about = "Multi-attribute K-means clustering")]
struct Opts {
    /// Control file naming the input, output and clustering parameters
    control: PathBuf,
}

fn run(control_path: &Path) -> Result<()> {
    let control = ControlFile::load(control_path)?;
    if control.cluster.k < 1 {
        warn!("No clusters to send to output!");
        return Ok(());
    }

    let data = Dataset::load(&control.input, control.cluster.use_labels)?;
    let mut engine = ClusterEngine::new(control.cluster)?;
    let result = engine.execute(&data)?;
    save_report(&control.output, &result, &data)
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().filter_or("RUST_LOG", "warn"));

    let opts = Opts::parse();
    match run(&opts.control) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
