//! operatorhub - generate Operator Lifecycle Manager format files

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, prelude::*};

mod commands;
mod error;
mod exit_codes;

use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "operatorhub")]
#[command(version)]
#[command(about = "Generate Operator Lifecycle Manager format files", long_about = None)]
#[command(after_help = "Example:\n  ./operatorhub --conf=config.yaml")]
pub struct Cli {
    /// Path to config file
    #[arg(long = "conf", default_value = "config.yaml")]
    pub conf: PathBuf,

    /// Path to installation manifests
    #[arg(long = "yaml-manifest", value_delimiter = ',')]
    pub yaml_manifest: Vec<PathBuf>,

    /// Path to the templates directory
    #[arg(long, default_value = "./templates")]
    pub templates: PathBuf,

    /// RedHat API key
    #[arg(long, env = "REDHAT_API_TOKEN", hide_env_values = true)]
    pub redhat_api_token: Option<String>,

    /// RedHat project id
    #[arg(long, env = "REDHAT_PROJECT_ID")]
    pub redhat_project_id: Option<String>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

fn init_logging(debug: bool) {
    let default = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    let logger = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter);

    tracing_subscriber::registry().with(logger).init();
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
        .and_then(|runtime| runtime.block_on(commands::generate::run(&cli)));

    if let Err(err) = result {
        if let Some(images) = err.candidate_images() {
            eprint!("\n{}", operatorhub_fetch::candidates_table(images));
        }
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
