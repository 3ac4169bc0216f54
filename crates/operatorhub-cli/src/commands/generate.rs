//! Generate command - render the OLM bundles of every configured package

use console::style;
use operatorhub_core::{Config, build_render_params, extract_yaml_parts};
use operatorhub_engine::{BundleRenderer, Engine};
use operatorhub_fetch::{CatalogClient, ManifestSource, ReleaseDownloader};
use tracing::{debug, info};

use crate::Cli;
use crate::error::{CliError, Result};

/// Credentials for the container catalog, present only when non-empty
fn credential(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

pub async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.conf).map_err(CliError::Config)?;
    debug!(
        new_version = %config.new_version,
        packages = config.packages.len(),
        "loaded config"
    );

    // Fail on missing credentials before any network call
    let image_digest = if config.has_digest_pinning() {
        let api_key = credential(cli.redhat_api_token.as_ref()).ok_or(CliError::MissingApiKey)?;
        let project_id =
            credential(cli.redhat_project_id.as_ref()).ok_or(CliError::MissingProjectId)?;

        let catalog = CatalogClient::new().map_err(CliError::Digest)?;
        let digest = catalog
            .image_digest(api_key, project_id, &config.new_version)
            .await
            .map_err(CliError::Digest)?;
        Some(digest)
    } else {
        None
    };

    let source = ManifestSource::new(cli.yaml_manifest.clone(), &config.new_version);
    let downloader = ReleaseDownloader::new().map_err(CliError::Manifests)?;
    let stream = source.load(&downloader).await.map_err(CliError::Manifests)?;

    let extracts = extract_yaml_parts(stream.as_slice()).map_err(CliError::Extract)?;

    let renderer = BundleRenderer::new(Engine::default(), &cli.templates);
    for (index, package) in config.packages.iter().enumerate() {
        let params = build_render_params(&config, index, &extracts, image_digest.as_deref())
            .map_err(CliError::Params)?;

        let report = renderer
            .render(&params, &package.output_path)
            .map_err(CliError::Render)?;

        if report.replaced {
            println!(
                "{} {}",
                style("replaced").yellow(),
                report.version_dir.display()
            );
        }
        for file in &report.files {
            println!("{} {}", style("wrote").green(), file.display());
        }
        info!(package = %package.package_name, files = report.files.len(), "bundle rendered");
    }

    Ok(())
}
