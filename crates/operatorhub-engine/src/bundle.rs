//! OLM bundle rendering
//!
//! Output layout for one package:
//!
//! ```text
//! <output>/
//! ├── <package>.package.yaml                          (package.tpl)
//! └── <new_version>/
//!     ├── <package>.v<new_version>.clusterserviceversion.yaml   (csv.tpl)
//!     └── <lowercase crd name>.crd.yaml                  (one per CRD)
//! ```

use operatorhub_core::RenderParams;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::engine::Engine;
use crate::error::{EngineError, Result};

pub const CSV_TEMPLATE_FILE: &str = "csv.tpl";
pub const PACKAGE_TEMPLATE_FILE: &str = "package.tpl";

const CRD_FILE_SUFFIX: &str = "crd.yaml";
const CSV_FILE_SUFFIX: &str = "clusterserviceversion.yaml";
const PACKAGE_FILE_SUFFIX: &str = "package.yaml";

/// Files written for one package
#[derive(Debug, Default)]
pub struct BundleReport {
    pub version_dir: PathBuf,
    pub files: Vec<PathBuf>,
    /// Whether a previous bundle for this version was removed first
    pub replaced: bool,
}

/// Renders bundles from a template directory
pub struct BundleRenderer {
    engine: Engine,
    templates_dir: PathBuf,
}

impl BundleRenderer {
    pub fn new(engine: Engine, templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            templates_dir: templates_dir.into(),
        }
    }

    /// Write the bundle for `params` under `out_dir`
    ///
    /// An existing `<out_dir>/<new_version>` directory is deleted first, never
    /// merged into. Files written before a failure are left in place.
    pub fn render(&self, params: &RenderParams, out_dir: &Path) -> Result<BundleReport> {
        let version_dir = out_dir.join(&params.new_version);
        let mut report = BundleReport {
            version_dir: version_dir.clone(),
            ..Default::default()
        };

        if version_dir.exists() {
            warn!(path = %version_dir.display(), "removing existing bundle directory");
            std::fs::remove_dir_all(&version_dir).map_err(|source| EngineError::RemoveDir {
                path: version_dir.clone(),
                source,
            })?;
            report.replaced = true;
        }

        std::fs::create_dir_all(&version_dir).map_err(|source| EngineError::CreateDir {
            path: version_dir.clone(),
            source,
        })?;

        let csv_file = version_dir.join(format!(
            "{}.v{}.{}",
            params.package_name, params.new_version, CSV_FILE_SUFFIX
        ));
        self.render_template(params, CSV_TEMPLATE_FILE, &csv_file)?;
        report.files.push(csv_file);

        for crd in &params.crd_list {
            let crd_file = version_dir.join(format!("{}.{}", crd.name.to_lowercase(), CRD_FILE_SUFFIX));
            write_file(&crd_file, &crd.def)?;
            report.files.push(crd_file);
        }

        // shared by all versions of the package
        let package_file = out_dir.join(format!("{}.{}", params.package_name, PACKAGE_FILE_SUFFIX));
        self.render_template(params, PACKAGE_TEMPLATE_FILE, &package_file)?;
        report.files.push(package_file);

        Ok(report)
    }

    fn render_template(&self, params: &RenderParams, template: &str, out_path: &Path) -> Result<()> {
        let template_path = self.templates_dir.join(template);
        debug!(template = %template_path.display(), out = %out_path.display(), "rendering template");

        let rendered = self.engine.render_file(&template_path, params)?;
        write_file(out_path, rendered.as_bytes())
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| EngineError::Write {
        path: path.to_path_buf(),
        source,
    })
}
