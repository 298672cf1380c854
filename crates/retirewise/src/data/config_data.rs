use std::path::Path;

use color_eyre::eyre::WrapErr;
use retirewise_core::ProjectionConfig;

/// Parse projection configuration from YAML.
///
/// Every section is optional; missing values fall back to defaults.
pub fn config_from_yaml(yaml: &str) -> Result<ProjectionConfig, serde_saphyr::Error> {
    serde_saphyr::from_str(yaml)
}

/// Load configuration from `path`, or defaults when no path is given
pub fn load_config(path: Option<&Path>) -> color_eyre::Result<ProjectionConfig> {
    let Some(path) = path else {
        tracing::debug!("no config file given, using default assumptions");
        return Ok(ProjectionConfig::default());
    };

    let yaml = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let config = config_from_yaml(&yaml)
        .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}
