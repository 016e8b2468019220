use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of the environment variables overriding file settings.
pub const ENV_PREFIX: &str = "PAYWALL";
const DEFAULT_CONFIG_FILE: &str = "server";

#[paywall_derive::paywall_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration object from a file overlaid with environment variables.
///
/// 1. **Base file**: `path`, or `server` in the working directory. The extension may be
///    omitted (`server` resolves `server.toml`, `server.json`, ...). A missing file is not an
///    error: every section has defaults.
/// 2. **Environment**: variables prefixed with `PAYWALL__`, nested with double underscores
///    (`PAYWALL__SERVER__PORT=8080` maps to `server.port`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file cannot be parsed or the merged values do not
/// match `T`.
///
/// # Example
/// ```rust
/// use paywall_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    load_from(&effective_path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__").try_parsing(true)
}

fn load_from<T>(path: &Path, environment: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    info!(path = %path.display(), "Loading configuration");

    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(environment)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paywall_domain::config::ApiConfig;
    use std::fs;

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        fs::write(&path, "[paywall]\nmax_page_views = 5\n\n[server]\nport = 8080\n").unwrap();

        let vars = [
            ("PAYWALL__PAYWALL__MAX_PAGE_VIEWS", "7"),
            ("PAYWALL__SESSION__COOKIE_NAME", "sid"),
            ("OTHER__SERVER__PORT", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        let config: ApiConfig = load_from(&path, environment().source(Some(vars))).unwrap();

        assert_eq!(config.paywall.max_page_views, 7);
        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.server.port, 8080);
    }
}
