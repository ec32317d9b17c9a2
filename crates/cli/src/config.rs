//! Resolve the effective configuration: file, then environment, then flags.

use clap::ArgMatches;
use kvadmin::{AdminConfig, Result};

/// Load configuration using the process environment.
pub fn load_config(matches: &ArgMatches) -> Result<AdminConfig> {
    load_config_with(matches, |name| std::env::var(name).ok())
}

/// Load configuration with an explicit environment lookup.
pub fn load_config_with<F>(matches: &ArgMatches, env: F) -> Result<AdminConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AdminConfig::from_toml_file(path)?,
        None => AdminConfig::default(),
    };
    config.apply_env_from(env)?;

    if let Some(host) = matches.get_one::<String>("host") {
        config.connection.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.connection.port = *port;
    }
    if let Some(password) = matches.get_one::<String>("password") {
        config.connection.password = Some(password.clone()).filter(|p| !p.is_empty());
    }
    if matches.get_flag("tls") {
        config.connection.tls = true;
    }
    if let Some(limit) = matches.get_one::<u64>("max-scan-iterations") {
        config.max_scan_iterations = Some(*limit);
    }

    config.validate()?;
    Ok(config)
}
