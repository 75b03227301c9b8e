//! Configuration validation

use super::*;
use anyhow::Result;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.target_dir.as_os_str().is_empty() {
        anyhow::bail!("target folder must not be empty");
    }

    if config.threads == 0 {
        anyhow::bail!("threads must be at least 1");
    }

    if config.duration.is_zero() {
        anyhow::bail!("duration must be greater than zero");
    }

    if config.log_path.as_os_str().is_empty() {
        anyhow::bail!("log path must not be empty");
    }

    if let Some(timeout) = config.join_timeout {
        if timeout.is_zero() {
            anyhow::bail!("join_timeout must be greater than zero when set");
        }
    }

    if config.phases.is_empty() {
        anyhow::bail!("at least one phase must be selected");
    }

    if config.phases.contains(&PhaseKind::Open) && config.open_pool_size == 0 {
        anyhow::bail!("open_pool_size must be at least 1 for the open phase");
    }

    validate_payload(config)?;

    Ok(())
}

/// Validate write payload sizes for the selected write phases
fn validate_payload(config: &Config) -> Result<()> {
    let checks = [
        (PhaseKind::WriteSmall, "small_write_size", config.payload.small_write_size),
        (PhaseKind::WriteLarge, "large_write_size", config.payload.large_write_size),
    ];

    for (phase, name, size) in checks {
        if !config.phases.contains(&phase) {
            continue;
        }
        if size == 0 {
            anyhow::bail!("{} must be greater than zero", name);
        }
        if usize::try_from(size).is_err() {
            anyhow::bail!("{} ({}) does not fit in memory on this platform", name, size);
        }
    }

    Ok(())
}
