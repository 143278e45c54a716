// SPDX-FileCopyrightText: 2024 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

mod forward;

use std::sync::Once;

use anyhow::Context;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::SubscriberExt,
    registry,
    util::{SubscriberInitExt, TryInitError},
};

pub use forward::{LogEntry, LogLevel, set_log_sink};

static INIT_LOGGER_ONCE: Once = Once::new();

/// Installs the global tracing subscriber.
///
/// Logs are written to stderr and forwarded to the sink registered with [`set_log_sink`]. Calling
/// this more than once has no effect.
pub fn init_logger() -> anyhow::Result<()> {
    let is_logger_initialized = INIT_LOGGER_ONCE.is_completed();

    let mut result = Ok(());
    INIT_LOGGER_ONCE.call_once(|| {
        result = do_init_logger().context("failed to init logger");
    });

    info!(is_logger_initialized, "init_logger");

    result
}

fn do_init_logger() -> Result<(), TryInitError> {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    registry()
        .with(env_filter)
        .with(forward::layer())
        .with(fmt::Layer::new().with_writer(std::io::stderr))
        .try_init()?;

    warn!(
        %default_level,
        "init_logger finished (deliberately output by warn level)"
    );

    Ok(())
}
