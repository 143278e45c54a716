// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::Path;

use airpushcommon::PresentationOptions;
use config::{Config, ConfigError, Environment, File, FileFormat, Map, Source};
use serde::Deserialize;

/// Prefix of environment variables overriding the settings.
///
/// E.g. `PUSHBRIDGE_PUSH_MARKER_KEY=gcm.message_id` sets [`BridgeSettings::push_marker_key`].
const ENV_PREFIX: &str = "PUSHBRIDGE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Payload field which marks a notification as a remote push notification.
    ///
    /// Notifications without it are not handled by the bridge.
    pub push_marker_key: String,
    /// Presentation of foreground notifications the application layer agreed to present.
    pub foreground_presentation: PresentationOptions,
    /// Reset the badge count when the app becomes active.
    pub reset_badge_on_activate: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            push_marker_key: "aps".to_owned(),
            foreground_presentation: PresentationOptions::ALERT | PresentationOptions::SOUND,
            reset_badge_on_activate: true,
        }
    }
}

/// Load the settings from an optional YAML file.
pub fn get_configuration(path: impl AsRef<Path>) -> Result<BridgeSettings, ConfigError> {
    get_configuration_impl(File::from(path.as_ref()).required(false), environment(None))
}

/// Load the settings from the given configuration string (in YAML format).
pub fn get_configuration_from_str(yaml: &str) -> Result<BridgeSettings, ConfigError> {
    get_configuration_impl(File::from_str(yaml, FileFormat::Yaml), environment(None))
}

/// Environment overrides, read from `variables` instead of the process environment if given.
fn environment(variables: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("foreground_presentation")
        .source(variables)
}

fn get_configuration_impl(
    source: impl Source + Send + Sync + 'static,
    environment: Environment,
) -> Result<BridgeSettings, ConfigError> {
    let builder = Config::builder()
        .add_source(source)
        .add_source(environment);
    builder.build()?.try_deserialize()
}
