// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Notification categories as described by the application layer

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::options::{ActionOptions, CategoryOptions};

/// Category as sent over the channel.
///
/// All fields are required: a descriptor with a missing or mistyped field is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDescriptor {
    pub identifier: String,
    pub actions: Vec<ActionDescriptor>,
    pub intent_identifiers: Vec<String>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionDescriptor {
    pub identifier: String,
    pub title: String,
    pub options: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("malformed notification categories: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl CategoryDescriptor {
    /// Strictly decodes a list of category descriptors.
    pub fn decode_all(value: Value) -> Result<Vec<Self>, CategoryError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Category in the form registered with the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCategory {
    pub identifier: String,
    pub actions: Vec<NotificationAction>,
    pub intent_identifiers: Vec<String>,
    pub options: CategoryOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub identifier: String,
    pub title: String,
    pub options: ActionOptions,
}

impl From<CategoryDescriptor> for NotificationCategory {
    fn from(descriptor: CategoryDescriptor) -> Self {
        Self {
            options: CategoryOptions::from_names(&descriptor.options),
            identifier: descriptor.identifier,
            actions: descriptor.actions.into_iter().map(From::from).collect(),
            intent_identifiers: descriptor.intent_identifiers,
        }
    }
}

impl From<ActionDescriptor> for NotificationAction {
    fn from(descriptor: ActionDescriptor) -> Self {
        Self {
            options: ActionOptions::from_names(&descriptor.options),
            identifier: descriptor.identifier,
            title: descriptor.title,
        }
    }
}
