// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use airpushcommon::{AuthorizationOptions, CategoryDescriptor, CategoryError};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::channel::MethodCall;

/// Command sent by the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RequestNotificationPermissions(PermissionRequest),
    Configure,
    GetAuthorizationStatus,
    Unregister,
    SetNotificationCategories(Vec<CategoryDescriptor>),
}

/// Arguments of `requestNotificationPermissions`; missing kinds are not requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PermissionRequest {
    pub sound: bool,
    pub badge: bool,
    pub alert: bool,
    pub provisional: bool,
}

impl PermissionRequest {
    pub fn options(&self) -> AuthorizationOptions {
        [
            (self.sound, AuthorizationOptions::SOUND),
            (self.badge, AuthorizationOptions::BADGE),
            (self.alert, AuthorizationOptions::ALERT),
            (self.provisional, AuthorizationOptions::PROVISIONAL),
        ]
        .into_iter()
        .filter(|(requested, _)| *requested)
        .fold(AuthorizationOptions::empty(), |options, (_, option)| {
            options | option
        })
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown method `{0}`")]
    UnknownMethod(String),
    #[error("malformed arguments for `requestNotificationPermissions`: {0}")]
    MalformedPermissionRequest(#[source] serde_json::Error),
    #[error(transparent)]
    MalformedCategories(#[from] CategoryError),
}

impl TryFrom<MethodCall> for Command {
    type Error = CommandError;

    fn try_from(call: MethodCall) -> Result<Self, Self::Error> {
        let command = match call.method.as_str() {
            "requestNotificationPermissions" => {
                let request = match call.arguments {
                    Value::Null => PermissionRequest::default(),
                    arguments => serde_json::from_value(arguments)
                        .map_err(CommandError::MalformedPermissionRequest)?,
                };
                Self::RequestNotificationPermissions(request)
            }
            "configure" => Self::Configure,
            "getAuthorizationStatus" => Self::GetAuthorizationStatus,
            "unregister" => Self::Unregister,
            "setNotificationCategories" => {
                Self::SetNotificationCategories(CategoryDescriptor::decode_all(call.arguments)?)
            }
            _ => return Err(CommandError::UnknownMethod(call.method)),
        };
        Ok(command)
    }
}
