// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use airpushcommon::{NativeError, NativeValue, PresentationOptions};

pub type FetchCompletion = Box<dyn FnOnce(FetchResult) + Send + 'static>;
pub type PresentationCompletion = Box<dyn FnOnce(PresentationOptions) + Send + 'static>;
pub type ResponseCompletion = Box<dyn FnOnce() + Send + 'static>;

/// Outcome of a background fetch triggered by a remote notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchResult {
    NewData,
    NoData,
    Failed,
}

impl FetchResult {
    /// Value of the corresponding `UIBackgroundFetchResult` case, to be passed to the platform
    /// completion handler.
    pub fn raw_value(self) -> u64 {
        match self {
            Self::NewData => 0,
            Self::NoData => 1,
            Self::Failed => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchOptions {
    /// User info of the remote notification which launched the app.
    pub remote_notification: Option<NativeValue>,
}

/// Callback of the platform's application and notification center delegates.
pub enum PlatformEvent {
    FinishedLaunching(LaunchOptions),
    EnteredBackground,
    BecameActive,
    RegisteredForRemoteNotifications {
        device_token: Vec<u8>,
    },
    FailedToRegisterForRemoteNotifications(NativeError),
    ReceivedRemoteNotification {
        user_info: NativeValue,
        completion: FetchCompletion,
    },
    /// A notification is about to be presented while the app is in the foreground.
    WillPresentNotification {
        user_info: NativeValue,
        completion: PresentationCompletion,
    },
    /// The user interacted with a delivered notification.
    ReceivedNotificationResponse {
        user_info: NativeValue,
        action_identifier: String,
        completion: ResponseCompletion,
    },
}

impl PlatformEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FinishedLaunching(_) => "didFinishLaunching",
            Self::EnteredBackground => "didEnterBackground",
            Self::BecameActive => "didBecomeActive",
            Self::RegisteredForRemoteNotifications { .. } => "didRegisterForRemoteNotifications",
            Self::FailedToRegisterForRemoteNotifications(_) => {
                "didFailToRegisterForRemoteNotifications"
            }
            Self::ReceivedRemoteNotification { .. } => "didReceiveRemoteNotification",
            Self::WillPresentNotification { .. } => "willPresentNotification",
            Self::ReceivedNotificationResponse { .. } => "didReceiveNotificationResponse",
        }
    }
}

impl fmt::Debug for PlatformEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FinishedLaunching(options) => {
                f.debug_tuple("FinishedLaunching").field(options).finish()
            }
            Self::RegisteredForRemoteNotifications { device_token } => f
                .debug_struct("RegisteredForRemoteNotifications")
                .field("device_token_len", &device_token.len())
                .finish(),
            Self::FailedToRegisterForRemoteNotifications(error) => f
                .debug_tuple("FailedToRegisterForRemoteNotifications")
                .field(error)
                .finish(),
            Self::ReceivedRemoteNotification { user_info, .. } => f
                .debug_struct("ReceivedRemoteNotification")
                .field("user_info", user_info)
                .finish_non_exhaustive(),
            Self::WillPresentNotification { user_info, .. } => f
                .debug_struct("WillPresentNotification")
                .field("user_info", user_info)
                .finish_non_exhaustive(),
            Self::ReceivedNotificationResponse {
                user_info,
                action_identifier,
                ..
            } => f
                .debug_struct("ReceivedNotificationResponse")
                .field("user_info", user_info)
                .field("action_identifier", action_identifier)
                .finish_non_exhaustive(),
            Self::EnteredBackground => f.write_str("EnteredBackground"),
            Self::BecameActive => f.write_str("BecameActive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_result_raw_values() {
        let results = [FetchResult::NewData, FetchResult::NoData, FetchResult::Failed];
        assert_eq!(results.map(FetchResult::raw_value), [0, 1, 2]);
    }

    #[test]
    fn debug_omits_completion() {
        let event = PlatformEvent::ReceivedRemoteNotification {
            user_info: NativeValue::Null,
            completion: Box::new(|_: FetchResult| {}),
        };
        assert_eq!(
            format!("{event:?}"),
            "ReceivedRemoteNotification { user_info: Null, .. }"
        );
        assert_eq!(event.name(), "didReceiveRemoteNotification");
    }
}
