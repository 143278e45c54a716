// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Platform notification APIs used by the bridge

use airpushcommon::{AuthorizationOptions, NativeError, NotificationCategory};

pub type AuthorizationCompletion = Box<dyn FnOnce(Result<bool, NativeError>) + Send + 'static>;
pub type SettingsCompletion = Box<dyn FnOnce(NotificationSettings) + Send + 'static>;

/// Notification center and application APIs of the platform.
///
/// Completions are called by the platform at a time of its choosing, possibly never.
pub trait NotificationService: Send + Sync {
    /// Whether the bridge is installed as the delegate of the notification center.
    fn is_delegate_installed(&self) -> bool;

    fn request_authorization(
        &self,
        options: AuthorizationOptions,
        completion: AuthorizationCompletion,
    );

    fn notification_settings(&self, completion: SettingsCompletion);

    fn register_for_remote_notifications(&self);

    fn unregister_for_remote_notifications(&self);

    /// Replaces all registered categories.
    fn set_notification_categories(&self, categories: Vec<NotificationCategory>);

    fn set_badge_count(&self, count: i64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
    Provisional,
    Ephemeral,
}

impl AuthorizationStatus {
    /// Name reported to the application layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::Denied => "denied",
            Self::NotDetermined => "notDetermined",
            Self::Provisional | Self::Ephemeral => "unsupported status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSetting {
    NotSupported,
    Disabled,
    Enabled,
}

impl NotificationSetting {
    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

/// Current notification settings of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    pub authorization_status: AuthorizationStatus,
    pub sound: NotificationSetting,
    pub badge: NotificationSetting,
    pub alert: NotificationSetting,
}

/// Settings reported after a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredSettings {
    pub sound: bool,
    pub badge: bool,
    pub alert: bool,
    pub provisional: bool,
}

impl RegisteredSettings {
    /// Provisional authorization is only reported if it was requested and granted.
    pub fn new(settings: &NotificationSettings, granted: bool, provisional_requested: bool) -> Self {
        Self {
            sound: settings.sound.is_enabled(),
            badge: settings.badge.is_enabled(),
            alert: settings.alert.is_enabled(),
            provisional: granted && provisional_requested,
        }
    }
}
