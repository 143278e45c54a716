// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bridge between the platform push notification callbacks and the application layer
//!
//! The platform reports app lifecycle changes, device tokens and notifications as
//! [`PlatformEvent`]s. The application layer sends [`Command`]s over a [`Channel`] and receives
//! [`OutboundEvent`]s back. [`NotificationBridge`] reconciles both sides.

pub mod channel;
pub mod command;
pub mod event;
pub mod logging;
pub mod service;
pub mod settings;

mod bridge;
mod launch;

pub use bridge::NotificationBridge;
pub use channel::{
    CallResult, Channel, MethodCall, MethodResult, MpscChannel, OutboundCall, OutboundEvent, Reply,
};
pub use command::{Command, CommandError, PermissionRequest};
pub use event::{FetchResult, LaunchOptions, PlatformEvent};
pub use service::{
    AuthorizationStatus, NotificationService, NotificationSetting, NotificationSettings,
    RegisteredSettings,
};
pub use settings::BridgeSettings;
