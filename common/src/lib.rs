// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Data model shared between the push notification bridge and the host adapters which feed it
//! with native values.

pub mod categories;
pub mod error;
pub mod options;
pub mod payload;

pub use categories::{
    ActionDescriptor, CategoryDescriptor, CategoryError, NotificationAction, NotificationCategory,
};
pub use error::{ErrorTriple, NativeError};
pub use options::{ActionOptions, AuthorizationOptions, CategoryOptions, PresentationOptions};
pub use payload::{NativeValue, NotificationPayload};
