// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Platform option sets and their decoding from option names sent over the channel
//!
//! Every option set is a bit set with the raw values of the platform. Names are decoded through a
//! static table which is built on first use. Unknown names don't contribute any flag, so that the
//! application layer can send option names this version does not know about.

use std::{collections::HashMap, fmt, ops, sync::LazyLock};

use serde::{Deserialize, Deserializer};
use tracing::debug;

macro_rules! option_set {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal {
            $($flag:ident = $bits:literal => $option_name:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            $(pub const $flag: Self = Self($bits);)+

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            /// Looks up a single option by name.
            ///
            /// Accepts the bare name (`"destructive"`) as well as the name qualified with the
            /// platform type (`"UNNotificationActionOptions.destructive"`).
            pub fn from_name(name: &str) -> Option<Self> {
                static TABLE: LazyLock<HashMap<&'static str, $name>> = LazyLock::new(|| {
                    HashMap::from([$(($option_name, $name::$flag),)+])
                });
                let name = name.strip_prefix(concat!($prefix, ".")).unwrap_or(name);
                TABLE.get(name).copied()
            }

            /// Unions all known options; unknown names are skipped.
            pub fn from_names<I, S>(names: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: AsRef<str>,
            {
                names.into_iter().fold(Self::empty(), |options, name| {
                    let name = name.as_ref();
                    match Self::from_name(name) {
                        Some(option) => options | option,
                        None => {
                            debug!(option = name, kind = $prefix, "skipping unknown option");
                            options
                        }
                    }
                })
            }
        }

        impl ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.insert(rhs);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut set = f.debug_set();
                $(
                    if self.contains(Self::$flag) {
                        set.entry(&$option_name);
                    }
                )+
                set.finish()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let names = Vec::<String>::deserialize(deserializer)?;
                Ok(Self::from_names(names))
            }
        }
    };
}

option_set! {
    /// Kinds of permissions requested from the user.
    AuthorizationOptions, "UNAuthorizationOptions" {
        BADGE = 1 => "badge",
        SOUND = 2 => "sound",
        ALERT = 4 => "alert",
        CAR_PLAY = 8 => "carPlay",
        CRITICAL_ALERT = 16 => "criticalAlert",
        PROVIDES_APP_NOTIFICATION_SETTINGS = 32 => "providesAppNotificationSettings",
        PROVISIONAL = 64 => "provisional",
    }
}

option_set! {
    /// How a notification is presented while the app is in the foreground.
    PresentationOptions, "UNNotificationPresentationOptions" {
        BADGE = 1 => "badge",
        SOUND = 2 => "sound",
        ALERT = 4 => "alert",
        LIST = 8 => "list",
        BANNER = 16 => "banner",
    }
}

option_set! {
    CategoryOptions, "UNNotificationCategoryOptions" {
        CUSTOM_DISMISS_ACTION = 1 => "customDismissAction",
        ALLOW_IN_CAR_PLAY = 2 => "allowInCarPlay",
        HIDDEN_PREVIEWS_SHOW_TITLE = 4 => "hiddenPreviewsShowTitle",
        HIDDEN_PREVIEWS_SHOW_SUBTITLE = 8 => "hiddenPreviewsShowSubtitle",
        ALLOW_ANNOUNCEMENT = 16 => "allowAnnouncement",
    }
}

option_set! {
    ActionOptions, "UNNotificationActionOptions" {
        AUTHENTICATION_REQUIRED = 1 => "authenticationRequired",
        DESTRUCTIVE = 2 => "destructive",
        FOREGROUND = 4 => "foreground",
    }
}
