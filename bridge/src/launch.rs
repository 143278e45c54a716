// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use airpushcommon::NotificationPayload;
use tracing::warn;

/// Notification which launched the app and is not yet delivered to the application layer.
///
/// ```text
/// Awaiting   --launched with notification--> Pending
/// Pending    --configure-->                  Delivered (emits onLaunch)
/// Pending    --user response-->              Pending, payload replaced
/// Awaiting,
/// Delivered  --user response-->              unchanged (emits onResume)
/// ```
///
/// Once delivered, the slot is never filled again.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum LaunchNotification {
    #[default]
    Awaiting,
    Pending(NotificationPayload),
    Delivered,
}

/// What to do with a notification response.
#[derive(Debug, PartialEq)]
pub(crate) enum ResponseDisposition {
    /// The response replaced the pending launch notification.
    Absorbed,
    /// No launch notification is pending; the response is delivered directly.
    Resume(NotificationPayload),
}

impl LaunchNotification {
    pub(crate) fn launched_with(&mut self, payload: NotificationPayload) {
        match self {
            Self::Awaiting => *self = Self::Pending(payload),
            Self::Pending(_) | Self::Delivered => {
                warn!(state = ?self, "ignoring repeated launch notification");
            }
        }
    }

    /// Takes the pending notification for delivery.
    pub(crate) fn take(&mut self) -> Option<NotificationPayload> {
        match std::mem::take(self) {
            Self::Pending(payload) => {
                *self = Self::Delivered;
                Some(payload)
            }
            state => {
                *self = state;
                None
            }
        }
    }

    pub(crate) fn respond(&mut self, payload: NotificationPayload) -> ResponseDisposition {
        match self {
            Self::Pending(pending) => {
                *pending = payload;
                ResponseDisposition::Absorbed
            }
            Self::Awaiting | Self::Delivered => ResponseDisposition::Resume(payload),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;
    use serde_json::json;

    use super::*;

    fn payload(id: i64) -> NotificationPayload {
        let mut payload = NotificationPayload::default();
        payload.insert("id", json!(id));
        payload
    }

    #[test]
    fn delivered_once() {
        let mut launch = LaunchNotification::default();
        launch.launched_with(payload(1));
        assert!(launch.is_pending());

        assert_eq!(launch.take(), Some(payload(1)));
        assert_eq!(launch, LaunchNotification::Delivered);
        assert_eq!(launch.take(), None);

        launch.launched_with(payload(2));
        assert_eq!(launch, LaunchNotification::Delivered);
    }

    #[test]
    fn response_replaces_pending() {
        let mut launch = LaunchNotification::default();
        launch.launched_with(payload(1));

        assert_eq!(launch.respond(payload(2)), ResponseDisposition::Absorbed);
        assert_eq!(launch.take(), Some(payload(2)));

        assert_eq!(
            launch.respond(payload(3)),
            ResponseDisposition::Resume(payload(3))
        );
        assert_eq!(launch, LaunchNotification::Delivered);
    }

    #[test]
    fn take_without_launch_notification() {
        let mut launch = LaunchNotification::default();
        assert_eq!(launch.take(), None);
        assert_eq!(launch, LaunchNotification::Awaiting);
        assert_eq!(
            launch.respond(payload(1)),
            ResponseDisposition::Resume(payload(1))
        );
    }

    /// Replays launches, responses and `configure` calls in arbitrary order.
    #[quickcheck]
    fn launch_notification_is_delivered_at_most_once(steps: Vec<(u8, i64)>) -> bool {
        let mut launch = LaunchNotification::default();
        let mut latest = None;
        let mut deliveries = 0;
        for (step, id) in steps {
            match step % 3 {
                0 => {
                    if launch == LaunchNotification::Awaiting {
                        latest = Some(payload(id));
                    }
                    launch.launched_with(payload(id));
                }
                1 => {
                    let pending = launch.is_pending();
                    let disposition = launch.respond(payload(id));
                    let expected = if pending {
                        latest = Some(payload(id));
                        ResponseDisposition::Absorbed
                    } else {
                        ResponseDisposition::Resume(payload(id))
                    };
                    if disposition != expected {
                        return false;
                    }
                }
                _ => {
                    if let Some(delivered) = launch.take() {
                        deliveries += 1;
                        if Some(delivered) != latest.take() {
                            return false;
                        }
                    }
                }
            }
        }
        deliveries <= 1
    }
}
