// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use airpushcommon::{
    CategoryDescriptor, NativeError, NativeValue, NotificationCategory, NotificationPayload,
    PresentationOptions,
};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    channel::{Channel, MethodCall, MethodResult, OutboundEvent, WILL_PRESENT},
    command::{Command, CommandError, PermissionRequest},
    event::{FetchResult, PlatformEvent, PresentationCompletion, ResponseCompletion},
    launch::{LaunchNotification, ResponseDisposition},
    service::{NotificationService, NotificationSettings, RegisteredSettings},
    settings::BridgeSettings,
};

/// Payload field carrying the identifier of the action the user chose.
const ACTION_IDENTIFIER_KEY: &str = "actionIdentifier";

/// Translates between the platform notification callbacks and the application layer.
///
/// Platform callbacks and channel commands may arrive on different threads. All mutable state is
/// kept behind a single lock, which is never held while calling into the channel or the service.
///
/// The result of a command and the events it triggers reach the application layer in no
/// particular order.
#[derive(Clone)]
pub struct NotificationBridge {
    channel: Arc<dyn Channel>,
    service: Arc<dyn NotificationService>,
    settings: Arc<BridgeSettings>,
    state: Arc<Mutex<BridgeState>>,
}

#[derive(Debug, Default)]
struct BridgeState {
    launch_notification: LaunchNotification,
    resuming_from_background: bool,
}

impl NotificationBridge {
    pub fn new(
        channel: Arc<dyn Channel>,
        service: Arc<dyn NotificationService>,
        settings: BridgeSettings,
    ) -> Self {
        Self {
            channel,
            service,
            settings: Arc::new(settings),
            state: Default::default(),
        }
    }

    /// Handles a call from the application layer.
    ///
    /// Unknown methods are answered as not implemented.
    ///
    /// # Panics
    ///
    /// On malformed arguments for a known command, and if `configure` is called before the bridge
    /// is installed as notification center delegate. Both are programming errors of the caller.
    pub fn handle_method_call(&self, call: MethodCall, result: MethodResult) {
        match Command::try_from(call) {
            Ok(command) => self.handle_command(command, result),
            Err(CommandError::UnknownMethod(method)) => {
                warn!(method, "unknown method");
                result.not_implemented();
            }
            Err(error) => panic!("contract violation: {error}"),
        }
    }

    pub fn handle_command(&self, command: Command, result: MethodResult) {
        debug!(?command, "handle command");
        match command {
            Command::RequestNotificationPermissions(request) => {
                self.request_notification_permissions(request, result)
            }
            Command::Configure => self.configure(result),
            Command::GetAuthorizationStatus => self.get_authorization_status(result),
            Command::Unregister => {
                self.service.unregister_for_remote_notifications();
                result.success(Value::Null);
            }
            Command::SetNotificationCategories(categories) => {
                self.set_notification_categories(categories, result)
            }
        }
    }

    /// Handles a callback of the platform.
    ///
    /// Returns `false` if the callback is not concerned with remote push notifications; its
    /// completion is dropped without being called in that case. App launch is never vetoed.
    pub fn handle_event(&self, event: PlatformEvent) -> bool {
        debug!(event = event.name(), "handle platform event");
        match event {
            PlatformEvent::FinishedLaunching(options) => {
                match options.remote_notification {
                    Some(user_info @ NativeValue::Dictionary(_)) => {
                        let payload = NotificationPayload::normalize(&user_info);
                        info!("launched by remote notification");
                        self.state
                            .lock()
                            .launch_notification
                            .launched_with(payload);
                    }
                    Some(user_info) => {
                        warn!(
                            ?user_info,
                            "ignoring launch notification which is not a dictionary"
                        );
                    }
                    None => {}
                }
                true
            }
            PlatformEvent::EnteredBackground => {
                self.state.lock().resuming_from_background = true;
                true
            }
            PlatformEvent::BecameActive => {
                self.state.lock().resuming_from_background = false;
                if self.settings.reset_badge_on_activate {
                    // The badge is only cleared on a change of the value.
                    self.service.set_badge_count(1);
                    self.service.set_badge_count(0);
                }
                true
            }
            PlatformEvent::RegisteredForRemoteNotifications { device_token } => {
                self.channel
                    .emit(OutboundEvent::Token(hex::encode(device_token)));
                true
            }
            PlatformEvent::FailedToRegisterForRemoteNotifications(error) => {
                self.registration_failed(error);
                true
            }
            PlatformEvent::ReceivedRemoteNotification {
                user_info,
                completion,
            } => {
                let payload = NotificationPayload::normalize(&user_info);
                let resuming_from_background = self.state.lock().resuming_from_background;
                let event = if resuming_from_background {
                    OutboundEvent::BackgroundMessage(payload)
                } else {
                    OutboundEvent::Message(payload)
                };
                self.channel.emit(event);
                completion(FetchResult::NoData);
                true
            }
            PlatformEvent::WillPresentNotification {
                user_info,
                completion,
            } => self.will_present(&user_info, completion),
            PlatformEvent::ReceivedNotificationResponse {
                user_info,
                action_identifier,
                completion,
            } => self.did_receive_response(&user_info, action_identifier, completion),
        }
    }

    fn request_notification_permissions(&self, request: PermissionRequest, result: MethodResult) {
        let options = request.options();
        debug!(?options, "request authorization");

        let channel = self.channel.clone();
        let service = self.service.clone();
        self.service.request_authorization(
            options,
            Box::new(move |outcome: Result<bool, NativeError>| match outcome {
                Ok(granted) => {
                    info!(granted, "authorization request finished");
                    service.notification_settings(Box::new(
                        move |settings: NotificationSettings| {
                            let registered =
                                RegisteredSettings::new(&settings, granted, request.provisional);
                            channel.emit(OutboundEvent::SettingsRegistered(registered));
                        },
                    ));
                    result.success(granted);
                }
                Err(error) => {
                    error!(%error, "authorization request failed");
                    result.error(error.into());
                }
            }),
        );

        // Registration does not depend on the authorization decision.
        self.service.register_for_remote_notifications();
    }

    fn configure(&self, result: MethodResult) {
        assert!(
            self.service.is_delegate_installed(),
            "the bridge must be installed as notification center delegate before `configure`"
        );

        self.service.register_for_remote_notifications();

        let launch_notification = self.state.lock().launch_notification.take();
        match launch_notification {
            Some(payload) => {
                info!("delivering launch notification");
                self.channel.emit(OutboundEvent::Launch(payload));
                // The launch event answers the call; the result stays unresolved.
                drop(result);
            }
            None => result.success(Value::Null),
        }
    }

    fn get_authorization_status(&self, result: MethodResult) {
        let channel = self.channel.clone();
        self.service
            .notification_settings(Box::new(move |settings: NotificationSettings| {
                channel.emit(OutboundEvent::AuthorizationStatus(
                    settings.authorization_status,
                ));
            }));
        result.success(Value::Null);
    }

    fn set_notification_categories(
        &self,
        categories: Vec<CategoryDescriptor>,
        result: MethodResult,
    ) {
        let categories: Vec<NotificationCategory> =
            categories.into_iter().map(From::from).collect();
        debug!(count = categories.len(), "set notification categories");
        self.service.set_notification_categories(categories);
        result.success(Value::Null);
    }

    fn registration_failed(&self, error: NativeError) {
        error!(%error, "failed to register for remote notifications");
    }

    fn will_present(&self, user_info: &NativeValue, completion: PresentationCompletion) -> bool {
        let Some(payload) = self.push_payload(user_info) else {
            return false;
        };

        let channel = self.channel.clone();
        let presentation = self.settings.foreground_presentation;
        let arguments = Value::from(payload.clone());
        self.channel.invoke_method(
            WILL_PRESENT,
            arguments,
            Some(Box::new(move |reply: Value| {
                if reply == Value::Bool(true) {
                    completion(presentation);
                } else {
                    debug!(%reply, "foreground presentation declined");
                    completion(PresentationOptions::empty());
                    channel.emit(OutboundEvent::Message(payload));
                }
            })),
        );
        true
    }

    fn did_receive_response(
        &self,
        user_info: &NativeValue,
        action_identifier: String,
        completion: ResponseCompletion,
    ) -> bool {
        let Some(mut payload) = self.push_payload(user_info) else {
            return false;
        };
        payload.insert(ACTION_IDENTIFIER_KEY, action_identifier);

        let disposition = self.state.lock().launch_notification.respond(payload);
        match disposition {
            ResponseDisposition::Absorbed => {
                // The app was launched by tapping the notification; `configure` delivers it as
                // launch notification. The response is not acknowledged.
                info!("notification response replaced pending launch notification");
                drop(completion);
            }
            ResponseDisposition::Resume(payload) => {
                self.channel.emit(OutboundEvent::Resume(payload));
                completion();
            }
        }
        true
    }

    /// Normalized payload of a remote push notification, or `None` for other notifications.
    fn push_payload(&self, user_info: &NativeValue) -> Option<NotificationPayload> {
        let payload = NotificationPayload::normalize(user_info);
        if payload.contains_key(&self.settings.push_marker_key) {
            Some(payload)
        } else {
            debug!(
                marker = self.settings.push_marker_key,
                "ignoring notification without push marker"
            );
            None
        }
    }
}
