// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(dead_code)]

use std::sync::{
    Arc, LazyLock,
    atomic::{AtomicBool, Ordering},
};

use airpushbridge::{
    BridgeSettings, CallResult, MethodCall, MethodResult, MpscChannel, NotificationBridge,
    NotificationService, NotificationSettings, OutboundCall,
    service::{AuthorizationCompletion, SettingsCompletion},
};
use airpushcommon::{
    AuthorizationOptions, NativeError, NativeValue, NotificationCategory, NotificationPayload,
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::EnvFilter;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    // To see the logs of the bridge, run the tests with `TEST_LOG=true`.
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_test_writer()
            .try_init();
    }
});

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    RequestAuthorization(AuthorizationOptions),
    NotificationSettings,
    RegisterForRemoteNotifications,
    UnregisterForRemoteNotifications,
    SetNotificationCategories(Vec<NotificationCategory>),
    SetBadgeCount(i64),
}

/// Notification service which records all calls and keeps completions until the test fires them.
pub struct MockNotificationService {
    delegate_installed: AtomicBool,
    calls: Mutex<Vec<ServiceCall>>,
    authorization_completions: Mutex<Vec<AuthorizationCompletion>>,
    settings_completions: Mutex<Vec<SettingsCompletion>>,
}

impl MockNotificationService {
    pub fn new(delegate_installed: bool) -> Arc<Self> {
        Arc::new(Self {
            delegate_installed: AtomicBool::new(delegate_installed),
            calls: Default::default(),
            authorization_completions: Default::default(),
            settings_completions: Default::default(),
        })
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().clone()
    }

    pub fn pending_settings_requests(&self) -> usize {
        self.settings_completions.lock().len()
    }

    /// Completes the oldest authorization request.
    pub fn complete_authorization(&self, outcome: Result<bool, NativeError>) {
        // the completion calls back into the service; don't hold the lock
        let completion = self.authorization_completions.lock().remove(0);
        completion(outcome);
    }

    /// Completes the oldest settings request.
    pub fn complete_settings(&self, settings: NotificationSettings) {
        let completion = self.settings_completions.lock().remove(0);
        completion(settings);
    }

    fn record(&self, call: ServiceCall) {
        self.calls.lock().push(call);
    }
}

impl NotificationService for MockNotificationService {
    fn is_delegate_installed(&self) -> bool {
        self.delegate_installed.load(Ordering::SeqCst)
    }

    fn request_authorization(
        &self,
        options: AuthorizationOptions,
        completion: AuthorizationCompletion,
    ) {
        self.record(ServiceCall::RequestAuthorization(options));
        self.authorization_completions.lock().push(completion);
    }

    fn notification_settings(&self, completion: SettingsCompletion) {
        self.record(ServiceCall::NotificationSettings);
        self.settings_completions.lock().push(completion);
    }

    fn register_for_remote_notifications(&self) {
        self.record(ServiceCall::RegisterForRemoteNotifications);
    }

    fn unregister_for_remote_notifications(&self) {
        self.record(ServiceCall::UnregisterForRemoteNotifications);
    }

    fn set_notification_categories(&self, categories: Vec<NotificationCategory>) {
        self.record(ServiceCall::SetNotificationCategories(categories));
    }

    fn set_badge_count(&self, count: i64) {
        self.record(ServiceCall::SetBadgeCount(count));
    }
}

pub struct TestBridge {
    pub bridge: NotificationBridge,
    pub service: Arc<MockNotificationService>,
    outbound: mpsc::UnboundedReceiver<OutboundCall>,
}

impl TestBridge {
    pub fn new() -> Self {
        Self::with_delegate(true)
    }

    pub fn with_delegate(delegate_installed: bool) -> Self {
        LazyLock::force(&TRACING);
        let (channel, outbound) = MpscChannel::new();
        let service = MockNotificationService::new(delegate_installed);
        let bridge = NotificationBridge::new(
            Arc::new(channel),
            service.clone(),
            BridgeSettings::default(),
        );
        Self {
            bridge,
            service,
            outbound,
        }
    }

    pub fn call(&self, method: &str, arguments: Value) -> oneshot::Receiver<CallResult> {
        let (result, rx) = MethodResult::channel();
        self.bridge
            .handle_method_call(MethodCall::new(method, arguments), result);
        rx
    }

    /// Next call sent to the application layer, if any.
    pub fn next_outbound(&mut self) -> Option<OutboundCall> {
        self.outbound.try_recv().ok()
    }

    /// Method names and arguments of all calls sent to the application layer so far.
    pub fn drain_outbound(&mut self) -> Vec<(String, Value)> {
        let mut calls = Vec::new();
        while let Some(call) = self.next_outbound() {
            calls.push((call.method, call.arguments));
        }
        calls
    }
}

/// User info of a remote push notification.
pub fn push_user_info(id: i64) -> NativeValue {
    NativeValue::dictionary([
        (
            NativeValue::from("aps"),
            NativeValue::dictionary([("alert", NativeValue::from(format!("message {id}")))]),
        ),
        (NativeValue::from("id"), NativeValue::from(id)),
        (NativeValue::from("thumbnail"), NativeValue::Data(vec![0xff; 4])),
    ])
}

/// User info of a local notification.
pub fn local_user_info() -> NativeValue {
    NativeValue::dictionary([("reminder", "stretch")])
}

pub fn normalized(user_info: &NativeValue) -> Value {
    NotificationPayload::normalize(user_info).into()
}
