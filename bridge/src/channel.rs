// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Message channel to the application layer
//!
//! The channel carries method calls in both directions. Inbound calls are answered through a
//! [`MethodResult`], outbound calls optionally receive a [`Reply`].

use std::fmt;

use airpushcommon::{ErrorTriple, NotificationPayload};
use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::service::{AuthorizationStatus, RegisteredSettings};

pub(crate) const WILL_PRESENT: &str = "willPresent";

/// Receives the answer of the application layer to an outbound call.
pub type Reply = Box<dyn FnOnce(Value) + Send + 'static>;

pub trait Channel: Send + Sync {
    /// Invokes `method` on the application layer.
    ///
    /// If `reply` is set, it is called with the answer of the application layer. It might never be
    /// called.
    fn invoke_method(&self, method: &str, arguments: Value, reply: Option<Reply>);

    /// Sends a fire-and-forget event.
    fn emit(&self, event: OutboundEvent) {
        let method = event.method();
        debug!(method, "emit event");
        self.invoke_method(method, event.into_arguments(), None);
    }
}

/// Call received from the application layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    Success(Value),
    Error(ErrorTriple),
    NotImplemented,
}

/// Answers a single inbound call.
///
/// Dropping the result without answering leaves the call unresolved.
pub struct MethodResult {
    respond: Box<dyn FnOnce(CallResult) + Send + 'static>,
}

impl fmt::Debug for MethodResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodResult").finish_non_exhaustive()
    }
}

impl MethodResult {
    pub fn new(respond: impl FnOnce(CallResult) + Send + 'static) -> Self {
        Self {
            respond: Box::new(respond),
        }
    }

    /// Result which is delivered to the returned receiver.
    ///
    /// The receiver fails with a `RecvError` if the call is left unresolved.
    pub fn channel() -> (Self, oneshot::Receiver<CallResult>) {
        let (tx, rx) = oneshot::channel();
        let result = Self::new(move |result| {
            let _ = tx.send(result);
        });
        (result, rx)
    }

    pub fn success(self, value: impl Into<Value>) {
        (self.respond)(CallResult::Success(value.into()));
    }

    pub fn error(self, error: ErrorTriple) {
        (self.respond)(CallResult::Error(error));
    }

    pub fn not_implemented(self) {
        (self.respond)(CallResult::NotImplemented);
    }
}

/// Event sent to the application layer without expecting an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    Launch(NotificationPayload),
    SettingsRegistered(RegisteredSettings),
    AuthorizationStatus(AuthorizationStatus),
    Token(String),
    BackgroundMessage(NotificationPayload),
    Message(NotificationPayload),
    Resume(NotificationPayload),
}

impl OutboundEvent {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Launch(_) => "onLaunch",
            Self::SettingsRegistered(_) => "onIosSettingsRegistered",
            Self::AuthorizationStatus(_) => "setAuthorizationStatus",
            Self::Token(_) => "onToken",
            Self::BackgroundMessage(_) => "onBackgroundMessage",
            Self::Message(_) => "onMessage",
            Self::Resume(_) => "onResume",
        }
    }

    pub fn into_arguments(self) -> Value {
        match self {
            Self::Launch(payload)
            | Self::BackgroundMessage(payload)
            | Self::Message(payload)
            | Self::Resume(payload) => payload.into(),
            Self::SettingsRegistered(settings) => json!({
                "sound": settings.sound,
                "badge": settings.badge,
                "alert": settings.alert,
                "provisional": settings.provisional,
            }),
            Self::AuthorizationStatus(status) => Value::from(status.as_str()),
            Self::Token(token) => Value::String(token),
        }
    }
}

/// Outbound call as forwarded by [`MpscChannel`].
pub struct OutboundCall {
    pub method: String,
    pub arguments: Value,
    pub reply: Option<Reply>,
}

impl fmt::Debug for OutboundCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundCall")
            .field("method", &self.method)
            .field("arguments", &self.arguments)
            .field("expects_reply", &self.reply.is_some())
            .finish()
    }
}

impl OutboundCall {
    /// Answers the call. Returns `false` if the call did not expect an answer.
    pub fn reply(self, value: Value) -> bool {
        match self.reply {
            Some(reply) => {
                reply(value);
                true
            }
            None => false,
        }
    }
}

/// Channel which forwards all outbound calls into an unbounded queue.
///
/// Hosts drain the receiving end and hand the calls to their transport.
#[derive(Clone)]
pub struct MpscChannel {
    tx: mpsc::UnboundedSender<OutboundCall>,
}

impl MpscChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Channel for MpscChannel {
    fn invoke_method(&self, method: &str, arguments: Value, reply: Option<Reply>) {
        let call = OutboundCall {
            method: method.to_owned(),
            arguments,
            reply,
        };
        if self.tx.send(call).is_err() {
            warn!(method, "channel receiver dropped; outbound call lost");
        }
    }
}
