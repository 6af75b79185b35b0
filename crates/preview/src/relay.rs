//! The cross-boundary console relay.
//!
//! The isolated context posts messages shaped
//! `{type: "console", method, args, cycle?}`. A host listener forwards each
//! raw payload into a [`RelayPort`]; the renderer drains the matching
//! [`RelayInbox`]. Tests inject synthetic payloads through the port directly.
//!
//! Every payload is stamped with a render cycle. Payloads stamped with a
//! cycle other than the current one are stale and dropped on drain.

use async_channel::{Receiver, Sender, TryRecvError, TrySendError};
use livepen_types::DiagnosticKind;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Placeholder for arguments that cannot be serialized.
pub const UNSERIALIZABLE_PLACEHOLDER: &str = "[Object]";

/// The four intercepted console channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Error,
    Warn,
    Info,
}

impl ConsoleMethod {
    pub const ALL: [ConsoleMethod; 4] = [
        ConsoleMethod::Log,
        ConsoleMethod::Error,
        ConsoleMethod::Warn,
        ConsoleMethod::Info,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Error => "error",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Info => "info",
        }
    }

    pub fn kind(self) -> DiagnosticKind {
        match self {
            ConsoleMethod::Log => DiagnosticKind::Trace,
            ConsoleMethod::Error => DiagnosticKind::Error,
            ConsoleMethod::Warn => DiagnosticKind::Warning,
            ConsoleMethod::Info => DiagnosticKind::Info,
        }
    }
}

/// A well-formed console message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    pub method: ConsoleMethod,
    pub args: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_cycle"
    )]
    pub cycle: Option<u64>,
}

/// Reads a cycle stamp. JavaScript numbers may arrive as integral floats.
fn cycle_stamp(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

fn deserialize_cycle<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(cycle_stamp))
}

/// Wire envelope; the `type` tag is checked on the way in.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireMessage {
    Console(ConsoleMessage),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireMessageRef<'a> {
    Console(&'a ConsoleMessage),
}

impl ConsoleMessage {
    pub fn new(method: ConsoleMethod, args: Vec<String>) -> Self {
        Self {
            method,
            args,
            cycle: None,
        }
    }

    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    /// Parses a raw payload; anything not matching the schema yields `None`.
    pub fn parse(payload: &Value) -> Option<Self> {
        match WireMessage::deserialize(payload) {
            Ok(WireMessage::Console(message)) => Some(message),
            Err(_) => None,
        }
    }

    /// The wire form of this message.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(WireMessageRef::Console(self)).unwrap_or(Value::Null)
    }
}

/// Renders one console argument the way the console panel shows it.
///
/// Strings are used as-is, objects and arrays are pretty-printed JSON and
/// other primitives use their JSON spelling. Values that cannot be
/// serialized become [`UNSERIALIZABLE_PLACEHOLDER`].
pub fn stringify_arg<T: Serialize + ?Sized>(arg: &T) -> String {
    match serde_json::to_value(arg) {
        Ok(Value::String(s)) => s,
        Ok(value @ (Value::Object(_) | Value::Array(_))) => serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| UNSERIALIZABLE_PLACEHOLDER.to_string()),
        Ok(other) => other.to_string(),
        Err(_) => UNSERIALIZABLE_PLACEHOLDER.to_string(),
    }
}

#[derive(Debug)]
struct Envelope {
    stamp: u64,
    payload: Value,
}

/// Creates a connected port/inbox pair with the given capacity.
pub fn relay_channel(capacity: usize) -> (RelayPort, RelayInbox) {
    let (tx, rx) = async_channel::bounded(capacity.max(1));
    let cycle = Arc::new(AtomicU64::new(0));
    (
        RelayPort {
            tx,
            cycle: Arc::clone(&cycle),
        },
        RelayInbox { rx, cycle },
    )
}

/// Producer end, handed to whatever listens on the isolation boundary.
#[derive(Debug, Clone)]
pub struct RelayPort {
    tx: Sender<Envelope>,
    cycle: Arc<AtomicU64>,
}

impl RelayPort {
    /// Forwards a raw payload without waiting.
    ///
    /// A payload carrying a numeric `cycle` keeps that stamp; others are
    /// stamped with the current cycle. Returns `false` when the payload was
    /// dropped: stamped with an earlier cycle, or the channel is full or
    /// closed. Stale payloads never take up channel capacity.
    pub fn post(&self, payload: Value) -> bool {
        let current = self.cycle.load(Ordering::Acquire);
        let stamp = payload.get("cycle").and_then(cycle_stamp).unwrap_or(current);
        if stamp < current {
            trace!(
                "Dropping stale console message from cycle {} (current {})",
                stamp, current
            );
            return false;
        }
        match self.tx.try_send(Envelope { stamp, payload }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Console relay full, dropping message");
                false
            }
            Err(TrySendError::Closed(_)) => {
                trace!("Console relay closed, dropping message");
                false
            }
        }
    }

    /// Posts a typed message.
    pub fn post_message(&self, message: &ConsoleMessage) -> bool {
        self.post(message.to_value())
    }

    pub fn current_cycle(&self) -> u64 {
        self.cycle.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer end, owned by the renderer.
#[derive(Debug)]
pub struct RelayInbox {
    rx: Receiver<Envelope>,
    cycle: Arc<AtomicU64>,
}

impl RelayInbox {
    pub fn current_cycle(&self) -> u64 {
        self.cycle.load(Ordering::Acquire)
    }

    /// Starts a new cycle, discarding everything still queued.
    ///
    /// Returns the new cycle number.
    pub fn begin_cycle(&self) -> u64 {
        let mut discarded = 0usize;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            trace!("Discarded {} queued console messages", discarded);
        }
        self.cycle.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Removes every queued payload and returns the valid, current ones in
    /// arrival order.
    pub fn drain(&self) -> Vec<ConsoleMessage> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(envelope) => messages.extend(self.accept(envelope)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        messages
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    fn accept(&self, envelope: Envelope) -> Option<ConsoleMessage> {
        let current = self.current_cycle();
        if envelope.stamp != current {
            trace!(
                "Dropping stale console message from cycle {} (current {})",
                envelope.stamp, current
            );
            return None;
        }
        let message = ConsoleMessage::parse(&envelope.payload);
        if message.is_none() {
            trace!("Ignoring non-console message");
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_parse_valid_message() {
        let msg = ConsoleMessage::parse(&json!({
            "type": "console", "method": "warn", "args": ["a", "b"]
        }))
        .unwrap();
        assert_eq!(msg.method, ConsoleMethod::Warn);
        assert_eq!(msg.args, vec!["a", "b"]);
        assert_eq!(msg.cycle, None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let rejected = [
            json!({"type": "console", "method": "debug", "args": []}),
            json!({"type": "other", "method": "log", "args": []}),
            json!({"method": "log", "args": []}),
            json!({"type": "console", "method": "log"}),
            json!({"type": "console", "method": "log", "args": [1, 2]}),
            json!("console"),
            Value::Null,
        ];
        for payload in rejected {
            assert!(ConsoleMessage::parse(&payload).is_none(), "{payload}");
        }
    }

    #[test]
    fn test_message_round_trips_wire_shape() {
        let value = ConsoleMessage::new(ConsoleMethod::Info, vec!["x".into()]).to_value();
        assert_eq!(value, json!({"type": "console", "method": "info", "args": ["x"]}));
    }

    #[test]
    fn test_parse_accepts_float_cycle() {
        let msg = ConsoleMessage::parse(&json!({
            "type": "console", "method": "log", "args": [], "cycle": 3.0
        }))
        .unwrap();
        assert_eq!(msg.cycle, Some(3));
    }

    #[test]
    fn test_method_kind_mapping() {
        assert_eq!(ConsoleMethod::Log.kind(), DiagnosticKind::Trace);
        assert_eq!(ConsoleMethod::Info.kind(), DiagnosticKind::Info);
        assert_eq!(ConsoleMethod::Warn.kind(), DiagnosticKind::Warning);
        assert_eq!(ConsoleMethod::Error.kind(), DiagnosticKind::Error);
    }

    #[test]
    fn test_stringify_arg() {
        assert_eq!(stringify_arg("plain"), "plain");
        assert_eq!(stringify_arg(&42), "42");
        assert_eq!(stringify_arg(&true), "true");
        assert_eq!(stringify_arg(&json!(null)), "null");
        assert_eq!(stringify_arg(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_stringify_unserializable_uses_placeholder() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not JSON");
        assert_eq!(stringify_arg(&map), UNSERIALIZABLE_PLACEHOLDER);
    }

    #[test]
    fn test_drain_preserves_order_and_filters() {
        let (port, inbox) = relay_channel(8);
        inbox.begin_cycle();
        port.post(json!({"type": "console", "method": "log", "args": ["1"]}));
        port.post(json!({"type": "nope"}));
        port.post(json!({"type": "console", "method": "error", "args": ["2"]}));

        let drained = inbox.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].args, vec!["1"]);
        assert_eq!(drained[1].method, ConsoleMethod::Error);
        assert_eq!(inbox.pending(), 0);
    }

    #[test]
    fn test_stale_cycle_is_dropped() {
        let (port, inbox) = relay_channel(8);
        let first = inbox.begin_cycle();
        let second = inbox.begin_cycle();
        assert_eq!(second, first + 1);

        let old = ConsoleMessage::new(ConsoleMethod::Log, vec!["old".into()]).with_cycle(first);
        let new = ConsoleMessage::new(ConsoleMethod::Log, vec!["new".into()]).with_cycle(second);
        assert!(!port.post_message(&old));
        assert!(port.post_message(&new));

        let drained = inbox.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].args, vec!["new"]);
    }

    #[test]
    fn test_begin_cycle_discards_queue() {
        let (port, inbox) = relay_channel(8);
        port.post_message(&ConsoleMessage::new(ConsoleMethod::Log, vec!["queued".into()]));
        inbox.begin_cycle();
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn test_full_channel_drops() {
        let (port, _inbox) = relay_channel(1);
        assert!(port.post(json!({})));
        assert!(!port.post(json!({})));
    }

    #[test]
    fn test_stale_payloads_leave_capacity_for_current_cycle() {
        let (port, inbox) = relay_channel(1);
        let first = inbox.begin_cycle();
        inbox.begin_cycle();

        for _ in 0..3 {
            let stale = ConsoleMessage::new(ConsoleMethod::Log, vec!["old".into()]);
            assert!(!port.post_message(&stale.with_cycle(first)));
        }
        assert_eq!(inbox.pending(), 0);
        assert!(port.post(json!({"type": "console", "method": "log", "args": ["now"]})));
        assert_eq!(inbox.drain()[0].args, vec!["now"]);
    }

    #[test]
    fn test_closed_channel_drops() {
        let (port, inbox) = relay_channel(4);
        drop(inbox);
        assert!(port.is_closed());
        assert!(!port.post(json!({})));
    }
}
