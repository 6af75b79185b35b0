pub mod fixtures;

use livepen::{ConsoleMethod, InMemoryContext, PreviewRenderer, RelayPort};
use serde_json::{Value, json};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn renderer() -> PreviewRenderer<InMemoryContext> {
    init_logger();
    PreviewRenderer::new(InMemoryContext::new())
}

/// A console message as the bridging script posts it.
pub fn console_payload(method: ConsoleMethod, args: &[&str], cycle: Option<u64>) -> Value {
    let mut payload = json!({
        "type": "console",
        "method": method.as_str(),
        "args": args,
    });
    if let Some(cycle) = cycle {
        payload["cycle"] = json!(cycle);
    }
    payload
}

/// Posts `payload` as the boundary listener would.
pub fn deliver(port: &RelayPort, payload: Value) {
    assert!(port.post(payload), "relay refused a message");
}
