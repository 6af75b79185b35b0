//! The bridging script injected into a directly accessible preview document.
//!
//! It wraps the four console channels, keeps calling the originals, and
//! posts every call to the parent window in the relay wire format. Uncaught
//! errors and unhandled promise rejections are reported on the `error`
//! channel.
//!
//! `document.open()` keeps the window global, so a later render finds the
//! wrappers already installed. The script then only updates the cycle stamp
//! that the existing wrappers read on every call.

use crate::relay::{ConsoleMethod, UNSERIALIZABLE_PLACEHOLDER};

const TEMPLATE: &str = r#"(function () {
  window.__livepenCycle = __CYCLE__;
  if (window.__livepenOriginals) { return; }
  var originals = window.__livepenOriginals = {};
  function render(arg) {
    if (typeof arg === 'object' && arg !== null) {
      try { return JSON.stringify(arg); } catch (e) { return '__PLACEHOLDER__'; }
    }
    return String(arg);
  }
  function send(method, args) {
    try {
      window.parent.postMessage({
        type: 'console',
        method: method,
        args: Array.prototype.map.call(args, render),
        cycle: window.__livepenCycle
      }, '*');
    } catch (e) {}
  }
  __METHODS__.forEach(function (method) {
    var original = originals[method] = console[method];
    console[method] = function () {
      if (original) { original.apply(console, arguments); }
      send(method, arguments);
    };
  });
  window.addEventListener('error', function (event) {
    send('error', [event.message]);
  });
  window.addEventListener('unhandledrejection', function (event) {
    send('error', ['Unhandled rejection: ' + render(event.reason)]);
  });
})();"#;

/// Builds the bridging script for one render cycle.
pub fn bridge_script(cycle: u64) -> String {
    let methods = ConsoleMethod::ALL
        .iter()
        .map(|m| format!("'{}'", m.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    TEMPLATE
        .replace("__CYCLE__", &cycle.to_string())
        .replace("__METHODS__", &format!("[{methods}]"))
        .replace("__PLACEHOLDER__", UNSERIALIZABLE_PLACEHOLDER)
}
