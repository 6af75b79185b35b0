//! WebAssembly integration tests.
//!
//! These tests run in a headless browser using wasm-bindgen-test.
//!
//! Run with: wasm-pack test --headless --chrome crates/wasm

use livepen_preview::{LoadPath, PreviewRenderer};
use livepen_traits::{IsolatedContext, Selection, Storage, TextInput};
use livepen_types::{DiagnosticKind, SourceBundle};
use livepen_wasm::{IframeContext, LivePen, LocalStorage, MessageBridge, TextAreaInput};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{HtmlIFrameElement, HtmlTextAreaElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount_frame(id: &str) -> HtmlIFrameElement {
    let frame: HtmlIFrameElement = document()
        .create_element("iframe")
        .unwrap()
        .dyn_into()
        .unwrap();
    frame.set_id(id);
    document().body().unwrap().append_child(&frame).unwrap();
    frame
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn test_init() {
    let version = livepen_wasm::get_version();
    assert!(!version.is_empty());
}

#[wasm_bindgen_test]
fn test_local_storage_round_trip() {
    let storage = LocalStorage::new().expect("localStorage available");
    storage.save("livepen_test_key", "value").unwrap();
    assert_eq!(
        storage.load("livepen_test_key").unwrap().as_deref(),
        Some("value")
    );
    storage.remove("livepen_test_key").unwrap();
    assert_eq!(storage.load("livepen_test_key").unwrap(), None);
}

#[wasm_bindgen_test]
fn test_iframe_direct_write_and_injection() {
    let frame = mount_frame("direct-frame");
    let mut context = IframeContext::new(frame.clone());

    context
        .write_direct("<html><head></head><body><p id=\"probe\">hi</p></body></html>")
        .unwrap();
    let inner = frame.content_document().unwrap();
    assert!(inner.get_element_by_id("probe").is_some());

    context.inject_script("window.__probe = 1;").unwrap();
    assert_eq!(inner.head().unwrap().get_elements_by_tag_name("script").length(), 1);
}

#[wasm_bindgen_test]
fn test_iframe_fallback_sets_srcdoc() {
    let frame = mount_frame("fallback-frame");
    let mut context = IframeContext::new(frame.clone());
    context.load_fallback("<p>fallback</p>");
    assert_eq!(frame.srcdoc(), "<p>fallback</p>");
}

#[wasm_bindgen_test]
fn test_missing_frame_reports_unavailable() {
    let pen = LivePen::new("no-such-frame").unwrap();
    pen.clear_console();
    assert_eq!(pen.run(), "unavailable");

    let entries = js_sys::Array::from(&pen.diagnostics().unwrap());
    assert_eq!(entries.length(), 1);
}

#[wasm_bindgen_test]
fn test_unknown_file_is_rejected() {
    let pen = LivePen::new("no-such-frame").unwrap();
    let err = pen.set_buffer("notes.txt", "x".to_string()).unwrap_err();
    let code = js_sys::Reflect::get(&err, &"code".into()).unwrap();
    assert_eq!(code.as_string().as_deref(), Some("UNKNOWN_FILE"));
}

#[wasm_bindgen_test]
fn test_textarea_selection_uses_byte_offsets() {
    let area: HtmlTextAreaElement = document()
        .create_element("textarea")
        .unwrap()
        .dyn_into()
        .unwrap();
    document().body().unwrap().append_child(&area).unwrap();

    let mut input = TextAreaInput::new(area.clone());
    input.set_text("é😀x");
    input.set_selection(Selection::new(2, 6));
    assert_eq!(area.selection_start().unwrap(), Some(1));
    assert_eq!(area.selection_end().unwrap(), Some(3));
    assert_eq!(input.selection(), Selection::new(2, 6));
}

#[wasm_bindgen_test]
async fn test_console_output_is_relayed() {
    let frame = mount_frame("relay-frame");
    let mut renderer = PreviewRenderer::new(IframeContext::new(frame));
    let _bridge = MessageBridge::attach(renderer.port()).unwrap();

    let outcome = renderer.render(&SourceBundle::new(
        "<html><head></head><body></body></html>",
        "",
        "setTimeout(function () { console.warn('late', {a: 1}); }, 0);",
    ));
    assert_eq!(outcome.path, LoadPath::Direct);
    assert!(outcome.bridged);

    sleep(100).await;
    renderer.pump();

    let warnings: Vec<_> = renderer
        .entries()
        .filter(|e| e.kind() == DiagnosticKind::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message(), &["late".to_string(), "{\"a\":1}".to_string()]);
}

#[wasm_bindgen_test]
async fn test_rerender_relays_each_call_once() {
    let frame = mount_frame("rerender-frame");
    let mut renderer = PreviewRenderer::new(IframeContext::new(frame));
    let _bridge = MessageBridge::attach(renderer.port()).unwrap();
    let bundle = SourceBundle::new(
        "<html><head></head><body></body></html>",
        "",
        "setTimeout(function () { console.info('tick'); }, 0);",
    );

    renderer.render(&bundle);
    sleep(50).await;
    renderer.render(&bundle);
    sleep(100).await;
    renderer.pump();

    let ticks = renderer
        .entries()
        .filter(|e| e.kind() == DiagnosticKind::Info)
        .count();
    assert_eq!(ticks, 1);
}
