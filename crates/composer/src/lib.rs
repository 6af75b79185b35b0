//! Document composition for the live preview.
//!
//! Turns the three source buffers of a [`SourceBundle`] into one
//! self-contained HTML document:
//!
//! 1. The style block goes immediately before the first `</head>`; failing
//!    that, immediately before the first `<body`; failing that, it is
//!    prepended to the markup.
//! 2. The script block goes immediately before the first `</body>` of the
//!    result of step 1; failing that, it is appended.
//!
//! Embedded content is inserted verbatim. Composition never fails: markup
//! without the expected markers still produces a document.
//!
//! ## Usage
//!
//! ```ignore
//! use livepen_composer::compose;
//! use livepen_types::SourceBundle;
//!
//! let bundle = SourceBundle::new("<div>hi</div>", "div{color:red}", "console.log(1)");
//! let doc = compose(&bundle);
//! assert!(doc.as_str().starts_with("<style>"));
//! ```

use livepen_types::{ComposedDocument, SourceBundle};

/// Closing head marker (case-sensitive).
pub const HEAD_CLOSE: &str = "</head>";
/// Opening body marker; matches `<body>` and `<body class="...">` alike.
pub const BODY_OPEN: &str = "<body";
/// Closing body marker (case-sensitive).
pub const BODY_CLOSE: &str = "</body>";

/// Where the style block ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePlacement {
    BeforeHeadClose,
    BeforeBodyOpen,
    Prepended,
}

/// Where the script block ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPlacement {
    BeforeBodyClose,
    Appended,
}

/// Insertion decisions for one markup buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub style: StylePlacement,
    pub script: ScriptPlacement,
}

/// Wraps CSS in a style element.
pub fn style_block(css: &str) -> String {
    format!("<style>{css}</style>")
}

/// Wraps JavaScript in a script element.
pub fn script_block(js: &str) -> String {
    format!("<script>{js}</script>")
}

/// Composes a bundle into one renderable document.
pub fn compose(bundle: &SourceBundle) -> ComposedDocument {
    compose_with_placement(bundle).0
}

/// Composes a bundle and reports where each block was inserted.
pub fn compose_with_placement(bundle: &SourceBundle) -> (ComposedDocument, Placement) {
    let (styled, style) = insert_style(&bundle.markup, &bundle.style);
    let (html, script) = insert_script(styled, &bundle.script);
    (ComposedDocument::new(html), Placement { style, script })
}

fn insert_style(markup: &str, css: &str) -> (String, StylePlacement) {
    let block = style_block(css);
    if let Some(html) = insert_before_first(markup, HEAD_CLOSE, &block) {
        (html, StylePlacement::BeforeHeadClose)
    } else if let Some(html) = insert_before_first(markup, BODY_OPEN, &block) {
        (html, StylePlacement::BeforeBodyOpen)
    } else {
        (format!("{block}\n{markup}"), StylePlacement::Prepended)
    }
}

fn insert_script(html: String, js: &str) -> (String, ScriptPlacement) {
    let block = script_block(js);
    match insert_before_first(&html, BODY_CLOSE, &block) {
        Some(out) => (out, ScriptPlacement::BeforeBodyClose),
        None => {
            let mut out = html;
            out.reserve(block.len() + 1);
            out.push('\n');
            out.push_str(&block);
            (out, ScriptPlacement::Appended)
        }
    }
}

/// Inserts `block` and a newline before the first `marker`, if present.
fn insert_before_first(haystack: &str, marker: &str, block: &str) -> Option<String> {
    let at = haystack.find(marker)?;
    let mut out = String::with_capacity(haystack.len() + block.len() + 1);
    out.push_str(&haystack[..at]);
    out.push_str(block);
    out.push('\n');
    out.push_str(&haystack[at..]);
    Some(out)
}
