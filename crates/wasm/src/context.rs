//! The `<iframe>` preview context.

use crate::error::describe_js;
use livepen_traits::{ContextError, IsolatedContext};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlIFrameElement};

/// An [`IsolatedContext`] backed by an `<iframe>` element.
///
/// Direct writes go through `contentDocument`; when the browser withholds
/// it the document is loaded through `srcdoc` instead.
#[derive(Debug, Clone)]
pub struct IframeContext {
    frame: HtmlIFrameElement,
}

impl IframeContext {
    pub fn new(frame: HtmlIFrameElement) -> Self {
        Self { frame }
    }

    /// Finds the frame by element id.
    pub fn from_element_id(id: &str) -> Result<Self, ContextError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ContextError::Unavailable("no document available".to_string()))?;
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| ContextError::Unavailable(format!("no element with id '{id}'")))?;
        let frame = element
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| ContextError::Unavailable(format!("element '{id}' is not an iframe")))?;
        Ok(Self::new(frame))
    }

    pub fn frame(&self) -> &HtmlIFrameElement {
        &self.frame
    }

    fn document(&self) -> Result<Document, ContextError> {
        self.frame
            .content_document()
            .ok_or_else(|| ContextError::AccessDenied("contentDocument is not accessible".into()))
    }
}

impl IsolatedContext for IframeContext {
    fn write_direct(&mut self, html: &str) -> Result<(), ContextError> {
        let document = self.document()?;
        let document = document.unchecked_ref::<web_sys::HtmlDocument>();
        let access = |e: wasm_bindgen::JsValue| ContextError::AccessDenied(describe_js(&e));

        document.open().map_err(access)?;
        document
            .write(&js_sys::Array::of1(&html.into()))
            .map_err(access)?;
        document.close().map_err(access)?;
        Ok(())
    }

    fn inject_script(&mut self, source: &str) -> Result<(), ContextError> {
        let document = self.document()?;
        let head = document
            .head()
            .ok_or_else(|| ContextError::Injection("document has no head".to_string()))?;
        let script = document
            .create_element("script")
            .map_err(|e| ContextError::Injection(describe_js(&e)))?;
        script.set_text_content(Some(source));
        head.append_child(&script)
            .map_err(|e| ContextError::Injection(describe_js(&e)))?;
        Ok(())
    }

    fn load_fallback(&mut self, html: &str) {
        self.frame.set_srcdoc(html);
    }

    fn name(&self) -> &'static str {
        "IframeContext"
    }
}
