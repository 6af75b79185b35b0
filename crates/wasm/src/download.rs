//! Offering an export to the user as a file download.

use crate::error::LivePenError;
use js_sys::{Array, Uint8Array};
use livepen_core::ExportArtifact;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Triggers a browser download of `artifact` through a temporary object URL.
pub fn download(artifact: &ExportArtifact) -> Result<(), LivePenError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| LivePenError::dom("No document available"))?;
    let body = document
        .body()
        .ok_or_else(|| LivePenError::dom("Document has no body"))?;

    let bytes = Uint8Array::from(artifact.bytes.as_slice());
    let options = BlobPropertyBag::new();
    options.set_type(&artifact.mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&Array::of1(&bytes), &options)
        .map_err(|e| LivePenError::from_js("Failed to create blob", &e))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| LivePenError::from_js("Failed to create object URL", &e))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| LivePenError::from_js("Failed to create link", &e))?
        .dyn_into()
        .map_err(|_| LivePenError::dom("Created element is not an anchor"))?;
    anchor.set_href(&url);
    anchor.set_download(&artifact.file_name);

    body.append_child(&anchor)
        .map_err(|e| LivePenError::from_js("Failed to attach link", &e))?;
    anchor.click();
    let _ = body.remove_child(&anchor);
    let _ = Url::revoke_object_url(&url);
    Ok(())
}
