//! Zip export through the JSZip library, loaded on demand.

use crate::error::describe_js;
use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use livepen_traits::{ArchiveEntry, ArchiveError, Archiver, ArchiverLoader};
use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlScriptElement;

pub const JSZIP_URL: &str = "https://cdnjs.cloudflare.com/ajax/libs/jszip/3.10.1/jszip.min.js";

/// Loads JSZip by injecting a script tag, unless it is already on the page.
#[derive(Debug, Clone)]
pub struct JsZipLoader {
    url: String,
}

impl Default for JsZipLoader {
    fn default() -> Self {
        Self::new(JSZIP_URL)
    }
}

impl JsZipLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn inject_script(&self) -> Result<(), ArchiveError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ArchiveError::LoadFailed("no document available".to_string()))?;
        let head = document
            .head()
            .ok_or_else(|| ArchiveError::LoadFailed("document has no head".to_string()))?;

        let script: HtmlScriptElement = document
            .create_element("script")
            .map_err(|e| ArchiveError::LoadFailed(describe_js(&e)))?
            .dyn_into()
            .map_err(|_| ArchiveError::LoadFailed("not a script element".to_string()))?;
        script.set_src(&self.url);

        let loaded = Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });
        head.append_child(&script)
            .map_err(|e| ArchiveError::LoadFailed(describe_js(&e)))?;

        JsFuture::from(loaded)
            .await
            .map_err(|_| ArchiveError::LoadFailed(format!("failed to load {}", self.url)))?;
        Ok(())
    }
}

fn global_constructor() -> Option<Function> {
    Reflect::get(&js_sys::global(), &JsValue::from_str("JSZip"))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

#[async_trait(?Send)]
impl ArchiverLoader for JsZipLoader {
    async fn load(&self) -> Result<Box<dyn Archiver>, ArchiveError> {
        if let Some(constructor) = global_constructor() {
            debug!("JSZip already present");
            return Ok(Box::new(JsZipArchiver { constructor }));
        }

        self.inject_script().await?;
        let constructor = global_constructor().ok_or_else(|| {
            ArchiveError::LoadFailed("script loaded but JSZip is not defined".to_string())
        })?;
        Ok(Box::new(JsZipArchiver { constructor }))
    }
}

/// Drives `new JSZip()`, `.file(name, contents)` and
/// `.generateAsync({type: "uint8array"})`.
#[derive(Debug, Clone)]
pub struct JsZipArchiver {
    constructor: Function,
}

fn method(target: &JsValue, name: &str) -> Result<Function, ArchiveError> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| ArchiveError::Generate(format!("JSZip has no '{name}' method")))
}

#[async_trait(?Send)]
impl Archiver for JsZipArchiver {
    async fn archive(&self, entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
        let zip = Reflect::construct(&self.constructor, &Array::new())
            .map_err(|e| ArchiveError::Generate(describe_js(&e)))?;

        let file = method(&zip, "file")?;
        for entry in entries {
            file.call2(
                &zip,
                &JsValue::from_str(&entry.name),
                &JsValue::from_str(&entry.contents),
            )
            .map_err(|e| ArchiveError::Entry {
                name: entry.name.clone(),
                message: describe_js(&e),
            })?;
        }

        let options = Object::new();
        Reflect::set(&options, &"type".into(), &"uint8array".into())
            .map_err(|e| ArchiveError::Generate(describe_js(&e)))?;
        let promise: Promise = method(&zip, "generateAsync")?
            .call1(&zip, &options)
            .map_err(|e| ArchiveError::Generate(describe_js(&e)))?
            .dyn_into()
            .map_err(|_| ArchiveError::Generate("generateAsync did not return a promise".into()))?;

        let bytes = JsFuture::from(promise)
            .await
            .map_err(|e| ArchiveError::Generate(describe_js(&e)))?;
        Ok(Uint8Array::new(&bytes).to_vec())
    }

    fn file_extension(&self) -> &'static str {
        "zip"
    }

    fn mime_type(&self) -> &'static str {
        "application/zip"
    }

    fn name(&self) -> &'static str {
        "JsZipArchiver"
    }
}
