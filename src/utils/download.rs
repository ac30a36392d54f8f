//! Client-side file download.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::dom;

/// Offer `text` as a downloadable plain-text file named `filename`.
pub fn download_text(filename: &str, text: &str) -> Result<(), JsValue> {
    download(filename, text, "text/plain;charset=utf-8")
}

pub fn download_json(filename: &str, json: &str) -> Result<(), JsValue> {
    download(filename, json, "application/json")
}

fn download(filename: &str, text: &str, mime: &str) -> Result<(), JsValue> {
    let document = dom::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(text));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)
}
