//! Browser download of exported bytes

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

const PDF_MIME: &str = "application/pdf";

/// Offer `bytes` to the user as a file download named `file_name`.
pub fn download_pdf(bytes: &[u8], file_name: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes).into());

    let props = BlobPropertyBag::new();
    props.set_type(PDF_MIME);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into()
        .map_err(|_| JsValue::from_str("Failed to create download link"))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url)
}
