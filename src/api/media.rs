//! Media Upload Endpoint
//!
//! Multipart upload returning a temporary media id that a later post
//! references through `PostDraft::media`.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::debug;

use client_cache::{ClientError, ClientResult, MediaRef};

use super::ApiClient;

/// Raw file content read from the browser
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    pub async fn upload_media(&self, file: UploadFile) -> ClientResult<MediaRef> {
        let size = file.bytes.len();
        let mut part = Part::bytes(file.bytes).file_name(file.name.clone());
        if !file.mime_type.is_empty() {
            part = part
                .mime_str(&file.mime_type)
                .map_err(|e| ClientError::Config(format!("invalid MIME type {}: {}", file.mime_type, e)))?;
        }
        let form = Form::new().part("file", part);
        debug!(name = %file.name, size, "uploading media");
        self.send_data(self.request(Method::POST, "media").multipart(form)).await
    }
}

/// Read a browser `File` into memory
pub async fn read_file(file: &web_sys::File) -> ClientResult<UploadFile> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ClientError::Decode(format!("could not read {}: {:?}", file.name(), e)))?;
    Ok(UploadFile {
        name: file.name(),
        mime_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}
