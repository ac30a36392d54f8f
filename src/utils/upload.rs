//! Reading files picked through a file input or dropped on the page.

use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList};

use super::log;
use crate::core::import::{UploadedFile, wants_content};

pub fn files_of(list: &FileList) -> Vec<File> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Path inside the picked folder, or the bare name for loose files.
fn relative_path(file: &File) -> String {
    let path = js_sys::Reflect::get(file, &"webkitRelativePath".into())
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    if path.is_empty() { file.name() } else { path }
}

/// Read one file. Binary and ignored files come back without content.
pub async fn read_file(file: &File) -> UploadedFile {
    let relative_path = relative_path(file);
    let content = if wants_content(&relative_path) {
        match JsFuture::from(file.text()).await {
            Ok(text) => text.as_string().unwrap_or_default(),
            Err(_) => {
                log::warn(&format!("Could not read {}", relative_path));
                String::new()
            }
        }
    } else {
        String::new()
    };
    UploadedFile {
        size: file.size() as u64,
        relative_path,
        content,
    }
}
