//! Native file dialog via a detached `<input type="file">`.

use js_sys::{Promise, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlInputElement};

use ragchat_types::{ChatError, Result};

/// A file the user picked, read fully into memory
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Open the browser's file dialog filtered by `accept`
/// (e.g. `".pdf,.txt"`). `Ok(None)` when the user cancels.
pub async fn pick_file(accept: &str) -> Result<Option<PickedFile>> {
    let dialog = FileDialog::open(accept)?;
    dialog.input.click();
    dialog.selection().await
}

/// An open file dialog. Its listeners stay attached until the selection
/// settles or the dialog is dropped.
pub struct FileDialog {
    input: HtmlInputElement,
    selected: Promise,
    /// Installed as the input's `onchange` handler
    _onchange: Closure<dyn FnMut(Event)>,
    oncancel: Closure<dyn FnMut(Event)>,
}

impl FileDialog {
    /// Create the input and attach its listeners without showing it.
    pub fn open(accept: &str) -> Result<Self> {
        let input: HtmlInputElement = gloo_utils::document()
            .create_element("input")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| ChatError::JsInterop("Element is not an input".to_string()))?;
        input.set_type("file");
        input.set_accept(accept);

        // Resolves `true` on `change`, `false` on `cancel`.
        let mut listeners = None;
        let selected = Promise::new(&mut |resolve, _reject| {
            let on_pick = resolve.clone();
            let onchange: Closure<dyn FnMut(Event)> = Closure::once(move |_: Event| {
                let _ = on_pick.call1(&JsValue::NULL, &JsValue::TRUE);
            });
            let oncancel: Closure<dyn FnMut(Event)> = Closure::once(move |_: Event| {
                let _ = resolve.call1(&JsValue::NULL, &JsValue::FALSE);
            });
            listeners = Some((onchange, oncancel));
        });
        let (onchange, oncancel) = listeners
            .ok_or_else(|| ChatError::JsInterop("File dialog promise did not start".to_string()))?;

        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        input
            .add_event_listener_with_callback("cancel", oncancel.as_ref().unchecked_ref())
            .map_err(js_error)?;

        Ok(Self {
            input,
            selected,
            _onchange: onchange,
            oncancel,
        })
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    /// Wait for the user, then read the chosen file.
    pub async fn selection(self) -> Result<Option<PickedFile>> {
        let picked = JsFuture::from(self.selected.clone()).await.map_err(js_error)?;
        if !picked.is_truthy() {
            log::debug!("File dialog cancelled");
            return Ok(None);
        }

        let Some(file) = self.input.files().and_then(|files| files.get(0)) else {
            return Ok(None);
        };
        let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_error)?;
        let bytes = Uint8Array::new(&buffer).to_vec();
        log::info!("Picked {} ({} bytes)", file.name(), bytes.len());
        Ok(Some(PickedFile {
            name: file.name(),
            bytes,
        }))
    }
}

impl Drop for FileDialog {
    fn drop(&mut self) {
        self.input.set_onchange(None);
        let _ = self
            .input
            .remove_event_listener_with_callback("cancel", self.oncancel.as_ref().unchecked_ref());
        log::debug!("File dialog listeners released");
    }
}

fn js_error(e: JsValue) -> ChatError {
    ChatError::JsInterop(format!("{:?}", e))
}
