use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Engine { pub(crate) inner: fourcolor::Engine }

impl Engine {
    pub fn rs_new() -> Engine { Engine { inner: fourcolor::Engine::new() } }
    pub fn rs_version(&self) -> u64 { self.inner.version() }
}
