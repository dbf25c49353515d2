use health_core::{Fetch, LoadFailure};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Same-origin `fetch` against the page that serves the dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebFetch;

impl Fetch for WebFetch {
    async fn fetch_text(&self, url: &str) -> Result<String, LoadFailure> {
        let window = web_sys::window()
            .ok_or_else(|| LoadFailure::Transport("no window".to_string()))?;

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::SameOrigin);

        let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
        let response_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?;
        let response = response_value
            .dyn_into::<Response>()
            .map_err(transport)?;

        if !response.ok() {
            return Err(LoadFailure::Status(response.status()));
        }

        let body = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(transport)?;
        body.as_string()
            .ok_or_else(|| LoadFailure::Malformed("response body is not text".to_string()))
    }
}

fn transport(error: JsValue) -> LoadFailure {
    LoadFailure::Transport(
        error
            .as_string()
            .unwrap_or_else(|| format!("{error:?}")),
    )
}
