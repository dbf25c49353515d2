use health_core::{DataSource, Mode};

/// Data base for the page at `pathname`; the loader retries relative paths.
pub fn data_source(pathname: &str) -> DataSource {
    DataSource::from_page_path(pathname)
}

/// Reads `mode=` from a query string such as `?mode=national&x=1`.
pub fn mode_from_query(search: &str) -> Option<Mode> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "mode")
        .and_then(|(_, value)| Mode::parse(value))
}

/// Current page location, when running in a browser.
pub fn location() -> Option<(String, String)> {
    let location = web_sys::window()?.location();
    let pathname = location.pathname().ok()?;
    let search = location.search().unwrap_or_default();
    Some((pathname, search))
}
