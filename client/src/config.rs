use tilemap_shared::MapStyle;

/// Attribute on the mount element that may carry a JSON [`MapStyle`].
pub const STYLE_ATTRIBUTE: &str = "data-map-style";

pub fn parse_style(raw: &str) -> Result<MapStyle, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(MapStyle::default());
    }
    serde_json::from_str::<MapStyle>(raw)
        .map(MapStyle::sanitized)
        .map_err(|e| format!("invalid {STYLE_ATTRIBUTE}: {e}"))
}

/// Read the map style from the mount element, falling back to defaults.
pub fn load_style(element: &web_sys::Element) -> MapStyle {
    let Some(raw) = element.get_attribute(STYLE_ATTRIBUTE) else {
        return MapStyle::default();
    };
    match parse_style(&raw) {
        Ok(style) => style,
        Err(e) => {
            web_sys::console::warn_1(&format!("{e}; using default map style").into());
            MapStyle::default()
        }
    }
}
