use tilemap_shared::colors::Rgb;

/// Format RGB as a CSS color string.
pub fn rgb_css((r, g, b): Rgb) -> String {
    format!("rgb({r},{g},{b})")
}
