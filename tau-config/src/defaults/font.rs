//! Default values for font settings.

pub fn font_size() -> f32 {
    12.0
}
