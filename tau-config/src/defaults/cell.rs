//! Default cell metrics and headless viewport size.

pub fn cell_width() -> u32 {
    9
}

pub fn cell_height() -> u32 {
    18
}

pub fn cell_baseline() -> u32 {
    5 // Pixels between the glyph baseline and the bottom of the cell
}

pub fn viewport_width() -> u32 {
    800
}

pub fn viewport_height() -> u32 {
    600
}
