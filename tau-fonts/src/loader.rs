//! System font lookup through fontdb.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};

use crate::types::FontData;

/// Load a face from the database. `None` family selects the generic monospace family.
pub(crate) fn load_font(
    font_db: &Database,
    family: Option<&str>,
    weight: Weight,
    style: Style,
) -> Option<FontData> {
    let families = match family {
        Some(name) => [Family::Name(name)],
        None => [Family::Monospace],
    };
    let query = Query {
        families: &families,
        weight,
        stretch: Stretch::Normal,
        style,
    };

    let id = font_db.query(&query)?;
    let (data, index) = font_db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    let font = FontData::new_with_index(data, index as usize);
    if font.is_none() {
        log::warn!("Font {:?} found but its data could not be parsed", family);
    }
    font
}
