use strum::{EnumCount, IntoEnumIterator};

use crate::color::{Color, ColorKey, ColorMode};

type Table = [Color; ColorKey::COUNT];

// Ordered as `ColorKey`'s variants.
const LIGHT: Table = [
    Color::rgb(0x37, 0x35, 0x2f),
    Color::rgb(0x94, 0x9c, 0xa0),
    Color::rgb(0x64, 0x47, 0x3a),
    Color::rgb(0xd9, 0x73, 0x0d),
    Color::rgb(0xdf, 0xab, 0x01),
    Color::rgb(0x0f, 0x7b, 0x6c),
    Color::rgb(0x0b, 0x6e, 0x99),
    Color::rgb(0x69, 0x40, 0xa5),
    Color::rgb(0xad, 0x1a, 0x72),
    Color::rgb(0xe0, 0x3e, 0x3e),
];
const DARK: Table = [
    Color::rgb(0xca, 0xcc, 0xce),
    Color::rgb(0x78, 0x80, 0x84),
    Color::rgb(0x93, 0x72, 0x64),
    Color::rgb(0xff, 0xa3, 0x44),
    Color::rgb(0xff, 0xdc, 0x49),
    Color::rgb(0x4d, 0xab, 0x9a),
    Color::rgb(0x52, 0x9c, 0xca),
    Color::rgb(0x9a, 0x6d, 0xd7),
    Color::rgb(0xe2, 0x55, 0xa1),
    Color::rgb(0xff, 0x73, 0x69),
];

/// Concrete colors for every [`ColorKey`], per [`ColorMode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    light: Table,
    dark: Table,
}
impl Default for Palette {
    fn default() -> Self {
        Self {
            light: LIGHT,
            dark: DARK,
        }
    }
}
impl Palette {
    /// Build the default palette, with any user overrides applied on top.
    #[must_use]
    pub fn with_overrides(overrides: &crate::config::PaletteOverrides) -> Self {
        let mut palette = Self::default();
        for (mode, table) in [
            (ColorMode::Light, &overrides.light),
            (ColorMode::Dark, &overrides.dark),
        ] {
            for (name, color) in table {
                match name.parse::<ColorKey>() {
                    Ok(key) => palette.set(mode, key, *color),
                    Err(_) => log::warn!("Ignoring palette override for unknown color {name:?}"),
                }
            }
        }
        palette
    }
    fn table(&self, mode: ColorMode) -> &Table {
        match mode {
            ColorMode::Light => &self.light,
            ColorMode::Dark => &self.dark,
        }
    }
    #[must_use]
    pub fn get(&self, mode: ColorMode, key: ColorKey) -> Color {
        self.table(mode)[key.index()]
    }
    pub fn set(&mut self, mode: ColorMode, key: ColorKey, color: Color) {
        let table = match mode {
            ColorMode::Light => &mut self.light,
            ColorMode::Dark => &mut self.dark,
        };
        table[key.index()] = color;
    }
    /// Every key with its color under `mode`, in swatch order.
    pub fn iter(&self, mode: ColorMode) -> impl Iterator<Item = (ColorKey, Color)> + '_ {
        ColorKey::iter().map(move |key| (key, self.get(mode, key)))
    }
}
