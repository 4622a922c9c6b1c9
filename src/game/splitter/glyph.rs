// Baking text into skins with a built-in 5x7 bitmap font

use crate::engine::renderer::{Rgba, TextureBackend, TextureError, TextureHandle};

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// Empty columns between two glyphs
const SPACING: u32 = 1;

/// Border thickness in pixels, regardless of cell size
const BORDER: u32 = 4;

const BACKGROUND: Rgba<u8> = Rgba([32, 32, 40, 255]);
const INK: Rgba<u8> = Rgba([245, 245, 245, 255]);
const BORDER_COLOR: Rgba<u8> = Rgba([40, 90, 230, 255]);

/// Rows top to bottom, leftmost column in the highest of the five bits
const FONT: [[u8; 7]; 26] = [
    [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // A
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
    [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110], // D
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
    [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100], // Y
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
];

/// Glyph baking errors
#[derive(Debug, thiserror::Error)]
pub enum GlyphError {
    #[error("No glyph for {0:?}")]
    Unsupported(char),

    #[error("Nothing to bake")]
    Empty,

    #[error(transparent)]
    Texture(#[from] TextureError),
}

/// Bitmap rows for `c`, `None` when the font has no such glyph.
/// A space is a valid glyph with no ink.
fn rows(c: char) -> Option<[u8; 7]> {
    match c.to_ascii_uppercase() {
        ' ' => Some([0; 7]),
        upper @ 'A'..='Z' => Some(FONT[(upper as u8 - b'A') as usize]),
        _ => None,
    }
}

/// Letter spawned after `current`, wrapping from Z back to A
pub fn next_letter(current: char) -> char {
    match current.to_ascii_uppercase() {
        'Z' => 'A',
        c @ 'A'..='Y' => (c as u8 + 1) as char,
        _ => 'A',
    }
}

/// Pixel size of the skin `bake` produces for `len` glyphs
pub fn skin_size(len: u32, cell: u32) -> (u32, u32) {
    let columns = len * (GLYPH_WIDTH + SPACING) - SPACING;
    // One empty cell of padding on every side
    (
        (columns + 2) * cell,
        (GLYPH_HEIGHT + 2) * cell,
    )
}

/// Render `text` into a new target with a border around it.
///
/// Every character is checked before anything is allocated.
pub fn bake<B: TextureBackend + ?Sized>(
    textures: &mut B,
    text: &str,
    cell: u32,
) -> Result<TextureHandle, GlyphError> {
    let glyphs = text
        .chars()
        .map(|c| rows(c).ok_or(GlyphError::Unsupported(c)))
        .collect::<Result<Vec<_>, _>>()?;
    if glyphs.is_empty() {
        return Err(GlyphError::Empty);
    }

    let cell = cell.max(1);
    let (width, height) = skin_size(glyphs.len() as u32, cell);
    let skin = textures.create_target(width, height)?;

    if let Err(err) = paint(textures, skin, &glyphs, cell, (width, height)) {
        textures.discard(skin);
        return Err(err.into());
    }
    Ok(skin)
}

fn paint<B: TextureBackend + ?Sized>(
    textures: &mut B,
    skin: TextureHandle,
    glyphs: &[[u8; 7]],
    cell: u32,
    (width, height): (u32, u32),
) -> Result<(), TextureError> {
    textures.clear(skin, BORDER_COLOR)?;
    textures.fill_rect(
        skin,
        BORDER,
        BORDER,
        width.saturating_sub(2 * BORDER),
        height.saturating_sub(2 * BORDER),
        BACKGROUND,
    )?;

    for (index, glyph) in glyphs.iter().enumerate() {
        let origin_x = cell + index as u32 * (GLYPH_WIDTH + SPACING) * cell;
        for (row, bits) in glyph.iter().enumerate() {
            for column in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - column)) != 0 {
                    textures.fill_rect(
                        skin,
                        origin_x + column * cell,
                        cell + row as u32 * cell,
                        cell,
                        cell,
                        INK,
                    )?;
                }
            }
        }
    }
    Ok(())
}
