//! The drawable-surface seam
//!
//! The engine decides *what* to draw and *where*; rasterization belongs to
//! whatever implements [`Surface`] (a canvas backend, a terminal backend,
//! or nothing at all). Assets are addressed by [`SheetId`], never loaded
//! here.

use glam::Vec2;

/// An axis-aligned rectangle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }
}

/// Identifies a sprite sheet owned by the external asset layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetId {
    Player,
    Enemy,
    Asteroid,
    Missile,
    Explosion,
    Backdrop,
}

/// Drawing calls the engine emits each tick.
///
/// Implementations must tolerate destination rects partially or fully
/// outside the canvas (entities scroll in from and out of the edges).
pub trait Surface {
    /// Draw the `src` region of a sprite sheet into the `dst` rect.
    fn draw_sprite(&mut self, sheet: SheetId, src: Rect, dst: Rect);

    /// Like [`Surface::draw_sprite`], rotated by `degrees` around the
    /// center of `dst`. The rotation is a draw transform only; collision
    /// geometry stays axis-aligned, so backends without rotation support
    /// may keep this default.
    fn draw_sprite_rotated(&mut self, sheet: SheetId, src: Rect, dst: Rect, degrees: f32) {
        let _ = degrees;
        self.draw_sprite(sheet, src, dst);
    }

    /// Fill a rect with an RGBA color (0-255 channels, straight alpha).
    fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]);

    /// Draw `text` centered within `area`.
    fn draw_text(&mut self, text: &str, area: Rect);
}

/// Discards every call. Headless drivers and benchmarks tick against this.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn draw_sprite(&mut self, _sheet: SheetId, _src: Rect, _dst: Rect) {}
    fn fill_rect(&mut self, _rect: Rect, _rgba: [u8; 4]) {}
    fn draw_text(&mut self, _text: &str, _area: Rect) {}
}

/// One captured drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Sprite {
        sheet: SheetId,
        src: Rect,
        dst: Rect,
    },
    SpriteRotated {
        sheet: SheetId,
        src: Rect,
        dst: Rect,
        degrees: f32,
    },
    FillRect {
        rect: Rect,
        rgba: [u8; 4],
    },
    Text {
        text: String,
        area: Rect,
    },
}

/// Captures draw calls in emission order so tests can assert on the
/// engine's output without rasterizing anything.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCmd>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All recorded banner/overlay strings, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of sprite draws (rotated or not) against one sheet.
    pub fn sprite_count(&self, sheet: SheetId) -> usize {
        self.commands
            .iter()
            .filter(|cmd| match cmd {
                DrawCmd::Sprite { sheet: s, .. } | DrawCmd::SpriteRotated { sheet: s, .. } => {
                    *s == sheet
                }
                _ => false,
            })
            .count()
    }
}

impl Surface for RecordingSurface {
    fn draw_sprite(&mut self, sheet: SheetId, src: Rect, dst: Rect) {
        self.commands.push(DrawCmd::Sprite { sheet, src, dst });
    }

    fn draw_sprite_rotated(&mut self, sheet: SheetId, src: Rect, dst: Rect, degrees: f32) {
        self.commands.push(DrawCmd::SpriteRotated {
            sheet,
            src,
            dst,
            degrees,
        });
    }

    fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        self.commands.push(DrawCmd::FillRect { rect, rgba });
    }

    fn draw_text(&mut self, text: &str, area: Rect) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            area,
        });
    }
}
