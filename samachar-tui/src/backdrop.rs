use crate::styles;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

const GLYPHS: [&str; 3] = ["·", "•", "∙"];

/// Sparse field of dots drifting upward one row every few ticks.
///
/// Cells are picked by hashing their coordinates, so the same tick always
/// draws the same picture.
#[derive(Debug, Clone, Copy)]
pub struct Backdrop {
    pub tick: u64,
}

impl Backdrop {
    pub fn new(tick: u64) -> Self {
        Self { tick }
    }
}

impl Widget for Backdrop {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let drift = (self.tick / 4) as u32;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let h = scatter(x as u32, (y as u32).wrapping_add(drift));
                if h % 47 != 0 {
                    continue;
                }
                let glyph = GLYPHS[(h as usize / 47) % GLYPHS.len()];
                buf[(x, y)].set_symbol(glyph).set_style(styles::backdrop());
            }
        }
    }
}

fn scatter(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    h ^ (h >> 13)
}
