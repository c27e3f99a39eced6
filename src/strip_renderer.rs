use std::error::Error;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use crate::grid::{GRID_ROWS, card_grid};
use crate::strip::{COLUMNS, Strip};

const FONT_CANDIDATES: &[&str] = &[
    "Arial", "Helvetica", "DejaVuSans", "LiberationSans", "SegoeUI", "Segoe UI", "NotoSans-Regular", "NotoSans", "Cantarell-Regular"
];

// Everything a ticket sheet actually prints: digits, the date separator and
// the header label text.
const REQUIRED_GLYPHS: &str = "0123456789/.- StripNoValidut";

fn find_system_font_data() -> Option<Vec<u8>> {
    // Allow explicit override for debugging or custom font selection
    if let Ok(path) = std::env::var("STRIP_FONT_PATH") {
        if let Ok(bytes) = fs::read(&path) { return Some(bytes); }
    }

    let mut search_dirs: Vec<PathBuf> = Vec::new();
    if cfg!(target_os = "macos") {
        search_dirs.extend([
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("/Library/Fonts"),
        ]);
        if let Some(home) = dirs_next::home_dir() { search_dirs.push(home.join("Library/Fonts")); }
    } else if cfg!(target_os = "windows") {
        if let Some(win) = std::env::var_os("WINDIR") { search_dirs.push(PathBuf::from(win).join("Fonts")); }
        search_dirs.push(PathBuf::from("C:/Windows/Fonts"));
    } else { // Linux / BSD
        search_dirs.extend([
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
        ]);
        if let Some(home) = dirs_next::home_dir() { search_dirs.push(home.join(".fonts")); }
        if let Some(home) = dirs_next::home_dir() { search_dirs.push(home.join(".local/share/fonts")); }
    }

    let mut font_files: Vec<PathBuf> = Vec::new();
    for dir in search_dirs {
        if !dir.exists() { continue; }
        for entry in walkdir::WalkDir::new(&dir).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() { continue; }
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                let ext_l = ext.to_ascii_lowercase();
                if matches!(ext_l.as_str(), "ttf" | "otf") { font_files.push(path.to_path_buf()); }
            }
        }
    }

    if font_files.is_empty() { return None; }

    // Fast path: try candidate names first
    for &cand in FONT_CANDIDATES {
        if let Some(p) = font_files.iter().find(|p| p.file_stem().and_then(|s| s.to_str()).map(|s| s.eq_ignore_ascii_case(cand)).unwrap_or(false)) {
            if let Ok(data) = fs::read(p) { return Some(data); }
        }
    }

    // Otherwise pick the font covering the most glyphs a sheet needs
    let mut best: Option<(usize, &Path)> = None;
    for path in &font_files {
        if let Ok(bytes) = fs::read(path) {
            if let Some(font) = Font::try_from_vec(bytes.clone()) {
                let score = REQUIRED_GLYPHS.chars().filter(|&c| font.glyph(c).id().0 != 0).count();
                if best.map(|(s, _)| score > s).unwrap_or(true) {
                    best = Some((score, path));
                }
            }
        }
    }
    if let Some((_, p)) = best { if let Ok(bytes) = fs::read(p) { return Some(bytes); } }

    None
}

struct TextPainter {
    font: Font<'static>,
}

impl TextPainter {
    fn new(font_data: Vec<u8>) -> Result<Self, Box<dyn Error>> {
        let font = Font::try_from_vec(font_data).ok_or("Invalid font data")?;
        Ok(Self { font })
    }

    fn text_width(&self, text: &str, scale: Scale) -> f32 {
        let glyphs: Vec<_> = self.font.layout(text, scale, point(0.0, 0.0)).collect();
        if let Some(last) = glyphs.last() {
            last.position().x + last.unpositioned().h_metrics().advance_width
        } else { 0.0 }
    }

    // Text centered inside the rect (left, top, w, h)
    fn draw_centered(&self, img: &mut RgbImage, text: &str, left: u32, top: u32, w: u32, h: u32, px: f32, color: Rgb<u8>) {
        let scale = Scale::uniform(px);
        let v = self.font.v_metrics(scale);
        let text_w = self.text_width(text, scale);
        let text_h = v.ascent - v.descent;
        let x = left as f32 + (w as f32 - text_w).max(0.0) / 2.0;
        let y = top as f32 + (h as f32 - text_h).max(0.0) / 2.0 + v.ascent;
        self.draw_at(img, text, x, y, scale, color);
    }

    fn draw_left(&self, img: &mut RgbImage, text: &str, left: u32, baseline_y: u32, px: f32, color: Rgb<u8>) {
        let scale = Scale::uniform(px);
        self.draw_at(img, text, left as f32, baseline_y as f32, scale, color);
    }

    fn draw_at(&self, img: &mut RgbImage, text: &str, x: f32, baseline_y: f32, scale: Scale, color: Rgb<u8>) {
        for glyph in self.font.layout(text, scale, point(x, baseline_y)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    if v < 0.05 { return; }
                    let px_x = gx as i32 + bb.min.x;
                    let px_y = gy as i32 + bb.min.y;
                    if px_x >= 0 && px_y >= 0 && (px_x as u32) < img.width() && (px_y as u32) < img.height() {
                        let dst = img.get_pixel_mut(px_x as u32, px_y as u32);
                        for i in 0..3 { dst[i] = ((dst[i] as f32)*(1.0 - v) + (color[i] as f32)*v) as u8; }
                    }
                });
            }
        }
    }
}

fn fill_rect(img: &mut RgbImage, left: u32, top: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in top..(top + h).min(img.height()) {
        for x in left..(left + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

// Draws one strip as a printable sheet: a header line, then the six tickets
// stacked vertically, each a 3x9 grid with blank cells shaded and its code
// (when given) printed above the grid. `codes` must be empty or hold one
// code per ticket.
pub fn render_strip_to_png(
    strip: &Strip,
    codes: &[String],
    strip_no: usize,
    expiry: Option<&str>,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    assert!(codes.is_empty() || codes.len() == strip.cards.len(), "one code per ticket");

    // Layout constants
    let cell_w = 64u32;
    let cell_h = 44u32;
    let padding = 20u32;
    let header_h = 34u32;
    let ticket_label_h = 20u32;
    let ticket_gap = 14u32;

    let grid_w = COLUMNS as u32 * cell_w;
    let grid_h = GRID_ROWS as u32 * cell_h;
    let ticket_h = ticket_label_h + grid_h;
    let tickets = strip.cards.len() as u32;
    let img_w = grid_w + padding * 2;
    let img_h = padding * 2 + header_h + tickets * ticket_h + tickets.saturating_sub(1) * ticket_gap;

    let bg = Rgb([255, 255, 255]);
    let blank = Rgb([225, 225, 225]);
    let line = Rgb([30, 30, 30]);
    let txt = Rgb([20, 20, 20]);

    let mut img = RgbImage::from_pixel(img_w, img_h, bg);

    let font_data = find_system_font_data().ok_or("No system font found for rendering")?;
    let painter = TextPainter::new(font_data)?;

    // Header: strip label on the left, expiry on the right
    let header_baseline = padding + 22;
    painter.draw_left(&mut img, &format!("Strip {strip_no}"), padding, header_baseline, 20.0, txt);
    if let Some(expiry) = expiry {
        let label = format!("Valid until {expiry}");
        let w = painter.text_width(&label, Scale::uniform(16.0));
        let x = (img_w as f32 - padding as f32 - w).max(padding as f32) as u32;
        painter.draw_left(&mut img, &label, x, header_baseline, 16.0, txt);
    }

    for (t, card) in strip.cards.iter().enumerate() {
        let top = padding + header_h + t as u32 * (ticket_h + ticket_gap);

        if let Some(code) = codes.get(t) {
            let label = format!("No. {code}");
            let w = painter.text_width(&label, Scale::uniform(14.0));
            let x = (padding as f32 + grid_w as f32 - w).max(padding as f32) as u32;
            painter.draw_left(&mut img, &label, x, top + 14, 14.0, txt);
        }

        let grid_top = top + ticket_label_h;
        let grid = card_grid(card);

        // Cell contents first, grid lines on top
        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let x0 = padding + c as u32 * cell_w;
                let y0 = grid_top + r as u32 * cell_h;
                match cell {
                    Some(n) => painter.draw_centered(&mut img, &n.to_string(), x0, y0, cell_w, cell_h, 22.0, txt),
                    None => fill_rect(&mut img, x0 + 1, y0 + 1, cell_w - 1, cell_h - 1, blank),
                }
            }
        }

        for r in 0..=GRID_ROWS as u32 {
            let y = grid_top + r * cell_h;
            for x in padding..(padding + grid_w) { img.put_pixel(x, y, line); }
        }
        for c in 0..=COLUMNS as u32 {
            let x = padding + c * cell_w;
            for y in grid_top..=(grid_top + grid_h) { img.put_pixel(x, y, line); }
        }
    }

    let mut file = File::create(path)?;
    img.write_to(&mut file, image::ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::generate_strip;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_render_strip_to_png() {
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let strip = generate_strip(&mut rng);
        let codes: Vec<String> = (0..6).map(|i| format!("{i:04}")).collect();
        render_strip_to_png(&strip, &codes, 1, Some("31/12/2026"), "test_strip.png").expect("render");
        assert!(std::path::Path::new("test_strip.png").exists());
        std::fs::remove_file("test_strip.png").ok();
    }
}
