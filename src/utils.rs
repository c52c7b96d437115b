//! Utility functions

use std::path::PathBuf;

// Speech bubble with a gauge arc, square viewBox for window/taskbar icons
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect x="4" y="6" width="56" height="42" rx="10" fill="#18181b" stroke="#3e98c7" stroke-width="3"/><path d="M18 48 L14 60 L30 48 Z" fill="#3e98c7"/><path d="M20 36 A12 12 0 1 1 44 36" fill="none" stroke="#d6d6d6" stroke-width="5" stroke-linecap="round"/><path d="M20 36 A12 12 0 0 1 40 26" fill="none" stroke="#3e98c7" stroke-width="5" stroke-linecap="round"/></svg>"##;

/// Rasterize the icon SVG to a square RGBA image.
pub fn rasterize_icon(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(ICON_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// App data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Aspect Sentiment")
}

/// Join labels the way the findings table shows them
pub fn join_labels(labels: &[String]) -> String {
    labels.join(", ")
}
