//! Helper functions and constants for the GUI
//!
//! Icon and QR texture loading, a minimal markdown renderer for the insights
//! panel, and small painting helpers shared by the views.

use crate::receive::EmbeddedImage;
use crate::types::TxStatus;
use eframe::egui::{self, RichText};

use super::theme::AppTheme;

// Load the window icon at compile time
pub static BITPRIVACY_ICON_PNG: &[u8] = include_bytes!("../bitprivacy-icon.png");

/// Load the application icon for the window
pub fn load_icon() -> Option<egui::IconData> {
    let img = image::load_from_memory(BITPRIVACY_ICON_PNG).ok()?.into_rgba8();
    let (width, height) = img.dimensions();
    Some(egui::IconData {
        rgba: img.into_raw(),
        width,
        height,
    })
}

/// Decode a fetched QR image and upload it as a texture.
pub fn load_qr_texture(ctx: &egui::Context, image: &EmbeddedImage) -> Option<egui::TextureHandle> {
    match decode_color_image(image.bytes()) {
        Ok(color_image) => {
            tracing::debug!(
                "QR texture decoded, size: {}x{}",
                color_image.width(),
                color_image.height()
            );
            Some(ctx.load_texture("receive_qr", color_image, egui::TextureOptions::NEAREST))
        }
        Err(e) => {
            tracing::warn!("Failed to decode QR image: {}", e);
            None
        }
    }
}

fn decode_color_image(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let rgba = image::load_from_memory(bytes)?.into_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Short label for a transaction status.
pub fn status_label(status: TxStatus) -> &'static str {
    match status {
        TxStatus::Done => "Completed",
        TxStatus::Pending => "Pending",
        TxStatus::Failed => "Failed",
    }
}

pub fn status_color(status: TxStatus, theme: &AppTheme) -> egui::Color32 {
    match status {
        TxStatus::Done => theme.inflow,
        TxStatus::Pending => theme.warning,
        TxStatus::Failed => theme.error,
    }
}

/// Gray placeholder bar shown while data loads.
pub fn skeleton_bar(ui: &mut egui::Ui, theme: &AppTheme, width: f32, height: f32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
    // Slow pulse
    let t = ui.input(|i| i.time) as f32;
    let alpha = 0.6 + 0.4 * (t * 2.0).sin().abs();
    ui.painter()
        .rect_filled(rect, 6.0, theme.skeleton.gamma_multiply(alpha));
}

/// A block of the small markdown subset the summarizer produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownBlock {
    Heading(String),
    Bullet(String),
    Paragraph(String),
}

/// Split markdown into headings, bullet items and paragraphs. Inline markup
/// other than `**bold**` markers is left as-is.
pub fn parse_markdown(text: &str) -> Vec<MarkdownBlock> {
    let mut blocks = Vec::new();
    let mut paragraph = String::new();

    let flush = |paragraph: &mut String, blocks: &mut Vec<MarkdownBlock>| {
        if !paragraph.is_empty() {
            blocks.push(MarkdownBlock::Paragraph(std::mem::take(paragraph)));
        }
    };

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else if trimmed.starts_with('#') {
            flush(&mut paragraph, &mut blocks);
            let heading = trimmed.trim_start_matches('#').trim();
            blocks.push(MarkdownBlock::Heading(strip_bold(heading)));
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            flush(&mut paragraph, &mut blocks);
            blocks.push(MarkdownBlock::Bullet(strip_bold(item.trim())));
        } else {
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(&strip_bold(trimmed));
        }
    }
    flush(&mut paragraph, &mut blocks);
    blocks
}

fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}

/// Render summarizer markdown.
pub fn render_markdown(ui: &mut egui::Ui, theme: &AppTheme, text: &str) {
    for block in parse_markdown(text) {
        match block {
            MarkdownBlock::Heading(heading) => {
                ui.add_space(theme.spacing_xs);
                ui.label(RichText::new(heading).size(17.0).strong().color(theme.text_primary));
            }
            MarkdownBlock::Bullet(item) => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new("•").color(theme.warning));
                    ui.label(RichText::new(item).color(theme.text_secondary));
                });
            }
            MarkdownBlock::Paragraph(paragraph) => {
                ui.label(RichText::new(paragraph).color(theme.text_secondary));
            }
        }
    }
}
