//! Centralized theme and styling system for the GUI
//!
//! Provides the AppTheme struct with colors, spacing, and styled widget factories.

use eframe::egui;

/// Centralized theme and styling system
#[derive(Clone, Copy)]
pub struct AppTheme {
    // Base colors
    pub background: egui::Color32,
    pub surface: egui::Color32,
    pub surface_hover: egui::Color32,
    pub surface_active: egui::Color32,
    pub panel_fill: egui::Color32,
    pub border: egui::Color32,
    pub text_primary: egui::Color32,
    pub text_secondary: egui::Color32,

    // Semantic colors
    pub primary: egui::Color32,
    pub secondary: egui::Color32,
    pub inflow: egui::Color32,
    pub outflow: egui::Color32,
    pub warning: egui::Color32,
    pub error: egui::Color32,
    pub link: egui::Color32,
    pub skeleton: egui::Color32,

    // Spacing constants
    pub spacing_xs: f32,
    pub spacing_sm: f32,
    pub spacing_md: f32,
    pub spacing_lg: f32,

    // Button sizes
    pub button_medium: egui::Vec2,
    pub button_large: egui::Vec2,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self {
            // Near-black background with gray-900 cards
            background: egui::Color32::from_rgb(0, 0, 0),
            surface: egui::Color32::from_rgb(17, 24, 39),
            surface_hover: egui::Color32::from_rgb(31, 41, 55),
            surface_active: egui::Color32::from_rgb(55, 65, 81),
            panel_fill: egui::Color32::from_rgb(3, 7, 18),
            border: egui::Color32::from_rgb(31, 41, 55),
            text_primary: egui::Color32::from_rgb(255, 255, 255),
            text_secondary: egui::Color32::from_rgb(156, 163, 175),

            primary: egui::Color32::from_rgb(37, 99, 235), // Send button blue
            secondary: egui::Color32::from_rgb(55, 65, 81), // Receive button gray
            inflow: egui::Color32::from_rgb(74, 222, 128),
            outflow: egui::Color32::from_rgb(248, 113, 113),
            warning: egui::Color32::from_rgb(247, 147, 26), // Bitcoin orange
            error: egui::Color32::from_rgb(248, 113, 113),
            link: egui::Color32::from_rgb(96, 165, 250),
            skeleton: egui::Color32::from_rgb(31, 41, 55),

            spacing_xs: 4.0,
            spacing_sm: 8.0,
            spacing_md: 16.0,
            spacing_lg: 32.0,

            button_medium: egui::vec2(128.0, 40.0),
            button_large: egui::vec2(240.0, 44.0),
        }
    }
}

impl AppTheme {
    /// Filled blue action button
    pub fn button_primary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary).strong())
            .fill(self.primary)
            .rounding(8.0)
            .min_size(self.button_medium)
    }

    /// Filled gray action button
    pub fn button_secondary(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary).strong())
            .fill(self.secondary)
            .rounding(8.0)
            .min_size(self.button_medium)
    }

    /// Full-width form submit button
    pub fn button_large(&self, text: &str) -> egui::Button<'_> {
        egui::Button::new(egui::RichText::new(text).color(self.text_primary).strong())
            .fill(self.primary)
            .rounding(8.0)
            .min_size(self.button_large)
    }

    /// Rounded card used for the balance, transactions and insights panels
    pub fn frame_card(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.surface)
            .rounding(16.0)
            .inner_margin(24.0)
            .stroke(egui::Stroke::new(1.0, self.border))
    }

    /// Calculate responsive width clamped to min/max bounds
    pub fn responsive_width(ui: &egui::Ui, min: f32, preferred: f32, max: f32) -> f32 {
        let available = ui.available_width();
        available.clamp(min, max.min(preferred))
    }
}

/// Configure the egui context style with the given theme
pub fn configure_style(ctx: &egui::Context, theme: &AppTheme) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = theme.surface;
    visuals.panel_fill = theme.background;
    visuals.window_stroke = egui::Stroke::new(1.0, theme.border);
    visuals.window_rounding = egui::Rounding::same(16.0);
    visuals.override_text_color = Some(theme.text_primary);
    visuals.hyperlink_color = theme.link;

    visuals.widgets.noninteractive.bg_fill = theme.surface;
    visuals.widgets.inactive.bg_fill = theme.surface_hover;
    visuals.widgets.hovered.bg_fill = theme.surface_active;
    visuals.widgets.active.bg_fill = theme.surface_active;
    visuals.widgets.open.bg_fill = theme.surface_active;

    // Text inputs
    visuals.extreme_bg_color = theme.panel_fill;
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, theme.border);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, theme.surface_active);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(2.0, theme.primary);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(16.0, 10.0);
    style.spacing.window_margin = egui::Margin::same(24.0);

    style.text_styles.insert(
        egui::TextStyle::Heading,
        egui::FontId::new(22.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Body,
        egui::FontId::new(15.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        egui::FontId::new(15.0, egui::FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        egui::FontId::new(13.0, egui::FontFamily::Monospace),
    );

    ctx.set_style(style);
}
