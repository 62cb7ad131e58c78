//! Toast notifications for brief feedback messages.
//!
//! Non-blocking, stacked top-center, gone after a few seconds. Used for
//! join confirmations and failed availability writes.

use egui::{Align2, Color32, Context, Id, RichText, Vec2};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

impl ToastLevel {
    fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✗",
        }
    }

    fn background_color(&self, is_dark_theme: bool) -> Color32 {
        if is_dark_theme {
            match self {
                ToastLevel::Success => Color32::from_rgb(30, 70, 40),
                ToastLevel::Error => Color32::from_rgb(80, 30, 30),
            }
        } else {
            match self {
                ToastLevel::Success => Color32::from_rgb(220, 255, 220),
                ToastLevel::Error => Color32::from_rgb(255, 220, 220),
            }
        }
    }

    fn text_color(&self, is_dark_theme: bool) -> Color32 {
        if is_dark_theme {
            match self {
                ToastLevel::Success => Color32::from_rgb(100, 220, 120),
                ToastLevel::Error => Color32::from_rgb(255, 120, 120),
            }
        } else {
            match self {
                ToastLevel::Success => Color32::from_rgb(30, 120, 50),
                ToastLevel::Error => Color32::from_rgb(180, 40, 40),
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    level: ToastLevel,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, ToastLevel::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, ToastLevel::Error);
    }

    fn push(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toasts.push(Toast {
            message: message.into(),
            level,
            created_at: Instant::now(),
            duration: Duration::from_secs(4),
        });
    }

    /// Draw active toasts and drop expired ones. Keeps repainting while
    /// anything is visible so expiry does not wait for the next input.
    pub fn render(&mut self, ctx: &Context, is_dark_theme: bool) {
        self.toasts.retain(|toast| !toast.is_expired());
        if self.toasts.is_empty() {
            return;
        }

        let mut offset_y = 12.0;
        for (index, toast) in self.toasts.iter().enumerate() {
            egui::Area::new(Id::new("toast").with(index))
                .anchor(Align2::CENTER_TOP, Vec2::new(0.0, offset_y))
                .order(egui::Order::Foreground)
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style())
                        .fill(toast.level.background_color(is_dark_theme))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                let color = toast.level.text_color(is_dark_theme);
                                ui.label(RichText::new(toast.level.icon()).color(color).strong());
                                ui.label(RichText::new(&toast.message).color(color));
                            });
                        });
                });
            offset_y += 36.0;
        }

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
