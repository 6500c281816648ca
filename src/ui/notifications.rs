//! Transient notifications shown in the bottom-right corner.

use crate::constants::NOTIFICATION_SECONDS;
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Input time after which the notification disappears
    pub expires_at: f64,
}

/// Queue of notifications, oldest first.
#[derive(Debug, Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn info(&mut self, message: impl Into<String>, now: f64) {
        self.push(NotificationKind::Info, message.into(), now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: f64) {
        let message = message.into();
        log::warn!("{message}");
        self.push(NotificationKind::Error, message, now);
    }

    fn push(&mut self, kind: NotificationKind, message: String, now: f64) {
        self.items.push(Notification {
            kind,
            message,
            expires_at: now + NOTIFICATION_SECONDS,
        });
    }

    /// Drops expired notifications.
    pub fn prune(&mut self, now: f64) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Draws the live notifications and schedules a repaint for the next expiry.
    pub fn show(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        self.prune(now);
        if self.items.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notifications"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for item in &self.items {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        let color = match item.kind {
                            NotificationKind::Info => ui.visuals().text_color(),
                            NotificationKind::Error => ui.visuals().error_fg_color,
                        };
                        ui.colored_label(color, &item.message);
                    });
                }
            });

        let next_expiry = self
            .items
            .iter()
            .map(|n| n.expires_at)
            .fold(f64::INFINITY, f64::min);
        let wait = (next_expiry - now).max(0.0);
        ctx.request_repaint_after(std::time::Duration::from_secs_f64(wait));
    }
}
