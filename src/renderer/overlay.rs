use glam::Vec3;

use crate::rooms::SceneKind;

/// What the HUD shows this frame
#[derive(Debug, Clone)]
pub struct OverlayInfo<'a> {
    pub fps: f32,
    pub position: Vec3,
    pub scene: SceneKind,
    pub rooms: &'a [String],
    pub pending: usize,
    pub locked: bool,
}

/// Something the user clicked in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    Enter,
    SwitchScene(SceneKind),
}

const ACCENT: egui::Color32 = egui::Color32::from_rgb(74, 158, 255);

pub fn draw_overlay(ctx: &egui::Context, info: &OverlayInfo<'_>) -> Option<OverlayAction> {
    let mut action = None;

    egui::Window::new("FPS")
        .title_bar(false)
        .resizable(false)
        .fixed_pos(egui::pos2(10.0, 10.0))
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("{:.0}", info.fps))
                    .size(32.0)
                    .color(ACCENT),
            );
            ui.label(egui::RichText::new("FPS").size(12.0).color(egui::Color32::GRAY));
            ui.label(
                egui::RichText::new(format!(
                    "{:.1}, {:.1}, {:.1}",
                    info.position.x, info.position.y, info.position.z
                ))
                .monospace()
                .color(egui::Color32::LIGHT_GRAY),
            );
            ui.label(
                egui::RichText::new(info.rooms.join(" / "))
                    .size(14.0)
                    .color(egui::Color32::WHITE),
            );
            if info.pending > 0 {
                ui.label(
                    egui::RichText::new(format!("loading {} assets...", info.pending))
                        .color(egui::Color32::YELLOW),
                );
            }
        });

    if !info.locked {
        egui::Area::new(egui::Id::new("start"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Museum");
                        if ui
                            .button(egui::RichText::new("Enter the museum").size(20.0))
                            .clicked()
                        {
                            action = Some(OverlayAction::Enter);
                        }
                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            for (i, kind) in SceneKind::ALL.iter().enumerate() {
                                let label = format!("{} {}", i + 1, kind);
                                if ui.selectable_label(*kind == info.scene, label).clicked() {
                                    action = Some(OverlayAction::SwitchScene(*kind));
                                }
                            }
                        });
                        ui.add_space(8.0);
                        ui.label("WASD / arrows: walk    mouse: look");
                        ui.label("1-5: switch scene    Esc: release the mouse");
                    });
                });
            });
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(locked: bool) -> OverlayInfo<'static> {
        OverlayInfo {
            fps: 60.0,
            position: Vec3::new(0.0, 25.0, 10.0),
            scene: SceneKind::Lobby,
            rooms: &[],
            pending: 0,
            locked,
        }
    }

    fn input(events: Vec<egui::Event>) -> egui::RawInput {
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            events,
            ..Default::default()
        }
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Runs one frame per event batch and collects every action
    fn click_at(ctx: &egui::Context, info: &OverlayInfo<'_>, pos: egui::Pos2) -> Vec<OverlayAction> {
        let frames = [
            vec![],
            vec![egui::Event::PointerMoved(pos)],
            vec![button(pos, true)],
            vec![button(pos, false)],
            vec![],
        ];
        let mut actions = Vec::new();
        for events in frames {
            let _ = ctx.run(input(events), |ctx| {
                if let Some(action) = draw_overlay(ctx, info) {
                    actions.push(action);
                }
            });
        }
        actions
    }

    #[test]
    fn clicks_outside_the_start_panel_do_nothing() {
        let ctx = egui::Context::default();
        let actions = click_at(&ctx, &info(false), egui::pos2(790.0, 590.0));
        assert!(actions.is_empty());
        assert!(ctx.memory(|memory| memory.area_rect(egui::Id::new("start"))).is_some());
    }

    #[test]
    fn start_panel_is_hidden_while_locked() {
        let ctx = egui::Context::default();
        let actions = click_at(&ctx, &info(true), egui::pos2(400.0, 300.0));
        assert!(actions.is_empty());
        assert!(ctx.memory(|memory| memory.area_rect(egui::Id::new("start"))).is_none());
    }
}
