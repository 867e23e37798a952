// CodeLens Desktop Review Window
// Copyright (c) 2026 Xing_The_Creator | CodeLens
//
// Editor on the left, chat on the right, console along the bottom.
// Requests run on the tokio runtime; the window only ever touches the
// session through its mutex and never holds the lock across a request.

use eframe::egui;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tracing::{error, info};

use crate::config::Settings;
use crate::review::gateway::{CompletionGateway, GroqGateway};
use crate::review::prompt::Mode;
use crate::review::report::AuditReport;
use crate::review::session::{MetricsSnapshot, ReviewSession, Speaker};

const COLOR_BG_DARK: egui::Color32 = egui::Color32::from_rgb(18, 18, 20);
const COLOR_PANEL_BG: egui::Color32 = egui::Color32::from_rgb(28, 28, 32);
const COLOR_ACCENT_BLUE: egui::Color32 = egui::Color32::from_rgb(70, 150, 255);
const COLOR_ACCENT_PURPLE: egui::Color32 = egui::Color32::from_rgb(170, 120, 255);
const COLOR_ACCENT_CYAN: egui::Color32 = egui::Color32::from_rgb(60, 200, 220);
const COLOR_CONSOLE_GREEN: egui::Color32 = egui::Color32::from_rgb(80, 220, 120);
const COLOR_TEXT_SECONDARY: egui::Color32 = egui::Color32::from_rgb(150, 150, 160);

const SAMPLE_CODE: &str = "def find_duplicates(items):
    seen = []
    dupes = []
    for item in items:
        if item in seen:
            dupes.append(item)
        seen.append(item)
    return dupes

print(find_duplicates([1, 2, 3, 2, 1]))
";

enum UiAction {
    Send(Mode),
    OpenFile,
    ExportReport,
    CloseConsole,
}

fn lock(session: &Mutex<ReviewSession>) -> MutexGuard<'_, ReviewSession> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

/// Latest analysis text and metrics, copied out so the lock is released.
fn analysis_snapshot(session: &Mutex<ReviewSession>) -> Option<(String, MetricsSnapshot)> {
    let session = lock(session);
    let analysis = session.last_analysis()?;
    Some((analysis.content.clone(), session.metrics().clone()))
}

fn score_color(score: u8) -> egui::Color32 {
    if score >= 80 {
        egui::Color32::from_rgb(80, 220, 120)
    } else if score >= 50 {
        egui::Color32::from_rgb(240, 200, 60)
    } else {
        egui::Color32::from_rgb(240, 90, 90)
    }
}

fn metric_badges(ui: &mut egui::Ui, metrics: &MetricsSnapshot) {
    let Some(score) = metrics.score else {
        return;
    };
    let icon = if score >= 80 { "🛡" } else { "⚠" };
    ui.label(
        egui::RichText::new(format!("{} Score: {}", icon, score))
            .strong()
            .color(score_color(score)),
    );
    if let Some(time) = metrics.time_label() {
        ui.label(
            egui::RichText::new(format!("⏱ {}", time))
                .monospace()
                .color(COLOR_ACCENT_PURPLE),
        );
    }
    if let Some(space) = &metrics.space_complexity {
        ui.label(
            egui::RichText::new(format!("💾 {}", space))
                .monospace()
                .color(COLOR_ACCENT_CYAN),
        );
    }
}

pub struct CodeLensApp {
    session: Arc<Mutex<ReviewSession>>,
    gateway: Arc<dyn CompletionGateway>,
    model: String,
    runtime: Handle,
    input: String,
    status: String,
}

impl CodeLensApp {
    pub fn new(gateway: Arc<dyn CompletionGateway>, model: &str, runtime: Handle) -> Self {
        Self {
            session: Arc::new(Mutex::new(ReviewSession::new(SAMPLE_CODE))),
            gateway,
            model: model.to_string(),
            runtime,
            input: String::new(),
            status: "Ready".to_string(),
        }
    }

    fn configure_style(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = COLOR_BG_DARK;
        visuals.panel_fill = COLOR_PANEL_BG;
        ctx.set_visuals(visuals);
    }

    fn handle(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::Send(mode) => self.dispatch(ctx, mode),
            UiAction::CloseConsole => lock(&self.session).close_console(),
            UiAction::OpenFile => {
                let Some(path) = rfd::FileDialog::new().pick_file() else {
                    return;
                };
                match std::fs::read_to_string(&path) {
                    Ok(code) => {
                        lock(&self.session).replace_buffer(code);
                        self.status = format!("Opened {}", path.display());
                        info!("[GUI] Opened {:?}", path);
                    }
                    Err(e) => {
                        self.status = format!("Could not open {}: {}", path.display(), e);
                        error!("[GUI] {}", self.status);
                    }
                }
            }
            UiAction::ExportReport => self.export_report(),
        }
    }

    fn export_report(&mut self) {
        // The save dialog is modal; never hold the session across it.
        let Some((content, metrics)) = analysis_snapshot(&self.session) else {
            self.status = "Run Analyze before exporting a report".to_string();
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("CodeLens-Report.txt")
            .save_file()
        else {
            return;
        };

        match AuditReport::new(&content, &metrics).save(&path) {
            Ok(()) => self.status = format!("Report saved to {}", path.display()),
            Err(e) => {
                error!("[GUI] Report export failed: {}", e);
                self.status = e.to_string();
            }
        }
    }

    fn dispatch(&mut self, ctx: &egui::Context, mode: Mode) {
        let typed = if mode == Mode::Chat {
            std::mem::take(&mut self.input)
        } else {
            String::new()
        };

        let request = match lock(&self.session).begin(mode, &typed) {
            Ok(request) => request,
            Err(e) => {
                self.status = e.to_string();
                if mode == Mode::Chat {
                    self.input = typed;
                }
                return;
            }
        };
        self.status = "Thinking...".to_string();

        let session = self.session.clone();
        let gateway = self.gateway.clone();
        let model = self.model.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let outcome = gateway.complete(&request.to_turns(), &model).await;
            lock(&session).finish(mode, outcome);
            ctx.request_repaint();
        });
    }
}

impl eframe::App for CodeLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.configure_style(ctx);
        let mut action: Option<UiAction> = None;

        {
            let mut session = lock(&self.session);
            let busy = session.is_loading();
            let language = session.language();
            if !busy && self.status == "Thinking..." {
                self.status = "Ready".to_string();
            }

            // 1. Toolbar
            egui::TopBottomPanel::top("toolbar").min_height(44.0).show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(egui::RichText::new(format!("📄 {}", language.file_name())).strong());
                    ui.add_space(12.0);
                    metric_badges(ui, session.metrics());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let optimize = egui::Button::new(
                            egui::RichText::new("⚡ Optimize").strong().color(egui::Color32::BLACK),
                        )
                        .fill(egui::Color32::WHITE);
                        if ui.add_enabled(!busy, optimize).clicked() {
                            action = Some(UiAction::Send(Mode::Optimize));
                        }
                        if ui.add_enabled(!busy, egui::Button::new("🔍 Analyze")).clicked() {
                            action = Some(UiAction::Send(Mode::Analyze));
                        }
                        if ui.add_enabled(!busy, egui::Button::new("▶ Run")).clicked() {
                            action = Some(UiAction::Send(Mode::Execute));
                        }
                        if ui.button("⬇ Export").clicked() {
                            action = Some(UiAction::ExportReport);
                        }
                        if ui.add_enabled(!busy, egui::Button::new("📂 Open")).clicked() {
                            action = Some(UiAction::OpenFile);
                        }
                    });
                });
            });

            // 2. Chat
            egui::SidePanel::right("chat").default_width(420.0).show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading("AI Assistant");
                ui.label(egui::RichText::new("CODELENS").size(10.0).color(COLOR_TEXT_SECONDARY));
                ui.separator();

                egui::TopBottomPanel::bottom("chat_input").show_inside(ui, |ui| {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        let width = ui.available_width() - 60.0;
                        let field = ui.add(
                            egui::TextEdit::singleline(&mut self.input)
                                .hint_text("Ask AI to review or modify...")
                                .desired_width(width),
                        );
                        let entered = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        if (ui.add_enabled(!busy, egui::Button::new("Send")).clicked() || entered) && !busy {
                            action = Some(UiAction::Send(Mode::Chat));
                        }
                    });
                    ui.add_space(6.0);
                });

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for msg in session.visible_messages() {
                            let (who, fill) = match msg.role {
                                Speaker::User => ("You", egui::Color32::from_rgb(60, 60, 70)),
                                Speaker::Assistant => ("AI", egui::Color32::from_rgb(38, 38, 46)),
                            };
                            egui::Frame::none()
                                .fill(fill)
                                .rounding(10.0)
                                .inner_margin(egui::Margin::same(10.0))
                                .show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    ui.label(msg.content.as_str());
                                });
                            ui.label(
                                egui::RichText::new(format!("{} • {}", who, msg.timestamp))
                                    .size(10.0)
                                    .color(COLOR_TEXT_SECONDARY),
                            );
                            ui.add_space(8.0);
                        }
                        if busy {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label("Thinking...");
                            });
                        }
                    });
            });

            // 3. Footer
            egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&self.status).size(12.0).color(COLOR_ACCENT_BLUE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(language.display_name());
                        ui.label("UTF-8");
                        ui.label(format!("Ln {}, Col 1", session.buffer().lines().count().max(1)));
                    });
                });
            });

            // 4. Console
            if let Some(output) = session.console().map(str::to_string) {
                egui::TopBottomPanel::bottom("console")
                    .resizable(true)
                    .default_height(180.0)
                    .show(ctx, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(">_ Console Output").monospace());
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("✕").clicked() {
                                    action = Some(UiAction::CloseConsole);
                                }
                            });
                        });
                        ui.separator();
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            if session.pending() == Some(Mode::Execute) {
                                ui.horizontal(|ui| {
                                    ui.spinner();
                                    ui.label("Executing...");
                                });
                            } else {
                                ui.label(
                                    egui::RichText::new(output)
                                        .monospace()
                                        .color(COLOR_CONSOLE_GREEN),
                                );
                            }
                        });
                    });
            }

            // 5. Editor
            egui::CentralPanel::default().show(ctx, |ui| {
                egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(session.buffer_mut())
                            .code_editor()
                            .hint_text("// Paste your code here...")
                            .desired_rows(30)
                            .desired_width(f32::INFINITY),
                    );
                });
            });
        }

        if let Some(action) = action {
            self.handle(ctx, action);
        }
    }
}

pub fn run_gui(settings: &Settings, runtime: Handle) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("CodeLens"),
        ..Default::default()
    };

    let gateway: Arc<dyn CompletionGateway> = Arc::new(GroqGateway::from_settings(settings));
    let app = CodeLensApp::new(gateway, &settings.model, runtime);

    eframe::run_native(
        "CodeLens",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
