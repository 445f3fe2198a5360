/*!
 * Desktop dashboard for climadash
 *
 * Four chart cards in a two-column grid. Each card has its selection
 * controls and a painted surface whose width follows the card. Hovering a
 * bar, marker or point shows its tooltip.
 */

use climadash::Chart;
use climadash::charts::Dashboard;
use climadash::data::{DataSource, SampleData};
use climadash::resize::ResizeWatcher;
use climadash::tooltip::{ActiveTooltip, HoverTracker, TooltipLayer};
use climadash::viz::scene::{Anchor, Mark, Point, TextStyle};
use eframe::egui;
use eframe::egui::epaint::TextShape;
use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Climate Insights - climadash"),
        ..Default::default()
    };

    eframe::run_native(
        "Climate Insights",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new()))),
    )
}

/// Per-chart host state: the resize watcher feeding the pipeline, hover bookkeeping and
/// the instant the current scene started animating.
struct ChartCard {
    watcher: ResizeWatcher,
    hover: HoverTracker,
    started: Instant,
}

struct DashboardApp {
    dashboard: Dashboard,
    cards: Vec<ChartCard>,
    tooltips: TooltipLayer,
    locale: String,
    output_path: String,
    status_message: String,
    error_message: String,
}

impl DashboardApp {
    fn new() -> Self {
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let (dashboard, error_message) = match SampleData.dataset() {
            Ok(ds) => (Dashboard::from_dataset(ds), String::new()),
            Err(e) => (
                Dashboard::from_dataset(climadash::data::sample()),
                format!("Could not load data: {e}"),
            ),
        };
        let mut app = Self {
            dashboard,
            cards: Vec::new(),
            tooltips: TooltipLayer::new(),
            locale: "en".to_string(),
            output_path: home_dir,
            status_message: String::new(),
            error_message,
        };
        app.cards = app
            .dashboard
            .charts_mut()
            .iter_mut()
            .map(|chart| ChartCard {
                watcher: chart.watch(),
                hover: HoverTracker::new(),
                started: Instant::now(),
            })
            .collect();
        app
    }

    fn export_all(&mut self) {
        let dir = PathBuf::from(self.output_path.trim());
        let mut written = 0;
        for chart in self.dashboard.charts() {
            let width = chart.dimensions().map(|d| d.width).unwrap_or(800).max(200);
            let path = dir.join(format!("{}.svg", chart.name()));
            if let Err(e) = chart.render_file(&path, width) {
                self.error_message = format!("Export failed: {e:#}");
                self.status_message.clear();
                return;
            }
            written += 1;
        }
        self.error_message.clear();
        self.status_message = format!("Wrote {} charts to {}", written, dir.display());
    }
}

fn color32(c: climadash::color::Rgb, opacity: f64) -> Color32 {
    let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, a)
}

fn to_screen(origin: Pos2, p: Point) -> Pos2 {
    Pos2::new(origin.x + p.x as f32, origin.y + p.y as f32)
}

fn stroke(s: &climadash::viz::scene::Stroke, opacity: f64) -> Stroke {
    Stroke::new(s.width as f32, color32(s.color, opacity))
}

fn paint_text(painter: &egui::Painter, at: Pos2, text: &str, style: &TextStyle, opacity: f64) {
    let font = FontId::proportional(style.size as f32);
    let color = color32(style.color, opacity);
    let galley = painter.layout_no_wrap(text.to_string(), font, color);
    let (w, h) = (galley.size().x, galley.size().y);
    let along = match style.anchor {
        Anchor::Start => 0.0,
        Anchor::Middle => w / 2.0,
        Anchor::End => w,
    };
    let shape = if style.vertical {
        // Rotated a quarter turn: the galley's width runs up the screen.
        let pos = Pos2::new(at.x - h, at.y + along);
        TextShape::new(pos, galley, color).with_angle(-std::f32::consts::FRAC_PI_2)
    } else {
        let pos = Pos2::new(at.x - along, at.y - h);
        TextShape::new(pos, galley, color)
    };
    painter.add(shape);
}

fn paint_marks(painter: &egui::Painter, origin: Pos2, marks: &[Mark]) {
    for mark in marks {
        match mark {
            Mark::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke: outline,
                corner,
                opacity,
            } => {
                let rect = Rect::from_min_size(
                    to_screen(origin, Point::new(*x, *y)),
                    Vec2::new(*width as f32, *height as f32),
                );
                painter.rect_filled(rect, *corner as f32, color32(*fill, *opacity));
                if let Some(s) = outline {
                    painter.rect_stroke(rect, *corner as f32, stroke(s, *opacity));
                }
            }
            Mark::Path {
                points,
                stroke: s,
                opacity,
            } => {
                let pts: Vec<Pos2> = points.iter().map(|p| to_screen(origin, *p)).collect();
                match s.dash {
                    Some((dash, gap)) => painter.extend(egui::Shape::dashed_line(
                        &pts,
                        stroke(s, *opacity),
                        dash as f32,
                        gap as f32,
                    )),
                    None => {
                        painter.add(egui::Shape::line(pts, stroke(s, *opacity)));
                    }
                }
            }
            Mark::Circle {
                center,
                radius,
                fill,
                stroke: outline,
                opacity,
            } => {
                let fill = fill
                    .map(|c| color32(c, *opacity))
                    .unwrap_or(Color32::TRANSPARENT);
                let outline = outline
                    .as_ref()
                    .map(|s| stroke(s, *opacity))
                    .unwrap_or(Stroke::NONE);
                painter.circle(to_screen(origin, *center), *radius as f32, fill, outline);
            }
            Mark::Text {
                at,
                text,
                style,
                opacity,
            } => paint_text(painter, to_screen(origin, *at), text, style, *opacity),
        }
    }
}

fn paint_tooltip(painter: &egui::Painter, origin: Pos2, tip: &ActiveTooltip) {
    let text = tip.lines.join("\n");
    if tip.floating {
        let galley = painter.layout_no_wrap(text, FontId::proportional(12.0), Color32::BLACK);
        let pos = to_screen(origin, tip.position) + Vec2::new(10.0, -28.0);
        let rect = Rect::from_min_size(pos, galley.size()).expand(5.0);
        painter.rect_filled(rect, 4.0, Color32::WHITE);
        painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::from_gray(0xdd)));
        painter.galley(pos, galley, Color32::BLACK);
    } else {
        painter.text(
            to_screen(origin, tip.position),
            Align2::CENTER_BOTTOM,
            text,
            FontId::proportional(10.0),
            Color32::BLACK,
        );
    }
}

/// One card: heading, controls, surface. Returns `true` while transitions are still running.
fn chart_card(
    ui: &mut egui::Ui,
    chart: &mut dyn Chart,
    card: &mut ChartCard,
    tooltips: &TooltipLayer,
    locale: &str,
) -> bool {
    ui.heading(chart.title());
    ui.add_space(5.0);

    ui.horizontal_wrapped(|ui| {
        let dims: Vec<_> = chart.controls().dimensions().to_vec();
        for dim in &dims {
            let current = chart.controls().current(dim.name).clone();
            let mut picked = current.clone();
            egui::ComboBox::from_id_salt((chart.name(), dim.name))
                .selected_text(dim.label(&current).to_string())
                .show_ui(ui, |ui| {
                    for choice in dim.choices() {
                        let label = dim.label(&choice).to_string();
                        ui.selectable_value(&mut picked, choice, label);
                    }
                });
            if picked != current
                && let Err(e) = chart.controls_mut().choose(dim.name, picked)
            {
                log::warn!("{e}");
            }
        }
        if ui.button("Reset").clicked() {
            chart.controls_mut().reset();
        }
    });
    ui.add_space(5.0);

    let width = ui.available_width().max(1.0);
    let (rect, response) = ui.allocate_exact_size(
        Vec2::new(width, chart.height() as f32),
        Sense::hover(),
    );
    card.watcher.observe(width.floor() as u32);
    chart.set_locale(locale);
    if chart.refresh() {
        card.started = Instant::now();
        card.hover.clear();
    }
    let Some(scene) = chart.scene() else {
        return false;
    };

    let elapsed = card.started.elapsed().as_secs_f64() * 1000.0;
    let origin = rect.min;
    let pointer = response
        .hover_pos()
        .map(|p| Point::new((p.x - origin.x) as f64, (p.y - origin.y) as f64));
    let hovered = card
        .hover
        .update(scene, elapsed, pointer, tooltips, chart.name());

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Color32::WHITE);
    paint_marks(&painter, origin, &scene.frame(elapsed, hovered));
    for tip in tooltips.active().iter().filter(|t| t.owner == chart.name()) {
        paint_tooltip(&painter, origin, tip);
    }

    elapsed < scene.duration_ms()
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Climate Insights");
                ui.separator();
                ui.label("Locale:");
                egui::ComboBox::from_id_salt("locale")
                    .selected_text(&self.locale)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.locale, "en".to_string(), "English (en)");
                        ui.selectable_value(&mut self.locale, "de".to_string(), "German (de)");
                        ui.selectable_value(&mut self.locale, "fr".to_string(), "French (fr)");
                        ui.selectable_value(&mut self.locale, "es".to_string(), "Spanish (es)");
                        ui.selectable_value(&mut self.locale, "it".to_string(), "Italian (it)");
                    });
                ui.separator();
                ui.label("Output path:");
                ui.text_edit_singleline(&mut self.output_path);
                if ui.button("Browse").clicked()
                    && let Some(path) = rfd::FileDialog::new().pick_folder()
                {
                    self.output_path = path.to_string_lossy().to_string();
                }
                if ui.button("Export SVG").clicked() {
                    self.export_all();
                }
            });
            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
            }
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.error_message);
            }
        });

        let mut animating = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let charts = self.dashboard.charts_mut();
                let col_width = (ui.available_width() - 10.0) / 2.0;
                for (charts, cards) in charts.chunks_mut(2).zip(self.cards.chunks_mut(2)) {
                    ui.horizontal_top(|ui| {
                        for (chart, card) in charts.iter_mut().zip(cards.iter_mut()) {
                            ui.vertical(|ui| {
                                ui.set_width(col_width);
                                ui.group(|ui| {
                                    animating |= chart_card(
                                        ui,
                                        chart.as_mut(),
                                        card,
                                        &self.tooltips,
                                        &self.locale,
                                    );
                                });
                            });
                        }
                    });
                    ui.add_space(10.0);
                }
            });
        });

        if animating {
            ctx.request_repaint();
        }
    }
}
