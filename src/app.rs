//! Application shell and eframe integration.
//!
//! Owns the viewer state (catalog, viewing configuration, time offset) and
//! renders the side-panel controls plus the central orbit plot. Control
//! changes flow through the `ViewEvents` capability interface; each change
//! triggers one synchronous recompute and redraw.

use crate::catalog::{PlanetCatalog, AU};
use crate::elements::true_from_mean;
use crate::export::export_picture;
use crate::scene::{build_scene, Scene};
use crate::time::{display_date, j2000_days, offset_days};
use crate::view::{ViewConfig, ViewEvents, MAX_ZOOM, MIN_ZOOM};
use chrono::{DateTime, Utc};
use eframe::egui;
use egui_plot::{Line, LineStyle, Plot, PlotBounds, PlotPoint, Points, Text};
use std::path::Path;

const DAY_RANGE: f64 = 365.0;
const ANGLE_RANGE: f64 = 180.0;

pub(crate) struct ViewerState {
    pub(crate) catalog: PlanetCatalog,
    pub(crate) view: ViewConfig,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) day_offset: f64,
    pub(crate) show_labels: bool,
    pub(crate) focused: Option<String>,
    pub(crate) animate: bool,
    /// Playback speed in days per second.
    pub(crate) speed: f64,
    pub(crate) last_export: Option<String>,
}

impl ViewerState {
    pub(crate) fn new(catalog: PlanetCatalog, start_time: DateTime<Utc>) -> Self {
        Self {
            catalog,
            view: ViewConfig::default(),
            start_time,
            day_offset: 0.0,
            show_labels: true,
            focused: None,
            animate: false,
            speed: 5.0,
            last_export: None,
        }
    }

    pub(crate) fn current_time(&self) -> DateTime<Utc> {
        offset_days(self.start_time, self.day_offset)
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Time").strong());
        let mut day = self.day_offset;
        if ui
            .add(
                egui::Slider::new(&mut day, -DAY_RANGE..=DAY_RANGE)
                    .text("days")
                    .fixed_decimals(0),
            )
            .changed()
        {
            self.on_time_change(day);
        }
        ui.label(egui::RichText::new(display_date(self.current_time())).weak());

        ui.separator();
        ui.label(egui::RichText::new("View").strong());
        let (mut phi, mut psi, mut theta) = (self.view.phi, self.view.psi, self.view.theta);
        let mut changed = false;
        changed |= ui
            .add(egui::Slider::new(&mut phi, -ANGLE_RANGE..=ANGLE_RANGE).text("phi").suffix("°"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut psi, -ANGLE_RANGE..=ANGLE_RANGE).text("psi").suffix("°"))
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut theta, -ANGLE_RANGE..=ANGLE_RANGE)
                    .text("theta")
                    .suffix("°"),
            )
            .changed();
        if changed {
            self.on_angle_change(phi, psi, theta);
        }
        let mut zoom = self.view.zoom;
        if ui
            .add(
                egui::Slider::new(&mut zoom, MIN_ZOOM..=MAX_ZOOM)
                    .text("zoom")
                    .logarithmic(true),
            )
            .changed()
        {
            self.on_zoom_change(zoom);
        }

        ui.separator();
        ui.label(egui::RichText::new("Display").strong());
        ui.checkbox(&mut self.show_labels, "Labels");
        egui::ComboBox::from_label("Focus")
            .selected_text(self.focused.clone().unwrap_or_else(|| "None".to_owned()))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.focused, None, "None");
                for body in self.catalog.bodies() {
                    if body.elements.is_some() {
                        ui.selectable_value(
                            &mut self.focused,
                            Some(body.name.clone()),
                            body.name.as_str(),
                        );
                    }
                }
            });
        if let Some(body) = self.focused.as_deref().and_then(|name| self.catalog.get(name)) {
            if let Some(el) = &body.elements {
                let t = j2000_days(self.current_time());
                let nu = true_from_mean(el.mean_anomaly_at(t), el.eccentricity).to_degrees();
                ui.label(
                    egui::RichText::new(format!(
                        "a = {:.3} AU, e = {:.4}, true anomaly = {nu:.1}°",
                        el.semi_major_axis / AU,
                        el.eccentricity
                    ))
                    .weak(),
                );
            }
        }
        ui.checkbox(&mut self.animate, "Animate");
        ui.add(
            egui::Slider::new(&mut self.speed, 0.1..=100.0)
                .text("days/s")
                .logarithmic(true),
        );

        ui.separator();
        if ui.button("Save image").clicked() {
            match export_picture(
                &self.catalog,
                &self.view,
                self.current_time(),
                Path::new("./plots"),
            ) {
                Ok(path) => self.last_export = Some(format!("saved {}", path.display())),
                Err(err) => {
                    log::error!("export failed: {err}");
                    self.last_export = Some(format!("export failed: {err}"));
                }
            }
        }
        if let Some(status) = &self.last_export {
            ui.label(egui::RichText::new(status).weak());
        }

        let hash = env!("GIT_HASH");
        if !hash.is_empty() {
            ui.separator();
            ui.weak(format!("orbit-viz {hash}"));
        }
    }

    fn show_plot(&mut self, ui: &mut egui::Ui) {
        let scene = build_scene(&self.catalog, self.current_time(), &self.view);
        let extent = scene.extent;
        let show_labels = self.show_labels;
        let focused = self.focused.clone();

        Plot::new("orbits")
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [-extent, -extent],
                    [extent, extent],
                ));
                draw_scene(plot_ui, &scene, show_labels, focused.as_deref());
            });
    }
}

impl ViewEvents for ViewerState {
    fn on_time_change(&mut self, day_offset: f64) {
        self.day_offset = day_offset;
    }

    fn on_angle_change(&mut self, phi: f64, psi: f64, theta: f64) {
        self.view.phi = phi;
        self.view.psi = psi;
        self.view.theta = theta;
    }

    fn on_zoom_change(&mut self, zoom: f64) {
        self.view.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

fn draw_scene(
    plot_ui: &mut egui_plot::PlotUi,
    scene: &Scene,
    show_labels: bool,
    focused: Option<&str>,
) {
    let extent = scene.extent;

    for trace in &scene.traces {
        let color = egui::Color32::from_rgb(trace.color[0], trace.color[1], trace.color[2]);
        let focus = focused == Some(trace.name.as_str());

        if let Some(outline) = &trace.outline {
            let (orbit_color, orbit_width) = if focus {
                (color, 2.0)
            } else {
                (color.gamma_multiply(0.4), 1.0)
            };
            plot_ui.line(
                Line::new("", outline.clone())
                    .color(orbit_color)
                    .width(orbit_width)
                    .style(LineStyle::dashed_loose()),
            );
        }
        if let Some(trail) = &trace.trail {
            plot_ui.line(Line::new("", trail.clone()).color(color).width(2.0));
        }

        let radius = if trace.outline.is_some() { 4.0 } else { 6.0 };
        plot_ui.points(
            Points::new("", vec![trace.position])
                .color(color)
                .radius(radius),
        );

        // Skip labels on orbits that are tiny at the current zoom.
        if show_labels
            && trace.outline.is_some()
            && (focus || trace.apparent_size * 10.0 >= extent)
        {
            plot_ui.text(
                Text::new(
                    "",
                    PlotPoint::new(trace.position[0], trace.position[1] + extent * 0.025),
                    egui::RichText::new(&trace.name).size(11.0),
                )
                .color(color)
                .anchor(egui::Align2::CENTER_BOTTOM),
            );
        }
    }

    plot_ui.text(
        Text::new(
            "",
            PlotPoint::new(-extent * 0.97, -extent * 0.97),
            egui::RichText::new(display_date(scene.timestamp)).monospace(),
        )
        .color(egui::Color32::GRAY)
        .anchor(egui::Align2::LEFT_BOTTOM),
    );
}

pub struct App {
    state: ViewerState,
}

impl App {
    pub fn new(catalog: PlanetCatalog) -> Self {
        Self {
            state: ViewerState::new(catalog, Utc::now()),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.animate {
            let dt = ctx.input(|i| i.stable_dt) as f64;
            let day = self.state.day_offset + self.state.speed * dt;
            self.state.on_time_change(day);
            ctx.request_repaint();
        }

        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| self.state.show_controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.state.show_plot(ui));
    }
}
