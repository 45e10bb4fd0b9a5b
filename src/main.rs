mod app;
mod catalog;
mod elements;
mod export;
mod math;
mod raster;
mod scene;
mod time;
mod view;

use crate::app::App;
use crate::catalog::PlanetCatalog;
use crate::view::ViewConfig;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use eframe::egui;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orbit-viz", version, about = "Solar-system orbit viewer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render a one-shot PNG for a given time and viewing configuration
    Export {
        /// Viewing angle around the x-axis, degrees
        #[arg(long, default_value_t = 0.0)]
        phi: f64,
        /// Viewing angle around the y-axis, degrees
        #[arg(long, default_value_t = 0.0)]
        psi: f64,
        /// Viewing angle around the z-axis, degrees
        #[arg(long, default_value_t = 0.0)]
        theta: f64,
        /// Linear zoom factor
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
        /// RFC 3339 timestamp; defaults to now
        #[arg(long)]
        time: Option<String>,
        /// Output directory
        #[arg(long, default_value = "./plots")]
        out: PathBuf,
    },
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let catalog = match PlanetCatalog::solar_system() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("invalid planet catalog: {err}");
            std::process::exit(1);
        }
    };

    if let Some(Command::Export { phi, psi, theta, zoom, time, out }) = cli.command {
        let time = match time {
            Some(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(t) => t.with_timezone(&Utc),
                Err(err) => {
                    eprintln!("invalid --time value {s:?}: {err}");
                    std::process::exit(2);
                }
            },
            None => Utc::now(),
        };
        let view = ViewConfig::new(phi, psi, theta, zoom);
        match export::export_picture(&catalog, &view, time, &out) {
            Ok(path) => {
                println!("{}", path.display());
                return Ok(());
            }
            Err(err) => {
                eprintln!("export failed: {err}");
                std::process::exit(1);
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Orbit Viz",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new(catalog)))),
    )
}
