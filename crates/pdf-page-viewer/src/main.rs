use clap::Parser;
use eframe::egui;
use pdf_page_viewer::app::PageViewerApp;
use pdf_page_viewer::cli::Cli;
use pdf_page_viewer::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use pdf_page_viewer::{DocumentPageViewer, JsonLinesBridge, PdfiumRenderer};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let args = match cli.viewer_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("Failed to read viewer arguments: {}", e);
            std::process::exit(2);
        }
    };

    let renderer = match PdfiumRenderer::new() {
        Ok(renderer) => renderer,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let viewer = DocumentPageViewer::from_args(
        &args,
        Box::new(renderer),
        Box::new(JsonLinesBridge::stdout()),
    );

    let options = eframe::NativeOptions {
        vsync: true,
        renderer: eframe::Renderer::Glow,
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT])
            .with_title(&cli.title),
        ..Default::default()
    };

    eframe::run_native(
        &cli.title,
        options,
        Box::new(|_cc| Ok(Box::new(PageViewerApp::new(viewer)))),
    )
}
