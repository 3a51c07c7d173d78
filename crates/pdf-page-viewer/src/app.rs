use crate::widget::DocumentPageViewer;
use eframe::egui;

pub struct PageViewerApp {
    viewer: DocumentPageViewer,
}

impl PageViewerApp {
    pub fn new(viewer: DocumentPageViewer) -> Self {
        Self { viewer }
    }
}

impl eframe::App for PageViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.viewer.show(ui);
            });
        });
    }
}
