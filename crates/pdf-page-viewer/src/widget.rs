use crate::bridge::HostBridge;
use crate::constants::*;
use crate::error::ViewerError;
use crate::payload::{DocumentPayload, PageNumber, ViewerArgs};
use crate::renderer::DocumentRenderer;
use crate::viewer::{Effect, Offset, PageView, ViewerEvent, ViewerState};
use eframe::egui;
use image::{RgbImage, imageops};

struct RenderedPage {
    page: PageNumber,
    texture: Result<egui::TextureHandle, String>,
}

/// Single-page PDF viewer bound to a host bridge.
///
/// Parsing is requested on construction and carried out by [`poll`](Self::poll),
/// which the UI calls at the start of every frame.
pub struct DocumentPageViewer {
    payload: DocumentPayload,
    state: ViewerState,
    renderer: Box<dyn DocumentRenderer>,
    bridge: Box<dyn HostBridge>,
    parse_requested: bool,
    rendered: Option<RenderedPage>,
}

impl DocumentPageViewer {
    pub fn new(
        payload: DocumentPayload,
        start_page: PageNumber,
        renderer: Box<dyn DocumentRenderer>,
        bridge: Box<dyn HostBridge>,
    ) -> Self {
        let (state, effects) = ViewerState::new(start_page);
        let mut viewer = Self {
            payload,
            state,
            renderer,
            bridge,
            parse_requested: false,
            rendered: None,
        };
        viewer.run_effects(effects);
        viewer
    }

    pub fn from_args(
        args: &ViewerArgs,
        renderer: Box<dyn DocumentRenderer>,
        bridge: Box<dyn HostBridge>,
    ) -> Self {
        Self::new(args.payload(), args.initial_page, renderer, bridge)
    }

    /// Replaces the payload, discarding all state derived from the previous one.
    pub fn remount(&mut self, payload: DocumentPayload, start_page: PageNumber) {
        let (state, effects) = ViewerState::new(start_page);
        self.payload = payload;
        self.state = state;
        self.parse_requested = false;
        self.rendered = None;
        self.run_effects(effects);
    }

    pub fn on_document_parsed(&mut self, page_count: u32) {
        log::info!("Document parsed: {} pages", page_count);
        let effects = self.state.apply(ViewerEvent::DocumentParsed(page_count));
        self.run_effects(effects);
    }

    pub fn on_document_failed(&mut self, error: ViewerError) {
        log::error!("Failed to parse document: {}", error);
        let effects = self.state.apply(ViewerEvent::DocumentFailed(error.to_string()));
        self.run_effects(effects);
    }

    pub fn navigate(&mut self, offset: Offset) -> PageNumber {
        let effects = self.state.apply(ViewerEvent::Navigate(offset));
        log::debug!("Navigated {:?} to page {}", offset, self.state.current_page);
        self.run_effects(effects);
        self.state.current_page
    }

    pub fn retry(&mut self) {
        let effects = self.state.apply(ViewerEvent::Retry);
        self.run_effects(effects);
    }

    /// Runs a pending parse request and feeds the outcome back into the state.
    /// Returns whether any work was done.
    pub fn poll(&mut self) -> bool {
        if !self.parse_requested {
            return false;
        }
        self.parse_requested = false;

        match self.renderer.load(&self.payload.data_uri()) {
            Ok(page_count) => self.on_document_parsed(page_count),
            Err(e) => self.on_document_failed(e),
        }
        true
    }

    pub fn view(&self) -> PageView {
        PageView::from_state(&self.state)
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn payload(&self) -> &DocumentPayload {
        &self.payload
    }

    pub fn current_page(&self) -> PageNumber {
        self.state.current_page
    }

    pub fn page_count(&self) -> Option<u32> {
        self.state.page_count
    }

    pub fn is_parse_pending(&self) -> bool {
        self.parse_requested
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let result = match effect {
                Effect::RequestParse => {
                    self.parse_requested = true;
                    Ok(())
                }
                Effect::RequestResize => self.bridge.request_resize(),
                Effect::EmitValue(page) => self.bridge.emit_value(page),
            };

            if let Err(e) = result {
                log::error!("Host bridge rejected {:?}: {}", effect, e);
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        self.poll();

        let view = self.view();
        let mut clicked = None;
        let mut retry = false;

        ui.vertical(|ui| {
            if view.show_page() {
                self.show_page(ui, view.page);
            } else if let Some(message) = view.error_message() {
                ui.colored_label(ui.visuals().error_fg_color, message);
                if ui.button(RETRY_LABEL).clicked() {
                    retry = true;
                }
            } else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(LOADING_LABEL);
                });
                ui.ctx().request_repaint();
            }

            ui.label(&view.status_text);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(view.previous_enabled, egui::Button::new(PREVIOUS_LABEL))
                    .clicked()
                {
                    clicked = Some(Offset::Previous);
                }

                if ui
                    .add_enabled(view.next_enabled, egui::Button::new(NEXT_LABEL))
                    .clicked()
                {
                    clicked = Some(Offset::Next);
                }
            });
        });

        if retry {
            self.retry();
        }

        if let Some(offset) = clicked {
            self.navigate(offset);
        }
    }

    fn show_page(&mut self, ui: &mut egui::Ui, page: PageNumber) {
        let available_width = ui.available_width().max(1.0);
        let max_side = ui.ctx().input(|i| i.max_texture_side);
        let max_side = u32::try_from(max_side).unwrap_or(u32::MAX);

        if self.rendered.as_ref().is_none_or(|r| r.page != page) {
            let texture = self
                .renderer
                .render_page(page, available_width as u32, max_side)
                .map(|image| {
                    let image = fit_texture_limit(image, max_side);
                    let color_image = egui::ColorImage::from_rgb(
                        [image.width() as usize, image.height() as usize],
                        image.as_raw(),
                    );
                    ui.ctx().load_texture(
                        format!("pdf_page_{}", page),
                        color_image,
                        Default::default(),
                    )
                })
                .map_err(|e| {
                    log::error!("Failed to render page {}: {}", page, e);
                    e.to_string()
                });

            self.rendered = Some(RenderedPage { page, texture });
        }

        let Some(rendered) = &self.rendered else {
            return;
        };

        match &rendered.texture {
            Ok(texture) => {
                let size = texture.size_vec2();
                let scale = available_width / size.x.max(1.0);
                ui.add(egui::Image::new(texture).fit_to_exact_size(size * scale));
            }
            Err(message) => {
                ui.label(format!("Failed to render page: {}", message));
            }
        }
    }
}

/// Downscales `image` so that neither side exceeds `max_side`.
fn fit_texture_limit(image: RgbImage, max_side: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width <= max_side && height <= max_side {
        return image;
    }

    let scale = max_side as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * scale).round() as u32).clamp(1, max_side);
    let new_height = ((height as f32 * scale).round() as u32).clamp(1, max_side);
    log::warn!(
        "Page image {}x{} exceeds texture limit {}, scaling to {}x{}",
        width,
        height,
        max_side,
        new_width,
        new_height
    );
    imageops::resize(&image, new_width, new_height, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{HostMessage, RecordingBridge};
    use crate::error::Result;
    use crate::renderer::render_size;
    use crate::viewer::LoadStatus;

    struct StubRenderer {
        outcome: Result<u32>,
    }

    impl DocumentRenderer for StubRenderer {
        fn load(&mut self, _data_uri: &str) -> Result<u32> {
            self.outcome.clone()
        }

        fn render_page(&self, _page: PageNumber, target_width: u32, max_side: u32) -> Result<RgbImage> {
            let (width, height) = render_size(612.0, 792.0, target_width, max_side);
            Ok(RgbImage::new(width, height))
        }
    }

    /// Ignores the size limits it is given.
    struct OversizedRenderer;

    impl DocumentRenderer for OversizedRenderer {
        fn load(&mut self, _data_uri: &str) -> Result<u32> {
            Ok(2)
        }

        fn render_page(&self, _page: PageNumber, _target_width: u32, _max_side: u32) -> Result<RgbImage> {
            Ok(RgbImage::new(1000, 1300))
        }
    }

    struct BrokenBridge;

    impl HostBridge for BrokenBridge {
        fn request_resize(&mut self) -> Result<()> {
            Err(ViewerError::Bridge("host went away".into()))
        }

        fn emit_value(&mut self, _page: PageNumber) -> Result<()> {
            Err(ViewerError::Bridge("host went away".into()))
        }
    }

    fn viewer(outcome: Result<u32>, start: i64) -> (DocumentPageViewer, RecordingBridge) {
        let bridge = RecordingBridge::new();
        let viewer = DocumentPageViewer::new(
            DocumentPayload::new("JVBERi0="),
            PageNumber::new(start).unwrap(),
            Box::new(StubRenderer { outcome }),
            Box::new(bridge.clone()),
        );
        (viewer, bridge)
    }

    fn run_frames(viewer: &mut DocumentPageViewer, max_texture_side: usize, frames: usize) {
        let ctx = egui::Context::default();
        for _ in 0..frames {
            let input = egui::RawInput {
                screen_rect: Some(egui::Rect::from_min_size(
                    egui::Pos2::ZERO,
                    egui::vec2(2560.0, 1440.0),
                )),
                max_texture_side: Some(max_texture_side),
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| viewer.show(ui));
            });
        }
    }

    fn rendered_size(viewer: &DocumentPageViewer) -> [usize; 2] {
        let rendered = viewer.rendered.as_ref().expect("page was not rendered");
        rendered
            .texture
            .as_ref()
            .expect("page render failed")
            .size()
    }

    #[test]
    fn test_parse_is_deferred_until_poll() {
        let (mut viewer, bridge) = viewer(Ok(4), 2);
        assert!(viewer.is_parse_pending());
        assert_eq!(viewer.page_count(), None);
        assert!(bridge.messages().is_empty());

        assert!(viewer.poll());
        assert_eq!(viewer.page_count(), Some(4));
        assert_eq!(bridge.messages(), vec![HostMessage::SetFrameHeight]);
        assert!(!viewer.poll());
    }

    #[test]
    fn test_failed_parse_enters_error_state() {
        let (mut viewer, bridge) = viewer(Err(ViewerError::InvalidPdf("truncated".into())), 1);
        viewer.poll();

        assert_eq!(
            viewer.view().error_message(),
            Some("Invalid PDF: truncated")
        );
        assert_eq!(viewer.page_count(), None);
        assert_eq!(bridge.resize_requests(), 1);
        assert!(bridge.emitted_values().is_empty());
    }

    #[test]
    fn test_retry_requeues_parse() {
        let (mut viewer, _bridge) = viewer(Err(ViewerError::NoDocument), 1);
        viewer.poll();
        viewer.retry();
        assert!(viewer.is_parse_pending());
        assert_eq!(viewer.state().status, LoadStatus::Loading);
    }

    #[test]
    fn test_remount_discards_previous_state() {
        let (mut viewer, bridge) = viewer(Ok(3), 1);
        viewer.poll();
        viewer.navigate(Offset::Next);

        viewer.remount(DocumentPayload::new("JVBERi0xLjc="), PageNumber::FIRST);
        assert_eq!(viewer.current_page(), PageNumber::FIRST);
        assert_eq!(viewer.page_count(), None);
        assert!(viewer.is_parse_pending());
        assert_eq!(viewer.payload().as_base64(), "JVBERi0xLjc=");

        viewer.poll();
        assert_eq!(viewer.page_count(), Some(3));
        assert_eq!(bridge.resize_requests(), 2);
    }

    #[test]
    fn test_bridge_errors_do_not_corrupt_state() {
        let mut viewer = DocumentPageViewer::new(
            DocumentPayload::new("JVBERi0="),
            PageNumber::FIRST,
            Box::new(StubRenderer { outcome: Ok(3) }),
            Box::new(BrokenBridge),
        );

        assert!(viewer.poll());
        assert_eq!(viewer.page_count(), Some(3));
        assert!(viewer.state().is_loaded());

        assert_eq!(viewer.navigate(Offset::Next).get(), 2);
        assert_eq!(viewer.navigate(Offset::Next).get(), 3);
        assert!(!viewer.view().next_enabled);
        assert_eq!(viewer.navigate(Offset::Previous).get(), 2);
    }

    #[test]
    fn test_show_on_wide_window_stays_within_texture_limit() {
        let (mut viewer, bridge) = viewer(Ok(5), 3);
        run_frames(&mut viewer, 2048, 3);

        assert_eq!(viewer.page_count(), Some(5));
        assert_eq!(bridge.resize_requests(), 1);

        let [width, height] = rendered_size(&viewer);
        assert!(width <= 2048 && height <= 2048, "texture {}x{}", width, height);
        assert_eq!(height, 2048);
    }

    #[test]
    fn test_show_downscales_oversized_renders() {
        let mut viewer = DocumentPageViewer::new(
            DocumentPayload::new("JVBERi0="),
            PageNumber::FIRST,
            Box::new(OversizedRenderer),
            Box::new(RecordingBridge::new()),
        );
        run_frames(&mut viewer, 512, 2);

        assert_eq!(rendered_size(&viewer), [394, 512]);
    }

    #[test]
    fn test_show_failed_parse_does_not_render() {
        let (mut viewer, _bridge) = viewer(Err(ViewerError::InvalidPdf("truncated".into())), 1);
        run_frames(&mut viewer, 2048, 2);

        assert!(viewer.rendered.is_none());
        assert_eq!(viewer.view().error_message(), Some("Invalid PDF: truncated"));
    }

    #[test]
    fn test_fit_texture_limit_keeps_small_images() {
        let image = fit_texture_limit(RgbImage::new(300, 400), 2048);
        assert_eq!(image.dimensions(), (300, 400));
    }

    #[test]
    fn test_fit_texture_limit_scales_longest_side() {
        let image = fit_texture_limit(RgbImage::new(4000, 3000), 2000);
        assert_eq!(image.dimensions(), (2000, 1500));
    }
}
