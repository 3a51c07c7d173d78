pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DATA_URI_BASE64_MARKER: &str = ";base64";

pub const DEFAULT_INITIAL_PAGE: u32 = 1;

pub const MIN_RENDER_WIDTH: u32 = 100;
pub const MAX_RENDER_WIDTH: u32 = 4096;
pub const MAX_RENDER_HEIGHT: u32 = 4096;

pub const PAGE_COUNT_PLACEHOLDER: &str = "--";
pub const PREVIOUS_LABEL: &str = "Previous";
pub const NEXT_LABEL: &str = "Next";
pub const RETRY_LABEL: &str = "Retry";
pub const LOADING_LABEL: &str = "Loading PDF…";

pub const DEFAULT_WINDOW_TITLE: &str = "PDF Page Viewer";
pub const DEFAULT_WINDOW_WIDTH: f32 = 720.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 960.0;
