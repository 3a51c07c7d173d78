//! Host-supplied document payload and mount arguments.

use crate::constants::{DATA_URI_BASE64_MARKER, DEFAULT_INITIAL_PAGE, PDF_MIME_TYPE};
use crate::error::{Result, ViewerError};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// 1-based page index. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct PageNumber(u32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    pub fn new(value: i64) -> Result<Self> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v >= 1)
            .map(PageNumber)
            .ok_or(ViewerError::InvalidPageNumber(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Steps by `offset` pages. Saturates at page 1 and at `u32::MAX`.
    pub fn offset(self, offset: i32) -> Self {
        PageNumber(self.0.saturating_add_signed(offset).max(1))
    }

    /// Zero-based index as used by the pdfium page collection.
    pub fn index(self) -> u32 {
        self.0 - 1
    }
}

impl TryFrom<i64> for PageNumber {
    type Error = ViewerError;

    fn try_from(value: i64) -> Result<Self> {
        PageNumber::new(value)
    }
}

impl From<PageNumber> for u32 {
    fn from(page: PageNumber) -> Self {
        page.0
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        PageNumber::FIRST
    }
}

/// Base64 text of a complete PDF. Cloning shares the same buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    base64: Rc<str>,
}

impl DocumentPayload {
    pub fn new(base64: impl Into<String>) -> Self {
        let text: String = base64.into();
        Self {
            base64: Rc::from(text.trim()),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(STANDARD.encode(bytes))
    }

    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    pub fn data_uri(&self) -> String {
        format!(
            "data:{}{},{}",
            PDF_MIME_TYPE, DATA_URI_BASE64_MARKER, self.base64
        )
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_base64(&self.base64)
    }
}

impl fmt::Debug for DocumentPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentPayload")
            .field("base64_len", &self.base64.len())
            .finish()
    }
}

fn decode_base64(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| ViewerError::InvalidPayload(format!("Invalid base64: {}", e)))
}

/// Decodes a `data:application/pdf;base64,...` URI into raw document bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ViewerError::InvalidPayload("Missing data: scheme".into()))?;

    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| ViewerError::InvalidPayload("Missing data separator".into()))?;

    let mime = header
        .strip_suffix(DATA_URI_BASE64_MARKER)
        .ok_or_else(|| ViewerError::InvalidPayload("Data URI is not base64 encoded".into()))?;

    if !mime.eq_ignore_ascii_case(PDF_MIME_TYPE) {
        return Err(ViewerError::InvalidPayload(format!(
            "Unsupported MIME type: {}",
            mime
        )));
    }

    decode_base64(data)
}

/// Arguments the host passes when mounting the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerArgs {
    pub pdf_base64: String,
    #[serde(default = "default_initial_page")]
    pub initial_page: PageNumber,
}

fn default_initial_page() -> PageNumber {
    PageNumber(DEFAULT_INITIAL_PAGE)
}

impl ViewerArgs {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn payload(&self) -> DocumentPayload {
        DocumentPayload::new(self.pdf_base64.as_str())
    }
}
