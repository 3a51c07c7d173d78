//! Channel from the viewer back to the hosting application.

use crate::error::{Result, ViewerError};
use crate::payload::PageNumber;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Fit the embedding frame to the current content.
    SetFrameHeight,
    SetComponentValue { value: PageNumber },
}

pub trait HostBridge {
    fn request_resize(&mut self) -> Result<()>;

    fn emit_value(&mut self, page: PageNumber) -> Result<()>;
}

/// Writes each message as one line of JSON.
pub struct JsonLinesBridge<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesBridge<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn send(&mut self, message: HostMessage) -> Result<()> {
        let line = serde_json::to_string(&message)?;
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|e| ViewerError::Bridge(format!("Failed to send {:?}: {}", message, e)))
    }
}

impl JsonLinesBridge<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> HostBridge for JsonLinesBridge<W> {
    fn request_resize(&mut self) -> Result<()> {
        self.send(HostMessage::SetFrameHeight)
    }

    fn emit_value(&mut self, page: PageNumber) -> Result<()> {
        self.send(HostMessage::SetComponentValue { value: page })
    }
}

/// Keeps every message in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingBridge {
    messages: Rc<RefCell<Vec<HostMessage>>>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<HostMessage> {
        self.messages.borrow().clone()
    }

    pub fn emitted_values(&self) -> Vec<u32> {
        self.messages
            .borrow()
            .iter()
            .filter_map(|m| match m {
                HostMessage::SetComponentValue { value } => Some(value.get()),
                HostMessage::SetFrameHeight => None,
            })
            .collect()
    }

    pub fn resize_requests(&self) -> usize {
        self.messages
            .borrow()
            .iter()
            .filter(|m| matches!(m, HostMessage::SetFrameHeight))
            .count()
    }
}

impl HostBridge for RecordingBridge {
    fn request_resize(&mut self) -> Result<()> {
        self.messages.borrow_mut().push(HostMessage::SetFrameHeight);
        Ok(())
    }

    fn emit_value(&mut self, page: PageNumber) -> Result<()> {
        self.messages
            .borrow_mut()
            .push(HostMessage::SetComponentValue { value: page });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lines_messages() {
        let mut bridge = JsonLinesBridge::new(Vec::new());
        bridge.request_resize().unwrap();
        bridge.emit_value(PageNumber::new(4).unwrap()).unwrap();

        let output = String::from_utf8(bridge.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"type":"setFrameHeight"}"#,
                r#"{"type":"setComponentValue","value":4}"#,
            ]
        );
    }

    #[test]
    fn test_host_message_round_trip() {
        let message: HostMessage =
            serde_json::from_str(r#"{"type":"setComponentValue","value":2}"#).unwrap();
        assert_eq!(
            message,
            HostMessage::SetComponentValue {
                value: PageNumber::new(2).unwrap()
            }
        );
    }

    #[test]
    fn test_json_lines_write_failure_is_bridge_error() {
        struct ClosedPipe;

        impl Write for ClosedPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut bridge = JsonLinesBridge::new(ClosedPipe);
        assert!(matches!(
            bridge.request_resize(),
            Err(ViewerError::Bridge(_))
        ));
    }

    #[test]
    fn test_recording_bridge_shares_log_between_clones() {
        let bridge = RecordingBridge::new();
        let mut handle = bridge.clone();

        handle.emit_value(PageNumber::new(2).unwrap()).unwrap();
        handle.request_resize().unwrap();

        assert_eq!(bridge.emitted_values(), vec![2]);
        assert_eq!(bridge.resize_requests(), 1);
        assert_eq!(bridge.messages().len(), 2);
    }
}
