//! Clipboard seam for the deposit wallet address

use crate::Result;
use serde::Serialize;
use std::sync::Mutex;

pub trait Clipboard: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<()>;
}

/// User-facing outcome of an external action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Notification {
    Success(String),
    Failure(String),
}

impl Notification {
    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success(msg) | Notification::Failure(msg) => msg,
        }
    }
}

/// Keeps copied text in memory; used by tests and non-interactive runs
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy_text(&self, text: &str) -> Result<()> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|e| crate::PayLaterError::Clipboard(e.to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}
