//! User-facing prompts and notifications.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

/// Short toast (undo / redo)
pub const SHORT: Duration = Duration::from_millis(1000);
/// Confirmation of a completed action
pub const BRIEF: Duration = Duration::from_millis(1500);
/// Default toast duration
pub const NORMAL: Duration = Duration::from_millis(2500);
/// Errors that must stay on screen
pub const LONG: Duration = Duration::from_millis(10000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Confirmation and notification collaborator.
///
/// `ask` only poses the question; the answer comes back later through
/// `Editor::resolve_confirmation`.
pub trait Messenger {
    fn ask(&mut self, message: &str);
    fn notify(&mut self, message: &str, severity: Severity, duration: Duration);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    #[serde(skip)]
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct MessengerLog {
    notices: Vec<Notice>,
    questions: Vec<String>,
}

/// Messenger that keeps everything it is told. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingMessenger {
    log: Rc<RefCell<MessengerLog>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.log.borrow().notices.clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.log.borrow().questions.clone()
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.log.borrow().notices.last().cloned()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.log
            .borrow()
            .notices
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<Notice> {
        let mut log = self.log.borrow_mut();
        log.questions.clear();
        std::mem::take(&mut log.notices)
    }
}

impl Messenger for RecordingMessenger {
    fn ask(&mut self, message: &str) {
        tracing::debug!("ask: {}", message);
        self.log.borrow_mut().questions.push(message.to_string());
    }

    fn notify(&mut self, message: &str, severity: Severity, duration: Duration) {
        tracing::debug!("notify ({:?}): {}", severity, message);
        self.log.borrow_mut().notices.push(Notice {
            message: message.to_string(),
            severity,
            duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_log() {
        let recorder = RecordingMessenger::new();
        let mut boxed: Box<dyn Messenger> = Box::new(recorder.clone());
        boxed.notify("Undo.", Severity::Info, SHORT);
        boxed.ask("Delete \"Box_1\"?");
        assert_eq!(recorder.notices().len(), 1);
        assert_eq!(recorder.questions(), vec!["Delete \"Box_1\"?".to_string()]);
        assert_eq!(recorder.count(Severity::Info), 1);
    }

    #[test]
    fn test_drain_empties() {
        let mut recorder = RecordingMessenger::new();
        recorder.notify("a", Severity::Error, NORMAL);
        assert_eq!(recorder.drain().len(), 1);
        assert!(recorder.last_notice().is_none());
    }
}
