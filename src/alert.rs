// 🔔 Alerts - blocking, dismissable user-facing messages

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Sink for alerts raised by screen controllers
pub trait Notifier {
    fn alert(&mut self, title: &str, message: &str);
}

/// FIFO of alerts waiting to be dismissed. The terminal UI shows the front
/// one as a modal; tests inspect what was raised.
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<Alert>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Alert> {
        self.pending.front()
    }

    pub fn dismiss(&mut self) -> Option<Alert> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.pending.iter()
    }
}

impl Notifier for AlertQueue {
    fn alert(&mut self, title: &str, message: &str) {
        tracing::debug!(title, "alert raised");
        self.pending.push_back(Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_order() {
        let mut queue = AlertQueue::new();
        queue.alert("Erro", "primeiro");
        queue.alert("Erro", "segundo");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.current().map(|a| a.message.as_str()), Some("primeiro"));
        queue.dismiss();
        assert_eq!(queue.current().map(|a| a.message.as_str()), Some("segundo"));
        queue.dismiss();
        assert!(queue.is_empty());
        assert!(queue.dismiss().is_none());
    }
}
