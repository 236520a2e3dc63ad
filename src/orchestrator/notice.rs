//! User-facing outcome notices for status changes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// How long a success notice stays up before clearing itself.
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_millis(2200);

pub const SUCCESS_MESSAGE: &str = "Status updated successfully.";
pub const ROLLBACK_MESSAGE: &str = "Update failed. Changes were reverted.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Notice>,
    // bumped on every change so a timer only clears the notice it was started for
    seq: u64,
}

/// Holds at most one notice. Success notices expire after [`SUCCESS_NOTICE_TTL`]; error
/// notices stay until [`NoticeBoard::clear`] or until replaced.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    slot: Arc<Mutex<Slot>>,
}

impl NoticeBoard {
    pub fn current(&self) -> Option<Notice> {
        self.lock().current.clone()
    }

    pub fn clear(&self) {
        let mut slot = self.lock();
        slot.seq += 1;
        slot.current = None;
    }

    pub(crate) fn success(&self, message: &str) {
        let seq = self.post(NoticeKind::Success, message);
        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            tokio::time::sleep(SUCCESS_NOTICE_TTL).await;
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.seq == seq {
                debug!("Success notice expired");
                slot.current = None;
            }
        });
    }

    pub(crate) fn error(&self, message: &str) {
        self.post(NoticeKind::Error, message);
    }

    fn post(&self, kind: NoticeKind, message: &str) -> u64 {
        let mut slot = self.lock();
        slot.seq += 1;
        slot.current = Some(Notice {
            kind,
            message: message.to_string(),
        });
        slot.seq
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn success_clears_itself() {
        let board = NoticeBoard::default();
        board.success(SUCCESS_MESSAGE);
        assert_eq!(board.current().unwrap().kind, NoticeKind::Success);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(board.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(board.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn error_persists_until_cleared() {
        let board = NoticeBoard::default();
        board.error(ROLLBACK_MESSAGE);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(
            board.current(),
            Some(Notice {
                kind: NoticeKind::Error,
                message: ROLLBACK_MESSAGE.to_string()
            })
        );

        board.clear();
        assert_eq!(board.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_does_not_clear_a_newer_error() {
        let board = NoticeBoard::default();
        board.success(SUCCESS_MESSAGE);
        board.error(ROLLBACK_MESSAGE);

        tokio::time::sleep(SUCCESS_NOTICE_TTL * 2).await;
        assert_eq!(board.current().unwrap().kind, NoticeKind::Error);
    }
}
