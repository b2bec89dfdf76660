use std::time::Duration;
use tokio::time::Instant;

pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    hide_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct Notification {
    slot: Option<Notice>,
}

impl Notification {
    pub fn show(&mut self, text: impl Into<String>, now: Instant) {
        self.slot = Some(Notice {
            text: text.into(),
            hide_at: now + NOTIFICATION_DURATION,
        });
    }

    pub fn visible_text(&self, now: Instant) -> Option<&str> {
        self.slot
            .as_ref()
            .filter(|notice| now < notice.hide_at)
            .map(|notice| notice.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn hides_after_duration() {
        let mut notification = Notification::default();
        assert_eq!(notification.visible_text(Instant::now()), None);

        notification.show("Read", Instant::now());
        tokio::time::advance(Duration::from_millis(3999)).await;
        assert_eq!(notification.visible_text(Instant::now()), Some("Read"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(notification.visible_text(Instant::now()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_show_replaces_text_and_resets_timer() {
        let mut notification = Notification::default();
        notification.show("Read", Instant::now());
        tokio::time::advance(Duration::from_millis(3000)).await;

        notification.show("Water", Instant::now());
        assert_eq!(notification.visible_text(Instant::now()), Some("Water"));

        tokio::time::advance(Duration::from_millis(3000)).await;
        assert_eq!(notification.visible_text(Instant::now()), Some("Water"));

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(notification.visible_text(Instant::now()), None);
    }
}
