//! Auto-hiding control bar.
//!
//! The bar holding the mode/fullscreen buttons is hidden until the pointer
//! moves. A move of at least [`MOVE_THRESHOLD`] pixels on either axis since
//! the last recorded position reveals it for [`VISIBLE_FOR`]; every further
//! qualifying move restarts that window.

use web_time::{Duration, Instant};

pub const MOVE_THRESHOLD: f64 = 5.0;
pub const VISIBLE_FOR: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UtilityBar {
    last_pointer: Option<Point>,
    visible_until: Option<Instant>,
}

impl UtilityBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position. Returns true if the move revealed the bar
    /// (or extended its window), in which case the hide timer restarts.
    pub fn pointer_moved(&mut self, x: f64, y: f64, now: Instant) -> bool {
        let qualifies = match self.last_pointer {
            None => true,
            Some(last) => (x - last.x).abs() >= MOVE_THRESHOLD || (y - last.y).abs() >= MOVE_THRESHOLD,
        };
        self.last_pointer = Some(Point { x, y });
        if qualifies {
            self.reveal(now);
        }
        qualifies
    }

    /// Record a position without revealing the bar.
    pub fn track(&mut self, x: f64, y: f64) {
        self.last_pointer = Some(Point { x, y });
    }

    pub fn reveal(&mut self, now: Instant) {
        self.visible_until = Some(now + VISIBLE_FOR);
    }

    pub fn hide(&mut self) {
        self.visible_until = None;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.visible_until.is_some_and(|until| now < until)
    }

    /// When the current window closes, if the bar is showing.
    pub fn deadline(&self) -> Option<Instant> {
        self.visible_until
    }

    /// Hide the bar if its window has passed. Returns true if it just hid.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.visible_until {
            Some(until) if now >= until => {
                self.visible_until = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_hidden_by_default() {
        let bar = UtilityBar::new();
        assert!(!bar.is_visible(Instant::now()));
        assert_eq!(bar.deadline(), None);
    }

    #[test]
    fn test_small_moves_do_not_reveal() {
        let t0 = Instant::now();
        let mut bar = UtilityBar::new();
        bar.track(100.0, 100.0);

        assert!(!bar.pointer_moved(103.0, 104.0, t0));
        // Position is still recorded, so creeping along never qualifies.
        assert!(!bar.pointer_moved(106.0, 104.0, t0));
        assert!(!bar.is_visible(t0));

        assert!(bar.pointer_moved(106.0, 109.0, t0));
        assert!(bar.is_visible(t0));
    }

    #[test]
    fn test_rapid_moves_keep_bar_visible() {
        let t0 = Instant::now();
        let mut bar = UtilityBar::new();

        for (i, at) in [0, 500, 900, 1400].into_iter().enumerate() {
            let offset = i as f64 * 10.0;
            assert!(bar.pointer_moved(offset, offset, t0 + ms(at)));
            assert!(bar.is_visible(t0 + ms(at)));
            assert!(!bar.expire(t0 + ms(at + 999)));
        }

        assert!(bar.is_visible(t0 + ms(2300)));
        assert!(bar.expire(t0 + ms(2401)));
        assert!(!bar.is_visible(t0 + ms(2401)));
        // Already hidden.
        assert!(!bar.expire(t0 + ms(3000)));
    }

    #[test]
    fn test_pause_hides_bar() {
        let t0 = Instant::now();
        let mut bar = UtilityBar::new();
        bar.pointer_moved(0.0, 0.0, t0);
        assert!(bar.is_visible(t0 + ms(999)));
        assert!(!bar.is_visible(t0 + ms(1000)));
        assert!(bar.expire(t0 + ms(1001)));
    }
}
