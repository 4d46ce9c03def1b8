//! Keyboard navigation for carousels

use crate::carousel::CarouselEngine;
use vantage_platform::Key;

impl CarouselEngine {
    /// Navigate in response to a key press
    ///
    /// Left and Right step, Home and End jump to the ends. Returns `true` when
    /// the key was handled so the host can suppress its default action. An
    /// empty carousel handles nothing.
    pub fn handle_key(&self, key: &Key) -> bool {
        let length = self.len();
        if length == 0 {
            return false;
        }

        match key {
            Key::Left => {
                self.prev();
            }
            Key::Right => {
                self.next();
            }
            Key::Home => {
                self.go_to(0);
            }
            Key::End => {
                self.go_to(length as i64 - 1);
            }
            _ => return false,
        }

        tracing::trace!("Carousel: key {:?} -> index {}", key, self.index());
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::carousel::{CarouselEngine, CarouselOptions};
    use vantage_platform::Key;

    #[test]
    fn test_arrow_keys_step_and_wrap() {
        let carousel = CarouselEngine::new(4, CarouselOptions::default());
        assert!(carousel.handle_key(&Key::Left));
        assert_eq!(carousel.index(), 3);
        assert!(carousel.handle_key(&Key::Right));
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_home_and_end() {
        let carousel = CarouselEngine::new(4, CarouselOptions::default());
        assert!(carousel.handle_key(&Key::End));
        assert_eq!(carousel.index(), 3);
        assert!(carousel.handle_key(&Key::Home));
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_unhandled_keys() {
        let carousel = CarouselEngine::new(4, CarouselOptions::default());
        assert!(!carousel.handle_key(&Key::from_dom_name("ArrowUp")));
        assert!(!carousel.handle_key(&Key::Char('a')));
        assert!(!carousel.handle_key(&Key::from_dom_name("Tab")));
        assert_eq!(carousel.index(), 0);

        let empty = CarouselEngine::new(0, CarouselOptions::default());
        assert!(!empty.handle_key(&Key::Right));
    }

    #[test]
    fn test_dom_key_names() {
        let carousel = CarouselEngine::new(3, CarouselOptions::default());
        assert!(carousel.handle_key(&Key::from_dom_name("ArrowRight")));
        assert!(carousel.handle_key(&Key::from_dom_name("End")));
        assert_eq!(carousel.index(), 2);
    }
}
