use crate::Route;
use iced::{event, keyboard, mouse, window, Event, Subscription};

/// Open/closed state of the user dropdown in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropdownMenu {
    open: bool,
}

impl DropdownMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Dismissal events are only listened for while the menu is open.
    pub fn subscription(&self) -> Subscription<MenuMessage> {
        if self.open {
            event::listen_with(dismissal)
        } else {
            Subscription::none()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuMessage {
    Toggle,
    Dismiss,
    Go(Route),
    Logout,
}

/// Escape, losing window focus, or a click no widget handled.
fn dismissal(event: Event, status: event::Status) -> Option<MenuMessage> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(keyboard::key::Named::Escape),
            ..
        }) => Some(MenuMessage::Dismiss),
        Event::Window(_, window::Event::Unfocused) => Some(MenuMessage::Dismiss),
        Event::Mouse(mouse::Event::ButtonPressed(_)) if status == event::Status::Ignored => {
            Some(MenuMessage::Dismiss)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_close() {
        let mut menu = DropdownMenu::default();
        assert!(!menu.is_open());
        menu.toggle();
        assert!(menu.is_open());
        menu.close();
        assert!(!menu.is_open());
        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_uncaptured_click_dismisses() {
        let press = Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left));
        assert_eq!(
            dismissal(press.clone(), event::Status::Ignored),
            Some(MenuMessage::Dismiss)
        );
        assert_eq!(dismissal(press, event::Status::Captured), None);
    }

    #[test]
    fn test_focus_loss_dismisses() {
        let unfocused = Event::Window(window::Id::MAIN, window::Event::Unfocused);
        assert_eq!(
            dismissal(unfocused, event::Status::Ignored),
            Some(MenuMessage::Dismiss)
        );
        let moved = Event::Mouse(mouse::Event::CursorLeft);
        assert_eq!(dismissal(moved, event::Status::Ignored), None);
    }
}
