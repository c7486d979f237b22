use super::InputEvent;

/// Result of feeding one input to a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction<T> {
    None,
    Confirm(T),
    Back,
}

/// A vertical list of choices with a wrapping highlight.
#[derive(Debug, Clone)]
pub struct Menu<T> {
    title: String,
    items: Vec<(String, T)>,
    selected: usize,
}

impl<T: Copy> Menu<T> {
    pub fn new(title: impl Into<String>, items: Vec<(String, T)>) -> Self {
        Self {
            title: title.into(),
            items,
            selected: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<T> {
        self.items.get(self.selected).map(|(_, value)| *value)
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn handle(&mut self, input: InputEvent) -> MenuAction<T> {
        match input {
            InputEvent::MenuUp | InputEvent::Up => {
                self.previous();
                MenuAction::None
            }
            InputEvent::MenuDown | InputEvent::Down => {
                self.next();
                MenuAction::None
            }
            InputEvent::MenuConfirm => match self.selected() {
                Some(value) => MenuAction::Confirm(value),
                None => MenuAction::None,
            },
            InputEvent::MenuBack => MenuAction::Back,
            InputEvent::Shortcut(n) => {
                let index = (n as usize).wrapping_sub(1);
                match self.items.get(index) {
                    Some((_, value)) => {
                        self.selected = index;
                        MenuAction::Confirm(*value)
                    }
                    None => MenuAction::None,
                }
            }
            _ => MenuAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Menu<char> {
        Menu::new(
            "Test",
            vec![
                ("Alpha".to_string(), 'a'),
                ("Beta".to_string(), 'b'),
                ("Gamma".to_string(), 'c'),
            ],
        )
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let mut menu = menu();
        assert_eq!(menu.selected(), Some('a'));

        menu.handle(InputEvent::MenuUp);
        assert_eq!(menu.selected_index(), 2);

        menu.handle(InputEvent::MenuDown);
        menu.handle(InputEvent::Down);
        assert_eq!(menu.selected(), Some('b'));
    }

    #[test]
    fn test_menu_confirm_back_and_shortcut() {
        let mut menu = menu();

        assert_eq!(menu.handle(InputEvent::MenuConfirm), MenuAction::Confirm('a'));
        assert_eq!(menu.handle(InputEvent::MenuBack), MenuAction::Back);
        assert_eq!(menu.handle(InputEvent::Shortcut(3)), MenuAction::Confirm('c'));
        assert_eq!(menu.selected_index(), 2);
        assert_eq!(menu.handle(InputEvent::Shortcut(0)), MenuAction::None);
        assert_eq!(menu.handle(InputEvent::Shortcut(9)), MenuAction::None);
        assert_eq!(menu.handle(InputEvent::PauseToggle), MenuAction::None);
    }
}
