use crate::config::Config;

use super::InputEvent;

/// One tunable in the options menu, bound to a config field.
pub struct OptionEntry {
    pub label: &'static str,
    get: fn(&Config) -> i64,
    set: fn(&mut Config, i64),
    format: fn(i64) -> String,
    pub min: i64,
    pub max: i64,
    step: i64,
}

impl OptionEntry {
    pub fn value(&self, config: &Config) -> i64 {
        (self.get)(config)
    }

    pub fn display(&self, config: &Config) -> String {
        (self.format)(self.value(config))
    }

    /// Move the value by `steps` increments, staying inside the bounds.
    pub fn adjust(&self, config: &mut Config, steps: i64) {
        let value = (self.value(config) + steps * self.step).clamp(self.min, self.max);
        (self.set)(config, value);
    }
}

/// Upper bound for the initial length on boards with room to spare.
pub const MAX_INITIAL_LENGTH: usize = 20;

/// The options table. `max_length` is the longest snake the board can
/// spawn; the initial length never goes past it.
pub fn option_entries(max_length: usize) -> Vec<OptionEntry> {
    vec![
        OptionEntry {
            label: "Initial length",
            get: |c| c.initial_length as i64,
            set: |c, v| c.initial_length = v as usize,
            format: |v| v.to_string(),
            min: 1,
            max: max_length.clamp(1, MAX_INITIAL_LENGTH) as i64,
            step: 1,
        },
        OptionEntry {
            label: "Base delay (ms)",
            get: |c| c.base_delay_ms as i64,
            set: |c, v| c.base_delay_ms = v as u64,
            format: |v| v.to_string(),
            min: 1,
            max: 1000,
            step: 10,
        },
        OptionEntry {
            label: "Wrap edges",
            get: |c| c.wrap as i64,
            set: |c, v| c.wrap = v != 0,
            format: |v| if v != 0 { "On".to_string() } else { "Off".to_string() },
            min: 0,
            max: 1,
            step: 1,
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsAction {
    None,
    Back,
}

/// The options screen: every entry from `option_entries` followed by Back.
pub struct OptionsMenu {
    entries: Vec<OptionEntry>,
    selected: usize,
}

impl OptionsMenu {
    pub fn new(max_length: usize) -> Self {
        Self {
            entries: option_entries(max_length),
            selected: 0,
        }
    }

    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Index of the highlighted row; `entries().len()` is the Back row.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    fn rows(&self) -> usize {
        self.entries.len() + 1
    }

    pub fn handle(&mut self, input: InputEvent, config: &mut Config) -> OptionsAction {
        match input {
            InputEvent::MenuUp | InputEvent::Up => {
                self.selected = (self.selected + self.rows() - 1) % self.rows();
            }
            InputEvent::MenuDown | InputEvent::Down => {
                self.selected = (self.selected + 1) % self.rows();
            }
            InputEvent::Left | InputEvent::Right => {
                let steps = if input == InputEvent::Left { -1 } else { 1 };
                if let Some(entry) = self.entries.get(self.selected) {
                    entry.adjust(config, steps);
                }
            }
            InputEvent::MenuConfirm if self.selected == self.entries.len() => {
                return OptionsAction::Back;
            }
            InputEvent::MenuBack | InputEvent::Quit => return OptionsAction::Back,
            _ => {}
        }
        OptionsAction::None
    }
}

impl Default for OptionsMenu {
    fn default() -> Self {
        Self::new(MAX_INITIAL_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_values_bounded_below() {
        let mut config = Config::default();
        let mut menu = OptionsMenu::default();

        // Initial length: 2 -> 1, then stays at the lower bound
        for _ in 0..5 {
            menu.handle(InputEvent::Left, &mut config);
        }
        assert_eq!(config.initial_length, 1);

        menu.handle(InputEvent::MenuDown, &mut config);
        for _ in 0..100 {
            menu.handle(InputEvent::Left, &mut config);
        }
        assert_eq!(config.base_delay_ms, 1);

        menu.handle(InputEvent::Right, &mut config);
        assert_eq!(config.base_delay_ms, 11);
    }

    #[test]
    fn test_wrap_toggle() {
        let mut config = Config::default();
        let mut menu = OptionsMenu::default();
        let wrap = &menu.entries()[2];
        assert_eq!(wrap.display(&config), "Off");

        menu.handle(InputEvent::MenuDown, &mut config);
        menu.handle(InputEvent::MenuDown, &mut config);
        menu.handle(InputEvent::Right, &mut config);
        assert!(config.wrap);
        menu.handle(InputEvent::Right, &mut config);
        assert!(config.wrap);
        menu.handle(InputEvent::Left, &mut config);
        assert!(!config.wrap);
    }

    #[test]
    fn test_back_row_and_escape() {
        let mut config = Config::default();
        let mut menu = OptionsMenu::default();

        assert_eq!(menu.handle(InputEvent::MenuConfirm, &mut config), OptionsAction::None);
        menu.handle(InputEvent::MenuUp, &mut config);
        assert_eq!(menu.selected_index(), menu.entries().len());
        assert_eq!(menu.handle(InputEvent::MenuConfirm, &mut config), OptionsAction::Back);
        assert_eq!(menu.handle(InputEvent::MenuBack, &mut config), OptionsAction::Back);
    }

    #[test]
    fn test_initial_length_capped_by_board() {
        let mut config = Config::default();
        let mut menu = OptionsMenu::new(3);
        assert_eq!(menu.entries()[0].max, 3);

        for _ in 0..10 {
            menu.handle(InputEvent::Right, &mut config);
        }
        assert_eq!(config.initial_length, 3);

        assert_eq!(OptionsMenu::new(0).entries()[0].max, 1);
        assert_eq!(OptionsMenu::default().entries()[0].max, 20);
        assert_eq!(OptionsMenu::new(100).entries()[0].max, 20);
    }
}
