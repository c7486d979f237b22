use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::game::{InputContext, InputEvent};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeyBinding {
    pub key: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl KeyBinding {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: &str) -> Self {
        self.modifiers.push(modifier.to_string());
        self
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        let key_matches = match event.code {
            KeyCode::Char(' ') => self.key == "space",
            KeyCode::Char(c) => self.key == c.to_string(),
            KeyCode::Enter => self.key == "enter",
            KeyCode::Tab => self.key == "tab",
            KeyCode::Backspace => self.key == "backspace",
            KeyCode::Esc => self.key == "esc",
            KeyCode::Left => self.key == "left",
            KeyCode::Right => self.key == "right",
            KeyCode::Up => self.key == "up",
            KeyCode::Down => self.key == "down",
            KeyCode::F(n) => self.key == format!("f{}", n),
            _ => false,
        };

        // Check modifiers
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = event.modifiers.contains(KeyModifiers::ALT);
        let shift = event.modifiers.contains(KeyModifiers::SHIFT);

        let modifiers_match = if self.modifiers.is_empty() {
            !ctrl && !alt && !shift
        } else {
            self.modifiers.iter().all(|m| match m.as_str() {
                "ctrl" => ctrl,
                "alt" => alt,
                "shift" => shift,
                _ => false,
            })
        };

        key_matches && modifiers_match
    }
}

/// Map a binding's action name to the input it produces.
fn action_event(action: &str) -> Option<InputEvent> {
    let event = match action {
        "up" => InputEvent::Up,
        "down" => InputEvent::Down,
        "left" | "decrease" => InputEvent::Left,
        "right" | "increase" => InputEvent::Right,
        "pause" => InputEvent::PauseToggle,
        "speed" => InputEvent::SpeedToggle,
        "menu_up" => InputEvent::MenuUp,
        "menu_down" => InputEvent::MenuDown,
        "confirm" => InputEvent::MenuConfirm,
        "back" => InputEvent::MenuBack,
        "quit" => InputEvent::Quit,
        other => {
            let n = other.strip_prefix("shortcut_")?.parse::<u8>().ok()?;
            InputEvent::Shortcut(n)
        }
    };
    Some(event)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KeyBindings {
    // Maps from action name to the keys that trigger it. Ordered, so a key
    // bound to several actions always resolves to the first action name.
    #[serde(default)]
    pub play: BTreeMap<String, Vec<KeyBinding>>,
    #[serde(default)]
    pub menu: BTreeMap<String, Vec<KeyBinding>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |names: &[&str]| names.iter().map(|k| KeyBinding::new(k)).collect::<Vec<_>>();
        let ctrl_c = KeyBinding::new("c").with_modifier("ctrl");

        let mut play = BTreeMap::new();
        play.insert("up".to_string(), keys(&["up", "w"]));
        play.insert("down".to_string(), keys(&["down", "s"]));
        play.insert("left".to_string(), keys(&["left", "a"]));
        play.insert("right".to_string(), keys(&["right", "d"]));
        play.insert("pause".to_string(), keys(&["p", "esc"]));
        play.insert("speed".to_string(), keys(&["f"]));
        let mut quit = keys(&["q"]);
        quit.push(ctrl_c.clone());
        play.insert("quit".to_string(), quit);

        let mut menu = BTreeMap::new();
        menu.insert("menu_up".to_string(), keys(&["up", "w"]));
        menu.insert("menu_down".to_string(), keys(&["down", "s"]));
        menu.insert("decrease".to_string(), keys(&["left", "a"]));
        menu.insert("increase".to_string(), keys(&["right", "d"]));
        menu.insert("confirm".to_string(), keys(&["enter", "space"]));
        menu.insert("back".to_string(), keys(&["esc"]));
        menu.insert("pause".to_string(), keys(&["p"]));
        let mut quit = keys(&["q"]);
        quit.push(ctrl_c);
        menu.insert("quit".to_string(), quit);
        // Number keys jump straight to a menu entry
        for n in 1..=9 {
            let digit = n.to_string();
            menu.insert(format!("shortcut_{}", n), keys(&[digit.as_str()]));
        }

        Self { play, menu }
    }
}

impl KeyBindings {
    /// Translate a key press into a game input for the given context.
    /// Unbound keys become `InputEvent::None`.
    pub fn resolve(&self, key: &KeyEvent, context: InputContext) -> InputEvent {
        let bindings = match context {
            InputContext::Play => &self.play,
            InputContext::Menu => &self.menu,
        };

        for (action, keys) in bindings {
            if keys.iter().any(|binding| binding.matches(key)) {
                match action_event(action) {
                    Some(event) => return event,
                    None => debug!("Ignoring unknown action '{}' in key bindings", action),
                }
            }
        }

        InputEvent::None
    }
}
