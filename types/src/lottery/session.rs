use serde::{Deserialize, Serialize};

use super::{generate, BetType, Cart};

/// Exactly one entry surface is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    /// Manual digit keypad with auto-add on completion.
    #[serde(rename = "keyboard")]
    Keypad,
    /// Visual number-grid picker.
    #[serde(rename = "grid")]
    Grid,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Keypad => "keyboard",
            InputMode::Grid => "grid",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "keyboard" => Some(InputMode::Keypad),
            "grid" => Some(InputMode::Grid),
            _ => None,
        }
    }
}

impl Default for InputMode {
    fn default() -> Self {
        InputMode::Keypad
    }
}

/// Local betting session for one period: the selected bet types, the active
/// input mode, the in-progress digit buffer, the shuffle toggle, and the cart.
///
/// Every operation is synchronous and local; edge operations (deselecting the
/// last bet type, undo with nothing added) simply return without effect.
/// Remote sale-limit validation happens one layer up, before rows reach the
/// cart.
#[derive(Clone, Debug, PartialEq)]
pub struct BetSession {
    selected: Vec<BetType>,
    input_mode: InputMode,
    buffer: String,
    shuffle_enabled: bool,
    cart: Cart,
}

impl Default for BetSession {
    fn default() -> Self {
        Self {
            selected: vec![BetType::default()],
            input_mode: InputMode::default(),
            buffer: String::new(),
            shuffle_enabled: false,
            cart: Cart::default(),
        }
    }
}

impl BetSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from persisted state. An empty selection falls back to
    /// the default bet type.
    pub fn hydrate(selected: Vec<BetType>, input_mode: InputMode, cart: Cart) -> Self {
        let selected = if selected.is_empty() {
            vec![BetType::default()]
        } else {
            selected
        };
        Self {
            selected,
            input_mode,
            buffer: String::new(),
            shuffle_enabled: false,
            cart,
        }
    }

    pub fn selected(&self) -> &[BetType] {
        &self.selected
    }

    /// The bet type driving the keypad's digit count: the first selected one.
    pub fn primary(&self) -> BetType {
        self.selected.first().copied().unwrap_or_default()
    }

    /// Multi-select toggle. Deselecting the only remaining type is a no-op; any
    /// actual change resets the shuffle toggle and the digit buffer, since
    /// shuffle semantics are bet-type-specific.
    pub fn toggle_bet_type(&mut self, bet_type: BetType) -> bool {
        if let Some(pos) = self.selected.iter().position(|t| *t == bet_type) {
            if self.selected.len() == 1 {
                return false;
            }
            self.selected.remove(pos);
        } else {
            self.selected.push(bet_type);
        }
        self.shuffle_enabled = false;
        self.buffer.clear();
        true
    }

    /// Replace the whole selection. An empty set falls back to the default bet
    /// type so the selection never becomes empty.
    pub fn set_selected(&mut self, types: Vec<BetType>) {
        self.selected = if types.is_empty() {
            vec![BetType::default()]
        } else {
            types
        };
        self.shuffle_enabled = false;
        self.buffer.clear();
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Switching modes always clears the in-progress buffer.
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Accept one keystroke. Non-digits are ignored. Reaching the primary bet
    /// type's digit count completes the entry: the full number is returned and
    /// the buffer resets.
    pub fn push_digit(&mut self, digit: char) -> Option<String> {
        if !digit.is_ascii_digit() {
            return None;
        }
        let required = self.primary().digit_count();
        if self.buffer.len() >= required {
            return None;
        }
        self.buffer.push(digit);
        if self.buffer.len() == required {
            return Some(std::mem::take(&mut self.buffer));
        }
        None
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle_enabled = enabled;
    }

    /// The numbers one entry resolves to for a bet type: the shuffle expansion
    /// when the toggle is on, otherwise the entry alone.
    pub fn candidates(&self, bet_type: BetType, number: &str) -> Vec<String> {
        if self.shuffle_enabled {
            generate::shuffle_candidates(bet_type, number)
        } else {
            vec![number.to_string()]
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }
}
