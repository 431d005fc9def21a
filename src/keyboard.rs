use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup};

use crate::replies::{NEXT_BUTTON, START_BUTTON};

pub(crate) fn start_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(START_BUTTON)]])
}

pub(crate) fn next_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(NEXT_BUTTON)]])
}

pub(crate) fn letters_keyboard(letters: &[char]) -> KeyboardMarkup {
    let keyboard = letters
        .iter()
        .map(|letter| vec![KeyboardButton::new(letter.to_string())]);

    KeyboardMarkup::new(keyboard)
}

pub(crate) fn remove_keyboard() -> ReplyMarkup {
    ReplyMarkup::kb_remove()
}
