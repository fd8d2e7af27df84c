//! UI context identifiers passed from hooks to the router

use serde::{Deserialize, Serialize};

/// Detective menu layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectiveMenuKind {
    /// Examine, Move
    Basic,
    /// Examine, Move, Talk, Present
    Full,
}

impl DetectiveMenuKind {
    const OPTION_KEYS: [&'static str; 4] = [
        "menu.option.examine",
        "menu.option.move",
        "menu.option.talk",
        "menu.option.present",
    ];

    pub fn option_count(&self) -> usize {
        match self {
            Self::Basic => 2,
            Self::Full => 4,
        }
    }

    /// Localization key for the option at `cursor`
    pub fn option_key(&self, cursor: usize) -> &'static str {
        if cursor < self.option_count() {
            Self::OPTION_KEYS[cursor]
        } else {
            "menu.unknown"
        }
    }
}

/// Selection list flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    Choice,
    Talk,
}

impl SelectionKind {
    pub fn label_key(&self) -> &'static str {
        match self {
            Self::Choice => "menu.kind.choice",
            Self::Talk => "menu.kind.talk",
        }
    }
}

/// Save or load screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveLoadKind {
    Save,
    Load,
}

/// Options screen tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionsCategory {
    SaveLoad,
    Sound,
    Game,
    Language,
    Display,
    KeyConfig,
    Story,
    Credits,
    Privacy,
}

impl OptionsCategory {
    pub fn name_key(&self) -> &'static str {
        match self {
            Self::SaveLoad => "options.save_load",
            Self::Sound => "options.sound",
            Self::Game => "options.game",
            Self::Language => "options.language",
            Self::Display => "options.display",
            Self::KeyConfig => "options.key_config",
            Self::Story => "options.story",
            Self::Credits => "options.credits",
            Self::Privacy => "options.privacy",
        }
    }
}

/// Luminol bloodstain progress after a spray hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodstainState {
    Undiscovered,
    /// Discovery animation starting
    Discovery,
    Discovered,
}
