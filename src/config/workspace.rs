use serde::{Deserialize, Serialize};

/// Which name a folder rename is checked against before it is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameCheck {
    /// Reject the rename when another folder of the same account already
    /// carries the requested name.
    #[default]
    NewName,
    /// Only probe the folder's current name for the account (legacy gate).
    /// Collisions are then caught by the store's UNIQUE constraint alone.
    CurrentName,
}

/// Folder/card behaviour knobs (see `workspace` table in config.toml).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// TOML: `workspace.rename_check`. Default: `new_name`.
    #[serde(default)]
    pub rename_check: RenameCheck,

    /// Page size for folder listings when the client sends none.
    /// TOML: `workspace.folder_page_size`. Default: `5`.
    #[serde(default = "default_folder_page_size")]
    pub folder_page_size: u32,

    /// Page size for card listings when the client sends none.
    /// TOML: `workspace.card_page_size`. Default: `10`.
    #[serde(default = "default_card_page_size")]
    pub card_page_size: u32,

    /// Upper bound applied to every requested page size.
    /// TOML: `workspace.max_page_size`. Default: `100`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Upper bound on cards accepted by one bulk create.
    /// TOML: `workspace.max_bulk_cards`. Default: `10`.
    #[serde(default = "default_max_bulk_cards")]
    pub max_bulk_cards: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            rename_check: RenameCheck::default(),
            folder_page_size: default_folder_page_size(),
            card_page_size: default_card_page_size(),
            max_page_size: default_max_page_size(),
            max_bulk_cards: default_max_bulk_cards(),
        }
    }
}

fn default_folder_page_size() -> u32 {
    5
}

fn default_card_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_max_bulk_cards() -> usize {
    10
}
