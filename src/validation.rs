//! Name validation for characters and guilds

use std::collections::HashSet;

use crate::realm::types::GUILD_TAG_MAX;

/// Name validation errors with helpful messages
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name is too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("name is too long (maximum {max} characters)")]
    TooLong { max: usize },

    #[error("name contains invalid characters: {chars}")]
    InvalidCharacters { chars: String },

    #[error("name is reserved")]
    Reserved,

    #[error("guild tag must be {min}-{max} letters or digits")]
    InvalidTag { min: usize, max: usize },
}

/// Name validation rules configuration
#[derive(Debug, Clone)]
pub struct NameRules {
    pub min_length: usize,
    pub max_length: usize,
    pub allow_spaces: bool,
    pub allow_unicode: bool,
}

impl NameRules {
    /// Rules for hero names shown on the leaderboard
    pub fn character() -> Self {
        NameRules {
            min_length: 2,
            max_length: 20,
            allow_spaces: false,
            allow_unicode: true,
        }
    }

    /// Guild names may contain spaces ("Shadow Wolves")
    pub fn guild() -> Self {
        NameRules {
            min_length: 3,
            max_length: 24,
            allow_spaces: true,
            allow_unicode: true,
        }
    }
}

/// Minimum guild tag length.
pub const GUILD_TAG_MIN: usize = 2;

fn reserved_names() -> HashSet<&'static str> {
    ["admin", "administrator", "system", "moderator", "realm", "npc", "market"]
        .iter()
        .copied()
        .collect()
}

/// Validate a name according to the given rules. Returns the trimmed name.
pub fn validate_name(name: &str, rules: &NameRules) -> Result<String, NameError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();

    if len < rules.min_length {
        return Err(NameError::TooShort {
            min: rules.min_length,
        });
    }
    if len > rules.max_length {
        return Err(NameError::TooLong {
            max: rules.max_length,
        });
    }

    if reserved_names().contains(trimmed.to_lowercase().as_str()) {
        return Err(NameError::Reserved);
    }

    let mut invalid_chars = Vec::new();
    for ch in trimmed.chars() {
        let valid = if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch == '\'' {
            true
        } else if ch == ' ' {
            rules.allow_spaces
        } else if ch.is_control() {
            false
        } else if (ch.is_alphabetic() || ch.is_numeric()) && !ch.is_ascii() {
            rules.allow_unicode
        } else {
            false
        };

        if !valid {
            invalid_chars.push(ch);
        }
    }

    if !invalid_chars.is_empty() {
        let unique_chars: HashSet<char> = invalid_chars.into_iter().collect();
        let mut chars: Vec<char> = unique_chars.into_iter().collect();
        chars.sort_unstable();
        let chars_str: String = chars
            .into_iter()
            .map(|c| {
                if c.is_control() {
                    format!("\\u{{{:04x}}}", c as u32)
                } else {
                    c.to_string()
                }
            })
            .collect();
        return Err(NameError::InvalidCharacters { chars: chars_str });
    }

    Ok(trimmed.to_string())
}

pub fn validate_character_name(name: &str) -> Result<String, NameError> {
    validate_name(name, &NameRules::character())
}

pub fn validate_guild_name(name: &str) -> Result<String, NameError> {
    validate_name(name, &NameRules::guild())
}

/// Validate a guild tag and normalise it to upper case.
pub fn normalize_guild_tag(tag: &str) -> Result<String, NameError> {
    let trimmed = tag.trim();
    let len = trimmed.chars().count();
    if !(GUILD_TAG_MIN..=GUILD_TAG_MAX).contains(&len)
        || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(NameError::InvalidTag {
            min: GUILD_TAG_MIN,
            max: GUILD_TAG_MAX,
        });
    }
    Ok(trimmed.to_ascii_uppercase())
}
