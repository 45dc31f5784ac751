//! Slot identities and the read-only projections shown in slot pickers.
//!
//! A [`SlotName`] can only be obtained through [`SlotName::sanitize`] (or
//! the default), so any value of the type is safe to splice into a file name:
//! no separators, no traversal, no control characters, no device names.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SaveConfig;

/// Characters rejected by at least one supported filesystem.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Characters stripped from both ends of a name.
const EDGE_CHARS: &[char] = &['.', '-', ' '];

/// Windows device names, matched case-insensitively against the part of the
/// name before its first dot.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Sanitized, case-sensitive slot identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotName(String);

impl SlotName {
    /// Turns arbitrary input into a usable slot name. Never fails.
    ///
    /// Illegal and control characters are dropped, runs of dots collapse to
    /// one, leading/trailing dots, dashes and spaces are trimmed and the
    /// result is cut to [`SaveConfig::MAX_SLOT_NAME_LEN`] characters. An
    /// empty result or a reserved device name yields the default slot. Case
    /// is preserved: `Main` and `main` are different slots.
    pub fn sanitize(raw: &str) -> Self {
        let stripped: String = raw
            .chars()
            .filter(|c| !c.is_control() && !ILLEGAL_CHARS.contains(c))
            .collect();
        let collapsed = collapse_dots(&stripped);
        let truncated: String = collapsed
            .trim_matches(EDGE_CHARS)
            .chars()
            .take(SaveConfig::MAX_SLOT_NAME_LEN)
            .collect();
        let name = truncated.trim_matches(EDGE_CHARS);

        if name.is_empty() {
            tracing::debug!(raw, "slot name sanitized to nothing, using default slot");
            return Self::default();
        }
        if is_reserved(name) {
            tracing::debug!(raw, "slot name is a reserved device name, using default slot");
            return Self::default();
        }
        Self(name.to_string())
    }

    /// Whether `raw` is already a sanitized name (what the user typed is what
    /// they get).
    pub fn is_canonical(raw: &str) -> bool {
        Self::sanitize(raw).as_str() == raw
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == SaveConfig::DEFAULT_SLOT
    }

    /// File name of this slot's primary save.
    pub fn file_name(&self) -> String {
        SaveConfig::primary_file_name(&self.0)
    }
}

fn collapse_dots(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_dot = false;
    for c in s.chars() {
        if c == '.' && prev_dot {
            continue;
        }
        prev_dot = c == '.';
        out.push(c);
    }
    out
}

fn is_reserved(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name).trim_end();
    RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
}

impl Default for SlotName {
    fn default() -> Self {
        Self(SaveConfig::DEFAULT_SLOT.to_string())
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SlotName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SlotName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::sanitize(s))
    }
}

impl<'de> Deserialize<'de> for SlotName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::sanitize(&raw))
    }
}

/// Health of a slot as seen by a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlotStatus {
    Healthy,
    /// The primary file could not be parsed for display; the slot can still
    /// be loaded (backup fallback), overwritten or deleted.
    Corrupted,
}

/// Read-only projection of a slot for slot-selection screens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub slot: SlotName,
    pub player_name: Option<String>,
    pub level: Option<u32>,
    pub saved_at: Option<DateTime<Utc>>,
    pub status: SlotStatus,
}

impl SlotSummary {
    pub fn healthy(slot: SlotName, player_name: String, level: u32) -> Self {
        Self {
            slot,
            player_name: Some(player_name),
            level: Some(level),
            saved_at: None,
            status: SlotStatus::Healthy,
        }
    }

    pub fn corrupted(slot: SlotName) -> Self {
        Self {
            slot,
            player_name: None,
            level: None,
            saved_at: None,
            status: SlotStatus::Corrupted,
        }
    }

    pub fn with_saved_at(mut self, saved_at: Option<DateTime<Utc>>) -> Self {
        self.saved_at = saved_at;
        self
    }

    pub fn is_corrupted(&self) -> bool {
        self.status == SlotStatus::Corrupted
    }
}
