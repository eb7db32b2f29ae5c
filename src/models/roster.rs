//! The fixed, externally known list of players.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Colour used for players missing from the palette.
pub const FALLBACK_COLOR: &str = "#aaa";

/// A known player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterMember {
    pub name: String,

    /// Chart colour (any CSS colour string)
    #[serde(default = "default_color")]
    pub color: String,

    /// First date this player was eligible to appear. Playlists before it
    /// do not count towards their dedication rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined: Option<NaiveDate>,
}

fn default_color() -> String {
    FALLBACK_COLOR.to_string()
}

impl RosterMember {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            joined: None,
        }
    }

    /// Builder method to set the join date.
    pub fn joined_on(mut self, date: NaiveDate) -> Self {
        self.joined = Some(date);
        self
    }

    /// Whether a playlist on `date` counts for this player.
    pub fn is_eligible_on(&self, date: NaiveDate) -> bool {
        self.joined.map_or(true, |joined| date >= joined)
    }
}

/// Ordered list of known players.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub members: Vec<RosterMember>,
}

impl Roster {
    pub fn new(members: Vec<RosterMember>) -> Self {
        Self { members }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Colour for a player, falling back to a neutral grey.
    pub fn color_of(&self, name: &str) -> &str {
        self.get(name)
            .map(|m| m.color.as_str())
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Join date for a player, if one is configured.
    pub fn joined(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(|m| m.joined)
    }

    /// Whether a playlist on `date` counts for the named player. Players
    /// outside the roster are always eligible.
    pub fn is_eligible(&self, name: &str, date: NaiveDate) -> bool {
        self.get(name).map_or(true, |m| m.is_eligible_on(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn roster() -> Roster {
        Roster::new(vec![
            RosterMember::new("alpha", "rgb(238, 31, 52)"),
            RosterMember::new("bravo", "rgb(20, 192, 245)").joined_on(date("2025-05-12")),
        ])
    }

    #[test]
    fn test_color_lookup() {
        let roster = roster();
        assert_eq!(roster.color_of("alpha"), "rgb(238, 31, 52)");
        assert_eq!(roster.color_of("nobody"), FALLBACK_COLOR);
    }

    #[test]
    fn test_eligibility() {
        let roster = roster();
        assert!(roster.is_eligible("alpha", date("2025-01-01")));
        assert!(!roster.is_eligible("bravo", date("2025-05-11")));
        assert!(roster.is_eligible("bravo", date("2025-05-12")));
        assert!(roster.is_eligible("guest", date("2025-01-01")));
        assert_eq!(roster.joined("bravo"), Some(date("2025-05-12")));
    }

    #[test]
    fn test_roster_names_keep_order() {
        let roster = roster();
        assert_eq!(roster.names().collect::<Vec<_>>(), vec!["alpha", "bravo"]);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_member_deserialization_defaults() {
        let member: RosterMember = toml::from_str(r#"name = "charlie""#).unwrap();
        assert_eq!(member.color, FALLBACK_COLOR);
        assert!(member.joined.is_none());
    }
}
