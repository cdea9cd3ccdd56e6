//! Category and mood tags.
//!
//! Both sets are closed. Declaration order is pinned: it is the order in
//! which keyword tables are scanned and the order used for uniform picks.

use crate::error::NeronError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reply category chosen by the intent classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Greeting,
    Humor,
    Smart,
    Motivation,
    Questions,
    Unclear,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Greeting,
        Category::Humor,
        Category::Smart,
        Category::Motivation,
        Category::Questions,
        Category::Unclear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Humor => "humor",
            Self::Smart => "smart",
            Self::Motivation => "motivation",
            Self::Questions => "questions",
            Self::Unclear => "unclear",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = NeronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| NeronError::UnknownCategory(s.to_string()))
    }
}

/// Emotional decoration profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Friendly,
    Curious,
    Confident,
    Humorous,
    Thoughtful,
}

impl Default for Mood {
    fn default() -> Self {
        Self::Friendly
    }
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Friendly,
        Mood::Curious,
        Mood::Confident,
        Mood::Humorous,
        Mood::Thoughtful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Curious => "curious",
            Self::Confident => "confident",
            Self::Humorous => "humorous",
            Self::Thoughtful => "thoughtful",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = NeronError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| NeronError::UnknownMood(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("humor".parse::<Category>().unwrap(), Category::Humor);
        assert_eq!(" Questions ".parse::<Category>().unwrap(), Category::Questions);
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn test_mood_parse_and_display() {
        for mood in Mood::ALL {
            assert_eq!(mood.to_string().parse::<Mood>().unwrap(), mood);
        }
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Category::Motivation).unwrap();
        assert_eq!(json, "\"motivation\"");
        let mood: Mood = serde_json::from_str("\"thoughtful\"").unwrap();
        assert_eq!(mood, Mood::Thoughtful);
    }
}
