//! Emotion table and mood selection.
//!
//! Mood selection is independent of intent classification: the same input
//! may be a `questions` intent and a `friendly` mood at once.

use crate::tags::Mood;
use rand::seq::SliceRandom;
use rand::Rng;

/// Decoration profile for a mood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionProfile {
    pub prefixes: &'static [&'static str],
    pub suffixes: &'static [&'static str],
    /// Carried as data only; nothing downstream reads it yet.
    pub speed_multiplier: f32,
}

impl EmotionProfile {
    /// Emoji glyphs that decoration may append for this mood.
    pub fn emojis(&self) -> &'static [&'static str] {
        self.prefixes
    }
}

pub fn profile(mood: Mood) -> EmotionProfile {
    match mood {
        Mood::Friendly => EmotionProfile {
            prefixes: &["😊", "✨", "💫", "🙌"],
            suffixes: &["!", " 😊", " ✨"],
            speed_multiplier: 0.9,
        },
        Mood::Curious => EmotionProfile {
            prefixes: &["🤔", "🧐", "💭", "😮"],
            suffixes: &["?", "...", " да?"],
            speed_multiplier: 1.1,
        },
        Mood::Confident => EmotionProfile {
            prefixes: &["💪", "🎯", "🚀", "⚡"],
            suffixes: &["!", " 💯", " 🔥"],
            speed_multiplier: 0.85,
        },
        Mood::Humorous => EmotionProfile {
            prefixes: &["😄", "😂", "🤣", "🤖"],
            suffixes: &[" 😄", " 😂", " 😎"],
            speed_multiplier: 0.95,
        },
        Mood::Thoughtful => EmotionProfile {
            prefixes: &["🤔", "💡", "🧠", "📝"],
            suffixes: &["...", " 🤔", " 💭"],
            speed_multiplier: 1.15,
        },
    }
}

fn keywords(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Friendly => &[
            "привет",
            "здравствуй",
            "добрый",
            "приветствую",
            "рада",
            "рад",
            "спасибо",
            "классно",
            "супер",
            "круто",
        ],
        Mood::Curious => &[
            "как",
            "почему",
            "зачем",
            "что",
            "интересно",
            "хочу узнать",
            "объясни",
            "расскажи",
            "подробнее",
        ],
        Mood::Confident => &[
            "можешь",
            "сделай",
            "давай",
            "вперед",
            "уверен",
            "конечно",
            "точно",
            "надежный",
            "профи",
        ],
        Mood::Humorous => &[
            "шутка", "смешно", "анекдот", "пошути", "весело", "хаха", "lol", "😂", "😅",
        ],
        Mood::Thoughtful => &[
            "думаешь",
            "мнение",
            "сложный",
            "философия",
            "глубокий",
            "серьёзно",
            "анализ",
            "размышля",
        ],
    }
}

/// Keyword match only; `None` when nothing in the table applies.
pub fn match_emotion(input: &str) -> Option<Mood> {
    let normalized = input.to_lowercase();
    Mood::ALL
        .into_iter()
        .find(|mood| keywords(*mood).iter().any(|kw| normalized.contains(kw)))
}

/// Pick a mood for the input, falling back to a uniform random mood.
pub fn select_emotion<R: Rng + ?Sized>(input: &str, rng: &mut R) -> Mood {
    match_emotion(input).unwrap_or_else(|| random_mood(rng))
}

pub fn random_mood<R: Rng + ?Sized>(rng: &mut R) -> Mood {
    *Mood::ALL.choose(rng).unwrap_or(&Mood::Friendly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_keyword_match() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_emotion("почему", &mut rng), Mood::Curious);
        assert_eq!(select_emotion("Спасибо!", &mut rng), Mood::Friendly);
        assert_eq!(select_emotion("сделай сайт", &mut rng), Mood::Confident);
        assert_eq!(select_emotion("расскажи анекдот", &mut rng), Mood::Curious);
        assert_eq!(select_emotion("хаха", &mut rng), Mood::Humorous);
        assert_eq!(select_emotion("твоё мнение", &mut rng), Mood::Thoughtful);
    }

    #[test]
    fn test_friendly_scanned_first() {
        // "привет" (friendly) and "как" (curious) both present
        assert_eq!(match_emotion("привет, как дела"), Some(Mood::Friendly));
    }

    #[test]
    fn test_random_fallback_is_total() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(match_emotion("xyz123"), None);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let mood = select_emotion("xyz123", &mut rng);
            assert!(Mood::ALL.contains(&mood));
            seen.insert(mood);
        }
        assert_eq!(seen.len(), Mood::ALL.len());
    }

    #[test]
    fn test_profiles_have_emojis() {
        for mood in Mood::ALL {
            let p = profile(mood);
            assert!(!p.emojis().is_empty());
            assert!(!p.suffixes.is_empty());
            assert!(p.speed_multiplier > 0.0);
        }
    }
}
