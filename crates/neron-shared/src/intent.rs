//! Intent classifier.
//!
//! Ordered substring rules, first match wins. This is keyword matching, not
//! language understanding. The classifier is total: every string, including
//! the empty one, maps to a category.

use crate::tags::Category;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

const GREETING_PATTERNS: &[&str] = &[
    "привет",
    "hello",
    "hi",
    "hey",
    "здорово",
    "приветствую",
    "здравствуй",
    "добрый день",
    "доброе утро",
    "добрый вечер",
];

const HUMOR_PATTERNS: &[&str] = &[
    "шутка", "смешно", "пошути", "анекдот", "весело", "хаха", "lol", "lmao", "😂", "😄", "рассмеши",
];

/// Matched as prefixes, not substrings.
const QUESTION_STARTERS: &[&str] = &[
    "как",
    "почему",
    "зачем",
    "что такое",
    "кто такой",
    "где",
    "когда",
    "сколько",
    "можешь ли",
    "можешь",
];

const MOTIVATION_PATTERNS: &[&str] = &[
    "мотивация",
    "вдохновение",
    "помоги",
    "поддержка",
    "совет",
    "рекомендация",
    "помоги мне",
    "что делать",
];

const NOISE_PATTERNS: &[&str] = &[
    "asdf",
    "ываыва",
    "12345",
    "йцукен",
    "wtf",
    "lolol",
    "непонятно",
];

const DOMAIN_PATTERNS: &[&str] = &[
    "ии",
    "искусственный интеллект",
    "автоматизация",
    "нейрон",
    "ai",
    "технологи",
    "код",
    "программиров",
    "робот",
];

const DOMAIN_CHOICES: [Category; 2] = [Category::Smart, Category::Questions];

const FALLBACK_CHOICES: [Category; 4] = [
    Category::Smart,
    Category::Questions,
    Category::Humor,
    Category::Motivation,
];

/// Inputs shorter than this (in chars) are unclear.
const MIN_CLEAR_LEN: usize = 3;

static ALNUM_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("static pattern compiles"));

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyRule {
    Greeting,
    Humor,
    Question,
    Motivation,
    TooShort,
    Noise,
    DomainKeyword,
    RandomFallback,
}

/// Category plus the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub rule: ClassifyRule,
}

/// Lower-case and trim, the normal form every rule runs against.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

fn contains_any(haystack: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| haystack.contains(p))
}

pub fn classify<R: Rng + ?Sized>(input: &str, rng: &mut R) -> Category {
    classify_explained(input, rng).category
}

pub fn classify_explained<R: Rng + ?Sized>(input: &str, rng: &mut R) -> Classification {
    let text = normalize(input);
    let hit = |category, rule| Classification { category, rule };

    if contains_any(&text, GREETING_PATTERNS) {
        return hit(Category::Greeting, ClassifyRule::Greeting);
    }

    if contains_any(&text, HUMOR_PATTERNS) {
        return hit(Category::Humor, ClassifyRule::Humor);
    }

    if QUESTION_STARTERS.iter().any(|p| text.starts_with(p)) || text.contains('?') {
        return hit(Category::Questions, ClassifyRule::Question);
    }

    if contains_any(&text, MOTIVATION_PATTERNS) {
        return hit(Category::Motivation, ClassifyRule::Motivation);
    }

    if text.chars().count() < MIN_CLEAR_LEN {
        return hit(Category::Unclear, ClassifyRule::TooShort);
    }

    if contains_any(&text, NOISE_PATTERNS) || ALNUM_ONLY.is_match(&text) {
        return hit(Category::Unclear, ClassifyRule::Noise);
    }

    // Open question upstream: deliberate variety or an unhandled default.
    // Either way the observed distribution is kept.
    if contains_any(&text, DOMAIN_PATTERNS) {
        let category = *DOMAIN_CHOICES.choose(rng).unwrap_or(&Category::Smart);
        return hit(category, ClassifyRule::DomainKeyword);
    }

    let category = *FALLBACK_CHOICES.choose(rng).unwrap_or(&Category::Smart);
    hit(category, ClassifyRule::RandomFallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_greeting() {
        let mut rng = rng();
        assert_eq!(classify("hi", &mut rng), Category::Greeting);
        assert_eq!(classify("  Привет, друг  ", &mut rng), Category::Greeting);
        assert_eq!(classify("Доброе утро", &mut rng), Category::Greeting);
    }

    #[test]
    fn test_priority_greeting_beats_question_mark() {
        let mut rng = rng();
        assert_eq!(classify("hey, как дела?", &mut rng), Category::Greeting);
        assert_eq!(classify("это шутка?", &mut rng), Category::Humor);
    }

    #[test]
    fn test_question_mark_and_starters() {
        let mut rng = rng();
        assert_eq!(classify("сайт готов?", &mut rng), Category::Questions);
        assert_eq!(classify("Почему небо синее", &mut rng), Category::Questions);
        assert_eq!(classify("сколько стоит", &mut rng), Category::Questions);
    }

    #[test]
    fn test_starter_is_prefix_only() {
        let mut rng = rng();
        // "где" appears mid-sentence only; "помоги" wins instead
        let c = classify_explained("помоги найти где", &mut rng);
        assert_eq!(c.rule, ClassifyRule::Motivation);
    }

    #[test]
    fn test_motivation() {
        let mut rng = rng();
        assert_eq!(classify("нужна мотивация", &mut rng), Category::Motivation);
        assert_eq!(classify("дай совет", &mut rng), Category::Motivation);
    }

    #[test]
    fn test_short_and_empty_are_unclear() {
        let mut rng = rng();
        assert_eq!(classify("", &mut rng), Category::Unclear);
        assert_eq!(classify("   ", &mut rng), Category::Unclear);
        assert_eq!(classify_explained("ок", &mut rng).rule, ClassifyRule::TooShort);
    }

    #[test]
    fn test_noise() {
        let mut rng = rng();
        assert_eq!(classify_explained("asdfgh", &mut rng).rule, ClassifyRule::Noise);
        assert_eq!(classify_explained("qwerty123", &mut rng).rule, ClassifyRule::Noise);
        assert_eq!(classify_explained("йцукен!!", &mut rng).rule, ClassifyRule::Noise);
    }

    #[test]
    fn test_domain_keyword_splits_between_two() {
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let c = classify_explained("расскажу про нейронные сети", &mut rng);
            assert_eq!(c.rule, ClassifyRule::DomainKeyword);
            assert!(DOMAIN_CHOICES.contains(&c.category));
            seen.insert(c.category);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_random_fallback_never_greets() {
        let mut rng = rng();
        for _ in 0..100 {
            let c = classify_explained("погода сегодня отличная", &mut rng);
            assert_eq!(c.rule, ClassifyRule::RandomFallback);
            assert!(FALLBACK_CHOICES.contains(&c.category));
        }
    }
}
