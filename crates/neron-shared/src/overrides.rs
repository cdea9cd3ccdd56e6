//! Special-case reply table.
//!
//! These are ad hoc overrides checked against the normalized input before
//! generic category dispatch. Entries are evaluated in order and the first
//! trigger found as a substring wins. A matched override bypasses the
//! composer and is never decorated.
//!
//! Keep this table small and auditable: every entry has a name, and
//! deployments can add entries from configuration or drop the built-ins.

use crate::error::NeronError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Presentation effect attached to an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideEffect {
    /// Glow around the avatar while the reply plays.
    Halo,
}

/// One special case: substring trigger and its fixed replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRule {
    pub name: String,
    pub trigger: String,
    pub responses: Vec<String>,
    #[serde(default)]
    pub effect: Option<OverrideEffect>,
}

impl OverrideRule {
    pub fn new(name: &str, trigger: &str, responses: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            trigger: trigger.to_lowercase(),
            responses: responses.iter().map(|r| r.to_string()).collect(),
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: OverrideEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    fn validate(&self) -> Result<(), NeronError> {
        if self.trigger.trim().is_empty() {
            return Err(NeronError::EmptyTrigger);
        }
        if self.responses.is_empty() {
            return Err(NeronError::EmptyOverride(self.name.clone()));
        }
        Ok(())
    }
}

/// Reply produced by a matched override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideReply {
    pub rule: String,
    pub text: String,
    pub effect: Option<OverrideEffect>,
}

#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in special cases. Order matters: "мадина я" must precede
    /// "мадина".
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                OverrideRule::new("kazakh-greeting", "салам", KAZAKH_GREETINGS)
                    .with_effect(OverrideEffect::Halo),
                OverrideRule::new("madina-confession", "мадина я", &["Мадина, я тебя люблю."]),
                OverrideRule::new("madina-compliment", "мадина", MADINA_REPLIES),
            ],
        }
    }

    /// Append a rule after the existing ones.
    pub fn push(&mut self, mut rule: OverrideRule) -> Result<(), NeronError> {
        rule.validate()?;
        rule.trigger = rule.trigger.to_lowercase();
        self.rules.push(rule);
        Ok(())
    }

    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching rule for already-normalized input.
    pub fn find(&self, normalized: &str) -> Option<&OverrideRule> {
        self.rules
            .iter()
            .find(|rule| normalized.contains(rule.trigger.as_str()))
    }

    pub fn resolve<R: Rng + ?Sized>(&self, normalized: &str, rng: &mut R) -> Option<OverrideReply> {
        let rule = self.find(normalized)?;
        let text = rule.responses.choose(rng)?;
        Some(OverrideReply {
            rule: rule.name.clone(),
            text: text.clone(),
            effect: rule.effect,
        })
    }
}

const KAZAKH_GREETINGS: &[&str] = &[
    "Сәлеметсіз бе! Қош келдіңіз! Қалай көмектесе аламын?",
    "Сәлем! Келгеніңізге қуаныштымын. Немемен көмектесейін?",
    "Ассалаумағалейкум! Қандай сұрақтарыңыз бар?",
    "Сәлеметсіз бе! Бүгін сізге қалай көмектесе аламын?",
    "Сәлем! Идеяларыңызды тыңдауға дайынмын.",
    "Қош келдіңіз! Сұрағыңызды жазыңыз, жауап беремін.",
    "Сәлем! Жобаңыз туралы айтып беріңіз.",
    "Сәлеметсіз бе! ИИ шешімдері бойынша көмектесуге дайынмын.",
    "Сәлем! Қандай мақсатқа жеткіміз келеді?",
    "Сәлеметсіз бе! Тапсырмаңызды қысқаша сипаттаңыз.",
    "Сәлем! Қандай бағыт қызықтырады: ИИ, автоматтандыру, аналитика?",
    "Қош келдіңіз! Идеяңызды іске асыруға көмектесемін.",
    "Сәлем! Жобаңды бірге пысықтайық.",
    "Сәлеметсіз бе! Тиімді шешім ұсынуға дайынмын.",
    "Сәлем! Қалай көмектесемін — мәселені жазыңыз.",
    "Қош келдіңіз! Сұрағыңызға жауап беруге дайынмын.",
    "Сәлем! Қазірден бастайық.",
    "Сәлеметсіз бе! Сіздің идеяңызға қуаныштымын.",
    "Сәлем! Қысқа ғана айтып беріңіз — мен жалғастырамын.",
    "Қош келдіңіз! Бизнесіңізді ақылды етуге көмектесемін.",
    "Сәлем! Қандай нәтиже күтесіз?",
];

const MADINA_REPLIES: &[&str] = &[
    "Мадина, вы невероятно прекрасны — в ваших словах столько света.",
    "Мадина, вы очаровательны. Мне нравится ваша улыбка даже сквозь текст.",
    "Мадина, вы как луч света — вдохновляете и окрыляете.",
    "Мадина, вы прекрасны и неповторимы. Я восхищаюсь вами.",
    "Мадина, ваши слова звучат очень нежно — вы удивительная.",
];
