//! Rule-table tests for the reply pipeline.
//!
//! Tests verify:
//! - Classifier priority order holds across the whole table
//! - Classifier and mood selector are allowed to disagree
//! - Composer never repeats an index back to back
//! - Overrides win over generic dispatch

use neron_shared::phrases;
use neron_shared::{
    classify, classify_explained, compose, normalize, select_emotion, Category, ClassifyRule,
    Decoration, Mood, OverrideTable,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[test]
fn question_mark_means_questions_below_greeting_and_humor() {
    let mut rng = rng(1);
    let inputs = [
        "сайт будет готов к пятнице?",
        "а роботы умеют мечтать?",
        "?",
        "нужна мотивация?",
        "asdf?",
    ];
    for input in inputs {
        assert_eq!(classify(input, &mut rng), Category::Questions, "{}", input);
    }

    assert_eq!(classify("hello?", &mut rng), Category::Greeting);
    assert_eq!(classify("lol?", &mut rng), Category::Humor);
}

#[test]
fn empty_and_hi_terminate() {
    let mut rng = rng(2);
    assert!(Category::ALL.contains(&classify("", &mut rng)));
    assert_eq!(classify("hi", &mut rng), Category::Greeting);
}

#[test]
fn intent_and_mood_can_disagree() {
    let mut rng = rng(3);
    let input = "Почему ты такой классный?";
    assert_eq!(classify(input, &mut rng), Category::Questions);
    // "классно" is not a substring of "классный", so curious wins via "почему"
    assert_eq!(select_emotion(input, &mut rng), Mood::Curious);

    let input = "спасибо, а как это работает?";
    assert_eq!(classify(input, &mut rng), Category::Questions);
    assert_eq!(select_emotion(input, &mut rng), Mood::Friendly);
}

#[test]
fn mood_fallback_is_never_an_error() {
    let mut rng = rng(4);
    for _ in 0..50 {
        assert!(Mood::ALL.contains(&select_emotion("xyz123", &mut rng)));
    }
    assert_eq!(select_emotion("почему", &mut rng), Mood::Curious);
}

#[test]
fn hundred_compositions_never_repeat_back_to_back() {
    let mut rng = rng(5);
    for category in Category::ALL {
        assert!(phrases::phrases(category).len() >= 2);
        let mut last = None;
        for _ in 0..100 {
            let composed = compose(category, Mood::Thoughtful, last, &Decoration::default(), &mut rng);
            assert_ne!(Some(composed.index), last);
            assert!(composed.text.contains(phrases::phrases(category)[composed.index]));
            last = Some(composed.index);
        }
    }
}

#[test]
fn overrides_are_checked_on_normalized_input() {
    let table = OverrideTable::builtin();
    let mut rng = rng(6);
    let normalized = normalize("   САЛАМ, брат  ");
    let reply = table.resolve(&normalized, &mut rng).expect("override should fire");
    assert_eq!(reply.rule, "kazakh-greeting");

    // Classification still runs and is unaffected by the override table
    let c = classify_explained("Мадина, привет", &mut rng);
    assert_eq!(c.rule, ClassifyRule::Greeting);
}
