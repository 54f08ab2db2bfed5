//! Built-in content themes.
//!
//! Static prompt tables for the four themes the application ships with.
//! Order within each table is the draw order.

use super::definition::{Card, ResponseMode};

/// Name of the theme used when none is chosen.
pub const DEFAULT_THEME: &str = "Deep Connections";

/// Built-in theme names, in display order.
pub const THEMES: [&str; 4] = [
    "Deep Connections",
    "Playful & Random",
    "Future & Dreams",
    "Hard Truths",
];

type Row = (&'static str, &'static str, ResponseMode, &'static str);

const O: ResponseMode = ResponseMode::OtherResponds;
const B: ResponseMode = ResponseMode::BothRespond;

const DEEP_CONNECTIONS: [Row; 7] = [
    ("deep-1", "What is a core memory from your childhood that shaped you?", B, "Identity"),
    ("deep-2", "When do you feel most understood by someone?", B, "Connection"),
    ("deep-3", "What belief about yourself took you years to unlearn?", O, "Growth"),
    ("deep-4", "What is something you wish more people noticed about you?", O, "Presence"),
    ("deep-5", "What does “feeling safe” look like in a relationship to you?", B, "Trust"),
    ("deep-6", "What is a small act of care that means a lot to you?", B, "Love"),
    ("deep-7", "What is one thing you are proud of that you rarely say out loud?", O, "Pride"),
];

const PLAYFUL_AND_RANDOM: [Row; 7] = [
    ("play-1", "If our friendship/relationship had a theme song, what would it be?", B, "Vibes"),
    ("play-2", "What is your most harmlessly ridiculous opinion?", O, "Chaos"),
    ("play-3", "Pick a superpower — but it comes with an annoying side effect. What is it?", B, "Imagination"),
    ("play-4", "What is a tiny thing that instantly improves your day?", B, "Joy"),
    ("play-5", "If you could swap lives with a fictional character for 24 hours, who would it be?", O, "Stories"),
    ("play-6", "What is your go-to “I need comfort” food or drink?", B, "Comfort"),
    ("play-7", "What is a skill you would learn instantly if you could?", O, "Curiosity"),
];

const FUTURE_AND_DREAMS: [Row; 7] = [
    ("future-1", "What is a risk you are currently afraid to take?", O, "Courage"),
    ("future-2", "If everything worked out, what would your life look like in 5 years?", B, "Vision"),
    ("future-3", "What is a dream you have that feels “too big” to say?", O, "Dreams"),
    ("future-4", "What is one habit that future-you will thank you for?", B, "Momentum"),
    ("future-5", "Who do you want to become — not what do you want to do?", B, "Becoming"),
    ("future-6", "What would you try if you knew you could not fail?", O, "Fearless"),
    ("future-7", "What is something you want to build with your time and energy?", O, "Create"),
];

const HARD_TRUTHS: [Row; 7] = [
    ("truth-1", "What pattern do you keep repeating even though you know it hurts you?", O, "Patterns"),
    ("truth-2", "What is a boundary you wish you set sooner?", O, "Boundaries"),
    ("truth-3", "What do you avoid talking about because it feels uncomfortable?", B, "Avoidance"),
    ("truth-4", "What is something you need to forgive yourself for?", O, "Healing"),
    ("truth-5", "When you are stressed, how do you tend to treat the people closest to you?", B, "Stress"),
    ("truth-6", "If you could change one thing about our dynamic, what would it be?", O, "Connection"),
    ("truth-7", "What is a hard truth you learned recently that changed you?", B, "Growth"),
];

/// Build the built-in decks as `(theme, cards)` pairs.
pub(crate) fn builtin_decks() -> Vec<(&'static str, Vec<Card>)> {
    let tables: [&[Row]; 4] = [
        &DEEP_CONNECTIONS,
        &PLAYFUL_AND_RANDOM,
        &FUTURE_AND_DREAMS,
        &HARD_TRUTHS,
    ];

    THEMES
        .iter()
        .zip(tables)
        .map(|(name, rows)| {
            let cards = rows
                .iter()
                .map(|&(id, prompt, mode, category)| Card::new(id, prompt, mode, category))
                .collect();
            (*name, cards)
        })
        .collect()
}
