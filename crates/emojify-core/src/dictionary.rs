//! Local word-to-emoji dictionary translator.
//!
//! The offline fallback for every remote failure. Pure and total: any input,
//! including the empty string, produces an output without error.

/// Look up a cleaned, lower-cased word.
pub fn lookup(word: &str) -> Option<&'static str> {
    let emoji = match word {
        "hello" | "hi" => "👋",
        "love" | "heart" => "❤️",
        "happy" => "😊",
        "sad" => "😢",
        "angry" => "😠",
        "food" | "eat" => "🍔",
        "drink" => "🥤",
        "water" => "💧",
        "fire" => "🔥",
        "sun" => "☀️",
        "moon" => "🌙",
        "star" => "⭐",
        "car" => "🚗",
        "house" => "🏠",
        "tree" => "🌳",
        "flower" => "🌸",
        "cat" => "🐱",
        "dog" => "🐶",
        "bird" => "🐦",
        "fish" => "🐠",
        "music" => "🎵",
        "book" => "📚",
        "phone" => "📱",
        "computer" => "💻",
        "money" => "💰",
        "time" => "⏰",
        "work" => "💼",
        "school" => "🏫",
        "party" => "🎉",
        "birthday" => "🎂",
        "gift" => "🎁",
        "travel" => "✈️",
        "beach" => "🏖️",
        "mountain" => "⛰️",
        "coffee" => "☕",
        "pizza" => "🍕",
        "beer" => "🍺",
        "wine" => "🍷",
        _ => return None,
    };
    Some(emoji)
}

/// Strip everything but ASCII word characters (`[A-Za-z0-9_]`).
fn clean(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Translate a sentence word by word.
///
/// The whole text is lower-cased before splitting, so unmapped words come
/// back lower-cased but otherwise untouched (punctuation included).
pub fn translate(text: &str) -> String {
    let lowered = text.to_lowercase();
    lowered
        .split_whitespace()
        .map(|token| lookup(&clean(token)).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}
