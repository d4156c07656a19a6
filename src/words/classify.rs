use serde::Serialize;

/// Semantic class of a lyric word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WordClass {
    /// Articles, conjunctions and other glue words.
    Filler,
    /// Forceful, violent or loud words.
    Impact,
    /// Soft, affectionate words.
    Tender,
    /// Verbs of movement.
    Motion,
    /// Negations and refusals.
    Negation,
    /// First-person references.
    SelfRef,
    /// Second and third-person references.
    Other,
    /// Interrogatives.
    Question,
    /// Spiritual or cosmic words.
    Transcendent,
    /// Anything else.
    Neutral,
}

/// Sound of the first letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneticClass {
    /// Plosive onset (`b d g k p t`).
    Hard,
    /// Fricative, nasal or liquid onset (`f l m n r s v w`).
    Soft,
    /// Anything else.
    Neutral,
}

const FILLER: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "of", "to", "in", "on", "at", "for", "with", "is",
    "are", "was", "were", "be", "been", "it", "its", "that", "this", "so", "just", "like", "oh",
    "yeah", "uh", "um", "da", "la", "na", "as", "by", "from", "then",
];

const SEMANTIC: &[(WordClass, &[&str])] = &[
    (
        WordClass::Impact,
        &[
            "fire", "burn", "break", "crash", "fight", "kill", "blood", "war", "hit", "smash",
            "explode", "scream", "rage", "thunder", "bang", "boom", "hard", "shot", "strike",
            "destroy", "wild", "loud",
        ],
    ),
    (
        WordClass::Tender,
        &[
            "love", "baby", "soft", "gentle", "kiss", "hold", "touch", "heart", "sweet", "warm",
            "care", "tender", "hug", "darling", "honey", "dear", "close",
        ],
    ),
    (
        WordClass::Motion,
        &[
            "run", "rise", "fall", "fly", "jump", "move", "dance", "spin", "drift", "float",
            "chase", "go", "come", "walk", "climb", "dive", "rush", "slide", "swing", "roll",
            "leave", "escape",
        ],
    ),
    (
        WordClass::Negation,
        &[
            "no", "not", "never", "nothing", "nobody", "none", "cant", "dont", "wont", "nowhere",
            "without", "aint", "neither", "nor",
        ],
    ),
    (
        WordClass::SelfRef,
        &["i", "me", "my", "mine", "myself", "im", "ive", "ill", "id"],
    ),
    (
        WordClass::Other,
        &[
            "you", "your", "yours", "yourself", "youre", "he", "she", "him", "her", "they",
            "them", "we", "us", "our",
        ],
    ),
    (
        WordClass::Question,
        &["why", "how", "what", "where", "when", "who", "whose", "which"],
    ),
    (
        WordClass::Transcendent,
        &[
            "heaven", "god", "soul", "spirit", "forever", "eternal", "infinite", "angel", "divine",
            "stars", "universe", "light", "dream", "sky", "glory", "holy",
        ],
    ),
];

/// Lowercase and keep only letters and digits.
pub fn normalize_token(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn normalize_letters(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classify a word. Filler membership wins over every semantic list.
pub fn classify_word(word: &str) -> WordClass {
    let w = normalize_letters(word);
    if w.is_empty() {
        return WordClass::Neutral;
    }
    if FILLER.contains(&w.as_str()) {
        return WordClass::Filler;
    }
    SEMANTIC
        .iter()
        .find(|(_, words)| words.contains(&w.as_str()))
        .map(|(class, _)| *class)
        .unwrap_or(WordClass::Neutral)
}

/// Phonetic class from the first letter only.
pub fn phonetic_class(word: &str) -> PhoneticClass {
    match normalize_letters(word).chars().next() {
        Some('b' | 'd' | 'g' | 'k' | 'p' | 't') => PhoneticClass::Hard,
        Some('f' | 'l' | 'm' | 'n' | 'r' | 's' | 'v' | 'w') => PhoneticClass::Soft,
        _ => PhoneticClass::Neutral,
    }
}

/// Exact token equality after normalization; prefixes and substrings never match.
pub fn is_exact_hero_token_match(token: &str, hero: &str) -> bool {
    let t = normalize_token(token);
    !t.is_empty() && t == normalize_token(hero)
}

/// Long vowel sounds: `ay`, `ee`, `oh`, `oo`.
pub fn has_long_vowel(word: &str) -> bool {
    let w = normalize_letters(word);
    ["ay", "ee", "oh", "oo"].iter().any(|v| w.contains(v))
}

#[cfg(test)]
#[path = "../../tests/unit/words/classify.rs"]
mod tests;
