//! Rule-based Penn-style part-of-speech tagging.
//!
//! Deterministic lookup tables plus suffix heuristics; enough to split
//! noun-like from adjective-like tokens without a trained model.

/// Tag a single word. Unknown words default to `NN`.
pub fn tag(word: &str) -> &'static str {
    let lower = word.to_lowercase();

    if let Some(tag) = closed_class(&lower) {
        return tag;
    }
    if is_common_adjective(&lower) {
        return "JJ";
    }
    if !lower.is_empty() && lower.chars().all(|c| c.is_ascii_digit()) {
        return "CD";
    }
    if let Some(tag) = suffix_tag(&lower) {
        return tag;
    }
    if word.chars().next().is_some_and(|c| c.is_uppercase()) {
        return "NNP";
    }
    if lower.len() > 2 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us")
    {
        return "NNS";
    }
    "NN"
}

fn closed_class(lower: &str) -> Option<&'static str> {
    let tag = match lower {
        "the" | "a" | "an" | "this" | "that" | "these" | "those" | "some" | "any" | "each"
        | "every" | "no" => "DT",
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "her" | "us"
        | "them" => "PRP",
        "my" | "your" | "his" | "its" | "our" | "their" => "PRP$",
        "in" | "on" | "at" | "of" | "for" | "with" | "from" | "by" | "as" | "if" | "about"
        | "into" | "over" | "under" | "out" | "off" | "up" | "down" | "than" | "through" => "IN",
        "and" | "or" | "but" | "nor" | "so" | "yet" => "CC",
        "can" | "could" | "will" | "would" | "shall" | "should" | "may" | "might" | "must" => {
            "MD"
        }
        "is" | "are" | "was" | "were" | "be" | "been" | "being" | "am" | "do" | "does" | "did"
        | "have" | "has" | "had" => "VB",
        "not" | "very" | "too" | "also" | "just" | "now" | "then" | "here" | "there" => "RB",
        "when" | "where" | "how" | "why" => "WRB",
        "what" | "who" | "which" => "WP",
        _ => return None,
    };
    Some(tag)
}

fn is_common_adjective(lower: &str) -> bool {
    matches!(
        lower,
        "amazing"
            | "awesome"
            | "good"
            | "great"
            | "bad"
            | "new"
            | "old"
            | "big"
            | "small"
            | "little"
            | "long"
            | "short"
            | "high"
            | "low"
            | "happy"
            | "sad"
            | "beautiful"
            | "terrible"
            | "horrible"
            | "incredible"
            | "nice"
            | "cool"
            | "free"
            | "real"
            | "sure"
            | "right"
            | "wrong"
            | "early"
            | "late"
            | "hard"
            | "easy"
            | "hot"
            | "cold"
            | "young"
            | "strong"
            | "weak"
            | "rich"
            | "poor"
            | "true"
            | "false"
            | "full"
            | "empty"
            | "fast"
            | "slow"
            | "funny"
            | "crazy"
            | "weird"
            | "huge"
            | "tiny"
            | "cute"
    )
}

fn suffix_tag(lower: &str) -> Option<&'static str> {
    let long_enough = |suffix: &str| lower.len() > suffix.len() + 1;

    if lower.ends_with("ly") && long_enough("ly") {
        return Some("RB");
    }
    if lower.ends_with("ing") && long_enough("ing") {
        return Some("VBG");
    }
    if lower.ends_with("ed") && long_enough("ed") {
        return Some("VBD");
    }
    if lower.ends_with("est") && long_enough("est") {
        return Some("JJS");
    }
    for suffix in ["ous", "ful", "ive", "able", "ible", "ish", "less"] {
        if lower.ends_with(suffix) && long_enough(suffix) {
            return Some("JJ");
        }
    }
    None
}
