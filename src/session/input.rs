use icu_normalizer::ComposingNormalizerBorrowed;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    Quit,
    Response(String),
}

/// NFKC-fold, trim and lowercase a line so full-width IME input compares
/// equal to its ASCII spelling.
pub fn normalize(raw: &str) -> String {
    let folded = ComposingNormalizerBorrowed::new_nfkc().normalize(raw);
    folded.trim().to_lowercase()
}

pub fn classify(raw: &str) -> Answer {
    let normalized = normalize(raw);
    match normalized.as_str() {
        "quit" | "q" => Answer::Quit,
        _ => Answer::Response(normalized),
    }
}

pub fn is_match(response: &str, expected: &str) -> bool {
    normalize(response) == normalize(expected)
}
