//! Rule-based English lemmatizer.
//!
//! Irregular forms come from a small lookup table, regular inflections are
//! reduced by suffix rules. Inputs are expected in lowercase.

const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("made", "make"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("found", "find"),
    ("felt", "feel"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "person"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("lives", "life"),
    ("diagnoses", "diagnosis"),
    ("analyses", "analysis"),
];

/// Reduce an English word form to its dictionary form.
pub fn english_lemma(word: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
        return (*lemma).to_string();
    }
    if word.chars().count() <= 3 || !word.chars().all(char::is_alphabetic) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    if let Some(stem) = word.strip_suffix("sses") {
        return format!("{}ss", stem);
    }
    for suffix in ["ches", "shes", "xes", "zes"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{}{}", stem, &suffix[..suffix.len() - 2]);
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('s') {
        return stem.to_string();
    }

    if let Some(stem) = word.strip_suffix("ied") {
        return format!("{}y", stem);
    }
    for suffix in ["ing", "ed"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.chars().count() >= 3 && stem.chars().any(is_vowel) {
                return undouble(stem);
            }
        }
    }

    word.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// `runn` -> `run`, `stopp` -> `stop`; `ll`, `ss` and `zz` are kept.
fn undouble(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n >= 2 && chars[n - 1] == chars[n - 2] && !is_vowel(chars[n - 1]) && !matches!(chars[n - 1], 'l' | 's' | 'z') {
        chars[..n - 1].iter().collect()
    } else {
        stem.to_string()
    }
}
