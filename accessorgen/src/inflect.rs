//! English inflection used to name accessor methods.
//!
//! Collections are usually named in the plural (`users`), while their adder and
//! remover take a single item (`addUser`). `singularize` recovers the singular
//! form from a suffix table; `classify` and `camelize` build method and variable
//! names from field names.

use convert_case::{Case, Casing};

/// Result of singularizing a word.
///
/// Some plural suffixes map to more than one plausible singular (`indices` can be
/// `index` or `indix`). Callers choose a policy explicitly, usually
/// [`Singular::preferred`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Singular {
    Unique(String),
    Ambiguous(Vec<String>),
}

impl Singular {
    /// The first candidate, which is the table's preferred reading.
    pub fn preferred(&self) -> &str {
        match self {
            Self::Unique(word) => word,
            Self::Ambiguous(candidates) => candidates.first().map(String::as_str).unwrap_or_default(),
        }
    }

    pub fn candidates(&self) -> Vec<&str> {
        match self {
            Self::Unique(word) => vec![word.as_str()],
            Self::Ambiguous(candidates) => candidates.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.candidates().contains(&word)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }

    fn from_candidates(mut candidates: Vec<String>) -> Self {
        let mut seen = Vec::with_capacity(candidates.len());
        candidates.retain(|candidate| {
            if seen.contains(candidate) {
                false
            } else {
                seen.push(candidate.clone());
                true
            }
        });

        if candidates.len() == 1 {
            Self::Unique(candidates.remove(0))
        } else {
            Self::Ambiguous(candidates)
        }
    }
}

/// One plural suffix rule.
struct PluralRule {
    /// Plural suffix, reversed and lowercase.
    reversed_suffix: &'static str,
    /// Whether the suffix may follow a vowel.
    after_vowel: bool,
    /// Whether the suffix may follow a consonant.
    after_consonant: bool,
    /// Singular replacement(s) for the suffix.
    singular: &'static [&'static str],
}

const fn rule(
    reversed_suffix: &'static str,
    after_vowel: bool,
    after_consonant: bool,
    singular: &'static [&'static str],
) -> PluralRule {
    PluralRule {
        reversed_suffix,
        after_vowel,
        after_consonant,
        singular,
    }
}

// Order matters: the first matching rule wins, so specific suffixes come before
// the generic `-es` and `-s` rules.
const PLURAL_RULES: &[PluralRule] = &[
    // bacteria (bacterium), criteria (criterion), phenomena (phenomenon)
    rule("a", true, true, &["on", "um"]),
    // nebulae (nebula)
    rule("ea", true, true, &["a"]),
    // mice (mouse), lice (louse)
    rule("eci", false, true, &["ouse"]),
    // geese (goose)
    rule("esee", false, true, &["oose"]),
    // fungi (fungus), alumni (alumnus), syllabi (syllabus), radii (radius)
    rule("i", true, true, &["us"]),
    // men (man), women (woman)
    rule("nem", true, true, &["man"]),
    // children (child)
    rule("nerdlihc", true, true, &["child"]),
    // oxen (ox)
    rule("nexo", false, false, &["ox"]),
    // indices (index), appendices (appendix)
    rule("seci", false, true, &["ex", "ix"]),
    // babies (baby)
    rule("sei", false, true, &["y"]),
    // analyses (analysis), theses (thesis), houses (house), kisses (kiss)
    rule("ses", true, true, &["s", "se", "sis"]),
    // lives (life), wives (wife)
    rule("sevi", false, true, &["ife"]),
    // hooves (hoof), dwarves (dwarf), elves (elf), leaves (leaf)
    rule("sev", true, true, &["f"]),
    // axes (ax, axe, axis)
    rule("sexa", false, false, &["ax", "axe", "axis"]),
    // indexes (index), matrixes (matrix)
    rule("sex", true, false, &["x"]),
    // quizzes (quiz)
    rule("sezz", true, false, &["z"]),
    // bureaus (bureau)
    rule("suae", false, true, &["eau"]),
    // roses (rose), garages (garage), heroes (hero), bushes (bush), arches (arch)
    rule("se", true, true, &["", "e"]),
    // tags (tag)
    rule("s", true, true, &[""]),
    // chateaux (chateau)
    rule("xuae", false, true, &["eau"]),
];

/// Words whose plural and singular are spelled the same.
const INVARIANT_WORDS: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "fish",
    "information",
    "metadata",
    "money",
    "moose",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns the singular form(s) of an English plural noun.
///
/// Words that match no rule are assumed to already be singular (or irregular)
/// and are returned unchanged.
pub fn singularize(word: &str) -> Singular {
    if INVARIANT_WORDS.contains(&word.to_ascii_lowercase().as_str()) {
        return Singular::Unique(word.to_string());
    }

    let chars: Vec<char> = word.chars().collect();
    let lower_reversed: Vec<char> = chars.iter().rev().map(char::to_ascii_lowercase).collect();

    for rule in PLURAL_RULES {
        let suffix: Vec<char> = rule.reversed_suffix.chars().collect();
        let len = suffix.len();
        if len > lower_reversed.len() || lower_reversed[..len] != suffix[..] {
            continue;
        }

        if let Some(&preceding) = lower_reversed.get(len) {
            let vowel = is_vowel(preceding);
            if (vowel && !rule.after_vowel) || (!vowel && !rule.after_consonant) {
                continue;
            }
        }

        let base: String = chars[..chars.len() - len].iter().collect();
        let first_upper = chars[chars.len() - len].is_uppercase();
        let candidates = rule
            .singular
            .iter()
            .map(|ending| {
                if first_upper {
                    format!("{base}{}", upper_first(ending))
                } else {
                    format!("{base}{ending}")
                }
            })
            .collect();

        return Singular::from_candidates(candidates);
    }

    // teeth (tooth), feet (foot)
    if word.contains("ee") {
        return Singular::Unique(word.replacen("ee", "oo", 1));
    }

    Singular::Unique(word.to_string())
}

/// `created_at` / `createdAt` -> `CreatedAt`
pub fn classify(word: &str) -> String {
    word.to_case(Case::Pascal)
}

/// `created_at` / `CreatedAt` -> `createdAt`
pub fn camelize(word: &str) -> String {
    word.to_case(Case::Camel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irregular_plurals() {
        assert_eq!(singularize("mice"), Singular::Unique("mouse".into()));
        assert_eq!(singularize("oxen"), Singular::Unique("ox".into()));
        assert_eq!(singularize("children"), Singular::Unique("child".into()));
        assert_eq!(singularize("women"), Singular::Unique("woman".into()));
        assert_eq!(singularize("geese"), Singular::Unique("goose".into()));
        assert_eq!(singularize("teeth"), Singular::Unique("tooth".into()));
    }

    #[test]
    fn test_regular_plurals() {
        assert_eq!(singularize("users"), Singular::Unique("user".into()));
        assert_eq!(singularize("groups"), Singular::Unique("group".into()));
        assert_eq!(singularize("categories"), Singular::Unique("category".into()));
        assert_eq!(singularize("wives"), Singular::Unique("wife".into()));
        assert_eq!(singularize("quizzes"), Singular::Unique("quiz".into()));
    }

    #[test]
    fn test_ambiguous_plurals() {
        let indices = singularize("indices");
        assert!(indices.is_ambiguous());
        assert!(indices.contains("index"));
        assert_eq!(indices.preferred(), "index");

        let roses = singularize("roses");
        assert!(roses.contains("rose"));

        let addresses = singularize("addresses");
        assert_eq!(addresses.preferred(), "address");
    }

    #[test]
    fn test_duplicate_candidates_collapse() {
        let singular = Singular::from_candidates(vec!["rose".into(), "rose".into()]);
        assert_eq!(singular, Singular::Unique("rose".into()));
    }

    #[test]
    fn test_unmatched_and_invariant_words() {
        assert_eq!(singularize("data"), Singular::Unique("data".into()));
        assert_eq!(singularize("sheep"), Singular::Unique("sheep".into()));
        assert_eq!(singularize("child"), Singular::Unique("child".into()));
        assert_eq!(singularize(""), Singular::Unique(String::new()));
    }

    #[test]
    fn test_vowel_constraint_falls_through() {
        // "-ies" after a vowel does not use the babies rule
        assert_eq!(singularize("boys"), Singular::Unique("boy".into()));
        // "oxen" rule forbids any preceding letter
        assert_eq!(singularize("boxen"), Singular::Unique("boxen".into()));
    }

    #[test]
    fn test_preserves_capitalisation() {
        assert_eq!(singularize("Children"), Singular::Unique("Child".into()));
        assert_eq!(singularize("Users"), Singular::Unique("User".into()));
    }

    #[test]
    fn test_classify_and_camelize() {
        assert_eq!(classify("users"), "Users");
        assert_eq!(classify("created_at"), "CreatedAt");
        assert_eq!(classify("createdAt"), "CreatedAt");
        assert_eq!(camelize("created_at"), "createdAt");
        assert_eq!(camelize("user"), "user");
    }
}
