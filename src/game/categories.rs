//! Word categories
//!
//! A category is a named, fixed pool of uppercase words. Rounds draw their
//! word lists from a category, and the placement engine draws substitutes
//! from the same pool. The stock categories are embedded and built once on
//! first use.

use once_cell::sync::Lazy;
use rand::prelude::*;
use std::collections::{BTreeMap, HashSet};

/// Source of category word lists.
pub trait CategorySource {
    /// Every word in the category, uppercase and without duplicates.
    /// Unknown categories yield an empty list.
    fn category_words(&self, category: &str) -> Vec<String>;

    /// Up to `count` distinct words from the category in random order.
    ///
    /// `count` is capped to the size of the category.
    fn random_words<R: Rng + ?Sized>(&self, category: &str, count: usize, rng: &mut R) -> Vec<String> {
        let mut words = self.category_words(category);
        if words.is_empty() {
            tracing::warn!(category, "no words found for category");
            return words;
        }
        words.shuffle(rng);
        words.truncate(count);
        words
    }
}

/// Stock categories, keyed by name.
static CATEGORIES: Lazy<BTreeMap<&'static str, Vec<String>>> = Lazy::new(|| {
    let raw: [(&str, &[&str]); 11] = [
        (
            "animals",
            &[
                "LION", "TIGER", "ELEPHANT", "GIRAFFE", "ZEBRA", "MONKEY", "PENGUIN", "DOLPHIN",
                "SHARK", "EAGLE", "OWL", "BEAR", "WOLF", "FOX", "DEER",
            ],
        ),
        (
            "disney",
            &[
                "MICKEY", "MINNIE", "DONALD", "GOOFY", "PLUTO", "SIMBA", "MUFASA", "NALA",
                "TIMON", "PUMBAA", "ALADDIN", "JASMINE", "GENIE", "JAFAR", "ABU",
            ],
        ),
        (
            "famousLandmarks",
            &[
                "EIFEL", "TOWER", "STATUE", "LIBERTY", "PYRAMIDS", "COLOSSEUM", "TAJMAHAL",
                "GREATWALL", "BIGBEN", "SYDNEYOPERA", "CHRISTREDEEMER", "MACHUPICCHU", "PETRA",
                "ANGKORWAT", "STONEHENGE",
            ],
        ),
        (
            "friendsAndFamilies",
            &[
                "MOTHER", "FATHER", "SISTER", "BROTHER", "GRANDMA", "GRANDPA", "AUNT", "UNCLE",
                "COUSIN", "NIECE", "NEPHEW", "DAUGHTER", "SON", "WIFE", "HUSBAND",
            ],
        ),
        (
            "fruits",
            &[
                "APPLE", "BANANA", "ORANGE", "GRAPE", "WATERMELON", "STRAWBERRY", "PINEAPPLE",
                "MANGO", "KIWI", "PEACH", "PLUM", "CHERRY", "LEMON", "LIME", "BLUEBERRY",
            ],
        ),
        (
            "greekGods",
            &[
                "ZEUS", "HERA", "POSEIDON", "HADES", "ATHENA", "APOLLO", "ARTEMIS", "ARES",
                "APHRODITE", "HERMES", "HEPHAESTUS", "DEMETER", "DIONYSUS", "HESTIA",
                "PERSEPHONE",
            ],
        ),
        (
            "harryPotter",
            &[
                "HARRY", "RON", "HERMIONE", "DUMBLEDORE", "VOLDEMORT", "HAGRID", "SNAPE",
                "MALFOY", "GINNY", "NEVILLE", "SIRIUS", "LUPIN", "MCGONAGALL", "HAGRID",
                "DEMENTOR",
            ],
        ),
        (
            "space",
            &[
                "SUN", "MOON", "EARTH", "MARS", "JUPITER", "SATURN", "NEPTUNE", "VENUS",
                "MERCURY", "PLUTO", "GALAXY", "STAR", "COMET", "ASTEROID", "NEBULA",
            ],
        ),
        (
            "superheroes",
            &[
                "SUPERMAN", "BATMAN", "SPIDERMAN", "IRONMAN", "THOR", "HULK", "WONDERWOMAN",
                "FLASH", "CAPTAINAMERICA", "BLACKWIDOW", "DEADPOOL", "WOLVERINE", "STORM",
                "CYBORG", "AQUAMAN",
            ],
        ),
        (
            "vampireDiaries",
            &[
                "DAMON", "STEFAN", "ELENA", "CAROLINE", "BONNIE", "KLAUS", "KATHERINE", "TYLER",
                "MATT", "JEREMY", "ALARIC", "REBEKAH", "KOL", "FINN", "ELIJAH",
            ],
        ),
        (
            "vegetables",
            &[
                "CARROT", "BROCCOLI", "SPINACH", "POTATO", "TOMATO", "CUCUMBER", "PEPPER",
                "ONION", "GARLIC", "CORN", "CELERY", "ASPARAGUS", "CAULIFLOWER", "EGGPLANT",
                "ZUCCHINI",
            ],
        ),
    ];

    raw.into_iter()
        .map(|(name, words)| (name, normalize(words.iter().copied())))
        .collect()
});

/// Uppercase and deduplicate, keeping first-seen order.
fn normalize<'a>(words: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .map(|w| w.trim().to_uppercase())
        .filter(|w| !w.is_empty() && seen.insert(w.clone()))
        .collect()
}

/// The embedded stock categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCategories;

impl BuiltinCategories {
    pub fn new() -> Self {
        Self
    }

    /// Names of all stock categories, sorted.
    pub fn names(&self) -> Vec<String> {
        CATEGORIES.keys().map(|k| k.to_string()).collect()
    }

    /// Pick a category name at random.
    pub fn random_category<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let names = self.names();
        names.choose(rng).cloned().unwrap_or_default()
    }
}

impl CategorySource for BuiltinCategories {
    fn category_words(&self, category: &str) -> Vec<String> {
        CATEGORIES.get(category).cloned().unwrap_or_default()
    }
}

/// A category table supplied at runtime, e.g. loaded from a word list.
#[derive(Debug, Clone, Default)]
pub struct CustomCategories {
    categories: BTreeMap<String, Vec<String>>,
}

impl CustomCategories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a category. Words are uppercased and deduplicated.
    pub fn insert<'a>(&mut self, name: &str, words: impl IntoIterator<Item = &'a str>) {
        self.categories.insert(name.to_string(), normalize(words));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<'a>(mut self, name: &str, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.insert(name, words);
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }
}

impl CategorySource for CustomCategories {
    fn category_words(&self, category: &str) -> Vec<String> {
        self.categories.get(category).cloned().unwrap_or_default()
    }
}

/// Turn a camelCase category name into a display title,
/// e.g. `famousLandmarks` into `Famous Landmarks`.
pub fn display_name(category: &str) -> String {
    let mut title = String::with_capacity(category.len() + 4);
    for (i, c) in category.chars().enumerate() {
        if i == 0 {
            title.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            title.push(' ');
            title.push(c);
        } else {
            title.push(c);
        }
    }
    title
}
