//! Word lists driving the rule-based tagger

use std::collections::HashSet;
use std::sync::LazyLock;

/// Words that end a facility name ("Heathrow Airport", "Central Station")
pub static FACILITY_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "airport", "airfield", "terminal", "station", "railway", "metro", "port", "harbour",
        "harbor", "mall", "market", "hospital", "university", "college", "school", "stadium",
        "arena", "museum", "temple", "church", "cathedral", "mosque", "palace", "fort",
        "castle", "tower", "bridge", "hotel", "plaza", "square", "zoo", "campus", "centre",
        "center",
    ]
    .into_iter()
    .collect()
});

/// Words that begin or end a natural or regional location ("Lake Tahoe",
/// "Nile River")
pub static NATURAL_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "river", "lake", "mountain", "mountains", "mount", "hill", "hills", "valley", "beach",
        "island", "islands", "bay", "coast", "desert", "forest", "peninsula", "sea", "ocean",
        "gulf", "canyon", "falls", "glacier", "park", "region", "province", "district",
    ]
    .into_iter()
    .collect()
});

/// Prepositions that announce a place ("in Paris", "near Gateway")
pub static LOCATIVE_CUES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "in", "at", "near", "from", "to", "around", "outside", "inside", "towards", "toward",
        "via", "into", "within", "by",
    ]
    .into_iter()
    .collect()
});

/// Lower-case words allowed between two capitalised words of one name
pub static CONNECTORS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["of", "de", "del", "da", "do", "la", "le", "von", "van", "upon", "on"]
        .into_iter()
        .collect()
});

/// Capitalised words that never start or form a name on their own
pub static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
        "been", "before", "behind", "being", "beside", "between", "but", "by", "can", "close",
        "closest", "could", "do", "does", "east", "every", "find", "for", "from", "get", "go",
        "going", "good", "hello", "here", "hey", "hi", "how", "i", "i'm", "if", "in", "is", "it",
        "its", "just", "left", "let", "me", "my", "near", "nearby", "nearest", "next", "no",
        "north", "not", "now", "of", "on", "one", "opposite", "or", "our", "please", "right",
        "show", "so", "some", "south", "take", "tell", "thanks", "that", "the", "their",
        "there", "this", "to", "today", "tomorrow", "we", "west", "what", "when", "where",
        "which", "who", "why", "will", "with", "would", "yes", "you", "your",
    ]
    .into_iter()
    .collect()
});

#[must_use]
pub fn is_keyword(lower: &str) -> bool {
    FACILITY_KEYWORDS.contains(lower) || NATURAL_KEYWORDS.contains(lower)
}
