/// String helpers shared by title resolution, item matching and display
use once_cell::sync::Lazy;
use regex::Regex;

static SECTION_CODES: Lazy<Regex> = Lazy::new(|| Regex::new(r"Â?§.").expect("valid regex"));
static AMPERSAND_CODES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&[0-9a-fk-or]").expect("valid regex"));
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Remove Minecraft color codes from text
/// Format: §x where x is a color code. A stray `Â` left over from
/// mis-decoded UTF-8 is dropped as well.
pub fn remove_minecraft_colors(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '§' => {
                chars.next();
            }
            'Â' => {}
            _ => result.push(ch),
        }
    }

    result
}

/// Clean a container title for lookup: strips `§x`, `Â§x`, `&x` codes and
/// stray `Â`, collapses whitespace runs and trims.
pub fn clean_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let cleaned = SECTION_CODES.replace_all(title, "");
    let cleaned = cleaned.replace('Â', "");
    let cleaned = AMPERSAND_CODES.replace_all(&cleaned, "");
    let cleaned = WHITESPACE_RUNS.replace_all(&cleaned, " ");

    cleaned.trim().to_string()
}

/// Lower-case alphanumeric projection used for the fuzzy title tier
pub fn fuzzy_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Normalize an item id: trimmed, upper-case, spaces become underscores
pub fn normalize_item_id(raw: &str) -> String {
    raw.trim().to_uppercase().replace(' ', "_")
}

/// Convert string to title case
pub fn to_title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `GOLD_DUST` -> `Gold Dust`
pub fn display_name_from_id(item_id: &str) -> String {
    to_title_case(&item_id.replace('_', " "))
}
