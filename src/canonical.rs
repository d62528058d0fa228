use regex::Regex;
use std::sync::OnceLock;

// Trailing " <roman numeral>" with the numeral anchored at end of string.
// Every sub-group is optional, so a match with an empty capture means the
// whitespace was not followed by a numeral at all.
fn roman_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s(M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3}))$")
            .expect("valid roman numeral pattern")
    })
}

/// Strip a trailing whitespace-plus-Roman-numeral level marker from a
/// localized attribute name ("Fortune III" -> "Fortune"). The numeral must
/// be preceded by whitespace, so a name merely ending in numeral letters
/// ("XIV") is left alone. Names without a well-formed suffix come back
/// unchanged.
pub fn strip_level_suffix(name: &str) -> String {
    if let Some(caps) = roman_suffix_re().captures(name) {
        if !caps[1].is_empty() {
            if let Some(whole) = caps.get(0) {
                return name[..whole.start()].trim().to_string();
            }
        }
    }
    name.to_string()
}

/// Render a level as a Roman numeral (1..=3999). Out-of-range values fall
/// back to decimal so a malformed table still produces readable names.
pub fn to_roman(n: u32) -> String {
    if n == 0 || n > 3999 {
        return n.to_string();
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut left = n;
    let mut out = String::new();
    for (value, digits) in TABLE {
        while left >= value {
            out.push_str(digits);
            left -= value;
        }
    }
    out
}

/// Description lookup key for an attribute tag, following the
/// `<category>.<namespace>.<name>.desc` convention of description packs:
/// "minecraft:fortune" -> "attribute.minecraft.fortune.desc".
pub fn description_key(tag: &str) -> String {
    format!("attribute.{}.desc", tag.replace(':', "."))
}
