/// Turn a title into a URL slug.
///
/// Accented Latin letters are folded to ASCII and any other non-ASCII
/// character is dropped. Punctuation other than `-` and `_` is removed,
/// runs of whitespace and dashes become a single `-`, and leading or
/// trailing dashes and underscores are stripped.
pub fn slugify(input: &str) -> String {
    let mut ascii = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii() {
            ascii.push(ch);
        } else {
            ascii.push_str(fold(ch));
        }
    }

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_ascii_whitespace() {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// ASCII spelling of a non-ASCII `ch`; empty for characters with none.
fn fold(ch: char) -> &'static str {
    match ch {
        'à'..='å' => "a",
        'À'..='Å' => "A",
        'æ' => "ae",
        'Æ' => "AE",
        'ç' | 'ć' | 'č' => "c",
        'Ç' | 'Ć' | 'Č' => "C",
        'è'..='ë' | 'ę' | 'ě' => "e",
        'È'..='Ë' | 'Ę' | 'Ě' => "E",
        'ì'..='ï' => "i",
        'Ì'..='Ï' => "I",
        'ñ' | 'ń' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ò'..='ö' | 'ø' | 'ő' => "o",
        'Ò'..='Ö' | 'Ø' | 'Ő' => "O",
        'œ' => "oe",
        'Œ' => "OE",
        'ù'..='ü' | 'ů' | 'ű' => "u",
        'Ù'..='Ü' | 'Ů' | 'Ű' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'ß' => "ss",
        'ś' | 'š' => "s",
        'Ś' | 'Š' => "S",
        'ź' | 'ż' | 'ž' => "z",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ł' => "l",
        'Ł' => "L",
        'đ' | 'ď' => "d",
        'Đ' | 'Ď' => "D",
        'ř' => "r",
        'Ř' => "R",
        'ť' => "t",
        'Ť' => "T",
        c if c.is_whitespace() => " ",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Who was Django Reinhardt?"), "who-was-django-reinhardt");
        assert_eq!(slugify("  Rust -- & Tokio  "), "rust-tokio");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Café crème 2024"), "cafe-creme-2024");
        assert_eq!(slugify("Straße nach Łódź"), "strasse-nach-lodz");
        assert_eq!(slugify("日本 Rust"), "rust");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_keeps_underscores_and_drops_punctuation() {
        assert_eq!(slugify("snake_case titles"), "snake_case-titles");
        assert_eq!(slugify("_private_"), "private");
        assert_eq!(slugify("v1.2 release"), "v12-release");
    }
}
