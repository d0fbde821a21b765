//! Localization module for MapSearch-RS
//!
//! Provides the collator used for ranking by name and for name matching.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Supported languages
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("de", "Deutsch"),
    ("fr", "Français"),
    ("es", "Español"),
    ("it", "Italiano"),
    ("pt", "Português"),
    ("nl", "Nederlands"),
    ("pl", "Polski"),
    ("ru", "Русский"),
    ("tr", "Türkçe"),
    ("uk", "Українська"),
];

/// Whether a language code (or its base, for `xx-YY`) is supported
pub fn is_supported(code: &str) -> bool {
    let base = base_language(code);
    SUPPORTED_LANGUAGES.iter().any(|(c, _)| *c == base)
}

fn base_language(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Primary-strength collator.
///
/// Case and diacritics are ignored, so `Café` and `cafe` compare equal. Turkish
/// gets its dotted/dotless `i` case mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collator {
    lang: String,
    turkic: bool,
}

impl Default for Collator {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Collator {
    pub fn new(lang: &str) -> Self {
        let base = base_language(lang).to_lowercase();
        let turkic = base == "tr" || base == "az";
        Self { lang: base, turkic }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Fold a string to its primary collation key
    pub fn fold(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                'I' if self.turkic => out.push('ı'),
                'İ' if self.turkic => out.push('i'),
                'ß' | 'ẞ' => out.push_str("ss"),
                'Æ' | 'æ' => out.push_str("ae"),
                'Œ' | 'œ' => out.push_str("oe"),
                'Ø' | 'ø' => out.push('o'),
                'Đ' | 'đ' => out.push('d'),
                'Ł' | 'ł' => out.push('l'),
                _ => {
                    for d in c.to_lowercase().nfd() {
                        if !is_combining_mark(d) {
                            out.push(d);
                        }
                    }
                }
            }
        }
        out
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.fold(a).cmp(&self.fold(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported() {
        assert!(is_supported("de"));
        assert!(is_supported("pt-BR"));
        assert!(!is_supported("xx"));
    }

    #[test]
    fn test_primary_strength() {
        let collator = Collator::new("en");
        assert_eq!(collator.compare("Café", "cafe"), Ordering::Equal);
        assert_eq!(collator.compare("Straße", "strasse"), Ordering::Equal);
        assert_eq!(collator.compare("apple", "Banana"), Ordering::Less);
        assert_eq!(collator.compare("Zürich", "zurich"), Ordering::Equal);
    }

    #[test]
    fn test_turkish_i() {
        let tr = Collator::new("tr-TR");
        let en = Collator::new("en");
        assert_eq!(tr.fold("ISTANBUL"), "ıstanbul");
        assert_eq!(tr.fold("İstanbul"), "istanbul");
        assert_eq!(en.fold("ISTANBUL"), "istanbul");
        assert_ne!(tr.compare("ISPARTA", "isparta"), Ordering::Equal);
        assert_eq!(en.compare("ISPARTA", "isparta"), Ordering::Equal);
    }
}
