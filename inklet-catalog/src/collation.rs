// Locale-style ordering for facet labels: accents and case are ignored first,
// then lower case sorts before upper case, then raw code points break ties.
// At the first level whitespace sorts before punctuation, then symbols,
// digits and letters, as root collation does. Within a class, code point
// order stands in for the full collation tables.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

// ASCII punctuation that root collation files under symbols.
const ASCII_SYMBOLS: &str = "$+<=>^`|~";

fn char_class(c: char) -> u8 {
	if c.is_whitespace() {
		0
	} else if c.is_ascii_punctuation() && !ASCII_SYMBOLS.contains(c) {
		1
	} else if c.is_numeric() {
		3
	} else if c.is_alphabetic() {
		4
	} else {
		2
	}
}

fn base_letters(s: &str) -> Vec<(u8, char)> {
	s.nfd()
		.filter(|c| !is_combining_mark(*c))
		.flat_map(char::to_lowercase)
		.map(|c| (char_class(c), c))
		.collect()
}

fn case_marks(s: &str) -> Vec<bool> {
	s.nfd()
		.filter(|c| !is_combining_mark(*c))
		.map(char::is_uppercase)
		.collect()
}

pub fn locale_cmp(a: &str, b: &str) -> Ordering {
	base_letters(a)
		.cmp(&base_letters(b))
		.then_with(|| case_marks(a).cmp(&case_marks(b)))
		.then_with(|| a.cmp(b))
}
