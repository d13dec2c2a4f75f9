//! Character-class folding for Japanese and Latin text.
//!
//! Folding runs Unicode NFKC first, which takes full-width ASCII and
//! half-width katakana to their standard forms and composes voicing marks.
//! On top of that it maps katakana to hiragana by code-point offset, expands
//! the kanji iteration mark and lower-cases Latin. It is what the synchronous
//! matcher compares on and the first stage of normalization.

use std::borrow::Cow;
use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfkc_quick};

/// Distance between a katakana code point and its hiragana counterpart.
const KATAKANA_OFFSET: u32 = 0x60;

const KANJI_ITERATION_MARK: char = '々';

/// True for CJK ideographs, including the iteration and shime marks.
#[inline]
pub fn is_kanji(c: char) -> bool {
    matches!(
        c,
        '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2FA1F}'
            | '々'
            | '〆'
    )
}

#[inline]
pub fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3041}'..='\u{309F}')
}

#[inline]
pub fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}')
}

/// Katakana letters with a hiragana counterpart at a fixed offset.
#[inline]
fn has_hiragana_form(c: char) -> bool {
    matches!(c, '\u{30A1}'..='\u{30F6}' | 'ヽ' | 'ヾ')
}

/// Katakana to hiragana; anything else unchanged.
#[inline]
pub fn to_hiragana(c: char) -> char {
    if has_hiragana_form(c) {
        char::from_u32(c as u32 - KATAKANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// True if the post-NFKC mapping leaves `c` unchanged regardless of context.
#[inline]
fn is_stable(c: char) -> bool {
    if c.is_ascii() {
        return !c.is_ascii_uppercase();
    }
    !(c.is_uppercase() || has_hiragana_form(c) || c == KANJI_ITERATION_MARK)
}

fn is_folded(text: &str) -> bool {
    is_nfkc_quick(text.chars()) == IsNormalized::Yes && text.chars().all(is_stable)
}

/// Fold a string, borrowing it when nothing changes.
pub fn fold(text: &str) -> Cow<'_, str> {
    if is_folded(text) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    fold_into(text, &mut out);
    Cow::Owned(out)
}

/// Append the folded form of `text` to `out`.
pub fn fold_into(text: &str, out: &mut String) {
    let mut last: Option<char> = None;

    for c in text.nfkc() {
        match c {
            KANJI_ITERATION_MARK => {
                let mapped = match last {
                    Some(prev) if is_kanji(prev) => prev,
                    _ => c,
                };
                out.push(mapped);
                last = Some(mapped);
            }
            c if has_hiragana_form(c) => {
                let mapped = to_hiragana(c);
                out.push(mapped);
                last = Some(mapped);
            }
            c if c.is_uppercase() => {
                for lower in c.to_lowercase() {
                    out.push(lower);
                    last = Some(lower);
                }
            }
            c => {
                out.push(c);
                last = Some(c);
            }
        }
    }
}

/// True if `text` is already in canonical form: folded and free of kanji.
pub fn is_canonical(text: &str) -> bool {
    is_folded(text) && !text.chars().any(is_kanji)
}
