//! 食材名の正規化
//!
//! 表記の異なる食材名（"boneless chicken breasts", "Chicken Breast" など）を
//! 1つの表示名にまとめる。

use crate::catalog::NAME_RULES;
use regex::Regex;

lazy_static::lazy_static! {
    static ref RULES: Vec<(Regex, &'static str)> = NAME_RULES
        .iter()
        .filter_map(|(pattern, display)| Regex::new(pattern).ok().map(|re| (re, *display)))
        .collect();
    static ref PARENTHETICAL: Regex = Regex::new(r"\([^)]*\)").unwrap();
}

/// 食材名を表示名に正規化
///
/// ルール表に該当しない場合は各単語の先頭を大文字にする。
/// 正規化済みの名前を再度渡しても結果は変わらない。
pub fn canonicalize(raw: &str) -> String {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return cleaned;
    }

    if let Some((_, display)) = RULES.iter().find(|(re, _)| re.is_match(&cleaned)) {
        return display.to_string();
    }

    title_case(&cleaned)
}

/// 括弧書きの除去・空白の統一・末尾の句読点除去
fn clean(raw: &str) -> String {
    let without_notes = PARENTHETICAL.replace_all(raw, " ");
    without_notes
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(|c: char| c.is_whitespace() || ",;.:".contains(c))
        .to_string()
}

/// 各単語の先頭を大文字にする（残りはそのまま）
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
