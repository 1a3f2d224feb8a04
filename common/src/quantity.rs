//! 分量テキストのパーサー
//!
//! "1 1/2 cups rice" / ".25" / "200g" のような自由記述の分量を
//! `{amount, unit, rest}` に分解する。
//!
//! ## 処理フロー
//! 1. 先頭の "." を "0." に補完
//! 2. トークン分割（整数・小数・分数・単語）
//! 3. パターン照合（優先順: 帯分数 → 分数 → 小数/整数 → 該当なし）
//! 4. 直後の単語を単位として正規化、残りを `rest` に格納
//!
//! 入力は信頼できない自由記述なので、どんな文字列でもパニックせず結果を返す。

use crate::units::{normalize_unit, Unit};
use serde::{Deserialize, Serialize};

/// パース結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    /// 分量（解釈できない・正でない場合は 0）
    pub amount: f64,
    /// 正規化済みの単位
    pub unit: Option<Unit>,
    /// 分量・単位に割り当てられなかった残りのテキスト
    pub rest: String,
}

/// 先頭パターンの照合結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityMatch {
    /// 帯分数 `1 1/2`
    Mixed { whole: f64, fraction: f64 },
    /// 分数 `1/2`
    Fraction(f64),
    /// 小数・整数 `2`, `0.25`
    Decimal(f64),
    /// 構造化された分量なし
    Unmatched,
}

impl QuantityMatch {
    /// 分量の数値
    pub fn value(&self) -> f64 {
        match self {
            QuantityMatch::Mixed { whole, fraction } => whole + fraction,
            QuantityMatch::Fraction(v) | QuantityMatch::Decimal(v) => *v,
            QuantityMatch::Unmatched => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Integer(f64),
    Decimal(f64),
    /// 分母0など不正な分数は None
    Fraction(Option<f64>),
    Word(&'a str),
    Other,
}

#[derive(Debug, Clone)]
struct Spanned<'a> {
    token: Token<'a>,
    start: usize,
}

/// 分量テキストをパース
///
/// # Examples
/// ```
/// use meal_cart_common::quantity::parse_amount;
/// use meal_cart_common::Unit;
///
/// let q = parse_amount("1 1/2 cups rice");
/// assert_eq!(q.amount, 1.5);
/// assert_eq!(q.unit, Some(Unit::Cup));
/// assert_eq!(q.rest, "rice");
/// ```
pub fn parse_amount(raw: &str) -> ParsedQuantity {
    let trimmed = raw.trim();
    let input = if trimmed.starts_with('.') {
        format!("0{}", trimmed)
    } else {
        trimmed.to_string()
    };

    let tokens = tokenize(&input);
    let (matched, consumed) = match_quantity(&tokens);

    if matched == QuantityMatch::Unmatched {
        return ParsedQuantity {
            amount: 0.0,
            unit: None,
            rest: raw.to_string(),
        };
    }

    let mut next = consumed;
    let unit = match tokens.get(next) {
        Some(Spanned { token: Token::Word(word), .. }) => {
            next += 1;
            normalize_unit(Some(word))
        }
        _ => None,
    };

    let rest = tokens
        .get(next)
        .map(|t| input[t.start..].trim().to_string())
        .unwrap_or_default();

    let value = matched.value();
    let amount = if value.is_finite() && value > 0.0 { value } else { 0.0 };

    ParsedQuantity { amount, unit, rest }
}

/// 先頭トークン列をパターン照合（最初にマッチしたものを採用）
///
/// 戻り値の usize は消費したトークン数。
fn match_quantity(tokens: &[Spanned<'_>]) -> (QuantityMatch, usize) {
    let kinds: Vec<&Token<'_>> = tokens.iter().map(|t| &t.token).collect();

    match kinds.as_slice() {
        [Token::Integer(whole), Token::Fraction(Some(fraction)), ..] => (
            QuantityMatch::Mixed {
                whole: *whole,
                fraction: *fraction,
            },
            2,
        ),
        [Token::Fraction(Some(value)), ..] => (QuantityMatch::Fraction(*value), 1),
        [Token::Integer(value) | Token::Decimal(value), ..] => (QuantityMatch::Decimal(*value), 1),
        _ => (QuantityMatch::Unmatched, 0),
    }
}

/// 空白区切りのチャンクを数値部と単語部に分けてトークン化
fn tokenize(input: &str) -> Vec<Spanned<'_>> {
    let mut chunks = Vec::new();
    let mut start = None;
    for (i, c) in input.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                chunks.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        chunks.push((s, input.len()));
    }

    let mut tokens = Vec::new();
    for (s, e) in chunks {
        let text = &input[s..e];
        // "200g" のように数値と単位が連結されている場合は分割
        let num_len = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '/'))
            .unwrap_or(text.len());

        if num_len > 0 && text.starts_with(|c: char| c.is_ascii_digit()) {
            tokens.push(Spanned {
                token: classify_number(&text[..num_len]),
                start: s,
            });
            if num_len < text.len() {
                tokens.push(Spanned {
                    token: classify_word(&text[num_len..]),
                    start: s + num_len,
                });
            }
        } else {
            tokens.push(Spanned {
                token: classify_word(text),
                start: s,
            });
        }
    }
    tokens
}

fn classify_number(text: &str) -> Token<'_> {
    if let Some((num, den)) = text.split_once('/') {
        let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if !is_digits(num) || !is_digits(den) {
            return Token::Other;
        }
        return match (num.parse::<f64>(), den.parse::<f64>()) {
            (Ok(n), Ok(d)) if d != 0.0 => Token::Fraction(Some(n / d)),
            _ => Token::Fraction(None),
        };
    }

    match text.parse::<f64>() {
        Ok(value) if text.contains('.') => Token::Decimal(value),
        Ok(value) => Token::Integer(value),
        Err(_) => Token::Other,
    }
}

fn classify_word(text: &str) -> Token<'_> {
    let body = text.strip_suffix('.').unwrap_or(text);
    if !body.is_empty() && body.chars().all(|c| c.is_alphabetic()) {
        Token::Word(text)
    } else {
        Token::Other
    }
}
