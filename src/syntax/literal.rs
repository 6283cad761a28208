// Sat Jan 17 2026 - Alex

use crate::model::{ConstantValue, PrimitiveType, TypeRef};
use once_cell::sync::Lazy;
use regex::Regex;

static INTEGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-])?(0[xX][0-9a-fA-F']+|0[bB][01']+|0[0-7']*|[1-9][0-9']*)([uU]?[lL]{0,2}|[lL]{1,2}[uU])$")
        .expect("integer literal pattern")
});

static FLOATING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?([fFlL])?$").expect("floating literal pattern")
});

/// A literal token with the type its spelling implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLiteral {
    pub value: ConstantValue,
    pub ty: TypeRef,
}

/// Parses a single C++ literal token. Returns `None` for anything that would
/// need evaluation (expressions, identifiers, user-defined literals).
pub fn parse_literal(token: &str) -> Option<ParsedLiteral> {
    let token = token.trim();
    match token {
        "true" => return Some(literal(ConstantValue::Bool(true), PrimitiveType::Bool)),
        "false" => return Some(literal(ConstantValue::Bool(false), PrimitiveType::Bool)),
        _ => {}
    }

    if let Some(parsed) = parse_integer(token) {
        return Some(parsed);
    }
    if FLOATING.is_match(token) && (token.contains('.') || token.contains(&['e', 'E'][..])) {
        let ty = match token.chars().last() {
            Some('f') | Some('F') => PrimitiveType::Float,
            Some('l') | Some('L') => PrimitiveType::LongDouble,
            _ => PrimitiveType::Double,
        };
        let text = token.trim_end_matches(&['f', 'F', 'l', 'L'][..]).to_string();
        return Some(literal(ConstantValue::Float(text), ty));
    }

    let unprefixed = token.trim_start_matches(&['L', 'u', 'U'][..]).trim_start_matches('8');
    if unprefixed.len() >= 3 && unprefixed.starts_with('\'') && unprefixed.ends_with('\'') {
        let chars = unescape(&unprefixed[1..unprefixed.len() - 1])?;
        if chars.len() != 1 {
            return None;
        }
        return Some(literal(ConstantValue::Char(chars[0]), PrimitiveType::Char));
    }
    if unprefixed.len() >= 2 && unprefixed.starts_with('"') && unprefixed.ends_with('"') {
        let chars = unescape(&unprefixed[1..unprefixed.len() - 1])?;
        return Some(ParsedLiteral {
            value: ConstantValue::Str(chars.into_iter().collect()),
            ty: TypeRef::primitive(PrimitiveType::Char).with_const().with_pointer(1),
        });
    }
    None
}

/// Parses a brace-list initializer element by element.
pub fn parse_literal_list(tokens: &[String]) -> Option<(Vec<ConstantValue>, TypeRef)> {
    let mut values = Vec::with_capacity(tokens.len());
    let mut element = None;
    for token in tokens {
        let parsed = parse_literal(token)?;
        element.get_or_insert(parsed.ty);
        values.push(parsed.value);
    }
    let ty = element.unwrap_or_else(|| TypeRef::primitive(PrimitiveType::Int));
    Some((values, ty))
}

/// Integer value of a token, for enumerator initializers.
pub fn parse_integer_value(token: &str) -> Option<i128> {
    match parse_integer(token.trim())?.value {
        ConstantValue::Integer(v) => Some(v),
        _ => None,
    }
}

fn parse_integer(token: &str) -> Option<ParsedLiteral> {
    let caps = INTEGER.captures(token)?;
    let negative = caps.get(1).map(|m| m.as_str() == "-").unwrap_or(false);
    let digits = caps.get(2)?.as_str().replace('\'', "");
    let suffix = caps.get(3).map(|m| m.as_str().to_ascii_lowercase()).unwrap_or_default();

    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
        i128::from_str_radix(bin, 2).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i128::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i128>().ok()?
    };
    let value = if negative { -magnitude } else { magnitude };

    let unsigned = suffix.contains('u');
    let longs = suffix.matches('l').count();
    let ty = match (unsigned, longs) {
        (false, 0) if i32::try_from(value).is_ok() => PrimitiveType::Int,
        (false, 0) | (false, 1) => PrimitiveType::Long,
        (true, 0) => PrimitiveType::UnsignedInt,
        (true, 1) => PrimitiveType::UnsignedLong,
        (false, _) => PrimitiveType::LongLong,
        (true, _) => PrimitiveType::UnsignedLongLong,
    };
    Some(literal(ConstantValue::Integer(value), ty))
}

fn literal(value: ConstantValue, ty: PrimitiveType) -> ParsedLiteral {
    ParsedLiteral {
        value,
        ty: TypeRef::primitive(ty),
    }
}

fn unescape(body: &str) -> Option<Vec<char>> {
    let mut out = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'x' => {
                let mut hex = String::new();
                while let Some(d) = chars.peek().copied().filter(char::is_ascii_hexdigit) {
                    hex.push(d);
                    chars.next();
                }
                char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?
            }
            other => other,
        };
        out.push(escaped);
    }
    Some(out)
}
