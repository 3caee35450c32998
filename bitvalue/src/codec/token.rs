//! The `name[:length]=value` initialiser grammar and the `name[:length]`
//! field formats used by [`BitReader`](crate::BitReader).

use tracing::trace;

use crate::codec::catalogue::Encoding;
use crate::error::{CreationError, Result};

/// One parsed initialiser token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub encoding: Encoding,
    pub length: Option<usize>,
    pub literal: &'a str,
}

/// What a field format reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Encoding(Encoding),
    /// Raw bits, returned as a new value
    Bits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldFormat {
    pub kind: FieldKind,
    pub length: Option<usize>,
}

fn malformed(token: &str) -> CreationError {
    CreationError::MalformedToken(token.to_string())
}

fn prefixed(token: &str) -> Option<Encoding> {
    let head = token.get(..2)?.to_ascii_lowercase();
    match head.as_str() {
        "0x" => Some(Encoding::Hex),
        "0b" => Some(Encoding::Bin),
        "0o" => Some(Encoding::Oct),
        _ => None,
    }
}

/// Whether `rest` opens a new token: a bare prefixed literal, or a name
/// directly followed by `:` or `=`.
fn starts_token(rest: &str) -> bool {
    let rest = rest.trim_start();
    if prefixed(rest).is_some() {
        return true;
    }
    let name_end = rest.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(rest.len());
    name_end > 0 && matches!(rest[name_end..].chars().next(), Some(':' | '='))
}

/// Splits initialiser text on `,`, and on `+` where a new token follows.
///
/// A `+` inside a literal, such as the sign in `int:8=+5`, is kept.
#[must_use]
pub fn split_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (index, character) in text.char_indices() {
        let separates = match character {
            ',' => true,
            '+' => starts_token(&text[index + 1..]),
            _ => false,
        };
        if separates {
            tokens.push(text[start..index].trim());
            start = index + 1;
        }
    }
    tokens.push(text[start..].trim());
    tokens.retain(|token| !token.is_empty());
    tokens
}

fn parse_length(token: &str, length: &str) -> Result<usize> {
    length.trim().parse::<usize>().map_err(|_| malformed(token).into())
}

/// Splits `name[:length]` into its encoding name and optional length.
fn name_and_length<'a>(token: &str, head: &'a str) -> Result<(&'a str, Option<usize>)> {
    match head.split_once(':') {
        Some((name, length)) => Ok((name.trim(), Some(parse_length(token, length)?))),
        None => Ok((head.trim(), None)),
    }
}

/// Parses a single `name[:length]=value` token, or a bare `0x`/`0b`/`0o` literal.
///
/// # Errors
/// [`CreationError::MalformedToken`] for text that fits neither form, or
/// [`CreationError::UnknownEncoding`] for a name outside the catalogue.
pub fn parse_token(token: &str) -> Result<Token<'_>> {
    let token = token.trim();
    if let Some(encoding) = prefixed(token) {
        trace!(%encoding, token, "bare literal");
        return Ok(Token {
            encoding,
            length: None,
            literal: token,
        });
    }
    let (head, literal) = token.split_once('=').ok_or_else(|| malformed(token))?;
    let (name, length) = name_and_length(token, head)?;
    let encoding = Encoding::from_name(name)?;
    trace!(%encoding, ?length, literal, "initialiser token");
    Ok(Token {
        encoding,
        length,
        literal: literal.trim(),
    })
}

/// Parses a read format such as `uint:12`, `bits:5`, `ue` or `bool`.
///
/// # Errors
/// [`CreationError::MalformedToken`] or [`CreationError::UnknownEncoding`].
pub fn parse_format(format: &str) -> Result<FieldFormat> {
    let format = format.trim();
    if format.contains('=') {
        return Err(malformed(format).into());
    }
    let (name, length) = name_and_length(format, format)?;
    let kind = if name == "bits" {
        FieldKind::Bits
    } else {
        FieldKind::Encoding(Encoding::from_name(name)?)
    };
    Ok(FieldFormat { kind, length })
}

/// Parses a comma separated list of read formats.
///
/// # Errors
/// As [`parse_format`], for the first bad entry.
pub fn parse_formats(formats: &str) -> Result<Vec<FieldFormat>> {
    split_tokens(formats).into_iter().map(parse_format).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn splits_on_commas_and_token_plus() {
        assert_eq!(split_tokens("uint:8=255, hex=ab"), vec!["uint:8=255", "hex=ab"]);
        assert_eq!(split_tokens("0x12+0b101"), vec!["0x12", "0b101"]);
        assert_eq!(split_tokens("int:8=+5 + se=-3"), vec!["int:8=+5", "se=-3"]);
        assert_eq!(split_tokens(" , "), Vec::<&str>::new());
    }

    #[test]
    fn named_tokens() {
        let token = parse_token(" uint:12 = 7 ").unwrap();
        assert_eq!(token.encoding, Encoding::Uint);
        assert_eq!(token.length, Some(12));
        assert_eq!(token.literal, "7");

        let token = parse_token("hex=0xff").unwrap();
        assert_eq!((token.encoding, token.length, token.literal), (Encoding::Hex, None, "0xff"));
    }

    #[test]
    fn bare_literals() {
        assert_eq!(parse_token("0XAB").unwrap().encoding, Encoding::Hex);
        assert_eq!(parse_token("0b10").unwrap().encoding, Encoding::Bin);
        assert_eq!(parse_token("0o17").unwrap().encoding, Encoding::Oct);
    }

    #[test]
    fn malformed_tokens() {
        assert!(matches!(
            parse_token("uint:8"),
            Err(Error::Creation(CreationError::MalformedToken(_)))
        ));
        assert!(matches!(
            parse_token("uint:-3=1"),
            Err(Error::Creation(CreationError::MalformedToken(_)))
        ));
        assert!(matches!(
            parse_token("word:8=1"),
            Err(Error::Creation(CreationError::UnknownEncoding(_)))
        ));
    }

    #[test]
    fn formats() {
        assert_eq!(
            parse_format("bits:5").unwrap(),
            FieldFormat {
                kind: FieldKind::Bits,
                length: Some(5)
            }
        );
        assert_eq!(parse_format("ue").unwrap().kind, FieldKind::Encoding(Encoding::Ue));
        assert_eq!(parse_formats("uint:8, bool, se").unwrap().len(), 3);
        assert!(parse_format("uint:8=3").is_err());
    }
}
