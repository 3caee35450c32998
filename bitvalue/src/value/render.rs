use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::codec::text::{read_bin, read_hex};
use crate::codec::token::{parse_token, split_tokens};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::value::BitValue;

impl BitValue {
    fn hex_digits(&self, length: usize) -> String {
        read_hex(self, 0, length - length % 4).unwrap_or_default()
    }

    fn render(&self, max_chars: Option<usize>) -> String {
        let length = self.len();
        if length == 0 {
            return String::new();
        }
        if let Some(max_chars) = max_chars {
            if length > 4 * max_chars {
                return format!("0x{}...", self.hex_digits(4 * max_chars));
            }
        }
        let tail = length % 4;
        if tail == 0 {
            return format!("0x{}", self.hex_digits(length));
        }
        if length < 32 {
            return format!("0b{}", self.bin());
        }
        format!(
            "0x{}, 0b{}",
            self.hex_digits(length),
            read_bin(self, length - tail, tail)
        )
    }

    /// Text form truncated after `config.max_chars` hex digits.
    #[must_use]
    pub fn to_string_with(&self, config: &Config) -> String {
        self.render(Some(config.max_chars))
    }

    /// Full-precision text form, parseable back with [`FromStr`].
    #[must_use]
    pub fn to_token_string(&self) -> String {
        self.render(None)
    }
}

impl fmt::Display for BitValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.to_string_with(&Config::default()))
    }
}

impl fmt::Debug for BitValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_string();
        write!(formatter, "BitValue(\"{text}\")")?;
        if text.ends_with("...") {
            write!(formatter, " # length={}", self.len())?;
        }
        Ok(())
    }
}

impl FromStr for BitValue {
    type Err = Error;

    /// Builds a value from `name[:length]=value` tokens and bare `0x`, `0b`
    /// and `0o` literals, appended in order.
    fn from_str(text: &str) -> Result<Self> {
        let tokens = split_tokens(text);
        if tokens.len() > 1 {
            debug!(count = tokens.len(), "building value from several tokens");
        }
        let mut value = BitValue::empty();
        for token in tokens {
            let token = parse_token(token)?;
            let literal = token.encoding.parse_literal(token.literal)?;
            value.append(&token.encoding.create(&literal, token.length)?);
        }
        Ok(value)
    }
}
