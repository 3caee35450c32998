//! Byte-pattern and bit-pattern search.
//!
//! Both strategies scan overlapping windows: each window is the search
//! increment plus the pattern length, so a match straddling two windows is
//! still seen whole.

use std::borrow::Cow;

use regex::Regex;
use tracing::trace;

use crate::codec::text::read_bin;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::{ByteStore, offset_copy};
use crate::value::BitValue;

const BYTE_INCREMENT: usize = 1024;
const BIT_INCREMENT: usize = 4096;

fn check_range(start: usize, end: usize, length: usize) -> Result<()> {
    if end > length {
        return Err(Error::OutOfRange { position: end, length });
    }
    if start > end {
        return Err(Error::OutOfRange { position: start, length });
    }
    Ok(())
}

impl BitValue {
    /// First byte-aligned position in `[start, end)` where `needle` occurs.
    ///
    /// Byte positions are counted from the first bit, so the value is
    /// realigned to offset 0 before scanning.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when the range is not within the value.
    pub fn find_bytes(&self, needle: &[u8], start: usize, end: usize) -> Result<Option<usize>> {
        check_range(start, end, self.len())?;
        if needle.is_empty() {
            return Ok(None);
        }
        let haystack: Cow<'_, ByteStore> = if self.store.offset == 0 {
            Cow::Borrowed(&self.store)
        } else {
            Cow::Owned(offset_copy(&self.store, 0))
        };
        let increment = BYTE_INCREMENT.max(needle.len() * 10);
        let window = increment + needle.len();
        let last = end / 8;
        let mut position = start.div_ceil(8);
        while position < last {
            let bytes = haystack.byte_slice(position, (position + window).min(last));
            if let Some(found) = bytes.windows(needle.len()).position(|candidate| candidate == needle) {
                return Ok(Some((position + found) * 8));
            }
            trace!(position, increment, "byte search window advanced");
            position += increment;
        }
        Ok(None)
    }

    /// Scans the binary digit text of `[start, end)` in overlapping windows,
    /// returning the first position `matcher` reports. With `byte_aligned`,
    /// unaligned matches are skipped.
    fn scan_digits(
        &self,
        start: usize,
        end: usize,
        overlap: usize,
        byte_aligned: bool,
        matcher: impl Fn(&str) -> Option<usize>,
    ) -> Option<usize> {
        let increment = BIT_INCREMENT.max(overlap.saturating_mul(10));
        let window = increment.saturating_add(overlap);
        let mut position = start;
        while position < end {
            let digits = read_bin(self, position, window.min(end - position));
            if let Some(found) = matcher(&digits) {
                let at = position + found;
                if !byte_aligned || at % 8 == 0 {
                    return Some(at);
                }
                position = at + 1;
                continue;
            }
            trace!(position, increment, "bit search window advanced");
            position += increment;
        }
        None
    }

    /// First position in `[start, end)` where `pattern` matches the value's
    /// binary digit text.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when the range is not within the value.
    pub fn find_regex(&self, pattern: &Regex, start: usize, end: usize, byte_aligned: bool) -> Result<Option<usize>> {
        check_range(start, end, self.len())?;
        Ok(self.scan_digits(start, end, pattern.as_str().len(), byte_aligned, |digits| {
            pattern.find(digits).map(|found| found.start())
        }))
    }

    /// First position in `[start, end)` where `pattern` occurs.
    ///
    /// Whole-byte patterns searched with `byte_aligned` use the byte search,
    /// everything else a literal search of the binary digit text. An empty
    /// pattern is never found.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when the range is not within the value.
    pub fn find_in(&self, pattern: &BitValue, start: usize, end: usize, byte_aligned: bool) -> Result<Option<usize>> {
        check_range(start, end, self.len())?;
        if pattern.is_empty() {
            return Ok(None);
        }
        if byte_aligned && pattern.len() % 8 == 0 {
            return self.find_bytes(&pattern.to_bytes(), start, end);
        }
        let needle = pattern.bin();
        Ok(self.scan_digits(start, end, needle.len(), byte_aligned, |digits| digits.find(&needle)))
    }

    /// First occurrence of `pattern` anywhere in the value.
    #[must_use]
    pub fn find(&self, pattern: &BitValue) -> Option<usize> {
        self.find_with(pattern, &Config::default())
    }

    /// First occurrence of `pattern`, honouring `config.byte_aligned`.
    #[must_use]
    pub fn find_with(&self, pattern: &BitValue, config: &Config) -> Option<usize> {
        self.find_in(pattern, 0, self.len(), config.byte_aligned).ok().flatten()
    }

    /// Successive non-overlapping occurrences of `pattern`.
    pub fn find_all<'a>(&'a self, pattern: &'a BitValue, byte_aligned: bool) -> FindAll<'a> {
        FindAll {
            haystack: self,
            pattern,
            byte_aligned,
            position: 0,
        }
    }
}

/// Iterator returned by [`BitValue::find_all`].
pub struct FindAll<'a> {
    haystack: &'a BitValue,
    pattern: &'a BitValue,
    byte_aligned: bool,
    position: usize,
}

impl Iterator for FindAll<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let found = self
            .haystack
            .find_in(self.pattern, self.position, self.haystack.len(), self.byte_aligned)
            .ok()
            .flatten()?;
        self.position = found + self.pattern.len();
        Some(found)
    }
}
