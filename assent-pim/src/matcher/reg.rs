use std::{
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
};

use lru::LruCache;
use regex::Regex;

use super::Matcher;
use crate::errors::WardenError;

/// Pattern matcher compiling `<...>` templates to anchored regexes, with the
/// most recently used expressions kept in an LRU cache.
pub struct Regexp {
    lru: Mutex<LruCache<String, Regex>>,
}

impl Regexp {
    pub fn new(cache_size: usize) -> Result<Self, WardenError> {
        let capacity =
            NonZeroUsize::new(cache_size).ok_or(WardenError::CacheSize)?;
        Ok(Self {
            lru: Mutex::new(LruCache::new(capacity)),
        })
    }

    fn compiled(
        &self,
        pattern: &str,
        delimiter_start: char,
        delimiter_end: char,
    ) -> Result<Regex, WardenError> {
        if let Some(reg) = self
            .lru
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
        {
            return Ok(reg.clone());
        }

        let source = build_regex(pattern, delimiter_start, delimiter_end)?;
        let reg = Regex::new(&source).map_err(|source| WardenError::Pattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        self.lru
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(pattern.to_owned(), reg.clone());
        Ok(reg)
    }
}

impl std::fmt::Debug for Regexp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Regexp").finish_non_exhaustive()
    }
}

impl Matcher for Regexp {
    fn matches(
        &self,
        delimiter_start: char,
        delimiter_end: char,
        haystack: &[String],
        needle: &str,
    ) -> Result<bool, WardenError> {
        for h in haystack {
            if !h.contains(delimiter_start) {
                if h == needle {
                    return Ok(true);
                }
                continue;
            }
            if self
                .compiled(h, delimiter_start, delimiter_end)?
                .is_match(needle)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Byte ranges of the top-level delimited segments of `s`, delimiters
/// included.
fn delimiter_spans(
    s: &str,
    delimiter_start: char,
    delimiter_end: char,
) -> Result<Vec<(usize, usize)>, WardenError> {
    let (mut level, mut start) = (0usize, 0usize);
    let mut spans = Vec::new();
    for (i, value) in s.char_indices() {
        if value == delimiter_start {
            level += 1;
            if level == 1 {
                start = i;
            }
        } else if value == delimiter_end {
            level = level
                .checked_sub(1)
                .ok_or_else(|| WardenError::Unbalanced(s.to_owned()))?;
            if level == 0 {
                spans.push((start, i + value.len_utf8()));
            }
        }
    }
    if level != 0 {
        return Err(WardenError::Unbalanced(s.to_owned()));
    }
    Ok(spans)
}

fn build_regex(
    tpl: &str,
    delimiter_start: char,
    delimiter_end: char,
) -> Result<String, WardenError> {
    let mut buffer = String::from("^");
    let mut end = 0;
    for (start, stop) in delimiter_spans(tpl, delimiter_start, delimiter_end)? {
        let inner = &tpl[start + delimiter_start.len_utf8()
            ..stop - delimiter_end.len_utf8()];
        buffer.push_str(&regex::escape(&tpl[end..start]));
        buffer.push('(');
        buffer.push_str(inner);
        buffer.push(')');
        end = stop;
    }
    buffer.push_str(&regex::escape(&tpl[end..]));
    buffer.push('$');
    Ok(buffer)
}
