pub mod reg;

use crate::errors::WardenError;

pub trait Matcher {
    /// Reports whether any pattern in `haystack` matches `needle`. Segments
    /// enclosed in the delimiters are regular expressions; everything else
    /// is matched literally.
    fn matches(
        &self,
        delimiter_start: char,
        delimiter_end: char,
        haystack: &[String],
        needle: &str,
    ) -> Result<bool, WardenError>;
}
