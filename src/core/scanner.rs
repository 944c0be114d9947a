//! Preamble scanner
//!
//! Classifies one decoded line at a time while tracking whether the scan
//! position is inside a `<!-- ... -->` comment. Comment material at the front
//! of a line is stripped before the line is looked at, so neither a `DOCTYPE`
//! nor a tag inside a comment is ever seen.

use memchr::{memchr, memmem};

/// Token that declares a DTD
pub const DOCTYPE: &str = "DOCTYPE";
/// Opens an XML comment
pub const START_COMMENT: &str = "<!--";
/// Closes an XML comment
pub const END_COMMENT: &str = "-->";

/// What a single line says about the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    /// Nothing decisive; read the next line
    Continue,
    /// A `DOCTYPE` declaration outside any comment
    Doctype,
    /// The first opening tag; the preamble is over
    OpeningTag,
}

impl LineVerdict {
    #[inline]
    pub fn is_final(self) -> bool {
        self != LineVerdict::Continue
    }
}

/// Lexical state carried from one line to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    in_comment: bool,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the scan position is inside a comment
    #[inline]
    pub fn in_comment(&self) -> bool {
        self.in_comment
    }

    /// Classify one line (without its terminator) and advance the comment state.
    pub fn classify(&mut self, line: &str) -> LineVerdict {
        let content = match self.consume_comment_tokens(line) {
            Some(content) => content,
            None => return LineVerdict::Continue,
        };
        if self.in_comment || !has_text(content) {
            return LineVerdict::Continue;
        }
        if has_doctype(content) {
            LineVerdict::Doctype
        } else if has_opening_tag(content) {
            LineVerdict::OpeningTag
        } else {
            LineVerdict::Continue
        }
    }

    /// Strip leading comment material from `line`.
    ///
    /// Returns `None` when the line is used up by comment tokens before any
    /// content outside a comment turns up.
    fn consume_comment_tokens<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        if !contains(line, START_COMMENT) && !contains(line, END_COMMENT) {
            return Some(line);
        }
        let mut rest = line;
        while let Some(next) = self.consume(rest) {
            if !self.in_comment && !next.trim().starts_with(START_COMMENT) {
                return Some(next);
            }
            rest = next;
        }
        None
    }

    /// Skip past the next token that flips the comment state.
    fn consume<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        let (token, in_comment_after) = if self.in_comment {
            (END_COMMENT, false)
        } else {
            (START_COMMENT, true)
        };
        let index = memmem::find(line.as_bytes(), token.as_bytes())?;
        self.in_comment = in_comment_after;
        // Tokens are ASCII, so this stays on a char boundary
        Some(&line[index + token.len()..])
    }
}

#[inline]
fn contains(haystack: &str, needle: &str) -> bool {
    memmem::find(haystack.as_bytes(), needle.as_bytes()).is_some()
}

#[inline]
fn has_text(content: &str) -> bool {
    content.chars().any(|c| !c.is_whitespace())
}

#[inline]
fn has_doctype(content: &str) -> bool {
    contains(content, DOCTYPE)
}

/// Only the first `<` counts, and it must be followed by a letter.
fn has_opening_tag(content: &str) -> bool {
    match memchr(b'<', content.as_bytes()) {
        Some(index) => content[index + 1..].chars().next().is_some_and(is_letter),
        None => false,
    }
}

/// Alphabetic minus letter numbers (Nl), such as roman numerals
#[inline]
fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_all(lines: &[&str]) -> (Vec<LineVerdict>, ScanState) {
        let mut state = ScanState::new();
        let verdicts = lines.iter().map(|line| state.classify(line)).collect();
        (verdicts, state)
    }

    #[test]
    fn test_plain_lines_pass_through() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("<?xml version=\"1.0\"?>"), LineVerdict::Continue);
        assert_eq!(state.classify("<!DOCTYPE beans>"), LineVerdict::Doctype);
        assert_eq!(state.classify("<beans>"), LineVerdict::OpeningTag);
        assert!(!state.in_comment());
    }

    #[test]
    fn test_doctype_wins_over_tag_on_same_line() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("<!DOCTYPE r><r/>"), LineVerdict::Doctype);
    }

    #[test]
    fn test_doctype_inside_comment_is_stripped() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("<!-- <!DOCTYPE fake> -->"), LineVerdict::Continue);
        assert!(!state.in_comment());
    }

    #[test]
    fn test_multiline_comment() {
        let (verdicts, state) = classify_all(&[
            "<!-- start",
            "still a comment DOCTYPE",
            "<inner>",
            "end -->",
            "<root/>",
        ]);
        assert_eq!(
            verdicts,
            vec![
                LineVerdict::Continue,
                LineVerdict::Continue,
                LineVerdict::Continue,
                LineVerdict::Continue,
                LineVerdict::OpeningTag,
            ]
        );
        assert!(!state.in_comment());
    }

    #[test]
    fn test_several_comments_on_one_line() {
        let mut state = ScanState::new();
        assert_eq!(
            state.classify("<!-- a --> <!-- DOCTYPE --><!--b--> <root>"),
            LineVerdict::OpeningTag
        );
        assert!(!state.in_comment());
    }

    #[test]
    fn test_content_after_comment_close() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("<!-- one"), LineVerdict::Continue);
        assert!(state.in_comment());
        assert_eq!(state.classify("two --> <!DOCTYPE x>"), LineVerdict::Doctype);
        assert!(!state.in_comment());
    }

    #[test]
    fn test_comment_reopened_on_same_line() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("<!-- a --> <!-- b"), LineVerdict::Continue);
        assert!(state.in_comment());
    }

    #[test]
    fn test_text_before_first_comment_is_dropped() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("<!DOCTYPE x> <!-- note -->"), LineVerdict::Continue);
        assert!(!state.in_comment());
    }

    #[test]
    fn test_stray_comment_close_blanks_line() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("--> <root>"), LineVerdict::Continue);
        assert!(!state.in_comment());
    }

    #[test]
    fn test_opening_tag_requires_letter() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("<?xml version=\"1.0\"?>"), LineVerdict::Continue);
        assert_eq!(state.classify("< root>"), LineVerdict::Continue);
        assert_eq!(state.classify("<1root>"), LineVerdict::Continue);
        assert_eq!(state.classify("text <"), LineVerdict::Continue);
        assert_eq!(state.classify("<élément/>"), LineVerdict::OpeningTag);
    }

    #[test]
    fn test_letter_numbers_do_not_open_a_tag() {
        let mut state = ScanState::new();
        // U+2160 ROMAN NUMERAL ONE is alphabetic but not a letter
        assert_eq!(state.classify("<\u{2160}>"), LineVerdict::Continue);
        assert_eq!(state.classify("<\u{3007}/>"), LineVerdict::Continue);
        assert_eq!(state.classify("<\u{4E00}/>"), LineVerdict::OpeningTag);
    }

    #[test]
    fn test_only_first_angle_bracket_is_checked() {
        let mut state = ScanState::new();
        assert_eq!(state.classify("<?xml version=\"1.0\"?><root>"), LineVerdict::Continue);
    }

    #[test]
    fn test_blank_lines_leave_state_alone() {
        let mut state = ScanState::new();
        assert_eq!(state.classify(""), LineVerdict::Continue);
        assert_eq!(state.classify(" \t "), LineVerdict::Continue);
        assert!(!state.in_comment());
        state.classify("<!--");
        assert_eq!(state.classify("   "), LineVerdict::Continue);
        assert!(state.in_comment());
    }

    #[test]
    fn test_verdict_is_final() {
        assert!(!LineVerdict::Continue.is_final());
        assert!(LineVerdict::Doctype.is_final());
        assert!(LineVerdict::OpeningTag.is_final());
    }
}
