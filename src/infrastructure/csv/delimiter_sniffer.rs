// ============================================================
// DELIMITER SNIFFER
// ============================================================
// Pick the field separator from the first lines of decoded text

use tracing::debug;

use super::encoding_detector::{decode_strict, resolve_encoding};
use crate::domain::error::Result;
use crate::domain::source::Delimiter;

/// Counts candidate separators in a short prefix of the text
pub struct DelimiterSniffer {
    /// Maximum number of newline-delimited lines sampled
    sample_lines: usize,
}

impl Default for DelimiterSniffer {
    fn default() -> Self {
        Self { sample_lines: 5 }
    }
}

impl DelimiterSniffer {
    pub fn new(sample_lines: usize) -> Self {
        Self {
            sample_lines: sample_lines.max(1),
        }
    }

    /// Decode `bytes` under `encoding` (no replacement characters) and sniff.
    ///
    /// `Ok(None)` means no candidate occurs in the sample at all.
    pub fn sniff(&self, bytes: &[u8], encoding: &str) -> Result<Option<Delimiter>> {
        let encoding = resolve_encoding(encoding)?;
        let text = decode_strict(bytes, encoding)?;
        Ok(self.sniff_text(&text))
    }

    /// Most frequent candidate over the sample; ties go to the earliest
    /// entry of [`Delimiter::ALL`].
    pub fn sniff_text(&self, text: &str) -> Option<Delimiter> {
        // The sample lines are joined without separators
        let sample: String = text
            .splitn(self.sample_lines + 1, '\n')
            .take(self.sample_lines)
            .collect();

        let mut best: Option<(Delimiter, usize)> = None;
        for delimiter in Delimiter::ALL {
            let count = sample.matches(delimiter.as_char()).count();
            debug!(delimiter = %delimiter, count, "delimiter candidate");
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((delimiter, count));
            }
        }

        best.map(|(delimiter, _)| delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;

    #[test]
    fn test_detect_common_delimiters() {
        let sniffer = DelimiterSniffer::default();
        assert_eq!(sniffer.sniff_text("a,b,c\nd,e,f"), Some(Delimiter::Comma));
        assert_eq!(sniffer.sniff_text("a;b;c\nd;e;f"), Some(Delimiter::Semicolon));
        assert_eq!(sniffer.sniff_text("a\tb\nc\td"), Some(Delimiter::Tab));
        assert_eq!(sniffer.sniff_text("a|b|c"), Some(Delimiter::Pipe));
    }

    #[test]
    fn test_tie_goes_to_candidate_order() {
        let sniffer = DelimiterSniffer::default();
        assert_eq!(sniffer.sniff_text("a;b,c"), Some(Delimiter::Comma));
        assert_eq!(sniffer.sniff_text("a|b\tc"), Some(Delimiter::Tab));
        assert_eq!(sniffer.sniff_text("a|b;c"), Some(Delimiter::Semicolon));
    }

    #[test]
    fn test_no_candidate_yields_none() {
        let sniffer = DelimiterSniffer::default();
        assert_eq!(sniffer.sniff_text("just one column\nof text\n"), None);
        assert_eq!(sniffer.sniff_text(""), None);
    }

    #[test]
    fn test_only_first_lines_are_sampled() {
        let sniffer = DelimiterSniffer::default();
        // Five comma lines, then many semicolons that must be ignored
        let text = "a,b\nc,d\ne,f\ng,h\ni,j\n;;;;;;;;;;;;;;;;\n;;;;;;;;;;;;;;";
        assert_eq!(sniffer.sniff_text(text), Some(Delimiter::Comma));

        let narrow = DelimiterSniffer::new(1);
        assert_eq!(narrow.sniff_text("a;b\nc,d,e,f"), Some(Delimiter::Semicolon));
    }

    #[test]
    fn test_sniff_is_deterministic() {
        let sniffer = DelimiterSniffer::default();
        let bytes = b"x|y;z,w\n1|2;3,4\n";
        let first = sniffer.sniff(bytes, "utf-8").unwrap();
        for _ in 0..10 {
            assert_eq!(sniffer.sniff(bytes, "utf-8").unwrap(), first);
        }
        assert_eq!(first, Some(Delimiter::Comma));
    }

    #[test]
    fn test_invalid_bytes_propagate_decode_error() {
        let sniffer = DelimiterSniffer::default();
        let err = sniffer.sniff(b"a,b\n\xff\xfe", "utf-8").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }
}
