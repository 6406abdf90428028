use std::io::{BufRead, Write};

use panelmerge::{IdentifierMismatch, MismatchReviewer, ReviewDecision};

/// Reviewer that prints each mismatching group and asks whether to continue.
///
/// An answer starting with `n` stops the check, as does end of input; any other
/// answer, including an empty line, continues.
pub struct PromptReviewer<R, W> {
    input: R,
    output: W,
    labels: (String, String, String),
}

impl<R: BufRead, W: Write> PromptReviewer<R, W> {
    pub fn new(input: R, output: W, labels: (String, String, String)) -> Self {
        Self {
            input,
            output,
            labels,
        }
    }

    fn ask(&mut self, mismatch: &IdentifierMismatch) -> std::io::Result<bool> {
        let (id, a, b) = &self.labels;
        writeln!(self.output, "\n{} {}:", id.to_uppercase(), mismatch.identifier)?;
        for r in &mismatch.rows {
            let date = r.date.map_or_else(|| "-".to_string(), |d| d.to_string());
            writeln!(self.output, "  {date}  {a}={}  {b}={}", r.field_a, r.field_b)?;
        }
        write!(self.output, "Continue checking? (y/n): ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        Ok(!line.trim().to_ascii_lowercase().starts_with('n'))
    }
}

impl<R: BufRead, W: Write> MismatchReviewer for PromptReviewer<R, W> {
    fn review(&mut self, mismatch: &IdentifierMismatch) -> ReviewDecision {
        match self.ask(mismatch) {
            Ok(true) => ReviewDecision::Continue,
            Ok(false) => ReviewDecision::Stop,
            Err(e) => {
                tracing::warn!(error = %e, "prompt failed; stopping mismatch review");
                ReviewDecision::Stop
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelmerge::MismatchRow;

    fn mismatch(id: &str) -> IdentifierMismatch {
        IdentifierMismatch {
            identifier: id.into(),
            rows: vec![MismatchRow {
                date: None,
                field_a: "XY1".into(),
                field_b: "XYZ".into(),
            }],
        }
    }

    fn labels() -> (String, String, String) {
        ("cusip".into(), "tic".into(), "ticker".into())
    }

    #[test]
    fn yes_continues_and_no_stops() {
        let mut out = Vec::new();
        let mut r = PromptReviewer::new("y\nn\n".as_bytes(), &mut out, labels());
        assert_eq!(r.review(&mismatch("A")), ReviewDecision::Continue);
        assert_eq!(r.review(&mismatch("B")), ReviewDecision::Stop);
        drop(r);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("CUSIP A:"));
        assert!(text.contains("tic=XY1  ticker=XYZ"));
        assert_eq!(text.matches("Continue checking? (y/n): ").count(), 2);
    }

    #[test]
    fn empty_answer_continues() {
        let mut r = PromptReviewer::new("\nmaybe\nNo\n".as_bytes(), Vec::new(), labels());
        assert_eq!(r.review(&mismatch("A")), ReviewDecision::Continue);
        assert_eq!(r.review(&mismatch("B")), ReviewDecision::Continue);
        assert_eq!(r.review(&mismatch("C")), ReviewDecision::Stop);
    }

    #[test]
    fn end_of_input_stops() {
        let mut r = PromptReviewer::new("".as_bytes(), Vec::new(), labels());
        assert_eq!(r.review(&mismatch("A")), ReviewDecision::Stop);
    }
}
