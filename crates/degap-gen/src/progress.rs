//! Terminal progress for a degap run: one bar over every element of every
//! gap, and a spinner line with the running token total.

use crate::report::TokenUsage;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

pub(crate) struct RunProgress {
    multi: MultiProgress,
    elements: ProgressBar,
    tokens: ProgressBar,
}

impl RunProgress {
    /// Progress over `total` elements. When `visible` is false nothing is drawn.
    pub(crate) fn new(total: usize, visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let multi = MultiProgress::with_draw_target(target);

        let elements = multi.add(ProgressBar::new(total as u64));
        elements.set_style(
            ProgressStyle::with_template("  {prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        elements.set_prefix("Degap");

        let tokens = multi.add(ProgressBar::new_spinner());
        tokens.set_style(
            ProgressStyle::with_template("  {spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        Self {
            multi,
            elements,
            tokens,
        }
    }

    /// Print the gap header above the bars.
    pub(crate) fn begin_gap(&self, gap_id: &str, elements: &[String]) {
        self.multi.suspend(|| {
            eprintln!(
                "  Gap at {}: {} new elements [{}]",
                gap_id,
                elements.len(),
                elements.join(", ")
            );
        });
    }

    pub(crate) fn begin_element(&self, gap_id: &str, ordinal: usize, element: &str) {
        self.elements
            .set_message(format!("{} #{}: {}", gap_id, ordinal, element));
    }

    /// One element finished, accepted or not; `usage` is the run total so far.
    pub(crate) fn element_done(&self, usage: TokenUsage) {
        self.tokens.set_message(format!(
            "~{} input / ~{} output tokens",
            usage.input_tokens, usage.output_tokens
        ));
        self.tokens.tick();
        self.elements.inc(1);
    }

    pub(crate) fn finish(&self) {
        self.elements.finish_and_clear();
        self.tokens.finish_and_clear();
    }
}
