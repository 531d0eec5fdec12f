//! Prompt construction and code extraction.

use degap_curriculum::GenerationSpec;
use regex::Regex;
use std::sync::OnceLock;

/// System prompt shared by every generation request.
pub const GENERATION_SYSTEM: &str = "\
You write short example programs for a beginners' programming course.
Each request names structural elements that the program must, may, or must not contain.

Element notes:
- Each element is a control keyword. 'if', 'elif' and 'else' are distinct: allowing 'if' does not allow 'elif' or 'else'.
- '/' denotes nesting. 'for/if' is an if statement inside a for loop; 'for/for/if' is an if statement inside two nested for loops.
- Allowing 'for' and 'if' does not allow 'for/if'. Use only the listed elements and the listed nestings.

Output rules:
- Produce exactly one simple, easy-to-understand program.
- Output code only: no explanation and no comments.";

/// Build the user prompt for one attempt. Deterministic in its inputs.
///
/// `feedback` holds the corrective notes of every earlier rejected attempt,
/// oldest first.
pub fn build_user_prompt(spec: &GenerationSpec, language: &str, feedback: &[String]) -> String {
    let mut prompt = format!("Write one {} program.\n\nRequirements:\n", language);
    prompt.push_str(&format!(
        "- Required elements: {}\n",
        join_or_none(spec.required.iter())
    ));
    prompt.push_str(&format!(
        "- Allowed elements: {}\n",
        join_or_none(spec.allowed.iter())
    ));
    prompt.push_str("- Allowed elements do not have to be used. Prefer the simplest program.\n");
    prompt.push_str(&format!(
        "- Forbidden elements: {}\n",
        join_or_none(spec.forbidden.iter())
    ));
    prompt.push_str("- Never use a forbidden element, nor any element not listed as required or allowed.\n");

    if !feedback.is_empty() {
        prompt.push_str("\nFeedback on earlier attempts:\n");
        for note in feedback {
            prompt.push_str(&format!("- {}\n", note));
        }
    }

    prompt
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined: Vec<&str> = items.map(String::as_str).collect();
    if joined.is_empty() {
        "None".to_string()
    } else {
        joined.join(", ")
    }
}

/// Strip `<think>...</think>` blocks that some models (qwen3, deepseek) emit.
/// An unclosed block truncates the text from `<think>` onward.
pub fn strip_think_blocks(text: &str) -> String {
    static THINK_RE: OnceLock<Regex> = OnceLock::new();
    static OPEN_RE: OnceLock<Regex> = OnceLock::new();
    let think_re = THINK_RE.get_or_init(|| Regex::new(r"(?is)<think>.*?</think>").unwrap());
    let open_re = OPEN_RE.get_or_init(|| Regex::new(r"(?i)<think>").unwrap());

    let mut result = think_re.replace_all(text, "").into_owned();
    if let Some(open) = open_re.find(&result) {
        let start = open.start();
        result.truncate(start);
    }
    result
}

/// Extract the code from a raw model response.
///
/// Think blocks are removed first; then the first fenced block wins, with any
/// language tag dropped; otherwise the whole trimmed text is used.
pub fn extract_code(response: &str) -> String {
    static FENCE_RE: OnceLock<Regex> = OnceLock::new();
    let fence_re = FENCE_RE
        .get_or_init(|| Regex::new(r"(?s)```(?:[\w+\-]*[ \t]*\r?\n)?(.*?)```").unwrap());

    let text = strip_think_blocks(response);
    if let Some(caps) = fence_re.captures(&text) {
        return caps[1].trim().to_string();
    }

    let trimmed = text.trim();
    // Unclosed fence (response cut off): drop the opening fence line.
    if let Some(rest) = trimmed.strip_prefix("```") {
        return rest
            .split_once('\n')
            .map_or("", |(_, body)| body)
            .trim()
            .to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use degap_core::vocab::Vocabulary;
    use std::collections::BTreeSet;

    #[test]
    fn test_prompt_lists_partition() {
        let learned: BTreeSet<String> = ["if".to_string()].into_iter().collect();
        let spec = GenerationSpec::single("for", &learned, &Vocabulary::default());
        let prompt = build_user_prompt(&spec, "python", &[]);
        assert!(prompt.contains("Write one python program."));
        assert!(prompt.contains("- Required elements: for\n"));
        assert!(prompt.contains("- Allowed elements: if\n"));
        assert!(prompt.contains("- Forbidden elements: elif, else, break, continue\n"));
        assert!(!prompt.contains("Feedback"));
    }

    #[test]
    fn test_prompt_with_nothing_allowed() {
        let spec = GenerationSpec::single("if", &BTreeSet::new(), &Vocabulary::default());
        let prompt = build_user_prompt(&spec, "python", &[]);
        assert!(prompt.contains("- Allowed elements: None\n"));
    }

    #[test]
    fn test_prompt_includes_all_feedback_in_order() {
        let spec = GenerationSpec::single("if", &BTreeSet::new(), &Vocabulary::default());
        let feedback = vec!["first note".to_string(), "second note".to_string()];
        let prompt = build_user_prompt(&spec, "python", &feedback);
        let first = prompt.find("first note").unwrap();
        let second = prompt.find("second note").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_extract_fenced_python() {
        let response = "Here you go:\n```python\nfor i in range(3):\n    print(i)\n```\nEnjoy!";
        assert_eq!(extract_code(response), "for i in range(3):\n    print(i)");
    }

    #[test]
    fn test_extract_first_fence_only() {
        let response = "```\nx = 1\n```\n\n```python\ny = 2\n```";
        assert_eq!(extract_code(response), "x = 1");
    }

    #[test]
    fn test_extract_strips_think_before_fence() {
        let response = "<think>Maybe ```python\nbad\n``` here</think>\n```py\ngood = 1\n```";
        assert_eq!(extract_code(response), "good = 1");
    }

    #[test]
    fn test_extract_plain_text() {
        assert_eq!(extract_code("  \nprint('hi')\n  "), "print('hi')");
    }

    #[test]
    fn test_extract_unclosed_fence() {
        assert_eq!(extract_code("```python\nfor x in y:\n    pass"), "for x in y:\n    pass");
    }

    #[test]
    fn test_unclosed_think_truncates() {
        assert_eq!(strip_think_blocks("code\n<think>still thinking"), "code\n");
    }

    #[test]
    fn test_think_case_insensitive() {
        assert_eq!(strip_think_blocks("<THINK>x</THINK>y"), "y");
    }
}
