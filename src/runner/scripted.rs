//! Scripted inputs embedded at the end of a source file.
//!
//! ```text
//! int main() { ... }
//!
//! /*
//! 3
//! 1 2 3
//! */
//! /*
//! 1
//! 7
//! */
//! ```
//!
//! Each trailing `/*\n ... */` block is one complete stdin payload. Blocks only
//! count when they form an unbroken run (whitespace between them is allowed)
//! that reaches the end of the file; anything else after the last block means
//! there are no scripted inputs at all.

use regex::Regex;
use std::sync::LazyLock;

static BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*\n(.*?)\*/").unwrap());

/// Extract scripted inputs from source text, in file order.
pub fn extract_scripted_inputs(source: &str) -> Vec<String> {
    let mut run: Vec<String> = Vec::new();
    let mut last_end: Option<usize> = None;

    for caps in BLOCK.captures_iter(source) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        // A gap with real content breaks the run
        if let Some(end) = last_end
            && !source[end..whole.start()].trim().is_empty()
        {
            run.clear();
        }

        run.push(body.as_str().to_string());
        last_end = Some(whole.end());
    }

    match last_end {
        Some(end) if source[end..].trim().is_empty() => run,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "/*\n * A. Sum\n */\n\n#include <bits/stdc++.h>\nint main() {}\n";

    #[test]
    fn test_two_trailing_blocks() {
        let source = format!("{PROGRAM}\n/*\n3\n1 2 3\n*//*\n1\n7\n*/\n");
        let inputs = extract_scripted_inputs(&source);
        assert_eq!(inputs, vec!["3\n1 2 3\n", "1\n7\n"]);
    }

    #[test]
    fn test_trailing_text_yields_nothing() {
        let source = format!("{PROGRAM}\n/*\n3\n1 2 3\n*//*\n1\n7\n*/\nint extra;\n");
        assert!(extract_scripted_inputs(&source).is_empty());
    }

    #[test]
    fn test_preamble_alone_is_not_input() {
        // The header comment is followed by code, so it never counts
        assert!(extract_scripted_inputs(PROGRAM).is_empty());
    }

    #[test]
    fn test_whitespace_between_blocks() {
        let source = format!("{PROGRAM}/*\na\n*/\n\n  /*\nb\n*/");
        assert_eq!(extract_scripted_inputs(&source), vec!["a\n", "b\n"]);
    }

    #[test]
    fn test_code_between_blocks_restarts_run() {
        let source = "/*\nstale\n*/\nint x;\n/*\nfresh\n*/\n";
        assert_eq!(extract_scripted_inputs(source), vec!["fresh\n"]);
    }

    #[test]
    fn test_inline_comment_is_not_a_block() {
        // `/*` must be followed by a newline
        let source = "int main() {}\n/* note */\n";
        assert!(extract_scripted_inputs(source).is_empty());
    }

    #[test]
    fn test_empty_source() {
        assert!(extract_scripted_inputs("").is_empty());
    }
}
