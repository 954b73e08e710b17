//! Facts pulled out of generated processor sources (C++ text).
//!
//! Everything here runs on comment-stripped text; see [`strip_comments`].

use crate::extract::ParamKind;
use regex::Regex;
use std::collections::BTreeMap;

/// Replace `//` and `/* */` comments with spaces, keeping newlines so line
/// numbers survive. String and character literals are left untouched.
pub fn strip_comments(src: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Line,
        Block,
        Str(char),
    }

    let mut out = String::with_capacity(src.len());
    let mut state = State::Code;
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Line;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                '"' | '\'' => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::Line => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    out.push(' ');
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || c == '\n' {
                    state = State::Code;
                }
            }
        }
    }
    out
}

/// Parameter identifiers and their kinds from `AudioParameterFloat|Bool|Choice`
/// constructions bound to a string identifier. Both the `ParameterID { "id", 1 }`
/// form and the older bare `"id"` first argument are recognised.
pub fn code_parameters(src: &str) -> BTreeMap<String, ParamKind> {
    let re = Regex::new(
        r#"AudioParameter(Float|Bool|Choice)\s*>?\s*\(\s*(?:(?:juce::)?ParameterID\s*\{\s*)?"(\w+)""#,
    )
    .expect("static regex");

    let clean = strip_comments(src);
    let mut params = BTreeMap::new();
    for c in re.captures_iter(&clean) {
        if let Some(kind) = ParamKind::from_token(&c[1]) {
            params.insert(c[2].to_string(), kind);
        }
    }
    params
}

/// `#include <juce_dsp/juce_dsp.h>` or the umbrella `JuceHeader.h`.
pub fn includes_dsp_module(src: &str) -> bool {
    let re = Regex::new(r#"(?m)^\s*#\s*include\s*[<"](?:juce_dsp/juce_dsp\.h|JuceHeader\.h)[>"]"#)
        .expect("static regex");
    re.is_match(&strip_comments(src))
}

/// Whether `component` (e.g. `Gain`, `IIR::Filter`) is declared in `header`
/// as a member, wrapped in a template such as `ProcessorDuplicator<...>`, or
/// through a `using` alias.
pub fn dsp_declared(header: &str, component: &str) -> bool {
    let clean = strip_comments(header);
    let name = regex::escape(component);
    let forms = [
        format!(r"juce::dsp::{name}\b(?:\s*<[^;]*>\s*|\s+)\w+\s*(?:;|\{{|=)"),
        format!(r"<[^;]*juce::dsp::{name}\b[^;]*>\s*\w+\s*(?:;|\{{|=)"),
        format!(r"using\s+\w+\s*=\s*[^;]*juce::dsp::{name}\b"),
    ];
    forms
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .any(|re| re.is_match(&clean))
}

/// Body of the first `prepareToPlay(...) { ... }` definition, braces
/// balanced. `None` when no definition exists.
pub fn prepare_to_play_body(src: &str) -> Option<String> {
    let clean = strip_comments(src);
    let re = Regex::new(r"\bprepareToPlay\s*\([^)]*\)[^;{]*\{").expect("static regex");
    let m = re.find(&clean)?;
    balanced_from(&clean, m.end() - 1, '{', '}').map(str::to_string)
}

/// Text strictly between the delimiter at byte `open_at` and its match.
pub(crate) fn balanced_from(text: &str, open_at: usize, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    for (offset, ch) in text[open_at..].char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[open_at + open.len_utf8()..open_at + offset]);
            }
        }
    }
    None
}
