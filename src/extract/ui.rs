//! Facts about the web UI bindings: identifiers the page asks for, and the
//! relay / view / attachment members the editor declares to serve them.

use crate::extract::source::{balanced_from, strip_comments};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

pub const RELAY_TYPES: [&str; 3] = ["WebSliderRelay", "WebToggleButtonRelay", "WebComboBoxRelay"];
pub const ATTACHMENT_TYPES: [&str; 3] = [
    "WebSliderParameterAttachment",
    "WebToggleButtonParameterAttachment",
    "WebComboBoxParameterAttachment",
];
pub const VIEW_TYPE: &str = "WebBrowserComponent";

/// Parameter identifiers passed to `getSliderState`, `getToggleButtonState`
/// or `getComboBoxState` as a quoted literal.
pub fn binding_identifiers(markup: &str) -> BTreeSet<String> {
    let re = Regex::new(
        r#"(?:getSliderState|getToggleButtonState|getComboBoxState)\s*\(\s*['"](\w+)['"]\s*\)"#,
    )
    .expect("static regex");
    re.captures_iter(markup).map(|c| c[1].to_string()).collect()
}

/// A member or local declared with one of the tracked types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// 1-based.
    pub line: usize,
}

fn alternation(types: &[&str]) -> String {
    format!("(?:{})", types.join("|"))
}

/// Variables declared by value or inside a smart pointer, e.g.
/// `juce::WebSliderRelay gainRelay;` or
/// `std::unique_ptr<juce::WebSliderRelay> gainRelay;`. References and raw
/// pointers are not declarations of the object itself.
pub fn declarations(src: &str, types: &[&str]) -> Vec<Declaration> {
    let clean = strip_comments(src);
    let pattern = format!(r"(?:juce::)?{}\b\s*>?\s*([A-Za-z_]\w*)", alternation(types));
    let re = Regex::new(&pattern).expect("static regex");
    let mut out = Vec::new();
    for c in re.captures_iter(&clean) {
        let Some(name) = c.get(1) else { continue };
        out.push(Declaration {
            name: name.as_str().to_string(),
            line: line_of(&clean, name.start()),
        });
        out.extend(trailing_declarators(&clean, name.end()));
    }
    out.sort_by_key(|d| d.line);
    out
}

/// Further names in the same declaration statement, as in
/// `std::unique_ptr<T> aRelay, bRelay;` or `T aRelay {"a"}, bRelay {"b"};`.
/// Gives up on anything that is not a plain member declaration (a
/// parameter list or a function body).
fn trailing_declarators(clean: &str, from: usize) -> Vec<Declaration> {
    let mut depth = 0i32;
    let mut separators = Vec::new();
    let mut terminated = false;
    for (i, ch) in clean[from..].char_indices() {
        match ch {
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => {
                depth -= 1;
                if depth < 0 {
                    return Vec::new();
                }
            }
            ';' if depth > 0 => return Vec::new(),
            ';' => {
                terminated = true;
                break;
            }
            ',' if depth == 0 => separators.push(from + i + 1),
            _ => {}
        }
    }
    if !terminated {
        return Vec::new();
    }

    let ident = Regex::new(r"^\s*[*&]?\s*([A-Za-z_]\w*)").expect("static regex");
    separators
        .into_iter()
        .filter_map(|start| {
            let name = ident.captures(&clean[start..])?.get(1)?;
            Some(Declaration {
                name: name.as_str().to_string(),
                line: line_of(clean, start + name.start()),
            })
        })
        .collect()
}

/// Variables assigned from `std::make_unique<Type>(...)`.
fn make_unique_targets(src: &str, types: &[&str]) -> Vec<String> {
    let pattern = format!(
        r"(\w+)\s*=\s*std::make_unique\s*<\s*(?:juce::)?{}\s*>\s*\(",
        alternation(types)
    );
    let re = Regex::new(&pattern).expect("static regex");
    re.captures_iter(src).map(|c| c[1].to_string()).collect()
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Constructor arguments given to `var`, from a member initialiser
/// (`var { ... }`, `var ( ... )`) or a `var = std::make_unique<...>(...)`
/// assignment.
fn initializer_args<'a>(src: &'a str, var: &str) -> Option<&'a str> {
    let name = regex::escape(var);
    let direct = Regex::new(&format!(r"\b{name}\s*([({{])")).expect("escaped name regex");
    let boxed = Regex::new(&format!(r"\b{name}\s*=\s*std::make_unique\s*<[^;]*?>\s*(\()"))
        .expect("escaped name regex");

    for re in [&boxed, &direct] {
        for c in re.captures_iter(src) {
            let Some(open) = c.get(1) else { continue };
            let (open_ch, close_ch) = if open.as_str() == "{" { ('{', '}') } else { ('(', ')') };
            if let Some(args) = balanced_from(src, open.start(), open_ch, close_ch) {
                return Some(args);
            }
        }
    }
    None
}

/// The parameter a relay is constructed for: the first string literal in its
/// arguments, or the identifier in front of `.getParamID()`.
fn relay_parameter(args: &str) -> Option<String> {
    let quoted = Regex::new(r#""(\w+)""#).expect("static regex");
    if let Some(c) = quoted.captures(args) {
        return Some(c[1].to_string());
    }
    let param_id = Regex::new(r"(\w+)\s*\.\s*getParamID\s*\(").expect("static regex");
    param_id.captures(args).map(|c| c[1].to_string())
}

pub fn relay_base(var: &str) -> &str {
    var.strip_suffix("Relay").unwrap_or(var)
}

pub fn attachment_base(var: &str) -> &str {
    var.strip_suffix("Attachment").unwrap_or(var)
}

/// Relay wiring found in the editor's header and implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBindings {
    /// Parameter identifier -> relay variable.
    pub relays: BTreeMap<String, String>,
    /// Relay variables some attachment is bound to.
    pub attached: BTreeSet<String>,
    /// Relay variables passed to `.withOptionsFrom(...)`.
    pub registered: BTreeSet<String>,
}

pub fn editor_bindings(header: &str, implementation: &str) -> EditorBindings {
    let header = strip_comments(header);
    let implementation = strip_comments(implementation);
    let sources = [header.as_str(), implementation.as_str()];

    let vars_of = |types: &[&str]| -> BTreeSet<String> {
        sources
            .iter()
            .flat_map(|src| {
                declarations(src, types)
                    .into_iter()
                    .map(|d| d.name)
                    .chain(make_unique_targets(src, types))
            })
            .collect()
    };
    let relay_vars = vars_of(&RELAY_TYPES[..]);
    let attachment_vars = vars_of(&ATTACHMENT_TYPES[..]);

    let args_of = |var: &str| sources.iter().find_map(|src| initializer_args(*src, var));

    let mut bindings = EditorBindings::default();
    for var in &relay_vars {
        if let Some(id) = args_of(var.as_str()).and_then(relay_parameter) {
            bindings.relays.entry(id).or_insert_with(|| var.clone());
        }

        let word = Regex::new(&format!(r"\b{}\b", regex::escape(var))).expect("escaped name regex");
        let attached = attachment_vars.iter().any(|att| {
            attachment_base(att) == relay_base(var)
                || args_of(att.as_str()).is_some_and(|args| word.is_match(args))
        });
        if attached {
            bindings.attached.insert(var.clone());
        }

        let registration = Regex::new(&format!(
            r"\.withOptionsFrom\s*\(\s*\*?\s*{}\s*\)",
            regex::escape(var)
        ))
        .expect("escaped name regex");
        if sources.iter().any(|src| registration.is_match(src)) {
            bindings.registered.insert(var.clone());
        }
    }
    bindings
}

/// Line positions of relay, view and attachment members in an editor header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationLines {
    pub relays: Vec<Declaration>,
    pub views: Vec<Declaration>,
    pub attachments: Vec<Declaration>,
}

impl DeclarationLines {
    /// The first view declaration owns the page.
    pub fn view(&self) -> Option<&Declaration> {
        self.views.iter().min_by_key(|d| d.line)
    }
}

pub fn declaration_lines(header: &str) -> DeclarationLines {
    DeclarationLines {
        relays: declarations(header, &RELAY_TYPES),
        views: declarations(header, &[VIEW_TYPE]),
        attachments: declarations(header, &ATTACHMENT_TYPES),
    }
}
