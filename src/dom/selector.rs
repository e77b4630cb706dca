//! Minimal CSS selector matching for the memory backend.
//!
//! Supports selector lists (`a, b`), descendant combinators (`a b`), and
//! compound selectors made of a tag, `#id`, `.class`, `[attr]` and
//! `[attr="value"]`. That covers every selector the scripts use.

/// What a node must expose to be matched.
pub(crate) trait Matchable: Sized {
    fn tag_name(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
    fn parent_node(&self) -> Option<Self>;
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn parse(token: &str) -> Option<Self> {
        let mut out = Self::default();
        let chars: Vec<char> = token.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '*' => i += 1,
                '#' => {
                    let (ident, next) = read_ident(&chars, i + 1);
                    out.id = Some(ident);
                    i = next;
                }
                '.' => {
                    let (ident, next) = read_ident(&chars, i + 1);
                    out.classes.push(ident);
                    i = next;
                }
                '[' => {
                    let close = chars[i..].iter().position(|&c| c == ']')? + i;
                    let inner: String = chars[i + 1..close].iter().collect();
                    out.attributes.push(parse_attribute(&inner));
                    i = close + 1;
                }
                _ => {
                    let (ident, next) = read_ident(&chars, i);
                    if ident.is_empty() {
                        return None;
                    }
                    out.tag = Some(ident.to_ascii_lowercase());
                    i = next;
                }
            }
        }
        Some(out)
    }

    fn matches<M: Matchable>(&self, node: &M) -> bool {
        if let Some(tag) = &self.tag {
            if !node.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attribute("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|(name, expected)| {
            match (node.attribute(name), expected) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
            }
        })
    }
}

fn read_ident(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len()
        && (chars[end].is_alphanumeric() || chars[end] == '-' || chars[end] == '_')
    {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn parse_attribute(inner: &str) -> (String, Option<String>) {
    match inner.split_once('=') {
        Some((name, value)) => {
            let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
            (name.trim().to_owned(), Some(value.to_owned()))
        }
        None => (inner.trim().to_owned(), None),
    }
}

/// One complex selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq)]
struct Complex {
    parts: Vec<Compound>,
}

impl Complex {
    fn matches<M: Matchable>(&self, node: &M) -> bool {
        let Some((last, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(node) {
            return false;
        }
        let mut cursor = node.parent_node();
        for part in ancestors.iter().rev() {
            loop {
                let Some(candidate) = cursor else {
                    return false;
                };
                cursor = candidate.parent_node();
                if part.matches(&candidate) {
                    break;
                }
            }
        }
        true
    }
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    /// Parse; `None` for syntax this engine does not support.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let mut selectors = Vec::new();
        for group in input.split(',') {
            let parts = split_outside_brackets(group)
                .iter()
                .map(|token| Compound::parse(token))
                .collect::<Option<Vec<_>>>()?;
            if parts.is_empty() {
                return None;
            }
            selectors.push(Complex { parts });
        }
        Some(Self { selectors })
    }

    pub(crate) fn matches<M: Matchable>(&self, node: &M) -> bool {
        self.selectors.iter().any(|s| s.matches(node))
    }
}

/// Split on whitespace that is not inside `[...]`.
fn split_outside_brackets(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in input.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
