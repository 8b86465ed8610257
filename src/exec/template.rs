// src/exec/template.rs

//! Typed command templates.
//!
//! Spec files write commands as flat strings (`"g++ $@ -o $@.exec"`). They
//! are parsed once, at load time, into an argument list where every
//! occurrence of [`TARGET_PLACEHOLDER`] is an explicit slot. Rendering then
//! substitutes the target per argument, so a filename containing spaces or
//! shell metacharacters always stays exactly one argument.

use std::fmt;

/// Token replaced by the file under test.
pub const TARGET_PLACEHOLDER: &str = "$@";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Target,
}

/// One argument made of literal text and target slots.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArgTemplate {
    segments: Vec<Segment>,
}

impl ArgTemplate {
    fn parse(word: &str) -> Self {
        let mut segments = Vec::new();
        let mut parts = word.split(TARGET_PLACEHOLDER).peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                segments.push(Segment::Text(part.to_string()));
            }
            if parts.peek().is_some() {
                segments.push(Segment::Target);
            }
        }
        Self { segments }
    }

    fn render(&self, target: &str) -> String {
        self.segments
            .iter()
            .map(|seg| match seg {
                Segment::Text(t) => t.as_str(),
                Segment::Target => target,
            })
            .collect()
    }
}

/// A whitespace-separated command with named substitution slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    source: String,
    args: Vec<ArgTemplate>,
}

impl CommandTemplate {
    pub fn parse(source: &str) -> Self {
        Self {
            source: source.trim().to_string(),
            args: source.split_whitespace().map(ArgTemplate::parse).collect(),
        }
    }

    /// The template as written in the spec.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Render into an argv with `target` substituted into every slot.
    pub fn render(&self, target: &str) -> Vec<String> {
        self.args.iter().map(|a| a.render(target)).collect()
    }

    /// Like [`render`](Self::render), with backslash escapes in each argument
    /// turned into the characters they name.
    pub fn render_unescaped(&self, target: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|a| unescape(&a.render(target)))
            .collect()
    }

    /// Rendered command as a single line, for report headings.
    pub fn display(&self, target: &str) -> String {
        self.render(target).join(" ")
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A test entry: zero or more setup commands whose output is piped, in
/// order, into the final measured command.
///
/// Written in specs as `"echo 5 | $@.exec"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPipeline {
    source: String,
    setup: Vec<CommandTemplate>,
    measured: CommandTemplate,
}

impl TestPipeline {
    pub fn parse(source: &str) -> Self {
        let mut stages: Vec<CommandTemplate> = source
            .split('|')
            .map(CommandTemplate::parse)
            .filter(|t| !t.is_empty())
            .collect();
        let measured = stages.pop().unwrap_or_else(|| CommandTemplate::parse(""));
        Self {
            source: source.trim().to_string(),
            setup: stages,
            measured,
        }
    }

    /// The test exactly as written, before any substitution.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn setup(&self) -> &[CommandTemplate] {
        &self.setup
    }

    pub fn measured(&self) -> &CommandTemplate {
        &self.measured
    }
}

/// Decode backslash escapes (`\n`, `\t`, `\\`, `\x41`, ...) into the
/// characters they stand for. Unknown escapes are kept verbatim.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('v') => out.push('\x0b'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('x') => {
                let hex: String = chars.clone().take(2).collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 => {
                        out.push(char::from(byte));
                        chars.nth(1);
                    }
                    _ => out.push_str("\\x"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
