//! Line-oriented parser for `go.mod` manifests.
//!
//! Handles `module`, `require` and `replace` in single-line and block form,
//! quoted paths, and `// indirect` markers. Directives that do not influence
//! module resolution are accepted and skipped.

use super::{Manifest, ManifestFile, ManifestParser, Replace, Requirement};
use crate::errors::{ModGraphError, Result};

/// Parser for the go.mod grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoModParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Module,
    Go,
    Toolchain,
    Require,
    Replace,
    Exclude,
    Retract,
    Godebug,
    Tool,
    Ignore,
}

impl Directive {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "module" => Some(Self::Module),
            "go" => Some(Self::Go),
            "toolchain" => Some(Self::Toolchain),
            "require" => Some(Self::Require),
            "replace" => Some(Self::Replace),
            "exclude" => Some(Self::Exclude),
            "retract" => Some(Self::Retract),
            "godebug" => Some(Self::Godebug),
            "tool" => Some(Self::Tool),
            "ignore" => Some(Self::Ignore),
            _ => None,
        }
    }
}

/// Accumulates directives while walking the file.
struct ParseState<'a> {
    path: &'a str,
    module: Option<String>,
    requires: Vec<Requirement>,
    replaces: Vec<Replace>,
}

impl ParseState<'_> {
    fn error(&self, line: u32, message: impl Into<String>) -> ModGraphError {
        ModGraphError::Parse {
            message: message.into(),
            path: self.path.to_string(),
            line: Some(line),
        }
    }

    fn apply(&mut self, directive: Directive, args: &str, comment: &str, line: u32) -> Result<()> {
        match directive {
            Directive::Module => {
                let tokens = tokenize(args).map_err(|m| self.error(line, m))?;
                if tokens.len() != 1 {
                    return Err(self.error(line, "usage: module module/path"));
                }
                if self.module.is_some() {
                    return Err(self.error(line, "repeated module statement"));
                }
                self.module = Some(tokens[0].clone());
            }
            Directive::Require => {
                let tokens = tokenize(args).map_err(|m| self.error(line, m))?;
                if tokens.len() != 2 {
                    return Err(self.error(line, "usage: require module/path v1.2.3"));
                }
                self.requires.push(Requirement {
                    path: tokens[0].clone(),
                    version: tokens[1].clone(),
                    indirect: is_indirect(comment),
                });
            }
            Directive::Replace => {
                let tokens = tokenize(args).map_err(|m| self.error(line, m))?;
                let replace = parse_replace(&tokens).ok_or_else(|| {
                    self.error(
                        line,
                        "usage: replace module/path [v1.2.3] => other/module [v1.4.5] | local/dir",
                    )
                })?;
                self.replaces.push(replace);
            }
            Directive::Go
            | Directive::Toolchain
            | Directive::Exclude
            | Directive::Retract
            | Directive::Godebug
            | Directive::Tool
            | Directive::Ignore => {}
        }
        Ok(())
    }
}

impl ManifestParser for GoModParser {
    fn parse(&self, file: &ManifestFile) -> Result<Manifest> {
        let path = file.path.display().to_string();
        let text = std::str::from_utf8(&file.content).map_err(|e| ModGraphError::Parse {
            message: format!("manifest is not valid utf-8: {}", e),
            path: path.clone(),
            line: None,
        })?;

        let mut state = ParseState {
            path: &path,
            module: None,
            requires: Vec::new(),
            replaces: Vec::new(),
        };
        let mut block: Option<(Directive, u32)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx as u32 + 1;
            let (code, comment) = split_comment(raw);
            let code = code.trim();
            if code.is_empty() {
                continue;
            }

            if let Some((directive, _)) = block {
                if code == ")" {
                    block = None;
                } else {
                    state.apply(directive, code, comment, line)?;
                }
                continue;
            }

            let (keyword, rest) = match code.find(char::is_whitespace) {
                Some(pos) => (&code[..pos], code[pos..].trim()),
                None => (code, ""),
            };
            let keyword = keyword.strip_suffix('(').unwrap_or(keyword);
            let directive = Directive::from_keyword(keyword)
                .ok_or_else(|| state.error(line, format!("unknown directive: {}", keyword)))?;

            if rest == "(" || (rest.is_empty() && code.ends_with('(')) {
                if directive == Directive::Module {
                    return Err(state.error(line, "module directive cannot open a block"));
                }
                block = Some((directive, line));
                continue;
            }
            state.apply(directive, rest, comment, line)?;
        }

        if let Some((_, opened_at)) = block {
            return Err(state.error(opened_at, "unterminated block"));
        }

        let module = state.module.take().ok_or_else(|| ModGraphError::Parse {
            message: "missing module directive".to_string(),
            path: path.clone(),
            line: None,
        })?;

        Ok(Manifest {
            module,
            requires: state.requires,
            replaces: state.replaces,
        })
    }
}

/// Splits a line at its `//` comment, ignoring slashes inside quotes.
fn split_comment(line: &str) -> (&str, &str) {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == b'\\' && q == b'"' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'`' => quote = Some(b),
            None if b == b'/' && bytes.get(i + 1) == Some(&b'/') => {
                return (&line[..i], line[i + 2..].trim());
            }
            None => {}
        }
        i += 1;
    }
    (line, "")
}

/// `// indirect` or `// indirect; other notes`.
fn is_indirect(comment: &str) -> bool {
    comment == "indirect" || comment.starts_with("indirect;")
}

/// Splits directive arguments into tokens, unquoting `"..."` and `` `...` ``.
fn tokenize(args: &str) -> std::result::Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = args.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut token = String::new();
        if c == '"' || c == '`' {
            chars.next();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                if ch == c {
                    closed = true;
                    break;
                }
                if ch == '\\' && c == '"' {
                    if let Some(escaped) = chars.next() {
                        token.push(escaped);
                    }
                    continue;
                }
                token.push(ch);
            }
            if !closed {
                return Err("unterminated quoted string".to_string());
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

fn parse_replace(tokens: &[String]) -> Option<Replace> {
    let arrow = tokens.iter().position(|t| t == "=>")?;
    let (left, right) = (&tokens[..arrow], &tokens[arrow + 1..]);
    if left.is_empty() || left.len() > 2 || right.is_empty() || right.len() > 2 {
        return None;
    }
    Some(Replace {
        old_path: left[0].clone(),
        old_version: left.get(1).cloned(),
        new_path: right[0].clone(),
        new_version: right.get(1).cloned(),
    })
}
