use std::iter::Enumerate;
use std::str::Lines;

use indexmap::IndexMap;

use crate::env::EnvMap;
use crate::error::Error;
use crate::key;
use crate::types::ParseOptions;

/// A single `${NAME}`, `${NAME:-default}` or `${NAME-default}` reference.
/// `len` covers everything after the opening `${` up to and including `}`.
struct BracedRef<'a> {
    name: &'a str,
    default_if_empty: &'a str,
    default_if_unset: &'a str,
    len: usize,
}

pub struct Parser<'a> {
    lines: Enumerate<Lines<'a>>,
    options: ParseOptions,
    vars: IndexMap<String, String>,
}

impl<'a> Parser<'a> {
    #[inline(always)]
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, ParseOptions::default())
    }

    pub fn with_options(input: &'a str, options: ParseOptions) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Self {
            lines: input.lines().enumerate(),
            options,
            vars: IndexMap::new(),
        }
    }

    /// Consumes the input and resolves it into an ordered mapping. Under the
    /// default lenient options this never fails; under strict options the
    /// first bad line aborts with no partial result.
    pub fn parse(mut self) -> Result<EnvMap, Error> {
        while let Some((idx, line)) = self.lines.next() {
            self.consume_line(idx + 1, line)?;
        }
        Ok(EnvMap::from_resolved(self.vars))
    }
}

impl<'a> Parser<'a> {
    fn consume_line(&mut self, number: usize, line: &'a str) -> Result<(), Error> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        // Split on the first '='; later '=' characters belong to the value.
        let Some((raw_key, raw_value)) = line.split_once('=') else {
            return self.reject(Error::MalformedLine {
                line: number,
                content: trimmed.to_string(),
            });
        };

        let key = raw_key.trim();
        if !key::is_valid_key(key) {
            return self.reject(Error::InvalidKey {
                key: key.to_string(),
            });
        }

        let rest = raw_value.trim();
        let (value, can_interpolate) = match rest.as_bytes().first() {
            Some(&b'"') => (self.double_quoted(&rest[1..]), true),
            Some(&b'\'') => match single_quoted(&rest[1..]) {
                Some(literal) => (literal.to_string(), false),
                None => return self.reject(Error::UnterminatedQuote { line: number }),
            },
            _ => (unquoted(rest).to_string(), true),
        };

        let value = if can_interpolate {
            self.interpolate(&value)
        } else {
            value
        };

        self.vars.insert(key.to_string(), value);
        Ok(())
    }

    #[inline]
    fn reject(&self, err: Error) -> Result<(), Error> {
        if self.options.strict {
            Err(err)
        } else {
            Ok(())
        }
    }

    /// Everything up to the closing quote on the same line, or a multi-line
    /// block joined with '\n' until a line containing '"'. Running out of
    /// input is tolerated: the consumed text becomes the value.
    fn double_quoted(&mut self, rest: &'a str) -> String {
        if let Some(end) = rest.find('"') {
            return rest[..end].to_string();
        }

        let mut value = String::from(rest);
        for (_, line) in self.lines.by_ref() {
            value.push('\n');
            match line.find('"') {
                Some(end) => {
                    value.push_str(&line[..end]);
                    break;
                }
                None => value.push_str(line),
            }
        }
        value
    }
}

// ==================================================================================
//  Interpolation
// ==================================================================================

impl<'a> Parser<'a> {
    /// One substitution pass: all braced references first, then the first
    /// remaining unbraced '$'. Substituted text is never re-resolved.
    fn interpolate(&self, value: &str) -> String {
        if !value.contains('$') {
            return value.to_string();
        }

        let value = if value.contains("${") {
            self.expand_braced(value)
        } else {
            value.to_string()
        };

        // Unbraced form: the whole remainder after '$' is the name.
        match value.find('$') {
            Some(i) => {
                let mut out = String::with_capacity(value.len());
                out.push_str(&value[..i]);
                if let Some(resolved) = self.lookup(&value[i + 1..]) {
                    out.push_str(&resolved);
                }
                out
            }
            None => value,
        }
    }

    fn expand_braced(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let tail = &rest[start + 2..];
            match parse_braced_ref(tail) {
                Some(braced) => {
                    out.push_str(&self.resolve_braced(&braced));
                    rest = &tail[braced.len..];
                }
                None => {
                    // Not a reference; emit the "${" literally and move on.
                    out.push_str("${");
                    rest = tail;
                }
            }
        }
        out.push_str(rest);
        out
    }

    /// `:-` defaults apply to empty-or-unset, bare `-` defaults to unset only.
    fn resolve_braced(&self, braced: &BracedRef<'_>) -> String {
        match self.lookup(braced.name) {
            Some(v) if v.is_empty() && !braced.default_if_empty.is_empty() => {
                braced.default_if_empty.to_string()
            }
            Some(v) => v,
            None if !braced.default_if_empty.is_empty() => braced.default_if_empty.to_string(),
            None if !braced.default_if_unset.is_empty() => braced.default_if_unset.to_string(),
            None => String::new(),
        }
    }

    /// Earlier assignments in this parse shadow the process environment,
    /// even when their value is the empty string.
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    }
}

fn parse_braced_ref(s: &str) -> Option<BracedRef<'_>> {
    let close = s.find('}')?;
    let body = &s[..close];

    let name_end = body
        .bytes()
        .position(|b| !b.is_ascii_alphanumeric() && b != b'_')
        .unwrap_or(body.len());
    let name = &body[..name_end];
    if !key::is_valid_key(name) {
        return None;
    }

    let seg = &body[name_end..];
    let (default_if_empty, default_if_unset) = if seg.is_empty() {
        ("", "")
    } else if let Some(t) = seg.strip_prefix(":-") {
        // ":-a-b" splits into an if-empty default "a" and if-unset default "b".
        match t.find('-') {
            Some(i) => (&t[..i], &t[i + 1..]),
            None => (t, ""),
        }
    } else if let Some(t) = seg.strip_prefix('-') {
        ("", t)
    } else {
        return None;
    };

    Some(BracedRef {
        name,
        default_if_empty,
        default_if_unset,
        len: close + 1,
    })
}

#[inline]
fn single_quoted(rest: &str) -> Option<&str> {
    rest.find('\'').map(|end| &rest[..end])
}

/// Unquoted values end at the first " #" (space before the hash required);
/// a bare '#' stays part of the value.
#[inline]
fn unquoted(rest: &str) -> &str {
    match rest.find(" #") {
        Some(i) => &rest[..i],
        None => rest,
    }
}
