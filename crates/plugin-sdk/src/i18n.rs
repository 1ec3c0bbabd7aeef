//! Translatable messages.
//!
//! Blocks declare their literal strings as [`Message`] constants and render
//! them through a [`Translator`]. Templates use printf-style placeholders;
//! positional forms (`%1$d`, `%2$s`) let translations reorder arguments.

use std::borrow::Cow;

use crate::escape::intval;

/// A translatable message key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// Source string, also the lookup key.
    pub msgid: &'static str,

    /// Note shown to translators next to the string.
    pub translator_comment: Option<&'static str>,
}

impl Message {
    pub const fn new(msgid: &'static str) -> Self {
        Self {
            msgid,
            translator_comment: None,
        }
    }

    pub const fn with_comment(msgid: &'static str, comment: &'static str) -> Self {
        Self {
            msgid,
            translator_comment: Some(comment),
        }
    }
}

/// Looks up translations for message keys within a text domain.
pub trait Translator {
    /// Translated template for `msgid`, or `msgid` itself when untranslated.
    fn translate<'a>(&'a self, domain: &str, msgid: &'a str) -> Cow<'a, str>;

    /// Translate `message` and substitute `args` into the result.
    fn format(&self, domain: &str, message: &Message, args: &[FormatArg]) -> String {
        sprintf(&self.translate(domain, message.msgid), args)
    }
}

/// Translator that returns every message untranslated.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate<'a>(&'a self, _domain: &str, msgid: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(msgid)
    }
}

/// Argument substituted into a message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatArg {
    Int(u64),
    /// Inserted verbatim; escape before passing.
    Str(String),
}

impl FormatArg {
    fn as_decimal(&self) -> u64 {
        match self {
            FormatArg::Int(n) => *n,
            FormatArg::Str(s) => intval(Some(s)),
        }
    }

    fn as_text(&self) -> Cow<'_, str> {
        match self {
            FormatArg::Int(n) => Cow::Owned(n.to_string()),
            FormatArg::Str(s) => Cow::Borrowed(s),
        }
    }
}

/// Substitute `args` into a printf-style `template`.
///
/// Supports `%d`, `%s`, their positional forms `%N$d`/`%N$s` (1-based) and
/// `%%`. Sequential placeholders consume arguments left to right. A missing
/// argument renders as nothing; an unrecognised placeholder is copied as-is.
pub fn sprintf(template: &str, args: &[FormatArg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut next_arg = 0usize;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let spec = &rest[pos + 1..];

        if let Some(after) = spec.strip_prefix('%') {
            out.push('%');
            rest = after;
            continue;
        }

        let digits = spec.bytes().take_while(u8::is_ascii_digit).count();
        let (index, conv_at) = if digits > 0 && spec[digits..].starts_with('$') {
            let n: usize = spec[..digits].parse().unwrap_or(0);
            (n.checked_sub(1), digits + 1)
        } else {
            (Some(next_arg), 0)
        };

        match spec[conv_at..].chars().next() {
            Some(conv @ ('d' | 's')) => {
                if conv_at == 0 {
                    next_arg += 1;
                }
                if let Some(arg) = index.and_then(|i| args.get(i)) {
                    match conv {
                        'd' => out.push_str(&arg.as_decimal().to_string()),
                        _ => out.push_str(&arg.as_text()),
                    }
                }
                rest = &spec[conv_at + 1..];
            }
            _ => {
                out.push('%');
                rest = spec;
            }
        }
    }

    out.push_str(rest);
    out
}
