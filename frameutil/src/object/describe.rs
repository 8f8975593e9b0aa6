//! Literal rendering of [`Value`]s and the short diagnostic form built on top of it.
use std::fmt::{self, Write};

use crate::{object::Value, utils::conf::DescriptionConfig};

impl Value {
    /// Build a formatting helper rendering the value in literal form, the way it appears when
    /// nested inside a container (`'abc'`, `('a',)`, `{'a': 1}`, ...).
    pub fn repr(&self) -> impl fmt::Display + '_ {
        struct Repr<'a>(&'a Value);

        impl fmt::Display for Repr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_repr(self.0, f)
            }
        }

        Repr(self)
    }
}

fn write_repr(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::None => f.write_str("None"),
        Value::Bool(true) => f.write_str("True"),
        Value::Bool(false) => f.write_str("False"),
        Value::Int(i) => write!(f, "{}", i),
        Value::Float(x) => write_float(*x, f),
        Value::Str(s) => write_str_literal(s, f),
        Value::Tuple(items) => {
            f.write_char('(')?;
            write_seq(items, f)?;
            if items.len() == 1 {
                f.write_char(',')?;
            }
            f.write_char(')')
        }
        Value::List(items) => {
            f.write_char('[')?;
            write_seq(items, f)?;
            f.write_char(']')
        }
        Value::Set(items) if items.is_empty() => f.write_str("set()"),
        Value::Set(items) => {
            f.write_char('{')?;
            write_seq(items, f)?;
            f.write_char('}')
        }
        Value::Dict(entries) => {
            f.write_char('{')?;
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", key.repr(), value.repr())?;
            }
            f.write_char('}')
        }
        Value::Module(m) => write!(f, "<module '{}'>", m.path()),
        Value::Class(c) => write!(f, "<class '{}'>", c.path()),
        Value::Function(func) => write!(f, "<function {}>", func.path()),
        Value::Method(m) => write!(f, "<bound method {}.{}>", m.owner().name(), m.name()),
        Value::Object(o) => write!(f, "{}", o),
    }
}

fn write_seq(items: &[Value], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_repr(item, f)?;
    }
    Ok(())
}

/// Shortest round-trip form, always carrying a fractional part or an exponent
/// (`1.0`, `1.2`, `1e+16`, `1e-07`, `inf`, `nan`).
fn write_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }

    let text = format!("{:?}", x);
    match text.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => f.write_str(&text),
    }
}

/// Quoted string literal. Single quotes unless the text contains a single quote and no double
/// quote; control characters are escaped.
fn write_str_literal(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{}", c)?,
            c if (c as u32) < 0x20 || c == '\x7f' => write!(f, "\\x{:02x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// Describe `value` as a short diagnostic string, using the default [`DescriptionConfig`].
///
/// Strings are returned unchanged; every other description longer than 100 characters is cut
/// and suffixed with `" ... ]"`.
pub fn object_description(value: &Value) -> String {
    object_description_with(value, &DescriptionConfig::default())
}

pub fn object_description_with(value: &Value, conf: &DescriptionConfig) -> String {
    let text = match value {
        Value::Str(s) => return s.clone(),
        Value::None
        | Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Tuple(_)
        | Value::List(_)
        | Value::Set(_)
        | Value::Dict(_) => value.repr().to_string(),
        Value::Module(m) => format!("module {}", m.path()),
        Value::Method(m) => format!("method {} of class {}", m.name(), m.owner().path()),
        Value::Class(c) => format!("class {}", c.path()),
        Value::Function(func) => format!("function {}", func.path()),
        Value::Object(o) => format!("object {}", o),
    };

    shorten(text, conf)
}

fn shorten(text: String, conf: &DescriptionConfig) -> String {
    match text.char_indices().nth(conf.max_len) {
        Some((cut, _)) => {
            let mut short = String::with_capacity(cut + conf.marker.len());
            short.push_str(&text[..cut]);
            short.push_str(&conf.marker);
            short
        }
        None => text,
    }
}
