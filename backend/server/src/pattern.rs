//! # Pattern Translation
//!
//! Search terms are written in the browser's regular expression dialect
//! (`RegExp` without the `u` flag). The `regex` crate reads a different one, so
//! every term is rewritten before it is compiled.
//!
//! ## Rewrites
//! - `{` and `}` that do not form a quantifier (`{n}`, `{n,}`, `{n,m}`) are literal braces
//! - `]` outside a class is a literal bracket
//! - `[]` matches nothing, `[^]` matches anything
//! - Inside a class `[` is literal and a `-` next to `\d`/`\w`/`\s` is literal
//! - `\d`, `\w`, `\b` are ASCII only, `\s` is the browser's whitespace set
//! - `.` stops at `\r`, `\u2028` and `\u2029` as well as `\n`
//! - `\uHHHH` pairs are joined into one code point, a lone surrogate matches nothing
//! - `\0`, legacy octal, `\cX` and identity escapes such as `\e` or `\<` become plain characters
//!
//! ## Rejected
//! Look-around and back-references have no `regex` equivalent and fail with [`SearchError::Syntax`].
use crate::search::SearchError;

const DIGIT: &str = "0-9";
const WORD: &str = "0-9A-Za-z_";
const SPACE: &str = r"\t\n\x0B\x0C\r\x20\xA0\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";
const EVERYTHING: &str = r"\x00-\x{10FFFF}";
const NOT_LINE_TERMINATOR: &str = r"[^\n\r\x{2028}\x{2029}]";

enum Atom {
    Char(char),
    Set { content: &'static str, negated: bool },
    Assertion(&'static str),
}

impl Atom {
    fn is_set(&self) -> bool {
        matches!(self, Atom::Set { .. })
    }

    fn push_outside_class(&self, out: &mut String) {
        match self {
            Atom::Char(c) => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            // Members already list both cases.
            Atom::Set { content, negated } => {
                out.push_str("(?-i:[");
                if *negated {
                    out.push('^');
                }
                out.push_str(content);
                out.push_str("])");
            }
            Atom::Assertion(assertion) => out.push_str(assertion),
        }
    }

    fn push_inside_class(&self, out: &mut String) {
        match self {
            Atom::Char(c) => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            Atom::Set {
                content,
                negated: false,
            } => out.push_str(content),
            Atom::Set {
                content,
                negated: true,
            } => {
                out.push_str("[^");
                out.push_str(content);
                out.push(']');
            }
            Atom::Assertion(assertion) => out.push_str(assertion),
        }
    }
}

pub fn translate(source: &str) -> Result<String, SearchError> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let (atom, next) = escape(&chars, i + 1, false)?;
                atom.push_outside_class(&mut out);
                i = next;
            }
            '[' => i = class(&chars, i + 1, &mut out)?,
            '(' if chars.get(i + 1) == Some(&'?') => i = group(&chars, i + 2, &mut out)?,
            '{' => match quantifier_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..end]);
                    i = end;
                }
                None => {
                    out.push_str(r"\{");
                    i += 1;
                }
            },
            '}' => {
                out.push_str(r"\}");
                i += 1;
            }
            ']' => {
                out.push_str(r"\]");
                i += 1;
            }
            '.' => {
                out.push_str(NOT_LINE_TERMINATOR);
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn group(chars: &[char], i: usize, out: &mut String) -> Result<usize, SearchError> {
    match (chars.get(i), chars.get(i + 1)) {
        (Some(':'), _) => {
            out.push_str("(?:");
            Ok(i + 1)
        }
        (Some('=' | '!'), _) | (Some('<'), Some('=' | '!')) => {
            Err(SearchError::Syntax("look-around is not supported"))
        }
        (Some('<'), _) => {
            out.push_str("(?<");
            Ok(i + 1)
        }
        _ => Err(SearchError::Syntax("invalid group")),
    }
}

fn quantifier_end(chars: &[char], open: usize) -> Option<usize> {
    let digits = |from: usize| {
        chars[from..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count()
    };

    let mut i = open + 1;
    let min = digits(i);
    if min == 0 {
        return None;
    }
    i += min;

    if chars.get(i) == Some(&',') {
        i += 1;
        i += digits(i);
    }

    (chars.get(i) == Some(&'}')).then_some(i + 1)
}

fn class(chars: &[char], mut i: usize, out: &mut String) -> Result<usize, SearchError> {
    let negated = chars.get(i) == Some(&'^');
    if negated {
        i += 1;
    }

    if chars.get(i) == Some(&']') {
        out.push_str(if negated { "[" } else { "[^" });
        out.push_str(EVERYTHING);
        out.push(']');
        return Ok(i + 1);
    }

    out.push('[');
    if negated {
        out.push('^');
    }

    while let Some(&c) = chars.get(i) {
        if c == ']' {
            out.push(']');
            return Ok(i + 1);
        }

        let (start, next) = class_atom(chars, i)?;
        i = next;

        let is_range = chars.get(i) == Some(&'-') && chars.get(i + 1).is_some_and(|&c| c != ']');
        if !is_range {
            start.push_inside_class(out);
            continue;
        }

        let (end, next) = class_atom(chars, i + 1)?;
        i = next;

        start.push_inside_class(out);
        if start.is_set() || end.is_set() {
            out.push_str(r"\-");
        } else {
            out.push('-');
        }
        end.push_inside_class(out);
    }

    // Unclosed; left for the compiler to report.
    Ok(i)
}

fn class_atom(chars: &[char], i: usize) -> Result<(Atom, usize), SearchError> {
    match chars[i] {
        '\\' => escape(chars, i + 1, true),
        c => Ok((Atom::Char(c), i + 1)),
    }
}

fn escape(chars: &[char], i: usize, in_class: bool) -> Result<(Atom, usize), SearchError> {
    let Some(&c) = chars.get(i) else {
        return Err(SearchError::Syntax("pattern ends with a backslash"));
    };

    let set = |content, negated| -> Result<(Atom, usize), SearchError> {
        Ok((Atom::Set { content, negated }, i + 1))
    };
    let literal = |c| -> Result<(Atom, usize), SearchError> { Ok((Atom::Char(c), i + 1)) };

    match c {
        'd' => set(DIGIT, false),
        'D' => set(DIGIT, true),
        'w' => set(WORD, false),
        'W' => set(WORD, true),
        's' => set(SPACE, false),
        'S' => set(SPACE, true),
        'b' if in_class => literal('\u{8}'),
        'b' => Ok((Atom::Assertion(r"(?-u:\b)"), i + 1)),
        'B' if !in_class => Ok((Atom::Assertion(r"(?-u:\B)"), i + 1)),
        'n' => literal('\n'),
        'r' => literal('\r'),
        't' => literal('\t'),
        'f' => literal('\u{C}'),
        'v' => literal('\u{B}'),
        '0'..='7' if c == '0' || in_class => Ok(octal(chars, i)),
        '1'..='9' if !in_class => Err(SearchError::Syntax("back-references are not supported")),
        'x' => match hex(chars, i + 1, 2) {
            Some(code) => Ok((code_point(code), i + 3)),
            None => literal('x'),
        },
        'u' => match hex(chars, i + 1, 4) {
            Some(high @ 0xD800..=0xDBFF) => match low_surrogate(chars, i + 5) {
                Some(low) => {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    Ok((code_point(code), i + 11))
                }
                None => Ok((code_point(high), i + 5)),
            },
            Some(code) => Ok((code_point(code), i + 5)),
            None => literal('u'),
        },
        'c' => match chars.get(i + 1) {
            Some(&l) if l.is_ascii_alphabetic() || (in_class && (l.is_ascii_digit() || l == '_')) => {
                Ok((code_point(l as u32 % 32), i + 2))
            }
            // `\c` without a control letter is a literal backslash; the `c` is read next.
            _ => Ok((Atom::Char('\\'), i)),
        },
        c => literal(c),
    }
}

fn octal(chars: &[char], start: usize) -> (Atom, usize) {
    let mut value = 0;
    let mut i = start;

    while let Some(digit) = chars.get(i).and_then(|c| c.to_digit(8)) {
        if i - start == 3 || value * 8 + digit > 0o377 {
            break;
        }
        value = value * 8 + digit;
        i += 1;
    }

    (code_point(value), i)
}

fn hex(chars: &[char], start: usize, len: usize) -> Option<u32> {
    let digits = chars.get(start..start + len)?;

    digits
        .iter()
        .try_fold(0, |value, c| Some(value * 16 + c.to_digit(16)?))
}

fn low_surrogate(chars: &[char], i: usize) -> Option<u32> {
    if chars.get(i) != Some(&'\\') || chars.get(i + 1) != Some(&'u') {
        return None;
    }

    hex(chars, i + 2, 4).filter(|code| (0xDC00..=0xDFFF).contains(code))
}

fn code_point(code: u32) -> Atom {
    match char::from_u32(code) {
        Some(c) => Atom::Char(c),
        // Lone surrogates never occur in a Rust string.
        None => Atom::Set {
            content: EVERYTHING,
            negated: true,
        },
    }
}
