//! Minimal ICU MessageFormat parser.
//!
//! Produces just enough structure to find plural constructs and to pull the
//! text of each plural option back out verbatim. Every option keeps the raw
//! source slice of its body, so nested arguments survive untouched.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Literal(String),
    /// `{name}`
    Argument { name: String },
    /// `{name, type}` or `{name, type, style}`, e.g. `number`, `date`, `time`.
    Typed {
        name: String,
        kind: String,
        style: Option<String>,
    },
    /// `{name, plural, ...}` or `{name, selectordinal, ...}`
    Plural {
        name: String,
        ordinal: bool,
        offset: i64,
        options: Vec<Choice>,
    },
    /// `{name, select, ...}`
    Select { name: String, options: Vec<Choice> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub selector: String,
    /// Body exactly as written between the option's braces.
    pub raw: String,
    pub body: Vec<Element>,
}

pub fn parse(src: &str) -> Result<Vec<Element>> {
    let mut p = Parser { src, pos: 0 };
    p.message(0, false)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(Error::icu(format!("expected '{want}', found '{c}'"), self.pos)),
            None => Err(Error::icu(format!("expected '{want}', found end of input"), self.pos)),
        }
    }

    /// Reads a run of characters up to whitespace or one of `stops`.
    fn word(&mut self, stops: &[char]) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || stops.contains(&c) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Parses message text up to end of input or an unconsumed closing brace.
    fn message(&mut self, depth: usize, in_plural: bool) -> Result<Vec<Element>> {
        let mut out = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    if !text.is_empty() {
                        out.push(Element::Literal(std::mem::take(&mut text)));
                    }
                    out.push(self.argument(depth)?);
                }
                '}' => {
                    if depth == 0 {
                        return Err(Error::icu("unmatched '}'", self.pos));
                    }
                    break;
                }
                '\'' => self.apostrophe(&mut text, in_plural),
                _ => {
                    text.push(c);
                    self.bump();
                }
            }
        }

        if !text.is_empty() {
            out.push(Element::Literal(text));
        }
        Ok(out)
    }

    fn apostrophe(&mut self, text: &mut String, in_plural: bool) {
        self.bump();
        match self.peek() {
            Some('\'') => {
                self.bump();
                text.push('\'');
            }
            Some(c) if c == '{' || c == '}' || (in_plural && c == '#') => {
                // quoted run until the next lone apostrophe
                while let Some(q) = self.bump() {
                    if q == '\'' {
                        if self.peek() == Some('\'') {
                            self.bump();
                            text.push('\'');
                            continue;
                        }
                        break;
                    }
                    text.push(q);
                }
            }
            _ => text.push('\''),
        }
    }

    fn argument(&mut self, depth: usize) -> Result<Element> {
        let open = self.pos;
        self.expect('{')?;
        self.skip_ws();

        let name = self.word(&['{', '}', ',']).to_string();
        if name.is_empty() {
            return Err(Error::icu("empty argument name", open));
        }
        self.skip_ws();

        match self.peek() {
            Some('}') => {
                self.bump();
                return Ok(Element::Argument { name });
            }
            Some(',') => {
                self.bump();
            }
            Some(c) => return Err(Error::icu(format!("unexpected '{c}' in argument"), self.pos)),
            None => return Err(Error::icu("unclosed argument", open)),
        }

        self.skip_ws();
        let kind = self.word(&['{', '}', ',']).to_string();
        self.skip_ws();

        match kind.as_str() {
            "plural" | "selectordinal" => {
                self.expect(',')?;
                let (offset, options) = self.options(depth, true)?;
                Ok(Element::Plural {
                    name,
                    ordinal: kind == "selectordinal",
                    offset,
                    options,
                })
            }
            "select" => {
                self.expect(',')?;
                let (_, options) = self.options(depth, false)?;
                Ok(Element::Select { name, options })
            }
            "" => Err(Error::icu("missing argument type", self.pos)),
            _ => {
                let style = if self.peek() == Some(',') {
                    self.bump();
                    Some(self.style()?.trim().to_string())
                } else {
                    None
                };
                self.expect('}')?;
                Ok(Element::Typed { name, kind, style })
            }
        }
    }

    /// Style text runs to the closing brace of the argument. Nested braces
    /// must balance.
    fn style(&mut self) -> Result<&'a str> {
        let start = self.pos;
        let mut nesting = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '{' => nesting += 1,
                '}' if nesting == 0 => return Ok(&self.src[start..self.pos]),
                '}' => nesting -= 1,
                _ => {}
            }
            self.bump();
        }
        Err(Error::icu("unclosed argument style", start))
    }

    fn options(&mut self, depth: usize, plural: bool) -> Result<(i64, Vec<Choice>)> {
        self.skip_ws();
        let mut offset = 0i64;

        if plural && self.src[self.pos..].starts_with("offset:") {
            self.pos += "offset:".len();
            self.skip_ws();
            let at = self.pos;
            let digits = self.word(&['{', '}']);
            offset = digits
                .parse()
                .map_err(|_| Error::icu(format!("invalid offset '{digits}'"), at))?;
        }

        let mut options = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                None => return Err(Error::icu("unclosed plural or select", self.pos)),
                _ => {}
            }

            let at = self.pos;
            let selector = self.word(&['{', '}']).to_string();
            if selector.is_empty() {
                return Err(Error::icu("missing selector", at));
            }
            self.skip_ws();
            self.expect('{')?;

            let body_start = self.pos;
            let body = self.message(depth + 1, plural)?;
            let raw = self.src[body_start..self.pos].to_string();
            self.expect('}')?;

            options.push(Choice { selector, raw, body });
        }

        if !options.iter().any(|o| o.selector == "other") {
            return Err(Error::icu("missing 'other' option", self.pos));
        }
        Ok((offset, options))
    }
}
