//! Comment and whitespace stripping for script files.
//!
//! This is a lexical minifier: it never renames or rewrites tokens. String, template
//! and regular expression literals are copied verbatim. Line breaks are kept wherever
//! dropping them could change automatic semicolon insertion.

use thiserror::Error;

/// Why a script could not be minified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MinifyError {
    #[error("unterminated {kind} starting on line {line}")]
    Unterminated { kind: &'static str, line: usize },
}

const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

// Characters after which a line break may end a statement.
fn ends_statement(c: char) -> bool {
    is_word(c) || matches!(c, ')' | ']' | '}' | '\'' | '"' | '`' | '+' | '-' | '/')
}

// Characters that may begin a statement on the next line.
fn starts_statement(c: char) -> bool {
    is_word(c) || matches!(c, '(' | '[' | '{' | '\'' | '"' | '`' | '+' | '-' | '!' | '~' | '/')
}

struct Minifier {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    out: String,
    // Whitespace seen since the last token: None, Some(false) = spaces, Some(true) = line break
    pending: Option<bool>,
}

impl Minifier {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            out: String::with_capacity(src.len()),
            pending: None,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn mark_whitespace(&mut self, newline: bool) {
        self.pending = Some(self.pending.unwrap_or(false) || newline);
    }

    fn flush_whitespace(&mut self, next: char) {
        let Some(newline) = self.pending.take() else {
            return;
        };
        let Some(prev) = self.out.chars().last() else {
            return;
        };
        // A directive may expand to a word, so it is spaced like one
        let prev_word = is_word(prev) || self.out.ends_with(":)");
        let next_word = is_word(next) || self.directive_end().is_some();
        if newline && ends_statement(prev) && starts_statement(next) {
            self.out.push('\n');
        } else if (prev_word && next_word)
            || (prev == '+' && next == '+')
            || (prev == '-' && next == '-')
            || (prev == '/' && next == '/')
            || (next == '.' && self.ends_with_number())
        {
            self.out.push(' ');
        }
    }

    fn last_word(&self) -> &str {
        let trimmed = self.out.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word(*c))
            .last()
            .map_or(trimmed.len(), |(i, _)| i);
        &trimmed[start..]
    }

    // `1 .toFixed()` must not become `1.toFixed()`
    fn ends_with_number(&self) -> bool {
        self.last_word().starts_with(|c: char| c.is_ascii_digit())
    }

    /// End offset of a `(: ... :)` directive starting at the cursor.
    fn directive_end(&self) -> Option<usize> {
        if self.peek(0) != Some('(') || self.peek(1) != Some(':') {
            return None;
        }
        let mut end = self.pos + 2;
        while let Some(&c) = self.chars.get(end) {
            if c == ':' || c == ')' {
                break;
            }
            end += 1;
        }
        (self.chars.get(end) == Some(&':') && self.chars.get(end + 1) == Some(&')')).then_some(end + 2)
    }

    fn copy_until(&mut self, end: usize) {
        while self.pos < end {
            match self.bump() {
                Some(c) => self.out.push(c),
                None => break,
            }
        }
    }

    fn regex_allowed(&self) -> bool {
        match self.out.trim_end().chars().last() {
            None => true,
            Some(c) if is_word(c) => REGEX_KEYWORDS.contains(&self.last_word()),
            Some(c) => !matches!(c, ')' | ']' | '}' | '\'' | '"' | '`'),
        }
    }

    fn copy_string(&mut self, quote: char) -> Result<(), MinifyError> {
        let line = self.line;
        let unterminated = MinifyError::Unterminated { kind: "string literal", line };
        self.out.push(quote);
        self.bump();
        loop {
            let c = self.bump().ok_or_else(|| unterminated.clone())?;
            match c {
                '\\' => {
                    self.out.push(c);
                    let escaped = self.bump().ok_or_else(|| unterminated.clone())?;
                    self.out.push(escaped);
                }
                '\n' => return Err(unterminated),
                c if c == quote => {
                    self.out.push(c);
                    return Ok(());
                }
                c => self.out.push(c),
            }
        }
    }

    fn copy_template(&mut self) -> Result<(), MinifyError> {
        let unterminated = MinifyError::Unterminated { kind: "template literal", line: self.line };
        self.out.push('`');
        self.bump();
        loop {
            let c = self.bump().ok_or_else(|| unterminated.clone())?;
            self.out.push(c);
            match c {
                '\\' => {
                    let escaped = self.bump().ok_or_else(|| unterminated.clone())?;
                    self.out.push(escaped);
                }
                '`' => return Ok(()),
                _ => {}
            }
        }
    }

    fn copy_regex(&mut self) -> Result<(), MinifyError> {
        let unterminated =
            MinifyError::Unterminated { kind: "regular expression literal", line: self.line };
        let mut in_class = false;
        self.out.push('/');
        self.bump();
        loop {
            let c = self.bump().ok_or_else(|| unterminated.clone())?;
            if c == '\n' {
                return Err(unterminated);
            }
            self.out.push(c);
            match c {
                '\\' => {
                    let escaped = self.bump().ok_or_else(|| unterminated.clone())?;
                    self.out.push(escaped);
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => return Ok(()),
                _ => {}
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), MinifyError> {
        let line = self.line;
        self.bump();
        self.bump();
        let mut newline = false;
        loop {
            match self.bump() {
                None => return Err(MinifyError::Unterminated { kind: "block comment", line }),
                Some('*') if self.peek(0) == Some('/') => {
                    self.bump();
                    self.mark_whitespace(newline);
                    return Ok(());
                }
                Some('\n') => newline = true,
                Some(_) => {}
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        self.mark_whitespace(true);
    }

    fn run(mut self) -> Result<String, MinifyError> {
        while let Some(c) = self.peek(0) {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                    self.mark_whitespace(c == '\n' || c == '\r');
                }
                '/' if self.peek(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.skip_block_comment()?,
                '\'' | '"' => {
                    self.flush_whitespace(c);
                    self.copy_string(c)?;
                }
                '`' => {
                    self.flush_whitespace(c);
                    self.copy_template()?;
                }
                // Directives are scanned after minification and must survive it
                '(' if self.peek(1) == Some(':') => {
                    self.flush_whitespace(c);
                    match self.directive_end() {
                        Some(end) => self.copy_until(end),
                        None => {
                            self.out.push(c);
                            self.bump();
                        }
                    }
                }
                '/' if self.regex_allowed() => {
                    self.flush_whitespace(c);
                    self.copy_regex()?;
                }
                c => {
                    self.flush_whitespace(c);
                    self.out.push(c);
                    self.bump();
                }
            }
        }
        Ok(self.out)
    }
}

/// Strip comments and redundant whitespace from a script.
pub fn minify_js(src: &str) -> Result<String, MinifyError> {
    Minifier::new(src).run()
}
