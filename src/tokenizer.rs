//! Splitting of command arguments into tokens with quote handling.
//!
//! A quoted region (`'...'` or `"..."`) keeps the delimiter from splitting the
//! text inside it, and the other quote character is taken literally there.
//! After splitting, every token goes through [`dequote`] which strips the
//! matching outer quotes.

use crate::error::{Result, ShellError};

/// Which quote character opened a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    None,
    Single,
    Double,
}

impl Quote {
    fn of(ch: char) -> Self {
        match ch {
            '\'' => Quote::Single,
            '"' => Quote::Double,
            _ => Quote::None,
        }
    }
}

/// A token found in a line: byte offsets `start..end` plus the quote it was
/// opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub quote: Quote,
}

impl Token {
    /// The raw text of the token, quotes included.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }
}

fn is_quote(ch: char) -> bool {
    ch == '\'' || ch == '"'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Between,
    Word { start: usize },
    Quoted { start: usize, quote: char },
}

struct Scanner<'a> {
    line: &'a str,
    delimiter: &'a str,
    limit: usize,
    pos: usize,
    state: ScanState,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str, delimiter: &'a str, limit: usize) -> Self {
        Scanner {
            line,
            delimiter,
            limit,
            pos: 0,
            state: ScanState::Between,
            tokens: Vec::new(),
        }
    }

    fn limit_reached(&self) -> bool {
        self.limit > 0 && self.tokens.len() >= self.limit
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.line.len() && !self.limit_reached() {
            let rest = &self.line[self.pos..];
            let Some(ch) = rest.chars().next() else {
                break;
            };
            match self.state {
                ScanState::Quoted { start, quote } => self.handle_quoted(ch, start, quote),
                _ if rest.starts_with(self.delimiter) => self.handle_delimiter(),
                _ => self.handle_char(ch),
            }
        }

        if !self.limit_reached() {
            // Whatever is still open runs to the end of the line. An
            // unterminated quote is kept raw so dequoting rejects it.
            match self.state {
                ScanState::Between => {}
                ScanState::Word { start } => self.emit(start, self.line.len(), Quote::None),
                ScanState::Quoted { start, quote } => {
                    self.emit(start, self.line.len(), Quote::of(quote))
                }
            }
        }
        self.tokens
    }

    fn emit(&mut self, start: usize, end: usize, quote: Quote) {
        self.tokens.push(Token { start, end, quote });
    }

    fn handle_quoted(&mut self, ch: char, start: usize, quote: char) {
        let next = self.pos + ch.len_utf8();
        if ch == quote {
            self.emit(start, next, Quote::of(quote));
            self.state = ScanState::Between;
        }
        self.pos = next;
    }

    fn handle_delimiter(&mut self) {
        if let ScanState::Word { start } = self.state {
            self.emit(start, self.pos, Quote::None);
        }
        self.state = ScanState::Between;
        self.pos += self.delimiter.len();
    }

    fn handle_char(&mut self, ch: char) {
        if is_quote(ch) {
            if let ScanState::Word { start } = self.state {
                self.emit(start, self.pos, Quote::None);
            }
            self.state = ScanState::Quoted {
                start: self.pos,
                quote: ch,
            };
        } else if self.state == ScanState::Between {
            self.state = ScanState::Word { start: self.pos };
        }
        self.pos += ch.len_utf8();
    }
}

/// Locate the tokens of `line` without dequoting them.
///
/// `limit == 0` means no limit; otherwise scanning stops as soon as `limit`
/// tokens were found and the rest of the line is ignored.
pub fn scan(line: &str, delimiter: &str, limit: usize) -> Result<Vec<Token>> {
    if delimiter.is_empty() || delimiter.contains(is_quote) {
        return Err(ShellError::UnsupportedConfiguration(delimiter.to_string()));
    }
    Ok(Scanner::new(line, delimiter, limit).run())
}

/// Split `line` on `delimiter` honoring quotes, and dequote every token.
///
/// ```
/// use quiz_shell::tokenize;
/// let tokens = tokenize("set name 'two words'", " ", 0).unwrap();
/// assert_eq!(tokens, vec!["set", "name", "two words"]);
/// ```
pub fn tokenize(line: &str, delimiter: &str, limit: usize) -> Result<Vec<String>> {
    scan(line, delimiter, limit)?
        .iter()
        .map(|token| dequote(token.text(line)))
        .collect()
}

/// Strip matching quote layers from both ends of `token`.
///
/// `"'x'"` becomes `x`. A token starting or ending with a quote that the other
/// end does not match is rejected, and so is a lone quote between two quotes
/// of the same kind.
pub fn dequote(token: &str) -> Result<String> {
    let chars: Vec<char> = token.chars().collect();
    let (Some(&first), Some(&last)) = (chars.first(), chars.last()) else {
        return Ok(String::new());
    };

    if (chars.len() == 1 && is_quote(first)) || ((is_quote(first) || is_quote(last)) && first != last)
    {
        return Err(ShellError::UnbalancedQuote(token.to_string()));
    }

    let mut prev_quote = None;
    let mut depth = 0;
    loop {
        let back = chars.len() - depth - 1;
        let ch = chars[depth];
        if ch != chars[back] || !is_quote(ch) {
            break;
        }
        if depth == back {
            // a single quote character left in the middle
            if prev_quote == Some(ch) {
                return Err(ShellError::UnpairedQuoteBetweenQuotes(token.to_string()));
            }
            break;
        }
        if depth + 1 == back {
            depth += 1;
            break;
        }
        prev_quote = Some(ch);
        depth += 1;
    }

    Ok(chars[depth..chars.len() - depth].iter().collect())
}
