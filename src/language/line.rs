//! Source lines broken into typed tokens, and the structural queries the
//! scanner asks of them.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Word,
    Whitespace,
    Symbol,
    Quote,
    Flag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// The delimiter character that enclosed a Quote token. Empty otherwise.
    pub quote_mark: String,
    /// The leading dashes of a Flag token. Empty otherwise.
    pub flag_prefix: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: &str) -> Token {
        Token {
            kind,
            value: value.to_string(),
            quote_mark: String::new(),
            flag_prefix: String::new(),
        }
    }

    pub fn word(value: &str) -> Token {
        Token::new(TokenKind::Word, value)
    }

    pub fn whitespace(value: &str) -> Token {
        Token::new(TokenKind::Whitespace, value)
    }

    pub fn symbol(value: &str) -> Token {
        Token::new(TokenKind::Symbol, value)
    }

    pub fn quote(value: &str, mark: char) -> Token {
        Token {
            kind: TokenKind::Quote,
            value: value.to_string(),
            quote_mark: mark.to_string(),
            flag_prefix: String::new(),
        }
    }

    pub fn flag(value: &str, prefix: &str) -> Token {
        Token {
            kind: TokenKind::Flag,
            value: value.to_string(),
            quote_mark: String::new(),
            flag_prefix: prefix.to_string(),
        }
    }
}

/// One physical line of source, as a token sequence plus derived positions.
/// The derived fields are recomputed whenever the tokens change; they are
/// never edited independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    /// 1-based position in the source file. 0 for synthesized lines.
    pub line_num: usize,
    /// Index of the first non-whitespace token, if any.
    pub start: Option<usize>,
    /// Index of the last non-whitespace token, if any.
    pub end: Option<usize>,
    /// Index of the first Word token, if any.
    pub word_start: Option<usize>,
    pub tokens: Vec<Token>,
}

fn classify(c: char) -> TokenKind {
    if c == '`' {
        return TokenKind::Word;
    }
    if c.is_alphanumeric() || c == '_' {
        return TokenKind::Word;
    }
    if c.is_whitespace() {
        return TokenKind::Whitespace;
    }
    TokenKind::Symbol
}

/// Break one line of raw text into tokens. A backtick toggles forced-word
/// mode without producing a token itself; inside it every character counts
/// as a Word. Runs of the same kind merge, except Symbols which are always
/// one character each.
pub fn tokenize(line_num: usize, text: &str) -> Line {
    let mut tokens: Vec<Token> = Vec::new();
    let mut current: Option<TokenKind> = None;
    let mut forced_word = false;

    for c in text.chars() {
        if c == '`' {
            forced_word = !forced_word;
            continue;
        }
        let kind = if forced_word {
            TokenKind::Word
        } else {
            classify(c)
        };

        if current == Some(kind) {
            if let Some(last) = tokens.last_mut() {
                last.value
                    .push(c);
            }
            continue;
        }

        tokens.push(Token::new(kind, &c.to_string()));
        current = if kind == TokenKind::Symbol {
            // Symbols never merge, so the next character always opens a
            // fresh token.
            None
        } else {
            Some(kind)
        };
    }

    Line::from_tokens(line_num, tokens)
}

/// Tokenize a whole file's worth of raw lines, numbering them from 1.
pub fn tokenize_lines(lines_raw: &[&str]) -> Vec<Line> {
    lines_raw
        .iter()
        .enumerate()
        .map(|(i, raw)| tokenize(i + 1, raw))
        .collect()
}

impl Line {
    pub fn from_tokens(line_num: usize, tokens: Vec<Token>) -> Line {
        let mut line = Line {
            line_num,
            start: None,
            end: None,
            word_start: None,
            tokens,
        };
        line.remark();
        line
    }

    fn remark(&mut self) {
        self.start = None;
        self.end = None;
        self.word_start = None;
        for (idx, token) in self
            .tokens
            .iter()
            .enumerate()
        {
            if token.kind != TokenKind::Whitespace {
                self.end = Some(idx);
                if self
                    .start
                    .is_none()
                {
                    self.start = Some(idx);
                }
            }
            if token.kind == TokenKind::Word
                && self
                    .word_start
                    .is_none()
            {
                self.word_start = Some(idx);
            }
        }
    }

    /// Reassemble the raw text this line was tokenized from.
    pub fn raw(&self) -> String {
        self.tokens
            .iter()
            .map(|token| {
                token
                    .value
                    .as_str()
            })
            .collect()
    }

    pub fn first_word(&self) -> &str {
        match self.word_start {
            Some(idx) => &self.tokens[idx].value,
            None => "",
        }
    }

    pub fn only_whitespace(&self) -> bool {
        self.start
            .is_none()
    }

    pub fn empty(&self) -> bool {
        self.tokens
            .is_empty()
    }

    /// The leading whitespace of this line, or "" when the line starts with
    /// content immediately.
    pub fn starting_whitespace(&self) -> &str {
        if self.start == Some(0) {
            return "";
        }
        match self
            .tokens
            .first()
        {
            Some(token) if token.kind == TokenKind::Whitespace => &token.value,
            _ => "",
        }
    }

    /// Do the tokens beginning at `index` spell out `symbol_seq`, one
    /// single-character Symbol token per character?
    pub fn has_symbol_seq(&self, index: usize, symbol_seq: &str) -> bool {
        if self
            .start
            .is_none()
        {
            return false;
        }
        let count = symbol_seq
            .chars()
            .count();
        if self
            .tokens
            .len()
            < index + count
        {
            return false;
        }
        for (offset, c) in symbol_seq
            .chars()
            .enumerate()
        {
            let token = &self.tokens[index + offset];
            if token.kind != TokenKind::Symbol || token.value != c.to_string() {
                return false;
            }
        }
        true
    }

    pub fn starts_with_symbol_seq(&self, symbol_seq: &str) -> bool {
        match self.start {
            Some(start) => self.has_symbol_seq(start, symbol_seq),
            None => false,
        }
    }

    pub fn ends_with_symbol_seq(&self, symbol_seq: &str) -> bool {
        let end = match self.end {
            Some(end) => end,
            None => return false,
        };
        let count = symbol_seq
            .chars()
            .count();
        if end + 1 < count {
            return false;
        }
        for (offset, c) in symbol_seq
            .chars()
            .rev()
            .enumerate()
        {
            let token = &self.tokens[end - offset];
            if token.kind != TokenKind::Symbol || token.value != c.to_string() {
                return false;
            }
        }
        true
    }

    /// True when the line holds exactly one non-whitespace token and its
    /// value is `value`.
    pub fn only_non_whitespace_equals(&self, value: &str) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start == end => self.tokens[start].value == value,
            _ => false,
        }
    }

    /// True when the non-whitespace token values equal `values`, in order
    /// and in count. Used to spot multi-word branch markers.
    pub fn is_seq_of_strings(&self, values: &[&str]) -> bool {
        let mut remaining = values.iter();
        for token in &self.tokens {
            if token.kind == TokenKind::Whitespace {
                continue;
            }
            match remaining.next() {
                Some(value) if token.value == *value => {}
                _ => return false,
            }
        }
        remaining
            .next()
            .is_none()
    }

    /// A copy of this line holding only the tokens strictly after the first
    /// Word token, with positions recomputed. The instruction name itself is
    /// dropped; a line with no Word token crops to an empty line.
    pub fn crop_from_first_word(&self) -> Line {
        let tokens = match self.word_start {
            Some(idx) => self.tokens[idx + 1..].to_vec(),
            None => vec![],
        };
        Line::from_tokens(self.line_num, tokens)
    }

    /// A copy with a single leading and/or trailing whitespace token
    /// removed.
    pub fn trim(&self) -> Line {
        let mut tokens = self
            .tokens
            .clone();
        if let Some(last) = tokens.last() {
            if last.kind == TokenKind::Whitespace {
                tokens.pop();
            }
        }
        if let Some(first) = tokens.first() {
            if first.kind == TokenKind::Whitespace {
                tokens.remove(0);
            }
        }
        Line::from_tokens(self.line_num, tokens)
    }

    pub fn append(&mut self, line: &Line) {
        self.tokens
            .extend_from_slice(&line.tokens);
        self.remark();
    }

    pub fn push_char(&mut self, c: char) {
        self.tokens
            .push(Token::new(classify(c), &c.to_string()));
        self.remark();
    }
}

/// Fold quoted spans into single Quote tokens. A `"` or `'` Symbol opens a
/// quote; everything up to the matching delimiter is concatenated into one
/// token carrying the delimiter as its quote mark. A backslash escapes the
/// active delimiter.
pub fn fold_quotes(line: &Line) -> Line {
    let mut tokens: Vec<Token> = Vec::new();
    let mut buffer = String::new();
    let mut delimiter: Option<char> = None;

    let mut idx = 0;
    while idx < line
        .tokens
        .len()
    {
        let token = &line.tokens[idx];
        match delimiter {
            None => {
                if token.kind == TokenKind::Symbol
                    && (token.value == "\"" || token.value == "'")
                {
                    delimiter = token
                        .value
                        .chars()
                        .next();
                } else {
                    tokens.push(token.clone());
                }
            }
            Some(mark) => {
                if token.kind == TokenKind::Symbol && token.value == "\\" {
                    if let Some(next) = line
                        .tokens
                        .get(idx + 1)
                    {
                        if next.kind == TokenKind::Symbol && next.value == mark.to_string() {
                            buffer.push(mark);
                            idx += 2;
                            continue;
                        }
                    }
                    buffer.push_str(&token.value);
                } else if token.kind == TokenKind::Symbol && token.value == mark.to_string() {
                    tokens.push(Token::quote(&buffer, mark));
                    buffer.clear();
                    delimiter = None;
                } else {
                    buffer.push_str(&token.value);
                }
            }
        }
        idx += 1;
    }

    Line::from_tokens(line.line_num, tokens)
}

/// Fold `-name` and `--long-name` spans into single Flag tokens. Dashes
/// before the first word accumulate as the flag's prefix; dashes after it
/// are part of the name. Dashes that never reach a word stay plain Symbols.
pub fn fold_flags(line: &Line) -> Line {
    let mut tokens: Vec<Token> = Vec::new();
    let mut name = String::new();
    let mut prefix = String::new();
    let mut seen_word = false;
    let mut in_flag = false;

    for token in &line.tokens {
        if !in_flag {
            if token.kind == TokenKind::Symbol && token.value == "-" {
                in_flag = true;
                prefix.push('-');
            } else {
                tokens.push(token.clone());
            }
            continue;
        }
        match token.kind {
            TokenKind::Word => {
                name.push_str(&token.value);
                seen_word = true;
            }
            TokenKind::Symbol if token.value == "-" => {
                if seen_word {
                    name.push('-');
                } else {
                    prefix.push('-');
                }
            }
            TokenKind::Whitespace => {
                flush_flag(&mut tokens, &mut name, &mut prefix, &mut seen_word);
                in_flag = false;
                tokens.push(token.clone());
            }
            // Any other token does not survive flag folding.
            _ => {}
        }
    }
    if in_flag {
        flush_flag(&mut tokens, &mut name, &mut prefix, &mut seen_word);
    }

    Line::from_tokens(line.line_num, tokens)
}

fn flush_flag(tokens: &mut Vec<Token>, name: &mut String, prefix: &mut String, seen_word: &mut bool) {
    if *seen_word {
        tokens.push(Token::flag(name, prefix));
    } else {
        // A bare run of dashes followed by whitespace was never a flag.
        for _ in prefix.chars() {
            tokens.push(Token::symbol("-"));
        }
    }
    name.clear();
    prefix.clear();
    *seen_word = false;
}
