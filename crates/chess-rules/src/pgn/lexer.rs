//! Splits PGN text into tokens and games.
//!
//! Comments, variations, NAGs and escape lines are dropped here so the
//! decoder only sees tags, ply tokens and results.

use super::tags::Tags;
use super::PgnError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Tag { name: String, value: String },
    Ply(String),
    Result(String),
}

/// A token and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub line: usize,
}

/// One game's header and move text, not yet interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RawGame {
    pub tags: Tags,
    /// Ply tokens with their line numbers.
    pub plies: Vec<(String, usize)>,
    pub result: Option<String>,
}

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Lexer {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.chars[self.pos - 1] == '\n'
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '}' {
                break;
            }
        }
    }

    fn skip_variation(&mut self) {
        let mut depth = 1;
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                '{' => self.skip_comment(),
                ';' => self.skip_line(),
                _ => {}
            }
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(|c| c == ' ' || c == '\t') {
            self.bump();
        }
    }

    /// Reads `Name "Value"]` after the opening bracket.
    fn tag(&mut self) -> Result<Token, PgnError> {
        let line = self.line;
        let unterminated = PgnError::UnterminatedTag { line };
        let malformed = |message: &str| PgnError::Syntax {
            line,
            message: message.to_string(),
        };

        self.skip_spaces();
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_ascii_alphanumeric() || *c == '_') {
            name.push(c);
            self.bump();
        }
        if name.is_empty() {
            return Err(malformed("tag without a name"));
        }

        self.skip_spaces();
        match self.bump() {
            Some('"') => {}
            None | Some('\n') => return Err(unterminated),
            Some(_) => return Err(malformed("tag value must be quoted")),
        }
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    None | Some('\n') => return Err(unterminated),
                    Some(c) => value.push(c),
                },
                None | Some('\n') => return Err(unterminated),
                Some(c) => value.push(c),
            }
        }

        self.skip_spaces();
        match self.bump() {
            Some(']') => Ok(Token::Tag { name, value }),
            None | Some('\n') => Err(unterminated),
            Some(_) => Err(malformed("unexpected text after tag value")),
        }
    }

    fn word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || "[]{}();$".contains(c) {
                break;
            }
            word.push(c);
            self.bump();
        }
        word
    }
}

/// Tokenizes a whole PGN text.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Spanned>, PgnError> {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();

    while let Some(c) = lexer.peek() {
        let line = lexer.line;
        match c {
            c if c.is_whitespace() => {
                lexer.bump();
            }
            '%' if lexer.at_line_start() => lexer.skip_line(),
            ';' => lexer.skip_line(),
            '{' => {
                lexer.bump();
                lexer.skip_comment();
            }
            '(' => {
                lexer.bump();
                lexer.skip_variation();
            }
            '$' => {
                lexer.bump();
                while lexer.peek().is_some_and(|c| c.is_ascii_digit()) {
                    lexer.bump();
                }
            }
            '[' => {
                lexer.bump();
                let token = lexer.tag()?;
                tokens.push(Spanned { token, line });
            }
            ']' | '}' | ')' => {
                return Err(PgnError::Syntax {
                    line,
                    message: format!("unexpected '{}'", c),
                });
            }
            _ => {
                let word = lexer.word();
                tokens.extend(classify(&word).into_iter().map(|token| Spanned { token, line }));
            }
        }
    }
    Ok(tokens)
}

/// Sorts a move-text word into results, move numbers (dropped) and plies.
fn classify(word: &str) -> Vec<Token> {
    if RESULTS.contains(&word) {
        return vec![Token::Result(word.to_string())];
    }
    let after_digits = word.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() < word.len() {
        let after_dots = after_digits.trim_start_matches('.');
        if after_dots.len() < after_digits.len() || after_digits.is_empty() {
            return classify(after_dots);
        }
    }
    if word.is_empty() {
        Vec::new()
    } else {
        vec![Token::Ply(word.to_string())]
    }
}

/// Groups tokens into games. A result ends a game; a tag after move text
/// starts a new one.
pub(crate) fn split_games(tokens: Vec<Spanned>) -> Vec<RawGame> {
    let mut games = Vec::new();
    let mut current = RawGame::default();
    let mut in_movetext = false;

    for Spanned { token, line } in tokens {
        match token {
            Token::Tag { name, value } => {
                if in_movetext {
                    games.push(std::mem::take(&mut current));
                    in_movetext = false;
                }
                current.tags.set(name, value);
            }
            Token::Ply(text) => {
                in_movetext = true;
                current.plies.push((text, line));
            }
            Token::Result(result) => {
                current.result = Some(result);
                games.push(std::mem::take(&mut current));
                in_movetext = false;
            }
        }
    }
    if !current.tags.is_empty() || !current.plies.is_empty() {
        games.push(current);
    }
    games
}
