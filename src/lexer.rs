// Sirocco Lexer — tokenizes .sco source files

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    Double(f64),
    Bool(bool),
    Null,
    // A string literal split into literal text and `${...}` / `$ident`
    // interpolation pieces; the parser re-parses the pieces
    StringLit(Vec<StrPiece>),

    // Identifiers & keywords
    Ident(String),
    Var,
    Final,
    Const,
    If,
    Else,
    While,
    Do,
    For,
    In,
    Return,
    Break,
    Continue,
    Try,
    Catch,
    Finally,
    On,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    TildeSlash,
    Percent,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    TildeSlashEq,
    PercentEq,
    PlusPlus,
    MinusMinus,
    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,
    Not,
    Question,
    Colon,
    Dot,
    Ellipsis,
    EllipsisQuestion,
    FatArrow,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,

    // Special
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrPiece {
    Lit(String),
    // Raw source text of an embedded expression
    Interp(String),
}

#[derive(Debug, Clone)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone)]
pub struct TokenWithSpan {
    pub token: Token,
    pub span: Span,
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span { line: self.line, col: self.col }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_string(&mut self, quote: char) -> Result<Token, String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        loop {
            match self.advance() {
                None => return Err("Unterminated string literal".to_string()),
                Some(c) if c == quote => break,
                Some('\\') => match self.advance() {
                    Some('n') => current.push('\n'),
                    Some('t') => current.push('\t'),
                    Some('r') => current.push('\r'),
                    Some('\\') => current.push('\\'),
                    Some('$') => current.push('$'),
                    Some('0') => current.push('\0'),
                    Some(c) if c == quote => current.push(c),
                    Some(c) => { current.push('\\'); current.push(c); }
                    None => return Err("Unterminated escape".to_string()),
                },
                Some('$') => {
                    if self.peek() == Some('{') {
                        self.advance();
                        let mut src = String::new();
                        let mut depth = 1;
                        loop {
                            match self.advance() {
                                None => return Err("Unterminated interpolation".to_string()),
                                Some('{') => { depth += 1; src.push('{'); }
                                Some('}') => {
                                    depth -= 1;
                                    if depth == 0 { break; }
                                    src.push('}');
                                }
                                Some(c) => src.push(c),
                            }
                        }
                        if !current.is_empty() {
                            pieces.push(StrPiece::Lit(std::mem::take(&mut current)));
                        }
                        pieces.push(StrPiece::Interp(src));
                    } else if self.peek().map_or(false, |c| c.is_alphabetic() || c == '_') {
                        // $name shorthand
                        let mut name = String::new();
                        while let Some(c) = self.peek() {
                            if c.is_alphanumeric() || c == '_' {
                                name.push(c);
                                self.advance();
                            } else {
                                break;
                            }
                        }
                        if !current.is_empty() {
                            pieces.push(StrPiece::Lit(std::mem::take(&mut current)));
                        }
                        pieces.push(StrPiece::Interp(name));
                    } else {
                        current.push('$');
                    }
                }
                Some(c) => current.push(c),
            }
        }
        if !current.is_empty() || pieces.is_empty() {
            pieces.push(StrPiece::Lit(current));
        }
        Ok(Token::StringLit(pieces))
    }

    fn read_number(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);
        let mut is_double = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else if c == '.' && !is_double && self.peek2().map_or(false, |x| x.is_ascii_digit()) {
                is_double = true;
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if is_double {
            Token::Double(s.parse().unwrap_or(0.0))
        } else {
            Token::Int(s.parse().unwrap_or(0))
        }
    }

    fn read_ident(&mut self, first: char) -> Token {
        let mut s = String::new();
        s.push(first);
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match s.as_str() {
            "var"      => Token::Var,
            "final"    => Token::Final,
            "const"    => Token::Const,
            "if"       => Token::If,
            "else"     => Token::Else,
            "while"    => Token::While,
            "do"       => Token::Do,
            "for"      => Token::For,
            "in"       => Token::In,
            "return"   => Token::Return,
            "break"    => Token::Break,
            "continue" => Token::Continue,
            "try"      => Token::Try,
            "catch"    => Token::Catch,
            "finally"  => Token::Finally,
            "on"       => Token::On,
            "true"     => Token::Bool(true),
            "false"    => Token::Bool(false),
            "null"     => Token::Null,
            _          => Token::Ident(s),
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<TokenWithSpan>, String> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let span = self.current_span();

            let ch = match self.peek() {
                None => {
                    tokens.push(TokenWithSpan { token: Token::Eof, span });
                    break;
                }
                Some(c) => c,
            };

            // Comments
            if ch == '/' && self.peek2() == Some('/') {
                while let Some(c) = self.peek() {
                    if c == '\n' { break; }
                    self.advance();
                }
                continue;
            }

            // Multi-line comments
            if ch == '/' && self.peek2() == Some('*') {
                self.advance(); self.advance();
                loop {
                    match self.advance() {
                        None => return Err("Unterminated block comment".to_string()),
                        Some('*') if self.peek() == Some('/') => { self.advance(); break; }
                        _ => {}
                    }
                }
                continue;
            }

            self.advance();

            let token = match ch {
                '"' | '\'' => self.read_string(ch)?,
                c if c.is_ascii_digit() => self.read_number(c),
                c if c.is_alphabetic() || c == '_' => self.read_ident(c),
                '+' => {
                    if self.peek() == Some('+') { self.advance(); Token::PlusPlus }
                    else if self.peek() == Some('=') { self.advance(); Token::PlusEq }
                    else { Token::Plus }
                }
                '-' => {
                    if self.peek() == Some('-') { self.advance(); Token::MinusMinus }
                    else if self.peek() == Some('=') { self.advance(); Token::MinusEq }
                    else { Token::Minus }
                }
                '*' => {
                    if self.peek() == Some('=') { self.advance(); Token::StarEq }
                    else { Token::Star }
                }
                '/' => {
                    if self.peek() == Some('=') { self.advance(); Token::SlashEq }
                    else { Token::Slash }
                }
                '~' => {
                    if self.peek() == Some('/') {
                        self.advance();
                        if self.peek() == Some('=') { self.advance(); Token::TildeSlashEq }
                        else { Token::TildeSlash }
                    } else {
                        return Err(format!("Unexpected character '~' at line {}, col {}", span.line, span.col));
                    }
                }
                '%' => {
                    if self.peek() == Some('=') { self.advance(); Token::PercentEq }
                    else { Token::Percent }
                }
                '=' => {
                    if self.peek() == Some('=') { self.advance(); Token::EqEq }
                    else if self.peek() == Some('>') { self.advance(); Token::FatArrow }
                    else { Token::Eq }
                }
                '!' => {
                    if self.peek() == Some('=') { self.advance(); Token::NotEq }
                    else { Token::Not }
                }
                '<' => {
                    if self.peek() == Some('=') { self.advance(); Token::LtEq }
                    else { Token::Lt }
                }
                '>' => {
                    if self.peek() == Some('=') { self.advance(); Token::GtEq }
                    else { Token::Gt }
                }
                '&' => {
                    if self.peek() == Some('&') { self.advance(); Token::AndAnd }
                    else {
                        return Err(format!("Unexpected character '&' at line {}, col {}", span.line, span.col));
                    }
                }
                '|' => {
                    if self.peek() == Some('|') { self.advance(); Token::OrOr }
                    else {
                        return Err(format!("Unexpected character '|' at line {}, col {}", span.line, span.col));
                    }
                }
                '.' => {
                    if self.peek() == Some('.') && self.peek2() == Some('.') {
                        self.advance();
                        self.advance();
                        if self.peek() == Some('?') { self.advance(); Token::EllipsisQuestion }
                        else { Token::Ellipsis }
                    } else if self.peek() == Some('.') {
                        return Err(format!("Unexpected '..' at line {}, col {}", span.line, span.col));
                    } else {
                        Token::Dot
                    }
                }
                '?' => Token::Question,
                ':' => Token::Colon,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '{' => Token::LBrace,
                '}' => Token::RBrace,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                ',' => Token::Comma,
                ';' => Token::Semicolon,
                _ => return Err(format!("Unexpected character '{}' at line {}, col {}", ch, span.line, span.col)),
            };

            tokens.push(TokenWithSpan { token, span });
        }

        Ok(tokens)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
