// ═══════════════════════════════════════════════════════════
// Sirocco Parser — turns tokens into AST
// ═══════════════════════════════════════════════════════════

use crate::ast::*;
use crate::lexer::{Lexer, StrPiece, Token, TokenWithSpan};

pub struct Parser {
    tokens: Vec<TokenWithSpan>,
    pos: usize,
    loop_depth: usize,
    fun_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithSpan>) -> Self {
        Parser { tokens, pos: 0, loop_depth: 0, fun_depth: 0 }
    }

    // ── Token navigation ──────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos].token
    }

    fn peek2(&self) -> &Token {
        self.tokens.get(self.pos + 1).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn span_line(&self) -> usize {
        self.tokens[self.pos].span.line
    }

    fn advance(&mut self) -> &Token {
        let t = &self.tokens[self.pos].token;
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        t
    }

    fn check(&self, t: &Token) -> bool { self.peek() == t }

    fn eat(&mut self, t: &Token) -> bool {
        if self.peek() == t { self.advance(); true } else { false }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(format!("Expected {:?}, got {:?} at line {}", expected, self.peek(), self.span_line()))
        }
    }

    fn expect_ident(&mut self) -> Result<String, String> {
        match self.peek().clone() {
            Token::Ident(s) => { self.advance(); Ok(s) }
            other => Err(format!("Expected identifier, got {:?} at line {}", other, self.span_line())),
        }
    }

    // A terminating semicolon; the very last one before EOF may be omitted
    fn expect_semi(&mut self) -> Result<(), String> {
        if self.eat(&Token::Semicolon) || self.check(&Token::Eof) {
            Ok(())
        } else {
            Err(format!("Expected ';', got {:?} at line {}", self.peek(), self.span_line()))
        }
    }

    // ── Top-level parsing ─────────────────────────────────────────────────────

    /// A compilation unit: function declarations and variable declaration
    /// groups only. Anything else at top level is rejected outright.
    pub fn parse_program(&mut self) -> Result<Vec<Stmt>, String> {
        let mut decls = Vec::new();
        while !self.check(&Token::Eof) {
            decls.push(self.parse_top_level()?);
        }
        Ok(decls)
    }

    /// A statement sequence, as typed at the REPL.
    pub fn parse_repl(&mut self) -> Result<Vec<Stmt>, String> {
        let mut stmts = Vec::new();
        while !self.check(&Token::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_top_level(&mut self) -> Result<Stmt, String> {
        match self.peek().clone() {
            Token::Var | Token::Final | Token::Const => {
                let decl = self.parse_var_decl()?;
                self.expect_semi()?;
                Ok(decl)
            }
            Token::Ident(_) if self.peek2() == &Token::LParen => {
                Ok(Stmt::FunDecl(self.parse_fun_decl()?))
            }
            other => Err(format!(
                "Expected a declaration at top level, got {:?} at line {}",
                other,
                self.span_line()
            )),
        }
    }

    // ── Statements ────────────────────────────────────────────────────────────

    fn parse_stmt(&mut self) -> Result<Stmt, String> {
        match self.peek().clone() {
            Token::Var | Token::Final | Token::Const => {
                let decl = self.parse_var_decl()?;
                self.expect_semi()?;
                Ok(decl)
            }
            Token::LBrace => {
                self.advance();
                let body = self.parse_block_body()?;
                self.expect(&Token::RBrace)?;
                Ok(Stmt::Block(body))
            }
            Token::If     => self.parse_if_stmt(),
            Token::While  => self.parse_while(),
            Token::Do     => self.parse_do_while(),
            Token::For    => self.parse_for(),
            Token::Try    => self.parse_try(),
            Token::Return => {
                if self.fun_depth == 0 {
                    return Err(format!("'return' outside of a function at line {}", self.span_line()));
                }
                self.advance();
                let value = if self.check(&Token::Semicolon) || self.check(&Token::Eof) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect_semi()?;
                Ok(Stmt::Return(value))
            }
            Token::Break => {
                if self.loop_depth == 0 {
                    return Err(format!("'break' outside of a loop at line {}", self.span_line()));
                }
                self.advance();
                self.expect_semi()?;
                Ok(Stmt::Break)
            }
            Token::Continue => {
                if self.loop_depth == 0 {
                    return Err(format!("'continue' outside of a loop at line {}", self.span_line()));
                }
                self.advance();
                self.expect_semi()?;
                Ok(Stmt::Continue)
            }
            Token::Ident(_) if self.peek2() == &Token::LParen => {
                // Local function declaration or an ordinary call — try the
                // declaration shape first and back off if it doesn't fit.
                let saved = self.pos;
                match self.parse_fun_decl() {
                    Ok(decl) => Ok(Stmt::FunDecl(decl)),
                    Err(_) => {
                        self.pos = saved;
                        let expr = self.parse_expr()?;
                        self.expect_semi()?;
                        Ok(Stmt::Expr(expr))
                    }
                }
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect_semi()?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, String> {
        let mut stmts = Vec::new();
        while !self.check(&Token::RBrace) && !self.check(&Token::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_var_decl(&mut self) -> Result<Stmt, String> {
        let modifier = match self.advance() {
            Token::Final => VarModifier::Final,
            Token::Const => VarModifier::Const,
            _            => VarModifier::Var,
        };
        let mut decls = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let init = if self.eat(&Token::Eq) { Some(self.parse_expr()?) } else { None };
            decls.push((name, init));
            if !self.eat(&Token::Comma) { break; }
        }
        Ok(Stmt::VarDecl { modifier, decls })
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, String> {
        self.expect(&Token::If)?;
        self.expect(&Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(&Token::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If { cond, then_branch, else_branch })
    }

    fn parse_while(&mut self) -> Result<Stmt, String> {
        self.expect(&Token::While)?;
        self.expect(&Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        let body = Box::new(self.parse_loop_body()?);
        Ok(Stmt::While { cond, body })
    }

    fn parse_do_while(&mut self) -> Result<Stmt, String> {
        self.expect(&Token::Do)?;
        let body = Box::new(self.parse_loop_body()?);
        self.expect(&Token::While)?;
        self.expect(&Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&Token::RParen)?;
        self.expect_semi()?;
        Ok(Stmt::DoWhile { body, cond })
    }

    fn parse_for(&mut self) -> Result<Stmt, String> {
        self.expect(&Token::For)?;
        self.expect(&Token::LParen)?;

        // for (x in xs) / for (var x in xs)
        let saved = self.pos;
        {
            let _ = self.eat(&Token::Var) || self.eat(&Token::Final) || self.eat(&Token::Const);
            if let Token::Ident(name) = self.peek().clone() {
                self.advance();
                if self.eat(&Token::In) {
                    let iterable = self.parse_expr()?;
                    self.expect(&Token::RParen)?;
                    let body = Box::new(self.parse_loop_body()?);
                    return Ok(Stmt::ForIn { var: name, iterable, body });
                }
            }
            self.pos = saved;
        }

        // for (init; cond; update, ...)
        let init = if self.eat(&Token::Semicolon) {
            None
        } else if matches!(self.peek(), Token::Var | Token::Final | Token::Const) {
            let decl = self.parse_var_decl()?;
            self.expect(&Token::Semicolon)?;
            Some(Box::new(decl))
        } else {
            let expr = self.parse_expr()?;
            self.expect(&Token::Semicolon)?;
            Some(Box::new(Stmt::Expr(expr)))
        };

        let cond = if self.check(&Token::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&Token::Semicolon)?;

        let mut update = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                update.push(self.parse_expr()?);
                if !self.eat(&Token::Comma) { break; }
            }
        }
        self.expect(&Token::RParen)?;

        let body = Box::new(self.parse_loop_body()?);
        Ok(Stmt::For { init, cond, update, body })
    }

    fn parse_loop_body(&mut self) -> Result<Stmt, String> {
        self.loop_depth += 1;
        let body = self.parse_stmt();
        self.loop_depth -= 1;
        body
    }

    fn parse_try(&mut self) -> Result<Stmt, String> {
        self.expect(&Token::Try)?;
        self.expect(&Token::LBrace)?;
        let body = self.parse_block_body()?;
        self.expect(&Token::RBrace)?;

        let mut catch = None;
        if self.check(&Token::On) || self.check(&Token::Catch) {
            let exception_type = if self.eat(&Token::On) {
                Some(self.expect_ident()?)
            } else {
                None
            };
            let param = if self.eat(&Token::Catch) {
                self.expect(&Token::LParen)?;
                let p = self.expect_ident()?;
                self.expect(&Token::RParen)?;
                Some(p)
            } else {
                None
            };
            self.expect(&Token::LBrace)?;
            let catch_body = self.parse_block_body()?;
            self.expect(&Token::RBrace)?;
            catch = Some(CatchClause { exception_type, param, body: catch_body });
        }

        let finally = if self.eat(&Token::Finally) {
            self.expect(&Token::LBrace)?;
            let f = self.parse_block_body()?;
            self.expect(&Token::RBrace)?;
            Some(f)
        } else {
            None
        };

        if catch.is_none() && finally.is_none() {
            return Err(format!("Expected 'catch' or 'finally' after try block at line {}", self.span_line()));
        }
        Ok(Stmt::Try { body, catch, finally })
    }

    // ── Functions ─────────────────────────────────────────────────────────────

    fn parse_fun_decl(&mut self) -> Result<FunDecl, String> {
        let name = self.expect_ident()?;
        let (params, optional_params) = self.parse_params()?;
        if !self.check(&Token::FatArrow) && !self.check(&Token::LBrace) {
            return Err(format!("Expected function body at line {}", self.span_line()));
        }
        let body = self.parse_fun_body()?;
        if matches!(body, FunBody::Expr(_)) {
            self.expect_semi()?;
        }
        Ok(FunDecl { name, params, optional_params, body })
    }

    fn parse_params(&mut self) -> Result<(Vec<String>, bool), String> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        let mut optional = false;
        loop {
            match self.peek().clone() {
                Token::RParen => break,
                // [a, b] / {a, b} — optional or named parameter group.
                // Parsed so declarations are recognized, refused at runtime.
                Token::LBracket | Token::LBrace => {
                    let close = if self.check(&Token::LBracket) { Token::RBracket } else { Token::RBrace };
                    self.advance();
                    optional = true;
                    while !self.check(&close) {
                        self.expect_ident()?;
                        if self.eat(&Token::Eq) {
                            self.parse_expr()?;
                        }
                        if !self.eat(&Token::Comma) { break; }
                    }
                    self.expect(&close)?;
                    break;
                }
                _ => {
                    params.push(self.expect_ident()?);
                    if !self.eat(&Token::Comma) { break; }
                }
            }
        }
        self.expect(&Token::RParen)?;
        Ok((params, optional))
    }

    // Body of a declaration or literal. Loop depth resets inside: a `break`
    // in a nested function never targets an enclosing loop.
    fn parse_fun_body(&mut self) -> Result<FunBody, String> {
        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.fun_depth += 1;
        let body = if self.eat(&Token::FatArrow) {
            self.parse_expr().map(|e| FunBody::Expr(Box::new(e)))
        } else {
            (|| {
                self.expect(&Token::LBrace)?;
                let stmts = self.parse_block_body()?;
                self.expect(&Token::RBrace)?;
                Ok(FunBody::Block(stmts))
            })()
        };
        self.fun_depth -= 1;
        self.loop_depth = outer_loops;
        body
    }

    // ── Expressions ───────────────────────────────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, String> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, String> {
        let lhs = self.parse_conditional()?;
        let op = match self.peek() {
            Token::Eq           => Some(None),
            Token::PlusEq       => Some(Some(BinOp::Add)),
            Token::MinusEq      => Some(Some(BinOp::Sub)),
            Token::StarEq       => Some(Some(BinOp::Mul)),
            Token::SlashEq      => Some(Some(BinOp::Div)),
            Token::TildeSlashEq => Some(Some(BinOp::TruncDiv)),
            Token::PercentEq    => Some(Some(BinOp::Mod)),
            _ => None,
        };
        if let Some(op) = op {
            if !is_place(&lhs) {
                return Err(format!("Invalid assignment target at line {}", self.span_line()));
            }
            self.advance();
            let value = self.parse_assignment()?;
            return Ok(Expr::Assign {
                target: Box::new(lhs),
                op,
                value: Box::new(value),
            });
        }
        Ok(lhs)
    }

    fn parse_conditional(&mut self) -> Result<Expr, String> {
        let cond = self.parse_or()?;
        if self.eat(&Token::Question) {
            let then_branch = self.parse_expr()?;
            self.expect(&Token::Colon)?;
            let else_branch = self.parse_expr()?;
            return Ok(Expr::Conditional {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }
        Ok(cond)
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::OrOr) {
            let right = self.parse_and()?;
            left = binary(left, BinOp::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_equality()?;
        while self.eat(&Token::AndAnd) {
            let right = self.parse_equality()?;
            left = binary(left, BinOp::And, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek() {
                Token::EqEq  => BinOp::Eq,
                Token::NotEq => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Token::Lt   => BinOp::Lt,
                Token::LtEq => BinOp::LtEq,
                Token::Gt   => BinOp::Gt,
                Token::GtEq => BinOp::GtEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus  => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star       => BinOp::Mul,
                Token::Slash      => BinOp::Div,
                Token::TildeSlash => BinOp::TruncDiv,
                Token::Percent    => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        match self.peek().clone() {
            Token::Minus => {
                self.advance();
                Ok(Expr::Unary { op: UnaryOp::Neg, operand: Box::new(self.parse_unary()?) })
            }
            Token::Not => {
                self.advance();
                Ok(Expr::Unary { op: UnaryOp::Not, operand: Box::new(self.parse_unary()?) })
            }
            Token::PlusPlus | Token::MinusMinus => {
                let dec = self.check(&Token::MinusMinus);
                self.advance();
                let target = self.parse_unary()?;
                if !is_place(&target) {
                    return Err(format!(
                        "Can only {} an assignable place at line {}",
                        if dec { "decrement" } else { "increment" },
                        self.span_line()
                    ));
                }
                Ok(Expr::IncDec { target: Box::new(target), dec, prefix: true })
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, String> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek().clone() {
                Token::Dot => {
                    self.advance();
                    let name = self.expect_ident()?;
                    if self.eat(&Token::LParen) {
                        let args = self.parse_args()?;
                        self.expect(&Token::RParen)?;
                        expr = Expr::MethodCall { object: Box::new(expr), name, args };
                    } else {
                        expr = Expr::Property { object: Box::new(expr), name };
                    }
                }
                Token::LParen => {
                    self.advance();
                    let args = self.parse_args()?;
                    self.expect(&Token::RParen)?;
                    expr = Expr::Call { callee: Box::new(expr), args };
                }
                Token::PlusPlus | Token::MinusMinus => {
                    let dec = self.check(&Token::MinusMinus);
                    if !is_place(&expr) {
                        return Err(format!(
                            "Can only {} an assignable place at line {}",
                            if dec { "decrement" } else { "increment" },
                            self.span_line()
                        ));
                    }
                    self.advance();
                    expr = Expr::IncDec { target: Box::new(expr), dec, prefix: false };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, String> {
        let mut args = Vec::new();
        while !self.check(&Token::RParen) && !self.check(&Token::Eof) {
            args.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) { break; }
        }
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.peek().clone() {
            Token::Int(n)    => { self.advance(); Ok(Expr::Int(n)) }
            Token::Double(f) => { self.advance(); Ok(Expr::Double(f)) }
            Token::Bool(b)   => { self.advance(); Ok(Expr::Bool(b)) }
            Token::Null      => { self.advance(); Ok(Expr::Null) }

            Token::StringLit(pieces) => {
                self.advance();
                build_string_expr(pieces)
            }

            Token::Ident(name) => {
                self.advance();
                Ok(Expr::Ident(name))
            }

            Token::LParen => {
                // (params) => expr / (params) { ... } is a function literal;
                // anything else in parens is just a grouped expression.
                let saved = self.pos;
                match self.parse_fun_lit() {
                    Ok(lit) => Ok(lit),
                    Err(_) => {
                        self.pos = saved;
                        self.advance();
                        let expr = self.parse_expr()?;
                        self.expect(&Token::RParen)?;
                        Ok(expr)
                    }
                }
            }

            Token::LBracket => {
                self.advance();
                let elements = self.parse_elements(&Token::RBracket, false)?;
                Ok(Expr::ListLit(elements))
            }

            Token::LBrace => {
                self.advance();
                let elements = self.parse_elements(&Token::RBrace, true)?;
                Ok(Expr::SetOrMapLit(elements))
            }

            other => Err(format!(
                "Unexpected token in expression: {:?} at line {}",
                other,
                self.span_line()
            )),
        }
    }

    fn parse_fun_lit(&mut self) -> Result<Expr, String> {
        let (params, optional_params) = self.parse_params()?;
        if !self.check(&Token::FatArrow) && !self.check(&Token::LBrace) {
            return Err("Not a function literal".to_string());
        }
        let body = self.parse_fun_body()?;
        Ok(Expr::FunLit { params, optional_params, body })
    }

    // ── Collection literal elements ───────────────────────────────────────────

    fn parse_elements(&mut self, close: &Token, allow_pairs: bool) -> Result<Vec<Element>, String> {
        let mut elements = Vec::new();
        while !self.check(close) && !self.check(&Token::Eof) {
            elements.push(self.parse_element(allow_pairs)?);
            if !self.eat(&Token::Comma) { break; }
        }
        self.expect(close)?;
        Ok(elements)
    }

    fn parse_element(&mut self, allow_pairs: bool) -> Result<Element, String> {
        match self.peek().clone() {
            Token::Ellipsis => {
                self.advance();
                Ok(Element::Spread { expr: self.parse_expr()?, null_aware: false })
            }
            Token::EllipsisQuestion => {
                self.advance();
                Ok(Element::Spread { expr: self.parse_expr()?, null_aware: true })
            }
            Token::Question => {
                self.advance();
                Ok(Element::NullAware(self.parse_expr()?))
            }
            Token::If => {
                self.advance();
                self.expect(&Token::LParen)?;
                let cond = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                let then_branch = Box::new(self.parse_element(allow_pairs)?);
                let else_branch = if self.eat(&Token::Else) {
                    Some(Box::new(self.parse_element(allow_pairs)?))
                } else {
                    None
                };
                Ok(Element::If { cond, then_branch, else_branch })
            }
            _ => {
                let expr = self.parse_expr()?;
                if allow_pairs && self.eat(&Token::Colon) {
                    let value = self.parse_expr()?;
                    Ok(Element::Pair(expr, value))
                } else {
                    Ok(Element::Expr(expr))
                }
            }
        }
    }
}

fn binary(lhs: Expr, op: BinOp, rhs: Expr) -> Expr {
    Expr::Binary { lhs: Box::new(lhs), op, rhs: Box::new(rhs) }
}

fn is_place(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::Property { .. })
}

// Re-parse the interpolation pieces the lexer carved out of a string literal
fn build_string_expr(pieces: Vec<StrPiece>) -> Result<Expr, String> {
    let mut parts = Vec::new();
    let mut has_interp = false;
    for piece in pieces {
        match piece {
            StrPiece::Lit(s) => parts.push(StringPart::Lit(s)),
            StrPiece::Interp(src) => {
                has_interp = true;
                let tokens = Lexer::new(&src)
                    .tokenize()
                    .map_err(|e| format!("In interpolation: {}", e))?;
                let mut sub = Parser::new(tokens);
                let expr = sub.parse_expr().map_err(|e| format!("In interpolation: {}", e))?;
                if !sub.check(&Token::Eof) {
                    return Err(format!("In interpolation: unexpected {:?}", sub.peek()));
                }
                parts.push(StringPart::Expr(expr));
            }
        }
    }
    if has_interp {
        Ok(Expr::StringInterp(parts))
    } else {
        let text = parts
            .into_iter()
            .map(|p| match p {
                StringPart::Lit(s) => s,
                StringPart::Expr(_) => String::new(),
            })
            .collect();
        Ok(Expr::Str(text))
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
