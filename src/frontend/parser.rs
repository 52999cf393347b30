// src/frontend/parser.rs
//
// Reference parser producing every plausible reading of a token fragment.
//
// Fragments come from code being typed, so the parser is permissive where a
// deterministic parser would not be: semicolons are optional, a missing `)` or
// `}` at the end of input is assumed, and a statement that reads both as a
// declaration and as an expression yields both trees.

use crate::errors::ParserError;
use crate::frontend::ast::*;
use crate::frontend::{Span, Token, TokenType};

/// Upper limit on the number of trees returned for one fragment.
pub const MAX_TREES: usize = 32;

/// Supplies candidate syntax trees for a token sequence, most plausible first.
pub trait TreeSource {
    fn trees(&self, tokens: &[Token]) -> Result<Vec<Tree>, ParserError>;
}

impl<F> TreeSource for F
where
    F: Fn(&[Token]) -> Result<Vec<Tree>, ParserError>,
{
    fn trees(&self, tokens: &[Token]) -> Result<Vec<Tree>, ParserError> {
        self(tokens)
    }
}

/// Position in the token slice. Copied freely to backtrack.
#[derive(Clone, Copy)]
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn current(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn ty(&self) -> TokenType {
        self.current().map_or(TokenType::Eof, |t| t.ty)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn check(&self, ty: TokenType) -> bool {
        self.ty() == ty
    }

    fn advanced(self) -> Self {
        Self {
            pos: self.pos + 1,
            ..self
        }
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.current();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn span(&self) -> Span {
        match (self.current(), self.tokens.last()) {
            (Some(token), _) => token.span,
            (None, Some(last)) => Span::new(last.span.end, last.span.end, last.span.line, last.span.column),
            (None, None) => Span::default(),
        }
    }

    fn error(&self, expected: &str) -> ParserError {
        ParserError::Unexpected {
            expected: expected.to_string(),
            found: self.ty().as_str().to_string(),
            span: self.span().into(),
        }
    }

    fn consume(&mut self, ty: TokenType, expected: &str) -> Result<&'t Token, ParserError> {
        if self.check(ty) {
            self.advance().ok_or_else(|| self.error(expected))
        } else {
            Err(self.error(expected))
        }
    }

    /// Consume a closing delimiter, or accept its absence at end of input.
    fn close(&mut self, ty: TokenType, expected: &str) -> Result<(), ParserError> {
        if self.match_token(ty) || self.at_end() {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    /// The statement may end here: `;`, `}` or end of input follows.
    fn at_statement_end(&self) -> bool {
        matches!(self.ty(), TokenType::Semicolon | TokenType::RBrace | TokenType::Eof)
    }
}

type Parsed<'t, T> = Result<(T, Cursor<'t>), ParserError>;

#[derive(Debug, Clone)]
pub struct Parser {
    max_trees: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            max_trees: MAX_TREES,
        }
    }

    pub fn with_max_trees(max_trees: usize) -> Self {
        Self {
            max_trees: max_trees.max(1),
        }
    }

    /// Every complete reading of `tokens`, in preference order.
    pub fn parse(&self, tokens: &[Token]) -> Result<Vec<Tree>, ParserError> {
        let start = Cursor { tokens, pos: 0 };
        let trees: Vec<Tree> = self
            .sequence(start, false)?
            .into_iter()
            .filter(|(_, end)| end.at_end())
            .map(|(stmts, _)| stmts)
            .collect();
        tracing::trace!(tokens = tokens.len(), trees = trees.len(), "parsed fragment");
        Ok(trees)
    }

    // ===== Statements =====

    /// Statement lists, stopping at `}` when inside a block.
    fn sequence<'t>(&self, start: Cursor<'t>, in_block: bool) -> Result<Vec<(Vec<Stmt>, Cursor<'t>)>, ParserError> {
        let mut partial = vec![(Vec::new(), start)];
        let mut done = Vec::new();
        let mut last_error = None;

        while !partial.is_empty() {
            let mut next = Vec::new();
            for (stmts, cursor) in partial {
                if cursor.at_end() || (in_block && cursor.check(TokenType::RBrace)) {
                    done.push((stmts, cursor));
                    continue;
                }
                match self.statement(cursor) {
                    Ok(alternatives) => {
                        for (stmt, after) in alternatives {
                            let mut extended = stmts.clone();
                            extended.push(stmt);
                            next.push((extended, after));
                        }
                    }
                    Err(error) => last_error = Some(error),
                }
            }
            next.truncate(self.max_trees);
            partial = next;
        }

        if done.is_empty() {
            return Err(last_error.unwrap_or_else(|| start.error("statement")));
        }
        done.truncate(self.max_trees);
        Ok(done)
    }

    fn statement<'t>(&self, cursor: Cursor<'t>) -> Result<Vec<(Stmt, Cursor<'t>)>, ParserError> {
        let single = |parsed: Parsed<'t, Stmt>| parsed.map(|(stmt, after)| vec![(stmt, end_statement(after))]);
        match cursor.ty() {
            TokenType::LBrace => self.block(cursor.advanced()),
            TokenType::RBrace => Err(ParserError::Trailing {
                span: cursor.span().into(),
            }),
            TokenType::Semicolon => Ok(vec![(Stmt::Empty, cursor.advanced())]),
            TokenType::KwReturn => single(self.return_stmt(cursor.advanced())),
            TokenType::KwBreak => single(Ok(jump(cursor.advanced(), Stmt::Break))),
            TokenType::KwContinue => single(Ok(jump(cursor.advanced(), Stmt::Continue))),
            _ => {
                let mut alternatives: Vec<(Stmt, Cursor<'t>)> = Vec::new();
                let declaration = self.declaration(cursor);
                let plain = self.expression(cursor, false);
                let juxtaposed = self.expression(cursor, true);

                let mut last_error = None;
                for parsed in [
                    declaration,
                    juxtaposed.map(|(e, c)| (Stmt::Expr(e), c)),
                    plain.map(|(e, c)| (Stmt::Expr(e), c)),
                ] {
                    match parsed {
                        Ok((stmt, after)) => {
                            let after = end_statement(after);
                            let duplicate = alternatives
                                .iter()
                                .any(|(s, c)| *s == stmt && c.pos == after.pos);
                            if !duplicate {
                                alternatives.push((stmt, after));
                            }
                        }
                        Err(error) => last_error = Some(error),
                    }
                }
                match (alternatives.is_empty(), last_error) {
                    (true, Some(error)) => Err(error),
                    (true, None) => Err(cursor.error("statement")),
                    _ => Ok(alternatives),
                }
            }
        }
    }

    fn block<'t>(&self, cursor: Cursor<'t>) -> Result<Vec<(Stmt, Cursor<'t>)>, ParserError> {
        let mut blocks = Vec::new();
        for (stmts, mut after) in self.sequence(cursor, true)? {
            after.close(TokenType::RBrace, "'}'")?;
            blocks.push((Stmt::Block(stmts), after));
        }
        Ok(blocks)
    }

    fn return_stmt<'t>(&self, cursor: Cursor<'t>) -> Parsed<'t, Stmt> {
        if cursor.at_statement_end() {
            return Ok((Stmt::Return(None), cursor));
        }
        let (value, after) = self.expression(cursor, true)?;
        Ok((Stmt::Return(Some(value)), after))
    }

    /// `[final] Type name [= init]`
    fn declaration<'t>(&self, mut cursor: Cursor<'t>) -> Parsed<'t, Stmt> {
        let is_final = cursor.match_token(TokenType::KwFinal);
        let (ty, mut cursor) = self.type_expr(cursor)?;
        let name = cursor.consume(TokenType::Identifier, "variable name")?.lexeme.clone();
        let (init, cursor) = if cursor.match_token(TokenType::Eq) {
            let (init, after) = self.expression(cursor, true)?;
            (Some(init), after)
        } else {
            (None, cursor)
        };
        Ok((
            Stmt::Decl {
                is_final,
                ty,
                name,
                init,
            },
            cursor,
        ))
    }

    fn type_expr<'t>(&self, mut cursor: Cursor<'t>) -> Parsed<'t, TypeExpr> {
        let prim = match cursor.ty() {
            TokenType::KwBoolean => Some(PrimType::Boolean),
            TokenType::KwChar => Some(PrimType::Char),
            TokenType::KwInt => Some(PrimType::Int),
            TokenType::KwLong => Some(PrimType::Long),
            TokenType::KwFloat => Some(PrimType::Float),
            TokenType::KwDouble => Some(PrimType::Double),
            _ => None,
        };
        let mut ty = match prim {
            Some(prim) => {
                cursor.advance();
                TypeExpr::Prim(prim)
            }
            None => {
                let mut path = vec![cursor.consume(TokenType::Identifier, "type")?.lexeme.clone()];
                while cursor.check(TokenType::Dot) {
                    let mut ahead = cursor.advanced();
                    match ahead.consume(TokenType::Identifier, "type name") {
                        Ok(token) => {
                            path.push(token.lexeme.clone());
                            cursor = ahead;
                        }
                        Err(_) => break,
                    }
                }
                TypeExpr::Named(path)
            }
        };
        while cursor.check(TokenType::LBracket) {
            let mut ahead = cursor.advanced();
            ahead.consume(TokenType::RBracket, "']'")?;
            ty = TypeExpr::Array(Box::new(ty));
            cursor = ahead;
        }
        Ok((ty, cursor))
    }

    // ===== Expressions =====

    /// Assignment is right associative and binds loosest.
    fn expression<'t>(&self, cursor: Cursor<'t>, juxtapose: bool) -> Parsed<'t, Expr> {
        let (target, mut cursor) = self.binary(cursor, 0, juxtapose)?;
        let op = match cursor.ty() {
            TokenType::Eq => AssignOp::Assign,
            TokenType::PlusEq => AssignOp::Add,
            TokenType::MinusEq => AssignOp::Sub,
            TokenType::StarEq => AssignOp::Mul,
            TokenType::SlashEq => AssignOp::Div,
            _ => return Ok((target, cursor)),
        };
        cursor.advance();
        let (value, cursor) = self.expression(cursor, juxtapose)?;
        Ok((
            Expr::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            cursor,
        ))
    }

    fn binary<'t>(&self, cursor: Cursor<'t>, min_prec: u8, juxtapose: bool) -> Parsed<'t, Expr> {
        let (mut left, mut cursor) = self.unary(cursor, juxtapose)?;
        while cursor.ty().precedence() > min_prec {
            let prec = cursor.ty().precedence();
            let op = match cursor.ty() {
                TokenType::Plus => BinOp::Add,
                TokenType::Minus => BinOp::Sub,
                TokenType::Star => BinOp::Mul,
                TokenType::Slash => BinOp::Div,
                TokenType::Percent => BinOp::Mod,
                TokenType::EqEq => BinOp::Eq,
                TokenType::BangEq => BinOp::Ne,
                TokenType::Lt => BinOp::Lt,
                TokenType::Gt => BinOp::Gt,
                TokenType::LtEq => BinOp::Le,
                TokenType::GtEq => BinOp::Ge,
                TokenType::AmpAmp => BinOp::And,
                TokenType::PipePipe => BinOp::Or,
                _ => break,
            };
            let (right, after) = self.binary(cursor.advanced(), prec, juxtapose)?;
            left = Expr::Binary {
                op,
                lhs: Box::new(left),
                rhs: Box::new(right),
            };
            cursor = after;
        }
        Ok((left, cursor))
    }

    /// Only negative numeric literals; there are no other prefix operators.
    fn unary<'t>(&self, cursor: Cursor<'t>, juxtapose: bool) -> Parsed<'t, Expr> {
        if cursor.check(TokenType::Minus) {
            let ahead = cursor.advanced();
            if matches!(ahead.ty(), TokenType::IntLiteral | TokenType::FloatLiteral) {
                let (literal, after) = self.primary(ahead)?;
                let negated = match literal {
                    Expr::Int(n) => Expr::Int(-n),
                    Expr::Long(n) => Expr::Long(-n),
                    Expr::Double(x) => Expr::Double(-x),
                    other => other,
                };
                return Ok((negated, after));
            }
        }
        self.postfix(cursor, juxtapose)
    }

    fn postfix<'t>(&self, cursor: Cursor<'t>, juxtapose: bool) -> Parsed<'t, Expr> {
        let (mut expr, mut cursor) = self.primary(cursor)?;
        loop {
            match cursor.ty() {
                TokenType::Dot => {
                    let mut ahead = cursor.advanced();
                    let name = ahead.consume(TokenType::Identifier, "member name")?.lexeme.clone();
                    expr = Expr::Field {
                        target: Box::new(expr),
                        name,
                    };
                    cursor = ahead;
                }
                TokenType::LParen => {
                    let (args, after) = self.arguments(cursor.advanced())?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        parens: true,
                    };
                    cursor = after;
                }
                ty if juxtapose
                    && ty.starts_operand()
                    && matches!(expr, Expr::Name(_) | Expr::Field { .. }) =>
                {
                    let mut args = Vec::new();
                    while cursor.ty().starts_operand() {
                        let (arg, after) = self.postfix(cursor, false)?;
                        args.push(arg);
                        cursor = after;
                    }
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        parens: false,
                    };
                    return Ok((expr, cursor));
                }
                _ => return Ok((expr, cursor)),
            }
        }
    }

    /// Arguments after `(`, through the closing `)`.
    fn arguments<'t>(&self, mut cursor: Cursor<'t>) -> Parsed<'t, Vec<Expr>> {
        let mut args = Vec::new();
        if cursor.match_token(TokenType::RParen) {
            return Ok((args, cursor));
        }
        loop {
            if cursor.at_end() {
                return Ok((args, cursor));
            }
            let (arg, after) = self.expression(cursor, true)?;
            args.push(arg);
            cursor = after;
            if !cursor.match_token(TokenType::Comma) {
                break;
            }
        }
        cursor.close(TokenType::RParen, "')'")?;
        Ok((args, cursor))
    }

    fn primary<'t>(&self, mut cursor: Cursor<'t>) -> Parsed<'t, Expr> {
        let Some(token) = cursor.current() else {
            return Err(cursor.error("expression"));
        };
        let expr = match token.ty {
            TokenType::Identifier => Expr::Name(token.lexeme.clone()),
            TokenType::IntLiteral => int_literal(&token.lexeme).ok_or_else(|| cursor.error("integer"))?,
            TokenType::FloatLiteral => {
                let digits = token.lexeme.trim_end_matches(['f', 'F', 'd', 'D']);
                Expr::Double(digits.parse().map_err(|_| cursor.error("number"))?)
            }
            TokenType::StringLiteral => Expr::Str(unescape(&token.lexeme)),
            TokenType::KwTrue => Expr::Bool(true),
            TokenType::KwFalse => Expr::Bool(false),
            TokenType::KwNull => Expr::Null,
            TokenType::LParen => {
                let (inner, mut after) = self.expression(cursor.advanced(), true)?;
                after.close(TokenType::RParen, "')'")?;
                return Ok((Expr::Paren(Box::new(inner)), after));
            }
            TokenType::KwNew => {
                let (ty, mut after) = self.type_expr(cursor.advanced())?;
                if after.match_token(TokenType::LParen) {
                    let (args, after) = self.arguments(after)?;
                    return Ok((
                        Expr::New {
                            ty,
                            args,
                            parens: true,
                        },
                        after,
                    ));
                }
                return Ok((
                    Expr::New {
                        ty,
                        args: Vec::new(),
                        parens: false,
                    },
                    after,
                ));
            }
            _ => return Err(cursor.error("expression")),
        };
        cursor.advance();
        Ok((expr, cursor))
    }
}

impl TreeSource for Parser {
    fn trees(&self, tokens: &[Token]) -> Result<Vec<Tree>, ParserError> {
        self.parse(tokens)
    }
}

fn end_statement(mut cursor: Cursor<'_>) -> Cursor<'_> {
    cursor.match_token(TokenType::Semicolon);
    cursor
}

/// `break` / `continue` with an optional label.
fn jump<'t>(mut cursor: Cursor<'t>, make: fn(Option<String>) -> Stmt) -> (Stmt, Cursor<'t>) {
    let label = cursor
        .check(TokenType::Identifier)
        .then(|| cursor.advance().map(|t| t.lexeme.clone()))
        .flatten();
    (make(label), cursor)
}

fn int_literal(lexeme: &str) -> Option<Expr> {
    match lexeme.strip_suffix(['l', 'L']) {
        Some(digits) => digits.parse().ok().map(Expr::Long),
        None => lexeme.parse().ok().map(Expr::Int),
    }
}

fn unescape(lexeme: &str) -> String {
    let body = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lex;

    fn parse(source: &str) -> Vec<Tree> {
        Parser::new().parse(&lex(source).unwrap()).unwrap()
    }

    fn name(n: &str) -> Box<Expr> {
        Box::new(Expr::Name(n.to_string()))
    }

    #[test]
    fn assignment_has_one_reading() {
        let trees = parse("x = 1");
        assert_eq!(
            trees,
            vec![vec![Stmt::Expr(Expr::Assign {
                op: AssignOp::Assign,
                target: name("x"),
                value: Box::new(Expr::Int(1)),
            })]]
        );
    }

    #[test]
    fn declaration_and_juxtaposition_are_both_offered() {
        let trees = parse("String s = \"a\"");
        assert_eq!(trees.len(), 3);
        assert!(matches!(trees[0][0], Stmt::Decl { .. }));
        assert!(matches!(
            &trees[1][0],
            Stmt::Expr(Expr::Assign { target, .. }) if matches!(**target, Expr::Call { parens: false, .. })
        ));
        // `String;` followed by `s = "a"`
        assert_eq!(trees[2].len(), 2);
    }

    #[test]
    fn juxtaposition_and_separate_statements() {
        let trees = parse("print x");
        assert_eq!(trees.len(), 3);
        assert_eq!(
            trees[1],
            vec![Stmt::Expr(Expr::Call {
                callee: name("print"),
                args: vec![Expr::Name("x".to_string())],
                parens: false,
            })]
        );
        assert_eq!(
            trees[2],
            vec![
                Stmt::Expr(Expr::Name("print".to_string())),
                Stmt::Expr(Expr::Name("x".to_string())),
            ]
        );
    }

    #[test]
    fn missing_closers_at_end_are_tolerated() {
        let trees = parse("{ f(1, 2");
        assert_eq!(trees.len(), 1);
        let Stmt::Block(inner) = &trees[0][0] else {
            panic!("expected block");
        };
        assert!(matches!(&inner[0], Stmt::Expr(Expr::Call { args, parens: true, .. }) if args.len() == 2));
    }

    #[test]
    fn precedence_and_literals() {
        let trees = parse("y = 1 + 2 * -3L;");
        let Stmt::Expr(Expr::Assign { value, .. }) = &trees[0][0] else {
            panic!("expected assignment");
        };
        assert_eq!(value.to_string(), "1 + 2 * -3L");
        let Expr::Binary { op, rhs, .. } = &**value else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinOp::Add);
        assert!(matches!(**rhs, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn jumps_and_returns() {
        let trees = parse("break outer; continue; return");
        assert_eq!(
            trees,
            vec![vec![
                Stmt::Break(Some("outer".to_string())),
                Stmt::Continue(None),
                Stmt::Return(None),
            ]]
        );
    }

    #[test]
    fn stray_closer_is_an_error() {
        let err = Parser::new().parse(&lex("x }").unwrap()).unwrap_err();
        assert!(matches!(err, ParserError::Trailing { .. }));
    }

    #[test]
    fn tree_count_is_capped() {
        let source = "a b; c d; e f; g h; i j; k l";
        let trees = Parser::with_max_trees(4).parse(&lex(source).unwrap()).unwrap();
        assert!(trees.len() <= 4);
        assert!(!trees.is_empty());
    }
}
