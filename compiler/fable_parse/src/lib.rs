//! Recursive-descent parser with precedence climbing.
//!
//! Statements are context-sensitive: `<-` and `..` are only legal inside a
//! function literal, and `index` only where a loop counter exists at runtime
//! (a detect right-hand side or a splice operand inside a table literal).
//! [`ParseContext`] threads those facts through the descent.
//!
//! The parser allocates nodes into a caller-owned [`Ast`] arena and returns
//! the top-level statement ids; a REPL keeps one arena across inputs.

mod context;
mod stack;


pub use context::ParseContext;

use fable_diagnostic::{Diagnostic, ErrorKind};
use fable_ir::{Ast, BinaryOp, Line, NodeId, NodeKind, Token, TokenKind, UnaryOp};

use crate::stack::ensure_sufficient_stack;

/// Parse a full token stream into top-level statements.
pub fn parse_program(tokens: &[Token], ast: &mut Ast) -> Result<Vec<NodeId>, Diagnostic> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        ast,
    };
    let mut statements = Vec::new();
    while !matches!(parser.kind(), TokenKind::Eof) {
        statements.push(parser.statement(ParseContext::NONE)?);
    }
    tracing::trace!(statements = statements.len(), "parsed program");
    Ok(statements)
}

/// Binding power of an infix operator, `0` for non-operators.
///
/// `<<` binds tighter than everything so a reload target is always the
/// nearest operand; `->` binds loosest so `[x] -> f => g` calls the
/// transform, not `f` alone.
fn infix_precedence(kind: &TokenKind) -> u8 {
    match kind {
        TokenKind::Reload => 15,
        TokenKind::LBracket => 14,
        TokenKind::Caret => 11,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 10,
        TokenKind::Plus | TokenKind::Minus => 9,
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => 8,
        TokenKind::EqEq | TokenKind::NotEq => 7,
        TokenKind::And => 6,
        TokenKind::Or | TokenKind::Xor => 5,
        TokenKind::Detect | TokenKind::Transform | TokenKind::Pipe | TokenKind::Reduce => 2,
        TokenKind::Arrow => 1,
        _ => 0,
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    ast: &'a mut Ast,
}

impl Parser<'_> {
    fn current(&self) -> &Token {
        // The stream always ends with Eof, which is never consumed.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn line(&self) -> Line {
        self.current().line
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, context: &str) -> Result<(), Diagnostic> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {} {}, found {}",
                kind.describe(),
                context,
                self.kind().describe()
            )))
        }
    }

    fn error(&self, message: String) -> Diagnostic {
        Diagnostic::new(ErrorKind::Syntax, self.line(), message)
    }

    // ----- statements -----

    fn statement(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        match self.kind() {
            TokenKind::Arrow => self.call_block_statement(ctx),
            TokenKind::ReturnArrow => self.return_statement(ctx),
            TokenKind::Unfold => self.splice_statement(ctx),
            _ => self.expression_statement(ctx),
        }
    }

    /// `-> callee;`
    fn call_block_statement(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        self.advance();
        let callee = self.expression(0, ctx)?;
        self.expect(&TokenKind::Semi, "after call block")?;
        Ok(self.ast.alloc(NodeKind::CallBlock { callee }, line))
    }

    /// `<- value;` with an implicit `nothing` when the value is omitted.
    fn return_statement(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        if !ctx.in_function() {
            return Err(self.error("return used outside a function".to_string()));
        }
        self.advance();
        let value = if matches!(self.kind(), TokenKind::Semi) {
            self.ast.alloc(NodeKind::Nothing, line)
        } else {
            self.expression(0, ctx)?
        };
        self.expect(&TokenKind::Semi, "after return statement")?;
        Ok(self.ast.alloc(NodeKind::Return(value), line))
    }

    /// `..operand;` as a statement splices into the function under
    /// construction, so it only parses inside a function literal.
    fn splice_statement(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        if !ctx.in_function() {
            return Err(self.error("splice used outside a function".to_string()));
        }
        self.advance();
        let operand = self.expression(0, ctx)?;
        self.expect(&TokenKind::Semi, "after splice statement")?;
        Ok(self.ast.alloc(NodeKind::Splice(operand), line))
    }

    fn expression_statement(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let expr = self.expression(0, ctx)?;
        match self.kind() {
            TokenKind::Assign => self.assignment(expr, ctx),
            TokenKind::Swap => Err(self.error("swap statements are not supported".to_string())),
            _ => {
                self.expect(&TokenKind::Semi, "after statement")?;
                Ok(expr)
            }
        }
    }

    fn assignment(&mut self, target: NodeId, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        self.reject_readonly_target(target)?;
        self.advance();
        let value = self.expression(0, ctx)?;
        self.expect(&TokenKind::Semi, "after assignment")?;
        Ok(self.ast.alloc(NodeKind::Assign { target, value }, line))
    }

    /// The literal keywords never accept a new binding, even wrapped in
    /// parentheses.
    fn reject_readonly_target(&self, target: NodeId) -> Result<(), Diagnostic> {
        let mut id = target;
        loop {
            match self.ast.kind(id) {
                NodeKind::Group(inner) => id = *inner,
                NodeKind::Bool(_)
                | NodeKind::Nothing
                | NodeKind::Always
                | NodeKind::Index => {
                    return Err(Diagnostic::new(
                        ErrorKind::Syntax,
                        self.ast.line(id),
                        format!("cannot assign to '{}'", fable_ir::render(self.ast, id)),
                    ));
                }
                _ => return Ok(()),
            }
        }
    }

    // ----- expressions -----

    fn expression(&mut self, min_prec: u8, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        ensure_sufficient_stack(|| self.expression_inner(min_prec, ctx))
    }

    fn expression_inner(&mut self, min_prec: u8, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let mut lhs = self.prefix(ctx)?;
        while infix_precedence(self.kind()) > min_prec {
            lhs = self.infix(lhs, ctx)?;
        }
        Ok(lhs)
    }

    fn prefix(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        let kind = self.kind().clone();
        match kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(self.ast.alloc(NodeKind::Int(value), line))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(self.ast.alloc(NodeKind::Float(value), line))
            }
            TokenKind::Text(value) => {
                self.advance();
                Ok(self.ast.alloc(NodeKind::Text(value), line))
            }
            TokenKind::Name(name) => {
                self.advance();
                Ok(self.ast.alloc(NodeKind::Name(name), line))
            }
            TokenKind::Yes => {
                self.advance();
                Ok(self.ast.alloc(NodeKind::Bool(true), line))
            }
            TokenKind::No => {
                self.advance();
                Ok(self.ast.alloc(NodeKind::Bool(false), line))
            }
            TokenKind::Nothing => {
                self.advance();
                Ok(self.ast.alloc(NodeKind::Nothing, line))
            }
            TokenKind::Index => {
                if !ctx.in_loop() {
                    return Err(self.error("index used outside a loop".to_string()));
                }
                self.advance();
                Ok(self.ast.alloc(NodeKind::Index, line))
            }
            TokenKind::Always => {
                Err(self.error(
                    "always is only allowed as a subscript or table literal key".to_string(),
                ))
            }
            TokenKind::At => {
                self.advance();
                let operand = self.expression(14, ctx)?;
                Ok(self.ast.alloc(NodeKind::Arg(operand), line))
            }
            TokenKind::Minus => self.unary(UnaryOp::Neg, ctx, line),
            TokenKind::Bang => self.unary(UnaryOp::Not, ctx, line),
            TokenKind::Question => self.unary(UnaryOp::Truth, ctx, line),
            TokenKind::Hash => self.unary(UnaryOp::Len, ctx, line),
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression(0, ctx)?;
                self.expect(&TokenKind::RParen, "to close the group")?;
                Ok(self.ast.alloc(NodeKind::Group(inner), line))
            }
            TokenKind::LBracket => self.table_literal(ctx),
            TokenKind::LBrace => self.fun_literal(ctx),
            other => Err(self.error(format!(
                "expected an expression, found {}",
                other.describe()
            ))),
        }
    }

    fn unary(&mut self, op: UnaryOp, ctx: ParseContext, line: Line) -> Result<NodeId, Diagnostic> {
        self.advance();
        let operand = self.expression(12, ctx)?;
        Ok(self.ast.alloc(NodeKind::Unary { op, operand }, line))
    }

    fn infix(&mut self, lhs: NodeId, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        match self.kind().clone() {
            TokenKind::LBracket => {
                self.advance();
                let key = if matches!(self.kind(), TokenKind::Always) {
                    let key_line = self.line();
                    self.advance();
                    self.ast.alloc(NodeKind::Always, key_line)
                } else {
                    self.expression(0, ctx)?
                };
                self.expect(&TokenKind::RBracket, "to close the subscript")?;
                Ok(self.ast.alloc(NodeKind::Subscript { target: lhs, key }, line))
            }
            TokenKind::Arrow => {
                self.advance();
                let callee = self.expression(1, ctx)?;
                Ok(self.ast.alloc(NodeKind::Call { args: lhs, callee }, line))
            }
            TokenKind::Detect => {
                self.advance();
                // The detector runs per produced value with a live loop
                // counter, so `index` is legal in it.
                let detector = self.expression(2, ctx.with(ParseContext::IN_LOOP))?;
                Ok(self.ast.alloc(
                    NodeKind::Detect {
                        producer: lhs,
                        detector,
                    },
                    line,
                ))
            }
            TokenKind::Transform => {
                self.advance();
                let transformer = self.expression(2, ctx)?;
                Ok(self.ast.alloc(
                    NodeKind::Transform {
                        producer: lhs,
                        transformer,
                    },
                    line,
                ))
            }
            TokenKind::Pipe => {
                self.advance();
                let predicate = self.expression(2, ctx)?;
                Ok(self.ast.alloc(
                    NodeKind::Filter {
                        producer: lhs,
                        predicate,
                    },
                    line,
                ))
            }
            TokenKind::Reduce => {
                self.advance();
                let reducer = self.expression(2, ctx)?;
                Ok(self.ast.alloc(
                    NodeKind::Reduce {
                        producer: lhs,
                        reducer,
                    },
                    line,
                ))
            }
            TokenKind::Reload => {
                self.advance();
                let initializer = self.expression(15, ctx)?;
                Ok(self.ast.alloc(
                    NodeKind::Reload {
                        target: lhs,
                        initializer,
                    },
                    line,
                ))
            }
            other => {
                let (op, prec) = match other {
                    TokenKind::Caret => (BinaryOp::Pow, 11),
                    TokenKind::Star => (BinaryOp::Mul, 10),
                    TokenKind::Slash => (BinaryOp::Div, 10),
                    TokenKind::Percent => (BinaryOp::Mod, 10),
                    TokenKind::Plus => (BinaryOp::Add, 9),
                    TokenKind::Minus => (BinaryOp::Sub, 9),
                    TokenKind::Lt => (BinaryOp::Lt, 8),
                    TokenKind::LtEq => (BinaryOp::LtEq, 8),
                    TokenKind::Gt => (BinaryOp::Gt, 8),
                    TokenKind::GtEq => (BinaryOp::GtEq, 8),
                    TokenKind::EqEq => (BinaryOp::Eq, 7),
                    TokenKind::NotEq => (BinaryOp::NotEq, 7),
                    TokenKind::And => (BinaryOp::And, 6),
                    TokenKind::Or => (BinaryOp::Or, 5),
                    TokenKind::Xor => (BinaryOp::Xor, 5),
                    unexpected => {
                        return Err(self.error(format!(
                            "unexpected operator {}",
                            unexpected.describe()
                        )));
                    }
                };
                self.advance();
                let rhs = self.expression(prec, ctx)?;
                Ok(self.ast.alloc(NodeKind::Binary { op, lhs, rhs }, line))
            }
        }
    }

    // ----- literals -----

    fn table_literal(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        self.advance();
        let mut items = Vec::new();
        loop {
            if matches!(self.kind(), TokenKind::RBracket) {
                break;
            }
            items.push(self.table_item(ctx)?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket, "to close the table literal")?;
        Ok(self.ast.alloc(NodeKind::TableLit { items }, line))
    }

    fn table_item(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        match self.kind() {
            TokenKind::Always => {
                self.advance();
                self.expect(&TokenKind::Colon, "after the always key")?;
                let value = self.expression(0, ctx)?;
                Ok(self.ast.alloc(NodeKind::AlwaysItem(value), line))
            }
            TokenKind::Unfold => {
                self.advance();
                // A spliced generator drains with a live loop counter.
                let operand = self.expression(0, ctx.with(ParseContext::IN_LOOP))?;
                let splice = self.ast.alloc(NodeKind::Splice(operand), line);
                Ok(splice)
            }
            _ => {
                let first = self.expression(0, ctx)?;
                if self.eat(&TokenKind::Colon) {
                    let value = self.expression(0, ctx)?;
                    Ok(self.ast.alloc(NodeKind::MapItem { key: first, value }, line))
                } else {
                    Ok(self.ast.alloc(NodeKind::SeqItem(first), line))
                }
            }
        }
    }

    fn fun_literal(&mut self, ctx: ParseContext) -> Result<NodeId, Diagnostic> {
        let line = self.line();
        self.advance();
        // IN_LOOP stays set inside the body: a loop frame surrounding the
        // literal is still live when the body runs.
        let body_ctx = ctx.with(ParseContext::IN_FUNCTION);
        let mut body = Vec::new();
        while !matches!(self.kind(), TokenKind::RBrace | TokenKind::Eof) {
            body.push(self.statement(body_ctx)?);
        }
        self.expect(&TokenKind::RBrace, "to close the function literal")?;
        Ok(self.ast.alloc(NodeKind::FunLit { body }, line))
    }
}
