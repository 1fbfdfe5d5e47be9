use indentphp_ast::*;
use indentphp_lexer::TokenKind;

use crate::parser::{PResult, Parser};

/// Parse an expression.
///
/// Assignment and the conditional operator are both right-associative and
/// greedy: the right-hand side extends as far as the grammar allows.
pub fn parse_expr(parser: &mut Parser) -> PResult<Expr> {
    parser.enter()?;
    let expr = parse_expr_kind(parser);
    parser.leave();
    expr
}

fn parse_expr_kind(parser: &mut Parser) -> PResult<Expr> {
    let start = parser.current_span();

    let primary = match parser.current_kind() {
        TokenKind::Isset => parse_isset(parser)?,
        TokenKind::Empty => parse_empty(parser)?,
        TokenKind::Variable => {
            let target = parse_variable(parser)?;
            if parser.eat(TokenKind::Equals).is_some() {
                parser.skip_whitespace();
                let value = parse_expr(parser)?;
                return Ok(Expr {
                    kind: ExprKind::Assign(AssignExpr {
                        target: Box::new(target),
                        value: Box::new(value),
                    }),
                    span: parser.end_span(start),
                });
            }
            target
        }
        _ => return Err(parser.expected("expression")),
    };

    if parser.eat(TokenKind::Question).is_none() {
        return Ok(primary);
    }
    parser.skip_whitespace();
    let then_expr = parse_expr(parser)?;
    parser.expect(TokenKind::Colon)?;
    parser.skip_whitespace();
    let else_expr = parse_expr(parser)?;

    Ok(Expr {
        kind: ExprKind::Ternary(TernaryExpr {
            condition: Box::new(primary),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }),
        span: parser.end_span(start),
    })
}

/// `$name` followed by any number of `[expr]` or `[]` subscripts.
pub fn parse_variable(parser: &mut Parser) -> PResult<Expr> {
    let token = parser.expect(TokenKind::Variable)?;
    let mut expr = Expr {
        kind: ExprKind::Variable(parser.text(&token).to_string()),
        span: token.span,
    };
    parser.skip_whitespace();

    while parser.eat(TokenKind::LeftBracket).is_some() {
        parser.skip_whitespace();
        let index = if parser.check(TokenKind::RightBracket) {
            None
        } else {
            Some(Box::new(parse_expr(parser)?))
        };
        parser.expect(TokenKind::RightBracket)?;
        expr = Expr {
            kind: ExprKind::ArrayAccess(ArrayAccessExpr {
                array: Box::new(expr),
                index,
            }),
            span: parser.end_span(token.span),
        };
        parser.skip_whitespace();
    }

    Ok(expr)
}

fn parse_isset(parser: &mut Parser) -> PResult<Expr> {
    let start = parser.advance().span;
    parser.skip_whitespace();
    parser.expect(TokenKind::LeftParen)?;
    parser.skip_whitespace();

    let mut vars = vec![parse_variable(parser)?];
    while parser.eat(TokenKind::Comma).is_some() {
        parser.skip_whitespace();
        vars.push(parse_variable(parser)?);
    }

    parser.expect(TokenKind::RightParen)?;
    let span = parser.end_span(start);
    parser.skip_whitespace();
    Ok(Expr {
        kind: ExprKind::Isset(vars),
        span,
    })
}

fn parse_empty(parser: &mut Parser) -> PResult<Expr> {
    let start = parser.advance().span;
    parser.skip_whitespace();
    parser.expect(TokenKind::LeftParen)?;
    parser.skip_whitespace();
    let var = parse_variable(parser)?;
    parser.expect(TokenKind::RightParen)?;
    let span = parser.end_span(start);
    parser.skip_whitespace();
    Ok(Expr {
        kind: ExprKind::Empty(Box::new(var)),
        span,
    })
}

// =============================================================================
// Static scalars
// =============================================================================

/// Parse a constant value: a literal, a (class) constant, a signed scalar or
/// an `array(...)` of scalars. Consumes trailing whitespace.
///
/// Leading signs are folded in one pass: `+` is dropped and every `-`
/// toggles [`StaticScalar::negated`].
pub fn parse_static_scalar(parser: &mut Parser) -> PResult<StaticScalar> {
    let start = parser.current_span();

    let mut minus_signs = 0usize;
    let mut signed = false;
    loop {
        match parser.current_kind() {
            TokenKind::Minus => minus_signs += 1,
            TokenKind::Plus => {}
            _ => break,
        }
        signed = true;
        parser.advance();
        parser.skip_whitespace();
    }

    parser.enter()?;
    let operand = parse_scalar_operand(parser);
    parser.leave();

    let mut scalar = operand?;
    if minus_signs % 2 == 1 {
        scalar.negate();
    }
    if signed {
        scalar.span = parser.end_span(start);
    }
    Ok(scalar)
}

fn parse_scalar_operand(parser: &mut Parser) -> PResult<StaticScalar> {
    let start = parser.current_span();
    let kind = parser.current_kind();

    if kind.is_common_scalar() {
        let token = parser.advance();
        let text = parser.text(&token).to_string();
        parser.skip_whitespace();
        return Ok(StaticScalar::new(ScalarKind::Literal(text), token.span));
    }

    match kind {
        TokenKind::Identifier => {
            let token = parser.advance();
            let name = parser.text(&token).to_string();
            parser.skip_whitespace();
            if parser.eat(TokenKind::DoubleColon).is_none() {
                return Ok(StaticScalar::new(ScalarKind::Constant(name), token.span));
            }
            parser.skip_whitespace();
            let member = parser.expect(TokenKind::Identifier)?;
            let member = parser.text(&member).to_string();
            let span = parser.end_span(start);
            parser.skip_whitespace();
            Ok(StaticScalar::new(
                ScalarKind::ClassConstant {
                    class: name,
                    name: member,
                },
                span,
            ))
        }
        TokenKind::Array => parse_static_array(parser),
        _ => Err(parser.expected("static value")),
    }
}

/// `array(` [pair (`,` pair)* [`,`]] `)`
fn parse_static_array(parser: &mut Parser) -> PResult<StaticScalar> {
    let start = parser.advance().span;
    parser.skip_whitespace();
    parser.expect(TokenKind::LeftParen)?;
    parser.skip_whitespace();

    let mut elements = Vec::new();
    while !parser.check(TokenKind::RightParen) {
        let element_start = parser.current_span();
        let first = parse_static_scalar(parser)?;
        let element = if parser.eat(TokenKind::FatArrow).is_some() {
            parser.skip_whitespace();
            ArrayElement {
                key: Some(first),
                value: parse_static_scalar(parser)?,
                span: parser.end_span(element_start),
            }
        } else {
            ArrayElement {
                key: None,
                value: first,
                span: parser.end_span(element_start),
            }
        };
        elements.push(element);

        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
        parser.skip_whitespace();
    }

    parser.expect(TokenKind::RightParen)?;
    let span = parser.end_span(start);
    parser.skip_whitespace();
    Ok(StaticScalar::new(ScalarKind::Array(elements), span))
}
