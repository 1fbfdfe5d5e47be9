use indentphp_ast::*;
use indentphp_lexer::TokenKind;

use crate::expr;
use crate::parser::{PResult, Parser};

/// Whether `kind` can begin a statement.
fn starts_statement(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon
            | TokenKind::Return
            | TokenKind::LeftBrace
            | TokenKind::If
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::Abstract
            | TokenKind::Final
            | TokenKind::Interface
    )
}

/// Parse statements until a token that cannot start one. The caller decides
/// whether that token is an acceptable terminator.
pub fn parse_statement_list(parser: &mut Parser) -> PResult<Vec<Stmt>> {
    let mut stmts = Vec::new();
    while starts_statement(parser.current_kind()) {
        stmts.push(parse_stmt(parser)?);
    }
    Ok(stmts)
}

/// Parse a single statement, including the whitespace that trails it.
pub fn parse_stmt(parser: &mut Parser) -> PResult<Stmt> {
    parser.enter()?;
    let stmt = parse_stmt_kind(parser);
    parser.leave();
    stmt
}

fn parse_stmt_kind(parser: &mut Parser) -> PResult<Stmt> {
    match parser.current_kind() {
        TokenKind::Semicolon => {
            let span = parser.advance().span;
            parser.skip_whitespace();
            Ok(Stmt {
                kind: StmtKind::Nop,
                span,
            })
        }
        TokenKind::Return => parse_return(parser),
        TokenKind::LeftBrace => parse_block(parser),
        TokenKind::If => parse_if(parser),
        TokenKind::Function => parse_function(parser),
        TokenKind::Class | TokenKind::Abstract | TokenKind::Final => parse_class(parser),
        TokenKind::Interface => parse_interface(parser),
        _ => Err(parser.unexpected()),
    }
}

fn parse_return(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span;
    parser.skip_whitespace();
    parser.expect(TokenKind::Semicolon)?;
    let span = parser.end_span(start);
    parser.skip_whitespace();
    Ok(Stmt {
        kind: StmtKind::Return,
        span,
    })
}

/// `{` statements `}`, returning the inner list and the brace-to-brace span.
fn parse_braced_list(parser: &mut Parser) -> PResult<(Vec<Stmt>, Span)> {
    let start = parser.expect(TokenKind::LeftBrace)?.span;
    parser.skip_whitespace();
    let stmts = parse_statement_list(parser)?;
    parser.expect(TokenKind::RightBrace)?;
    let span = parser.end_span(start);
    parser.skip_whitespace();
    Ok((stmts, span))
}

fn parse_block(parser: &mut Parser) -> PResult<Stmt> {
    let (stmts, span) = parse_braced_list(parser)?;
    Ok(Stmt {
        kind: StmtKind::Block(stmts),
        span,
    })
}

fn parse_if(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span;
    parser.skip_whitespace();
    parser.expect(TokenKind::LeftParen)?;
    parser.skip_whitespace();
    let condition = expr::parse_expr(parser)?;
    parser.expect(TokenKind::RightParen)?;
    parser.skip_whitespace();

    let then_branch = Box::new(parse_stmt(parser)?);

    // A dangling else binds to the innermost if, which has already had its
    // chance to take it by the time control returns here.
    let else_branch = if parser.eat(TokenKind::Else).is_some() {
        parser.skip_whitespace();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt {
        kind: StmtKind::If(IfStmt {
            condition,
            then_branch,
            else_branch,
        }),
        span: parser.end_span(start),
    })
}

fn parse_function(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span;
    parser.expect_whitespace()?;
    let by_ref = parser.eat(TokenKind::Ampersand).is_some();
    parser.skip_whitespace();
    let name = parse_identifier(parser)?;
    parser.skip_whitespace();
    let params = parse_parameter_list(parser)?;
    let (body, _) = parse_braced_list(parser)?;

    Ok(Stmt {
        kind: StmtKind::Function(FunctionDecl {
            name,
            by_ref,
            params,
            body,
        }),
        span: parser.end_span(start),
    })
}

fn parse_identifier(parser: &mut Parser) -> PResult<String> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(parser.text(&token).to_string())
}

// =============================================================================
// Parameters
// =============================================================================

/// `(` [param (`,` param)*] `)` with trailing whitespace.
pub fn parse_parameter_list(parser: &mut Parser) -> PResult<Vec<Param>> {
    parser.expect(TokenKind::LeftParen)?;
    parser.skip_whitespace();

    let mut params = Vec::new();
    if !parser.check(TokenKind::RightParen) {
        loop {
            params.push(parse_param(parser)?);
            if parser.eat(TokenKind::Comma).is_none() {
                break;
            }
            parser.skip_whitespace();
        }
    }

    parser.expect(TokenKind::RightParen)?;
    parser.skip_whitespace();
    Ok(params)
}

fn parse_param(parser: &mut Parser) -> PResult<Param> {
    let start = parser.current_span();

    let type_hint = match parser.current_kind() {
        TokenKind::Identifier => {
            let name = parse_identifier(parser)?;
            parser.skip_whitespace();
            Some(name)
        }
        TokenKind::Array => {
            parser.advance();
            parser.skip_whitespace();
            Some("array".to_string())
        }
        _ => None,
    };

    // No whitespace is allowed between `&` and the variable.
    let by_ref = parser.eat(TokenKind::Ampersand).is_some();
    let var = parser.expect(TokenKind::Variable)?;
    let name = parser.text(&var).to_string();
    parser.skip_whitespace();

    let default = if parser.eat(TokenKind::Equals).is_some() {
        parser.skip_whitespace();
        Some(expr::parse_static_scalar(parser)?)
    } else {
        None
    };

    Ok(Param {
        name,
        by_ref,
        type_hint,
        default,
        span: parser.end_span(start),
    })
}

// =============================================================================
// Classes and interfaces
// =============================================================================

fn parse_class(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.current_span();

    let modifier = match parser.current_kind() {
        TokenKind::Abstract => Some(ClassModifier::Abstract),
        TokenKind::Final => Some(ClassModifier::Final),
        _ => None,
    };
    if modifier.is_some() {
        parser.advance();
        parser.skip_whitespace();
    }

    parser.expect(TokenKind::Class)?;
    parser.skip_whitespace();
    let name = parse_identifier(parser)?;
    parser.skip_whitespace();

    let mut extends = Vec::new();
    if parser.eat(TokenKind::Extends).is_some() {
        parser.skip_whitespace();
        extends.push(parse_identifier(parser)?);
        parser.skip_whitespace();
    }

    let implements = if parser.eat(TokenKind::Implements).is_some() {
        parser.skip_whitespace();
        parse_name_list(parser)?
    } else {
        Vec::new()
    };

    let members = parse_class_body(parser)?;

    Ok(Stmt {
        kind: StmtKind::Class(ClassDecl {
            kind: ClassKind::Class,
            name,
            modifier,
            extends,
            implements,
            members,
        }),
        span: parser.end_span(start),
    })
}

fn parse_interface(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span;
    parser.skip_whitespace();
    let name = parse_identifier(parser)?;
    parser.skip_whitespace();

    let extends = if parser.eat(TokenKind::Extends).is_some() {
        parser.skip_whitespace();
        parse_name_list(parser)?
    } else {
        Vec::new()
    };

    let members = parse_class_body(parser)?;

    Ok(Stmt {
        kind: StmtKind::Class(ClassDecl {
            kind: ClassKind::Interface,
            name,
            modifier: None,
            extends,
            implements: Vec::new(),
            members,
        }),
        span: parser.end_span(start),
    })
}

/// IDENT (`,` IDENT)* with whitespace after each element.
fn parse_name_list(parser: &mut Parser) -> PResult<Vec<String>> {
    let mut names = vec![parse_identifier(parser)?];
    parser.skip_whitespace();
    while parser.eat(TokenKind::Comma).is_some() {
        parser.skip_whitespace();
        names.push(parse_identifier(parser)?);
        parser.skip_whitespace();
    }
    Ok(names)
}

fn parse_class_body(parser: &mut Parser) -> PResult<Vec<ClassMember>> {
    parser.expect(TokenKind::LeftBrace)?;
    parser.skip_whitespace();

    let mut members = Vec::new();
    while starts_member(parser.current_kind()) {
        members.push(parse_class_member(parser)?);
    }

    parser.expect(TokenKind::RightBrace)?;
    parser.skip_whitespace();
    Ok(members)
}

fn starts_member(kind: TokenKind) -> bool {
    kind == TokenKind::Var
        || kind == TokenKind::Const
        || kind == TokenKind::Function
        || member_modifier(kind).is_some()
}

fn member_modifier(kind: TokenKind) -> Option<Modifier> {
    match kind {
        TokenKind::Public => Some(Modifier::Public),
        TokenKind::Protected => Some(Modifier::Protected),
        TokenKind::Private => Some(Modifier::Private),
        TokenKind::Static => Some(Modifier::Static),
        TokenKind::Abstract => Some(Modifier::Abstract),
        TokenKind::Final => Some(Modifier::Final),
        _ => None,
    }
}

fn parse_class_member(parser: &mut Parser) -> PResult<ClassMember> {
    let start = parser.current_span();

    let kind = match parser.current_kind() {
        TokenKind::Const => parse_constants(parser)?,
        TokenKind::Var => {
            parser.advance();
            parser.skip_whitespace();
            parse_property(parser, vec![Modifier::Var])?
        }
        _ => {
            let mut modifiers = Vec::new();
            while let Some(modifier) = member_modifier(parser.current_kind()) {
                modifiers.push(modifier);
                parser.advance();
                parser.skip_whitespace();
            }

            match parser.current_kind() {
                TokenKind::Function => parse_method(parser, modifiers)?,
                TokenKind::Variable if !modifiers.is_empty() => {
                    parse_property(parser, modifiers)?
                }
                _ => return Err(parser.expected("variable or 'function'")),
            }
        }
    };

    Ok(ClassMember {
        kind,
        span: parser.end_span(start),
    })
}

fn parse_constants(parser: &mut Parser) -> PResult<ClassMemberKind> {
    parser.advance();
    parser.skip_whitespace();

    let mut items = Vec::new();
    loop {
        let start = parser.current_span();
        let name = parse_identifier(parser)?;
        parser.skip_whitespace();
        parser.expect(TokenKind::Equals)?;
        parser.skip_whitespace();
        let value = expr::parse_static_scalar(parser)?;
        items.push(ConstItem {
            name,
            value,
            span: parser.end_span(start),
        });

        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
        parser.skip_whitespace();
    }

    parser.expect(TokenKind::Semicolon)?;
    parser.skip_whitespace();
    Ok(ClassMemberKind::Constants(items))
}

fn parse_property(parser: &mut Parser, modifiers: Vec<Modifier>) -> PResult<ClassMemberKind> {
    let mut items = Vec::new();
    loop {
        let var = parser.expect(TokenKind::Variable)?;
        let name = parser.text(&var).to_string();
        parser.skip_whitespace();

        let default = if parser.eat(TokenKind::Equals).is_some() {
            parser.skip_whitespace();
            Some(expr::parse_static_scalar(parser)?)
        } else {
            None
        };
        items.push(PropertyItem {
            name,
            default,
            span: parser.end_span(var.span),
        });

        if parser.eat(TokenKind::Comma).is_none() {
            break;
        }
        parser.skip_whitespace();
    }

    parser.expect(TokenKind::Semicolon)?;
    parser.skip_whitespace();
    Ok(ClassMemberKind::Property(PropertyDecl { modifiers, items }))
}

fn parse_method(parser: &mut Parser, modifiers: Vec<Modifier>) -> PResult<ClassMemberKind> {
    parser.advance();
    parser.skip_whitespace();
    // No whitespace is allowed between `&` and the method name.
    let by_ref = parser.eat(TokenKind::Ampersand).is_some();
    let name = parse_identifier(parser)?;
    parser.skip_whitespace();
    let params = parse_parameter_list(parser)?;

    let body = match parser.current_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            parser.skip_whitespace();
            None
        }
        TokenKind::LeftBrace => Some(parse_braced_list(parser)?.0),
        _ => return Err(parser.expected("';' or '{'")),
    };

    Ok(ClassMemberKind::Method(MethodDecl {
        modifiers,
        by_ref,
        name,
        params,
        body,
    }))
}
