use super::*;
use crate::range::bit_range;
use nom::{
    IResult,
    combinator::{ opt, rest, value, verify },
    multi::many0,
    branch::alt,
    sequence::{ pair, preceded, terminated, tuple },
    character::complete::{ multispace0, multispace1 },
    bytes::complete::{ tag, take_till1, take_while1 },
};

/// What kind of statement a module body line is.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StatementKind {
    /// `input`, `output`, `inout` or `wire` declaration.
    Decl(FieldKind),
    /// `assign` statement.
    Assign,
    /// Everything else: a primitive gate or sub-module instance.
    Instance,
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// The leading identifier of a statement.
fn first_token(i: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_while1(is_ident_char))(i)
}

/// Classifies a statement by its first token.
pub fn classify(stmt: &str) -> StatementKind {
    use FieldKind::*;
    match first_token(stmt) {
        Ok((_, "input")) => StatementKind::Decl(Input),
        Ok((_, "output")) => StatementKind::Decl(Output),
        Ok((_, "inout")) => StatementKind::Decl(InOut),
        Ok((_, "wire")) => StatementKind::Decl(Wire),
        Ok((_, "assign")) => StatementKind::Assign,
        _ => StatementKind::Instance
    }
}

fn malformed(statement: &str, reason: &'static str) -> ParseError {
    ParseError::MalformedDeclaration {
        module: CompactString::default(),
        statement: statement.into(),
        reason
    }
}

/// Extracts the declared name from a module header like
/// `module adder(a, b, s)`. Anything after `(` or `;` is ignored.
pub fn parse_module_name(header: &str) -> Result<CompactString, ParseError> {
    let head = header.split(|c: char| c == '(' || c == ';').next().unwrap_or_default();
    let r: IResult<&str, &str> = preceded(
        pair(multispace0, terminated(tag("module"), multispace1)),
        take_till1(char::is_whitespace)
    )(head);
    match r {
        Ok((_, name)) => Ok(name.into()),
        Err(_) => Err(malformed(
            header.lines().next().unwrap_or_default(),
            "module header has no name"))
    }
}

fn decl_keyword(i: &str) -> IResult<&str, FieldKind> {
    use FieldKind::*;
    preceded(multispace0, alt((
        value(Input, tag("input")),
        value(Output, tag("output")),
        value(InOut, tag("inout")),
        value(Wire, tag("wire")),
    )))(i)
}

/// Net and variable qualifiers allowed between the keyword and the
/// range, as in `input wire [3:0] a` or `output reg signed q`.
const DECL_QUALIFIERS: &[&str] = &["wire", "reg", "logic", "signed", "unsigned"];

fn decl_qualifier(i: &str) -> IResult<&str, &str> {
    preceded(multispace1, verify(take_while1(is_ident_char),
                                 |q: &str| DECL_QUALIFIERS.contains(&q)))(i)
}

/// Parses an `input`/`output`/`inout`/`wire` declaration.
///
/// Width is 1 without a range and `|hi - lo| + 1` with one. All
/// comma-separated names share the same width. Qualifiers such as
/// `wire`, `reg` or `signed` are skipped.
pub fn parse_field_decl(stmt: &str) -> Result<(FieldKind, Vec<NamedField>), ParseError> {
    let r: IResult<&str, (FieldKind, Vec<&str>, Option<BitRange>, &str)> =
        tuple((decl_keyword, many0(decl_qualifier), opt(bit_range), rest))(stmt);
    let (kind, _, range, names) = match r {
        Ok((_, t)) => t,
        Err(_) => return Err(malformed(stmt, "expected a declaration keyword"))
    };
    if names.contains(|c: char| c == '[' || c == ']') {
        return Err(malformed(stmt, "bad bit range, expected [hi:lo]"))
    }
    let width = range.map_or(1, |r| r.width());
    let mut fields = Vec::new();
    for name in names.split(',') {
        let name = name.trim_matches(|c: char| c == ';' || c == ',' || c.is_whitespace());
        if name.is_empty() {
            return Err(malformed(stmt, "empty signal name"))
        }
        if name.contains(char::is_whitespace) {
            return Err(malformed(stmt, "unsupported declaration qualifier"))
        }
        fields.push(NamedField { name: name.into(), width });
    }
    Ok((kind, fields))
}

/// Parses a gate or module instance like `and g1(y, a, b)`.
///
/// The component type is the first token before `(`; a second token
/// is the instance label. The input count is the number of `,`
/// separators inside the connection list.
pub fn parse_instance(stmt: &str) -> Result<InstanceRef, ParseError> {
    let open = stmt.find('(')
        .ok_or_else(|| malformed(stmt, "instance has no connection list"))?;
    let close = stmt.rfind(')')
        .filter(|&close| close > open)
        .ok_or_else(|| malformed(stmt, "instance connection list has no `)`"))?;
    let mut head = stmt[..open].split_whitespace();
    let component = head.next()
        .ok_or_else(|| malformed(stmt, "instance has no component type"))?;
    let label = head.next().map(CompactString::from);
    let input_count = stmt[open + 1..close].matches(',').count();
    Ok(InstanceRef {
        component: component.into(),
        label,
        input_count
    })
}

/// Extracts the compared literal of a guard like `(sel == 2'b01)`.
fn guard_literal(cond: &str) -> Option<&str> {
    let (_, after) = cond.split_once("== ")?;
    Some(after.split(')').next().unwrap_or(after).trim())
}

/// Parses an `assign` statement into its target and right-hand side.
///
/// A right-hand side of the form `(c1 == L1) ? R1 : (c2 == L2) ? R2 : D`
/// becomes a conditional chain. Its alternatives are separated by
/// `": "`; the last one is the default.
pub fn parse_assign(stmt: &str) -> Result<AssignStmt, ParseError> {
    let body = preceded(multispace0, tag::<_, _, nom::error::Error<&str>>("assign"))(stmt)
        .map(|(rem, _)| rem)
        .map_err(|_| malformed(stmt, "expected `assign`"))?;
    let (lhs, rhs) = body.split_once('=')
        .ok_or_else(|| malformed(stmt, "assign has no `=`"))?;
    let target = lhs.trim();
    if target.is_empty() {
        return Err(malformed(stmt, "assign has no target"))
    }
    let rhs = rhs.trim();

    let parts: Vec<&str> = rhs.split(": ").collect();
    let (default, guarded) = match parts.split_last() {
        Some((default, guarded)) if !guarded.is_empty() => (default, guarded),
        _ => return Ok(AssignStmt {
            target: target.into(),
            rhs: AssignRhs::Plain(rhs.to_string())
        })
    };
    let mut alternatives = Vec::with_capacity(guarded.len());
    for part in guarded {
        let (cond, result) = part.split_once('?')
            .ok_or_else(|| malformed(stmt, "conditional alternative has no `?`"))?;
        let cond_lit = guard_literal(cond)
            .ok_or_else(|| malformed(stmt, "condition has no `==` comparison"))?;
        alternatives.push(MuxAlternative {
            condition_bits: convert_literal(cond_lit)?,
            result_bits: convert_literal(result.trim())?,
        });
    }
    Ok(AssignStmt {
        target: target.into(),
        rhs: AssignRhs::Conditional {
            alternatives,
            default: default.trim().to_string()
        }
    })
}
