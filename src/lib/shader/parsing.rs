//! Line tokenization and parameter resolution.
//!
//! Tokens are classified with the grammar in `lib/pest/grammar.pest`; references are looked up in
//! the [Graph] being built. Nothing here ever inserts a node.

use super::{
    error::{Error, LineResult, Shape},
    graph::{Graph, NodeId, Operand, Unvalidated},
};

use crate::vector::Vector;

use {pest::Parser, pest_derive::Parser};

#[derive(Parser)]
#[grammar = "lib/pest/grammar.pest"]
struct MParser;

/// Split a line into its blank-separated tokens. Blank lines have no tokens.
pub fn tokenize(line: &str) -> LineResult<Vec<&str>> {
    let line_pair = MParser::parse(Rule::line, line)
        .map_err(|_| Error::malformed(line, Shape::Line))?
        .next()
        .ok_or_else(|| Error::malformed(line, Shape::Line))?;

    Ok(line_pair
        .into_inner()
        .filter(|pair| pair.as_rule() == Rule::token)
        .map(|pair| pair.as_str())
        .collect())
}

/// Whether the token is a numeric literal.
pub fn is_number(token: &str) -> bool {
    MParser::parse(Rule::number_literal, token).is_ok()
}

/// Parse a numeric literal, e.g. `-0.5`.
pub fn parse_number(token: &str) -> LineResult<f32> {
    if !is_number(token) {
        return Err(Error::malformed(token, Shape::Number));
    }

    token
        .parse()
        .map_err(|_| Error::malformed(token, Shape::Number))
}

/// Parse a vector literal with exactly `DIM` components, e.g. `(1,0.5,0,1)`.
pub fn parse_vector<const DIM: usize>(token: &str) -> LineResult<Vector<DIM>> {
    let literal = MParser::parse(Rule::vector_literal, token)
        .map_err(|_| Error::malformed(token, Shape::Vector(DIM)))?
        .next()
        .ok_or_else(|| Error::malformed(token, Shape::Vector(DIM)))?;

    let components = literal
        .into_inner()
        .flat_map(|pair| pair.into_inner())
        .filter(|pair| pair.as_rule() == Rule::number)
        .map(|pair| parse_number(pair.as_str()))
        .collect::<LineResult<Vec<f32>>>()?;

    Vector::try_from(components.as_slice()).map_err(|got| Error::ArityMismatch {
        context: format!("Vector literal `{token}`"),
        expected: DIM,
        got,
    })
}

/// Resolve a reference token to the latest node declared under that name.
pub fn resolve_reference(token: &str, graph: &Graph<Unvalidated>) -> LineResult<NodeId> {
    graph
        .find(token)
        .ok_or_else(|| Error::UndeclaredReference(token.to_owned()))
}

/// Resolve an arithmetic operand: numeric literals become constants, anything else must name a
/// declared node. Numbers take precedence over nodes with numeric names.
pub fn resolve_operand(token: &str, graph: &Graph<Unvalidated>) -> LineResult<Operand> {
    if is_number(token) {
        return parse_number(token).map(Operand::Constant);
    }

    if token.starts_with('(') {
        return Err(Error::malformed(token, Shape::Operand));
    }

    resolve_reference(token, graph).map(Operand::Node)
}
