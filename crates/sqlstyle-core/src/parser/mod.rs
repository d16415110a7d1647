//! Minimal SQL parser.
//!
//! Builds a lossless [`SyntaxNode`] tree with just enough structure for
//! style rules: statements, set operators, and leaf tokens. It is not a
//! SQL grammar and accepts any text that tokenizes.

mod lexer;

pub use lexer::is_keyword;

use crate::tree::{NodeKind, PositionMarker, SyntaxNode};
use thiserror::Error;

/// Keywords that combine two queries.
const SET_OPERATORS: &[&str] = &["UNION", "INTERSECT", "EXCEPT", "MINUS"];

/// Keywords that may qualify a set operator.
const SET_QUALIFIERS: &[&str] = &["ALL", "DISTINCT"];

/// Errors that can occur while parsing SQL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A quoted token or block comment has no closing delimiter.
    #[error("unterminated {what} starting at {line}:{column}")]
    Unterminated {
        /// What was left open.
        what: &'static str,
        /// Line of the opening delimiter.
        line: usize,
        /// Column of the opening delimiter.
        column: usize,
    },
}

/// Parses SQL text into a tree rooted at a [`NodeKind::File`] node.
///
/// # Errors
///
/// Returns an error if a string, quoted identifier or block comment is
/// not terminated.
pub fn parse(sql: &str) -> Result<SyntaxNode, ParseError> {
    let tokens = lexer::tokenize(sql)?;
    let mut file_children = Vec::new();
    let mut statement: Vec<SyntaxNode> = Vec::new();

    for token in tokens {
        if statement.is_empty() && token.kind().is_trivia() {
            file_children.push(token);
            continue;
        }
        let terminates = token.kind() == NodeKind::Symbol && token.raw() == ";";
        statement.push(token);
        if terminates {
            file_children.push(build_statement(std::mem::take(&mut statement)));
        }
    }

    if !statement.is_empty() {
        let trailing = statement
            .iter()
            .rev()
            .take_while(|t| t.kind().is_trivia())
            .count();
        let trivia = statement.split_off(statement.len() - trailing);
        file_children.push(build_statement(statement));
        file_children.extend(trivia);
    }

    Ok(SyntaxNode::branch(
        NodeKind::File,
        file_children,
        PositionMarker::start(),
    ))
}

fn build_statement(tokens: Vec<SyntaxNode>) -> SyntaxNode {
    let fallback = tokens
        .first()
        .map_or_else(PositionMarker::start, SyntaxNode::position);
    let mut children = Vec::with_capacity(tokens.len());
    let mut idx = 0;

    while idx < tokens.len() {
        let token = &tokens[idx];
        if !is_keyword_in(token, SET_OPERATORS) {
            children.push(token.clone());
            idx += 1;
            continue;
        }

        let mut end = idx;
        let mut probe = idx + 1;
        while probe < tokens.len() && tokens[probe].kind().is_trivia() {
            probe += 1;
        }
        if probe < tokens.len() && is_keyword_in(&tokens[probe], SET_QUALIFIERS) {
            end = probe;
        }

        children.push(SyntaxNode::branch(
            NodeKind::SetOperator,
            tokens[idx..=end].to_vec(),
            token.position(),
        ));
        idx = end + 1;
    }

    SyntaxNode::branch(NodeKind::Statement, children, fallback)
}

fn is_keyword_in(token: &SyntaxNode, words: &[&str]) -> bool {
    token.kind() == NodeKind::Keyword && words.contains(&token.raw_upper().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_operators(root: &SyntaxNode) -> Vec<String> {
        let mut found = Vec::new();
        root.walk(|node, _| {
            if node.kind() == NodeKind::SetOperator {
                found.push(node.raw().to_string());
            }
        });
        found
    }

    #[test]
    fn parse_is_lossless() {
        let sql = "-- header\nSELECT a FROM t UNION ALL\n  SELECT b FROM u;\n\nSELECT 1";
        let root = parse(sql).unwrap();
        assert_eq!(root.raw(), sql);
        let leaves: String = root.leaves().map(SyntaxNode::raw).collect();
        assert_eq!(leaves, sql);
    }

    #[test]
    fn splits_statements_at_semicolons() {
        let root = parse("SELECT 1; SELECT 2;\n").unwrap();
        let statements: Vec<&str> = root
            .children()
            .iter()
            .filter(|c| c.kind() == NodeKind::Statement)
            .map(SyntaxNode::raw)
            .collect();
        assert_eq!(statements, vec!["SELECT 1;", "SELECT 2;"]);
    }

    #[test]
    fn trailing_trivia_stays_outside_statement() {
        let root = parse("SELECT 1  \n").unwrap();
        assert_eq!(root.children()[0].kind(), NodeKind::Statement);
        assert_eq!(root.children()[0].raw(), "SELECT 1");
        assert_eq!(root.children().len(), 3);
    }

    #[test]
    fn groups_set_operators_with_qualifier() {
        let root = parse("SELECT 1 union\n all SELECT 2 UNION SELECT 3 EXCEPT SELECT 4").unwrap();
        assert_eq!(set_operators(&root), vec!["union\n all", "UNION", "EXCEPT"]);
    }

    #[test]
    fn set_operator_first_child_is_operator_keyword() {
        let root = parse("SELECT 1 UNION DISTINCT SELECT 2").unwrap();
        let mut first = None;
        root.walk(|node, _| {
            if node.kind() == NodeKind::SetOperator {
                first = node.first_child().map(|c| (c.kind(), c.raw().to_string()));
            }
        });
        assert_eq!(first, Some((NodeKind::Keyword, "UNION".to_string())));
    }

    #[test]
    fn comment_between_operator_and_qualifier_is_grouped() {
        let root = parse("SELECT 1 UNION /* c */ ALL SELECT 2").unwrap();
        assert_eq!(set_operators(&root), vec!["UNION /* c */ ALL"]);

        let root = parse("SELECT 1 UNION -- note\nALL SELECT 2").unwrap();
        assert_eq!(set_operators(&root), vec!["UNION -- note\nALL"]);
    }

    #[test]
    fn trailing_comment_without_qualifier_stays_outside() {
        let root = parse("SELECT 1 UNION /* all rows */ SELECT 2").unwrap();
        assert_eq!(set_operators(&root), vec!["UNION"]);
    }

    #[test]
    fn empty_input_gives_empty_file() {
        let root = parse("").unwrap();
        assert_eq!(root.kind(), NodeKind::File);
        assert!(root.children().is_empty());
    }
}
