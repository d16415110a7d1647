//! Tokenizer producing leaf nodes.

use super::ParseError;
use crate::tree::{NodeKind, PositionMarker, SyntaxNode};

/// Words lexed as [`NodeKind::Keyword`]. Anything else is an identifier.
const KEYWORDS: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CROSS", "DELETE", "DESC", "DISTINCT",
    "ELSE", "END", "EXCEPT", "EXISTS", "FROM", "FULL", "GROUP", "HAVING", "IN", "INNER", "INSERT",
    "INTERSECT", "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT", "MINUS", "NOT", "NULL", "OFFSET",
    "ON", "OR", "ORDER", "OUTER", "RIGHT", "SELECT", "SET", "THEN", "UNION", "UPDATE", "USING",
    "VALUES", "WHEN", "WHERE", "WITH",
];

/// Returns true if `word` is lexed as a keyword.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    let upper = word.to_ascii_uppercase();
    KEYWORDS.contains(&upper.as_str())
}

/// Splits `sql` into leaf nodes whose text concatenates back to `sql`.
pub(crate) fn tokenize(sql: &str) -> Result<Vec<SyntaxNode>, ParseError> {
    let mut lexer = Lexer {
        sql,
        pos: PositionMarker::start(),
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    sql: &'a str,
    pos: PositionMarker,
    tokens: Vec<SyntaxNode>,
}

impl Lexer<'_> {
    fn rest(&self) -> &str {
        &self.sql[self.pos.offset..]
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(ch) = self.rest().chars().next() {
            let (kind, len) = self.next_token(ch)?;
            let end = self.pos.offset + len;
            let raw = &self.sql[self.pos.offset..end];
            self.tokens.push(SyntaxNode::leaf(kind, raw, self.pos));
            self.pos = self.pos.advance(raw);
        }
        Ok(())
    }

    fn next_token(&self, ch: char) -> Result<(NodeKind, usize), ParseError> {
        let rest = self.rest();
        let token = match ch {
            '\n' => (NodeKind::Newline, 1),
            '\r' if rest.starts_with("\r\n") => (NodeKind::Newline, 2),
            c if c.is_whitespace() => (
                NodeKind::Whitespace,
                take_while(rest, |c| c.is_whitespace() && c != '\n' && c != '\r').max(c.len_utf8()),
            ),
            '-' if rest.starts_with("--") => (NodeKind::Comment, rest.find('\n').unwrap_or(rest.len())),
            '/' if rest.starts_with("/*") => {
                let end = rest[2..]
                    .find("*/")
                    .ok_or_else(|| self.unterminated("block comment"))?;
                (NodeKind::Comment, end + 4)
            }
            '\'' => (NodeKind::Literal, self.quoted(rest, '\'', "string literal")?),
            '"' | '`' => (NodeKind::Identifier, self.quoted(rest, ch, "quoted identifier")?),
            c if c.is_ascii_digit() => (
                NodeKind::Literal,
                take_while(rest, |c| c.is_ascii_alphanumeric() || c == '.'),
            ),
            c if c.is_alphabetic() || c == '_' => {
                let len = take_while(rest, |c| c.is_alphanumeric() || c == '_' || c == '$');
                let kind = if is_keyword(&rest[..len]) {
                    NodeKind::Keyword
                } else {
                    NodeKind::Identifier
                };
                (kind, len)
            }
            c => (NodeKind::Symbol, c.len_utf8()),
        };
        Ok(token)
    }

    /// Length of a quoted token. A doubled quote character is an escape.
    fn quoted(&self, rest: &str, quote: char, what: &'static str) -> Result<usize, ParseError> {
        let mut chars = rest.char_indices().skip(1).peekable();
        while let Some((idx, c)) = chars.next() {
            if c != quote {
                continue;
            }
            if chars.peek().is_some_and(|&(_, next)| next == quote) {
                chars.next();
                continue;
            }
            return Ok(idx + c.len_utf8());
        }
        Err(self.unterminated(what))
    }

    fn unterminated(&self, what: &'static str) -> ParseError {
        ParseError::Unterminated {
            what,
            line: self.pos.line,
            column: self.pos.column,
        }
    }
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(s.len(), |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<(NodeKind, String)> {
        tokenize(sql)
            .unwrap()
            .iter()
            .map(|t| (t.kind(), t.raw().to_string()))
            .collect()
    }

    #[test]
    fn lexes_keywords_case_insensitively() {
        let tokens = kinds("select a Union b");
        assert_eq!(tokens[0], (NodeKind::Keyword, "select".to_string()));
        assert_eq!(tokens[2], (NodeKind::Identifier, "a".to_string()));
        assert_eq!(tokens[4], (NodeKind::Keyword, "Union".to_string()));
    }

    #[test]
    fn lexes_trivia() {
        let tokens = kinds("a  -- note\r\n/* x */b");
        let got: Vec<NodeKind> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            got,
            vec![
                NodeKind::Identifier,
                NodeKind::Whitespace,
                NodeKind::Comment,
                NodeKind::Newline,
                NodeKind::Comment,
                NodeKind::Identifier,
            ]
        );
        assert_eq!(tokens[2].1, "-- note\r");
    }

    #[test]
    fn string_literal_with_escaped_quote() {
        let tokens = kinds("'it''s' x");
        assert_eq!(tokens[0], (NodeKind::Literal, "'it''s'".to_string()));
    }

    #[test]
    fn unterminated_string_is_error() {
        let err = tokenize("SELECT 'abc").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unterminated {
                what: "string literal",
                line: 1,
                column: 8
            }
        ));
    }

    #[test]
    fn unterminated_block_comment_is_error() {
        assert!(tokenize("SELECT /* open").is_err());
    }

    #[test]
    fn tokens_are_lossless() {
        let sql = "SELECT \"weird col\", 1.5e3 FROM t\n\tWHERE x <> 'ü';";
        let joined: String = tokenize(sql).unwrap().iter().map(SyntaxNode::raw).collect();
        assert_eq!(joined, sql);
    }
}
