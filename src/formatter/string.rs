use crate::formatter::layout::{layout, Piece};
use crate::node::Node;

/// Render a normalized single-spaced SQL string. Token texts, including
/// quoted names and string literals, are copied verbatim.
pub fn format(root: &Node) -> String {
    let pieces = layout(root);
    let mut out = String::with_capacity(pieces.len() * 4);
    for piece in pieces {
        match piece {
            Piece::Token(token) | Piece::Separator(token) => out.push_str(&token.text),
            Piece::Gap(gap) => out.push_str(gap.as_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{tokenize, Syntax};
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn fmt(source: &str) -> String {
        let root = Parser::default()
            .parse(tokenize(source, &Syntax::default()))
            .unwrap();
        format(&root)
    }

    #[test]
    fn test_irregular_whitespace() {
        assert_eq!(fmt("SELECT   *   FROM  t"), "SELECT * FROM t");
    }

    #[test]
    fn test_quoting_untouched() {
        assert_eq!(
            fmt("SELECT * FROM \"users\" WHERE id = %s"),
            "SELECT * FROM \"users\" WHERE id = %s"
        );
        assert_eq!(
            fmt("select 'a   b''c'   from [my  table]"),
            "select 'a   b''c' from [my  table]"
        );
    }

    #[test]
    fn test_unterminated_group_gets_no_closing_paren() {
        assert_eq!(
            fmt("SELECT * FROM t WHERE x IN (1,2,   3"),
            "SELECT * FROM t WHERE x IN (1, 2, 3"
        );
    }

    #[test]
    fn test_nested_lists() {
        assert_eq!(
            fmt("select coalesce(a,b) ,count( * )\nfrom t"),
            "select coalesce(a, b), count( * ) from t"
        );
    }

    #[test]
    fn test_idempotent() {
        for source in [
            "select a,b from t where x in (1,2",
            "select a -- trailing\n,b from t",
            "  /* lead */ select\n\n1  ",
            "insert into t (a , b) values ($1 ,$2)",
            "select 'oops",
        ] {
            let once = fmt(source);
            assert_eq!(fmt(&once), once, "not idempotent for {:?}", source);
        }
    }
}
