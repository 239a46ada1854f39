use crate::error::{Result, SelectorError};
use std::fmt;

/// Traversal bound on an upstream/downstream modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Full closure.
    Unbounded,

    /// At most this many hops from a seed.
    Limit(usize),
}

impl Depth {
    pub(crate) fn limit(self) -> Option<usize> {
        match self {
            Depth::Unbounded => None,
            Depth::Limit(n) => Some(n),
        }
    }
}

/// The name/tag/wildcard term inside a clause, before modifiers apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Literal model name.
    Name(String),

    /// Every model carrying the tag.
    Tag(String),

    /// Every supplied model.
    Wildcard,
}

/// One comma-separated unit of a selection expression:
/// `[N]+ criterion +[N]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Leading `+` or `N+`: include ancestors of each match.
    pub upstream: Option<Depth>,

    pub criterion: Criterion,

    /// Trailing `+` or `+N`: include descendants of each match.
    pub downstream: Option<Depth>,
}

/// Parsed selection expression: the union of its clauses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionExpr {
    pub clauses: Vec<Clause>,
}

impl SelectionExpr {
    /// Parse a selection string. Pure; no graph required.
    ///
    /// The expression splits on commas and resolves to the union of its
    /// clauses. An empty or whitespace-only expression parses to an empty
    /// union, which selects nothing.
    pub fn parse(expr: &str) -> Result<Self> {
        let mut clauses = Vec::new();

        for segment in expr.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            clauses.push(Clause::parse(segment)?);
        }

        Ok(Self { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Clause {
    fn parse(clause: &str) -> Result<Self> {
        let mut rest = clause;

        let upstream = match split_leading_modifier(rest) {
            Some((digits, remainder)) => {
                rest = remainder.trim_start();
                Some(parse_depth(digits, clause)?)
            }
            None => None,
        };

        let downstream = match split_trailing_modifier(rest) {
            Some((remainder, digits)) => {
                rest = remainder.trim_end();
                Some(parse_depth(digits, clause)?)
            }
            None => None,
        };

        let criterion = parse_criterion(rest, clause)?;

        Ok(Self {
            upstream,
            criterion,
            downstream,
        })
    }
}

/// `+model` / `2+model` -> (depth digits, rest). Leading digits without a
/// following `+` belong to the name, not to a modifier.
fn split_leading_modifier(clause: &str) -> Option<(&str, &str)> {
    let digits_end = clause
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(clause.len());

    let (digits, tail) = clause.split_at(digits_end);
    tail.trim_start().strip_prefix('+').map(|rest| (digits, rest))
}

/// `model+` / `model+3` -> (rest, depth digits). Trailing digits without a
/// preceding `+` belong to the name.
fn split_trailing_modifier(clause: &str) -> Option<(&str, &str)> {
    let digits_start = clause
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(clause.len());

    let (head, digits) = clause.split_at(digits_start);
    head.trim_end()
        .strip_suffix('+')
        .map(|remainder| (remainder, digits))
}

fn parse_depth(digits: &str, clause: &str) -> Result<Depth> {
    if digits.is_empty() {
        return Ok(Depth::Unbounded);
    }

    digits
        .parse::<usize>()
        .map(Depth::Limit)
        .map_err(|_| SelectorError::InvalidClause {
            clause: clause.to_string(),
            reason: format!("depth `{digits}` is not a valid integer"),
        })
}

fn parse_criterion(token: &str, clause: &str) -> Result<Criterion> {
    let token = token.trim();

    if token.is_empty() {
        return Err(SelectorError::InvalidClause {
            clause: clause.to_string(),
            reason: "missing model name, tag: criterion, or *".to_string(),
        });
    }

    if token == "*" {
        return Ok(Criterion::Wildcard);
    }

    // The qualifier is everything up to the last colon, so `tag::bad` and
    // `a:b:c` both surface the malformed qualifier instead of producing a
    // tag value containing `:`.
    if let Some((qualifier, value)) = token.rsplit_once(':') {
        if qualifier != "tag" {
            return Err(SelectorError::UnknownQualifier {
                qualifier: qualifier.to_string(),
                clause: clause.to_string(),
            });
        }
        if value.is_empty() {
            return Err(SelectorError::InvalidClause {
                clause: clause.to_string(),
                reason: "empty tag value".to_string(),
            });
        }
        return Ok(Criterion::Tag(value.to_string()));
    }

    Ok(Criterion::Name(token.to_string()))
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Name(name) => f.write_str(name),
            Criterion::Tag(tag) => write!(f, "tag:{tag}"),
            Criterion::Wildcard => f.write_str("*"),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upstream {
            Some(Depth::Unbounded) => f.write_str("+")?,
            Some(Depth::Limit(n)) => write!(f, "{n}+")?,
            None => {}
        }

        write!(f, "{}", self.criterion)?;

        match self.downstream {
            Some(Depth::Unbounded) => f.write_str("+")?,
            Some(Depth::Limit(n)) => write!(f, "+{n}")?,
            None => {}
        }

        Ok(())
    }
}

impl fmt::Display for SelectionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn clause(expr: &str) -> Clause {
        let parsed = SelectionExpr::parse(expr).unwrap();
        assert_eq!(parsed.clauses.len(), 1, "expected one clause in {expr:?}");
        parsed.clauses.into_iter().next().unwrap()
    }

    #[test]
    fn parses_bare_name() {
        assert_eq!(
            clause("my_model"),
            Clause {
                upstream: None,
                criterion: Criterion::Name("my_model".to_string()),
                downstream: None,
            }
        );
    }

    #[test]
    fn parses_tag_criterion() {
        assert_eq!(
            clause("tag:finance").criterion,
            Criterion::Tag("finance".to_string())
        );
    }

    #[test]
    fn parses_wildcard() {
        assert_eq!(clause("*").criterion, Criterion::Wildcard);
    }

    #[test]
    fn parses_upstream_modifier() {
        let c = clause("+my_model");
        assert_eq!(c.upstream, Some(Depth::Unbounded));
        assert_eq!(c.downstream, None);
    }

    #[test]
    fn parses_bounded_modifiers_on_both_sides() {
        let c = clause("2+my_model+3");
        assert_eq!(c.upstream, Some(Depth::Limit(2)));
        assert_eq!(c.criterion, Criterion::Name("my_model".to_string()));
        assert_eq!(c.downstream, Some(Depth::Limit(3)));
    }

    #[test]
    fn digits_without_plus_belong_to_the_name() {
        let c = clause("stg_2024");
        assert_eq!(c.upstream, None);
        assert_eq!(c.criterion, Criterion::Name("stg_2024".to_string()));
        assert_eq!(c.downstream, None);
    }

    #[test]
    fn splits_union_on_commas_and_ignores_whitespace() {
        let parsed = SelectionExpr::parse(" tag:finance , +downstream_model ").unwrap();
        assert_eq!(parsed.clauses.len(), 2);
        assert_eq!(
            parsed.clauses[0].criterion,
            Criterion::Tag("finance".to_string())
        );
        assert_eq!(parsed.clauses[1].upstream, Some(Depth::Unbounded));
    }

    #[test]
    fn empty_expression_is_an_empty_union() {
        assert!(SelectionExpr::parse("").unwrap().is_empty());
        assert!(SelectionExpr::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn empty_segments_between_commas_are_skipped() {
        let parsed = SelectionExpr::parse("a,,b").unwrap();
        assert_eq!(parsed.clauses.len(), 2);
    }

    #[test]
    fn unknown_qualifier_fails_with_the_offending_token() {
        let err = SelectionExpr::parse("schema:raw").unwrap_err();
        assert!(
            matches!(&err, SelectorError::UnknownQualifier { qualifier, .. } if qualifier == "schema"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn double_colon_tag_fails_to_parse() {
        let err = SelectionExpr::parse("tag::bad").unwrap_err();
        assert!(
            matches!(&err, SelectorError::UnknownQualifier { qualifier, .. } if qualifier == "tag:"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn empty_tag_value_fails_to_parse() {
        let err = SelectionExpr::parse("tag:").unwrap_err();
        assert!(matches!(err, SelectorError::InvalidClause { .. }));
    }

    #[test]
    fn modifier_without_criterion_fails_to_parse() {
        for expr in ["+", "3+", "+2", "+ +"] {
            assert!(
                SelectionExpr::parse(expr).is_err(),
                "{expr:?} should not parse"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for expr in [
            "my_model",
            "tag:finance",
            "*",
            "+my_model",
            "my_model+",
            "2+my_model+3",
            "tag:finance,+downstream_model",
            "+*+",
            "0+a+0",
        ] {
            let parsed = SelectionExpr::parse(expr).unwrap();
            let reparsed = SelectionExpr::parse(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "round trip failed for {expr:?}");
        }
    }

    #[test]
    fn whitespace_inside_a_clause_round_trips_to_canonical_form() {
        let parsed = SelectionExpr::parse(" + my_model + 2 ").unwrap();
        assert_eq!(parsed.to_string(), "+my_model+2");
    }
}
