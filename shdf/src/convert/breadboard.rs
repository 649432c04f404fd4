//! Breadboard position notation.
//!
//! Canonical endpoints use `breadboard.<column><row>` for holes
//! (`breadboard.10a`) and `breadboard.<column><rail>` for power rails
//! (`breadboard.1tn`). The native format writes holes as
//! `<column><side>.<row>` (`10t.a`) and rails as `<rail>.<column>`
//! (`tn.1`). Both the converter and the validator share this parser.

use std::fmt;

/// Highest hole/rail column on a full-size board.
pub const MAX_COLUMN: u32 = 60;

/// One of the four power rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rail {
    TopPositive,
    TopNegative,
    BottomPositive,
    BottomNegative,
}

impl Rail {
    pub fn parse(code: &str) -> Option<Rail> {
        match code {
            "tp" => Some(Rail::TopPositive),
            "tn" => Some(Rail::TopNegative),
            "bp" => Some(Rail::BottomPositive),
            "bn" => Some(Rail::BottomNegative),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Rail::TopPositive => "tp",
            Rail::TopNegative => "tn",
            Rail::BottomPositive => "bp",
            Rail::BottomNegative => "bn",
        }
    }
}

/// A parsed breadboard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPosition {
    /// A hole in the component area, rows `a`..=`j`.
    Hole { column: u32, row: char },
    /// A power-rail position.
    Rail { column: u32, rail: Rail },
}

impl BoardPosition {
    /// Parse the canonical form: `10a` or `1tn` (without the
    /// `breadboard.` prefix).
    pub fn parse_canonical(pos: &str) -> Option<BoardPosition> {
        let digits: String = pos.chars().take_while(|c| c.is_ascii_digit()).collect();
        let rest = &pos[digits.len()..];
        let column: u32 = digits.parse().ok()?;

        if rest.len() == 1 {
            let row = rest.chars().next()?;
            if row.is_ascii_lowercase() && ('a'..='j').contains(&row) {
                return Some(BoardPosition::Hole { column, row });
            }
            return None;
        }
        Rail::parse(rest).map(|rail| BoardPosition::Rail { column, rail })
    }

    /// Parse the native form: `10t.a` or `tn.1` (after the `:`).
    pub fn parse_native(pos: &str) -> Option<BoardPosition> {
        let (head, tail) = pos.split_once('.')?;

        if let Some(rail) = Rail::parse(head) {
            let column: u32 = tail.parse().ok()?;
            return Some(BoardPosition::Rail { column, rail });
        }

        // Hole: head is "<column><side>", tail is the row letter.
        let digits: String = head.chars().take_while(|c| c.is_ascii_digit()).collect();
        let side = &head[digits.len()..];
        if digits.is_empty() || (side != "t" && side != "b") {
            return None;
        }
        let column: u32 = digits.parse().ok()?;
        if tail.len() != 1 {
            return None;
        }
        let row = tail.chars().next()?;
        if !('a'..='j').contains(&row) {
            return None;
        }
        Some(BoardPosition::Hole { column, row })
    }

    /// Render the canonical form (without the `breadboard.` prefix).
    pub fn to_canonical(&self) -> String {
        match self {
            BoardPosition::Hole { column, row } => format!("{column}{row}"),
            BoardPosition::Rail { column, rail } => format!("{column}{}", rail.code()),
        }
    }

    /// Render the native form (after the `:`). Rows `a`..=`e` sit on the
    /// top half of the board, `f`..=`j` on the bottom.
    pub fn to_native(&self) -> String {
        match self {
            BoardPosition::Hole { column, row } => {
                let side = if ('a'..='e').contains(row) { 't' } else { 'b' };
                format!("{column}{side}.{row}")
            }
            BoardPosition::Rail { column, rail } => format!("{}.{column}", rail.code()),
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            BoardPosition::Hole { column, .. } | BoardPosition::Rail { column, .. } => *column,
        }
    }

    pub fn column_in_range(&self) -> bool {
        (1..=MAX_COLUMN).contains(&self.column())
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_hole_parsing() {
        assert_eq!(
            BoardPosition::parse_canonical("10a"),
            Some(BoardPosition::Hole { column: 10, row: 'a' })
        );
        assert_eq!(
            BoardPosition::parse_canonical("3j"),
            Some(BoardPosition::Hole { column: 3, row: 'j' })
        );
        assert_eq!(BoardPosition::parse_canonical("10k"), None);
        assert_eq!(BoardPosition::parse_canonical("a10"), None);
    }

    #[test]
    fn test_canonical_rail_parsing() {
        assert_eq!(
            BoardPosition::parse_canonical("1tn"),
            Some(BoardPosition::Rail { column: 1, rail: Rail::TopNegative })
        );
        assert_eq!(
            BoardPosition::parse_canonical("50bp"),
            Some(BoardPosition::Rail { column: 50, rail: Rail::BottomPositive })
        );
        assert_eq!(BoardPosition::parse_canonical("1xx"), None);
        assert_eq!(BoardPosition::parse_canonical("tn"), None);
    }

    #[test]
    fn test_native_parsing() {
        assert_eq!(
            BoardPosition::parse_native("10t.a"),
            Some(BoardPosition::Hole { column: 10, row: 'a' })
        );
        assert_eq!(
            BoardPosition::parse_native("tn.1"),
            Some(BoardPosition::Rail { column: 1, rail: Rail::TopNegative })
        );
        assert_eq!(BoardPosition::parse_native("10x.a"), None);
        assert_eq!(BoardPosition::parse_native("10t"), None);
    }

    #[test]
    fn test_round_trips() {
        for canonical in ["10a", "1f", "60j", "1tn", "30bp"] {
            let pos = BoardPosition::parse_canonical(canonical).expect("Should parse");
            assert_eq!(pos.to_canonical(), canonical);
            let native = pos.to_native();
            assert_eq!(BoardPosition::parse_native(&native), Some(pos));
        }
    }

    #[test]
    fn test_hole_side_follows_row() {
        let top = BoardPosition::Hole { column: 10, row: 'c' };
        let bottom = BoardPosition::Hole { column: 10, row: 'g' };
        assert_eq!(top.to_native(), "10t.c");
        assert_eq!(bottom.to_native(), "10b.g");
    }

    #[test]
    fn test_column_range() {
        assert!(BoardPosition::parse_canonical("60a").expect("parses").column_in_range());
        assert!(!BoardPosition::parse_canonical("61a").expect("parses").column_in_range());
        assert!(!BoardPosition::parse_canonical("0tn").expect("parses").column_in_range());
    }
}
