//! An inclusive `[hi:lo]` bit range on a declaration.

use nom::{
    IResult,
    combinator::{ map, map_res, opt, recognize },
    sequence::{ delimited, preceded, separated_pair },
    character::complete::{ char, digit1, multispace0 },
};

/// An inclusive bit range in verilog, e.g. `[7:0]`.
///
/// The direction is inferred from the relation between two ends,
/// so `[0:7]` and `[7:0]` describe the same width.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BitRange(pub isize, pub isize);

impl BitRange {
    /// Number of bits covered by the range. Always positive.
    #[inline]
    pub fn width(&self) -> usize {
        self.0.abs_diff(self.1) + 1
    }
}

fn int(i: &str) -> IResult<&str, isize> {
    map_res(
        recognize(preceded(opt(char('-')), digit1)),
        |s: &str| s.parse::<isize>()
    )(i)
}

/// Parses a bracketed range like `[ 7 : 0 ]`, surrounding blanks allowed.
pub(crate) fn bit_range(i: &str) -> IResult<&str, BitRange> {
    map(delimited(
        preceded(multispace0, char('[')),
        separated_pair(
            delimited(multispace0, int, multispace0),
            char(':'),
            delimited(multispace0, int, multispace0)),
        char(']')
    ), |(hi, lo)| BitRange(hi, lo))(i)
}

#[test]
fn test_range() {
    assert_eq!(BitRange(7, 0).width(), 8);
    assert_eq!(BitRange(0, 7).width(), 8);
    assert_eq!(BitRange(-2, 99).width(), 102);
    assert_eq!(BitRange(3, 3).width(), 1);
    assert_eq!(bit_range(" [15:8] a"), Ok((" a", BitRange(15, 8))));
    assert_eq!(bit_range("[ 3 : 0 ]"), Ok(("", BitRange(3, 0))));
    assert!(bit_range("[7:0 a").is_err());
    assert!(bit_range("[x:0]").is_err());
}
