//! Sized bit literals such as `8'hFF`, `3'o7` and `4'b1010`.

use super::*;
use nom::{
    IResult,
    combinator::{ all_consuming, map_res, rest },
    sequence::tuple,
    character::complete::{ anychar, char, digit1, multispace0 },
};

/// Widest literal accepted, the minimum every verilog tool must
/// support.
pub const MAX_LITERAL_WIDTH: usize = 1 << 16;

/// Radix of a sized literal.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Radix {
    Binary,
    Octal,
    Hex,
}

impl Radix {
    fn from_char(c: char) -> Option<Radix> {
        use Radix::*;
        match c {
            'b' | 'B' => Some(Binary),
            'o' | 'O' => Some(Octal),
            'h' | 'H' => Some(Hex),
            _ => None
        }
    }

    /// Bits carried by one digit.
    #[inline]
    fn digit_bits(self) -> u32 {
        match self {
            Radix::Binary => 1,
            Radix::Octal => 3,
            Radix::Hex => 4,
        }
    }
}

/// A decoded `<width>'<radix><digits>` literal.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BitLiteral {
    /// Declared width.
    pub width: usize,
    pub radix: Radix,
    /// Digits with `_` separators removed.
    pub digits: CompactString,
}

fn malformed(literal: &str, reason: &'static str) -> ParseError {
    ParseError::MalformedLiteral {
        module: CompactString::default(),
        literal: literal.into(),
        reason
    }
}

fn sized_literal(i: &str) -> IResult<&str, (usize, char, &str)> {
    let (i, (_, width, _, radix, digits)) = tuple((
        multispace0,
        map_res(digit1, |s: &str| s.parse::<usize>()),
        char('\''),
        anychar,
        rest
    ))(i)?;
    Ok((i, (width, radix, digits.trim_end())))
}

impl BitLiteral {
    /// Parses a literal, checking the radix marker and the digits.
    pub fn parse(s: &str) -> Result<BitLiteral, ParseError> {
        let (_, (width, radix_char, digits)) = all_consuming(sized_literal)(s)
            .map_err(|_: nom::Err<nom::error::Error<&str>>| {
                malformed(s, "expected <width>'<radix><digits>")
            })?;
        if width == 0 {
            return Err(malformed(s, "zero width"))
        }
        if width > MAX_LITERAL_WIDTH {
            return Err(malformed(s, "width too large"))
        }
        let radix = Radix::from_char(radix_char)
            .ok_or_else(|| malformed(s, "unknown radix, expected h, o or b"))?;
        let digits: CompactString = digits.chars().filter(|&c| c != '_').collect();
        if digits.is_empty() {
            return Err(malformed(s, "no digits"))
        }
        let valid = match radix {
            Radix::Binary => digits.chars().all(|c| matches!(c, '0' | '1' | 'x' | 'X' | 'z' | 'Z')),
            _ => digits.chars().all(|c| c.to_digit(1 << radix.digit_bits()).is_some()),
        };
        if !valid {
            return Err(malformed(s, "invalid digit for radix"))
        }
        Ok(BitLiteral { width, radix, digits })
    }

    /// Expands the literal to its binary digit string.
    ///
    /// Hex and octal values are expanded digit by digit, stripped of
    /// leading zeros and left-padded with `0` to the declared width.
    /// A value wider than declared keeps all of its bits. Binary
    /// digits are returned unchanged.
    pub fn to_bits(&self) -> String {
        if self.radix == Radix::Binary {
            return self.digits.to_string()
        }
        let n = self.radix.digit_bits() as usize;
        let mut bits = String::with_capacity(self.digits.len() * n);
        for c in self.digits.chars() {
            // validated in parse.
            let d = c.to_digit(1 << n).unwrap_or(0);
            for k in (0..n).rev() {
                bits.push(if d >> k & 1 == 1 { '1' } else { '0' });
            }
        }
        let significant = bits.trim_start_matches('0');
        format!("{:0>width$}", significant, width = self.width)
    }
}

/// Converts a literal straight to its bit string.
pub fn convert_literal(s: &str) -> Result<String, ParseError> {
    Ok(BitLiteral::parse(s)?.to_bits())
}
