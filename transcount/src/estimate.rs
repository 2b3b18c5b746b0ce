//! Cost of conditional (multiplexing) assigns.

use super::*;
use svmodparse::{ AssignRhs, MuxAlternative };

/// Gate costs used to price a `(s == L) ? R : ...` chain.
///
/// Each guard is an AND-reduction over the bits of the compared
/// literal, priced with the input-dependent `and` entry. Each result
/// bit is driven through one `bufif1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxCostModel {
    pub and_base: u64,
    pub and_per_input: u64,
    pub buffer: u64,
}

impl MuxCostModel {
    /// Reads the `and` and `bufif1` costs from a registry.
    pub fn from_registry(reg: &CostRegistry) -> Result<MuxCostModel, TransCountError> {
        let (and_base, and_per_input) = match reg.primitive("and") {
            Some(PrimitiveCost::PerInput { base, per_input }) => (base, per_input),
            _ => return Err(TransCountError::MissingPrimitive {
                name: "and", kind: "input-dependent"
            })
        };
        let buffer = match reg.primitive("bufif1") {
            Some(PrimitiveCost::Fixed(c)) => c,
            _ => return Err(TransCountError::MissingPrimitive {
                name: "bufif1", kind: "input-independent"
            })
        };
        Ok(MuxCostModel { and_base, and_per_input, buffer })
    }

    /// Guard cost plus result cost of one alternative, `None` on
    /// overflow.
    #[inline]
    pub fn alternative_cost(&self, alt: &MuxAlternative) -> Option<u64> {
        let condition = self.and_per_input
            .checked_mul(alt.condition_bits.len() as u64)?
            .checked_add(self.and_base)?;
        let result = self.buffer.checked_mul(alt.result_bits.len() as u64)?;
        condition.checked_add(result)
    }

    /// Cost of an assign's right-hand side. Plain assigns are wires
    /// and cost nothing; the default branch of a chain adds nothing
    /// on its own.
    pub fn assign_cost(&self, rhs: &AssignRhs) -> Option<u64> {
        match rhs {
            AssignRhs::Plain(_) => Some(0),
            AssignRhs::Conditional { alternatives, .. } =>
                alternatives.iter().try_fold(0u64, |acc, a| {
                    acc.checked_add(self.alternative_cost(a)?)
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svmodparse::parse_assign;

    fn model() -> MuxCostModel {
        MuxCostModel::from_registry(&CostRegistry::new()).unwrap()
    }

    #[test]
    fn builtin_model() {
        assert_eq!(model(), MuxCostModel { and_base: 1, and_per_input: 1, buffer: 6 });
    }

    #[test]
    fn one_alternative() {
        let alt = MuxAlternative {
            condition_bits: "01".into(),
            result_bits: "1010".into(),
        };
        // (1*2 + 1) + 6*4
        assert_eq!(model().alternative_cost(&alt), Some(27));
    }

    #[test]
    fn chains_sum_alternatives() {
        let m = model();
        let a = parse_assign(
            "assign y = (op == 2'b00) ? 4'h1 : (op == 2'b01) ? 8'hFF : 4'b0000"
        ).unwrap();
        assert_eq!(m.assign_cost(&a.rhs), Some(27 + (3 + 6 * 8)));
        let plain = parse_assign("assign y = a").unwrap();
        assert_eq!(m.assign_cost(&plain.rhs), Some(0));
    }

    #[test]
    fn overflowing_alternatives() {
        let m = MuxCostModel { and_base: u64::MAX, and_per_input: 1, buffer: 6 };
        let alt = MuxAlternative {
            condition_bits: "1".into(),
            result_bits: "1".into(),
        };
        assert_eq!(m.alternative_cost(&alt), None);
        let m = MuxCostModel { and_base: 0, and_per_input: 0, buffer: u64::MAX / 2 + 1 };
        let a = parse_assign("assign y = (s == 1'b1) ? 2'b11 : 2'b00").unwrap();
        assert_eq!(m.assign_cost(&a.rhs), None);
    }

    #[test]
    fn missing_primitives() {
        let mut reg = CostRegistry::new();
        reg.insert_primitive("bufif1", PrimitiveCost::PerInput { base: 6, per_input: 0 });
        assert!(matches!(MuxCostModel::from_registry(&reg),
                         Err(TransCountError::MissingPrimitive { name: "bufif1", .. })));
        assert!(matches!(MuxCostModel::from_registry(&CostRegistry::empty()),
                         Err(TransCountError::MissingPrimitive { name: "and", .. })));
    }
}
