//! The cost knowledge base: primitive gate tables plus the costs of
//! modules resolved so far.

use super::*;
use nom::{
    IResult,
    combinator::{ all_consuming, map_res, opt },
    sequence::{ delimited, pair, terminated, tuple },
    character::complete::{ char, digit1, one_of },
    bytes::complete::take_while1,
};
use std::collections::HashMap;

/// Built-in primitives whose cost grows with the input count,
/// as `(name, base, per_input)`.
pub const BUILTIN_INPUT_DEPENDENT: &[(&str, u64, u64)] = &[
    ("and", 1, 1),
    ("or", 1, 1),
    ("nand", 0, 1),
    ("nor", 0, 1),
    ("xor", 0, 4),
];

/// Built-in primitives with a fixed cost, as `(name, cost)`.
pub const BUILTIN_INPUT_INDEPENDENT: &[(&str, u64)] = &[
    ("not", 1),
    ("bufif1", 6),
];

/// Transistor cost of a primitive gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveCost {
    /// Same cost for any number of inputs.
    Fixed(u64),
    /// `base + per_input * input_count`.
    PerInput { base: u64, per_input: u64 },
}

impl PrimitiveCost {
    /// Cost of one instance, `None` if it does not fit in a `u64`.
    #[inline]
    pub fn cost(&self, input_count: usize) -> Option<u64> {
        match *self {
            PrimitiveCost::Fixed(c) => Some(c),
            PrimitiveCost::PerInput { base, per_input } =>
                per_input.checked_mul(input_count as u64)?.checked_add(base),
        }
    }

    /// Parses a command-line primitive definition: `NAME=COST` for a
    /// fixed cost, or `NAME=BASE+PERxN` for an input-dependent one.
    pub fn parse_spec(spec: &str) -> Result<(CompactString, PrimitiveCost), TransCountError> {
        fn num(i: &str) -> IResult<&str, u64> {
            map_res(digit1, |s: &str| s.parse::<u64>())(i)
        }
        let r: IResult<&str, (&str, u64, Option<u64>)> = all_consuming(tuple((
            terminated(
                take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
                char('=')),
            num,
            opt(delimited(char('+'), num, pair(one_of("xX*"), one_of("nN")))),
        )))(spec);
        match r {
            Ok((_, (name, c, None))) =>
                Ok((name.into(), PrimitiveCost::Fixed(c))),
            Ok((_, (name, base, Some(per_input)))) =>
                Ok((name.into(), PrimitiveCost::PerInput { base, per_input })),
            Err(_) => Err(TransCountError::InvalidPrimitiveSpec {
                spec: spec.into(),
                reason: "expected NAME=COST or NAME=BASE+PERxN"
            })
        }
    }
}

/// Where a component's cost comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentCost {
    Primitive(PrimitiveCost),
    /// A module resolved earlier, with its total count.
    Module(u64),
}

impl ComponentCost {
    /// Cost of one instance. Module costs ignore the input count.
    #[inline]
    pub fn cost(&self, input_count: usize) -> Option<u64> {
        match self {
            ComponentCost::Primitive(p) => p.cost(input_count),
            ComponentCost::Module(c) => Some(*c),
        }
    }
}

/// Mapping from component name to transistor cost.
///
/// Lookups consult three tiers in order: input-independent
/// primitives, input-dependent primitives, then resolved modules.
/// The module tier only grows; recording a name twice keeps the
/// later cost.
#[derive(Debug, Clone)]
pub struct CostRegistry {
    input_independent: HashMap<CompactString, u64>,
    input_dependent: HashMap<CompactString, (u64, u64)>,
    modules: HashMap<CompactString, u64>,
}

impl Default for CostRegistry {
    fn default() -> Self {
        CostRegistry::new()
    }
}

impl CostRegistry {
    /// A registry seeded with the built-in gate tables.
    pub fn new() -> CostRegistry {
        let mut reg = CostRegistry::empty();
        for &(name, c) in BUILTIN_INPUT_INDEPENDENT {
            reg.insert_primitive(name, PrimitiveCost::Fixed(c));
        }
        for &(name, base, per_input) in BUILTIN_INPUT_DEPENDENT {
            reg.insert_primitive(name, PrimitiveCost::PerInput { base, per_input });
        }
        reg
    }

    /// A registry without any primitive.
    pub fn empty() -> CostRegistry {
        CostRegistry {
            input_independent: HashMap::new(),
            input_dependent: HashMap::new(),
            modules: HashMap::new(),
        }
    }

    /// Registers or replaces a primitive. A primitive of the same
    /// name in the other tier is dropped.
    pub fn insert_primitive(&mut self, name: impl Into<CompactString>, cost: PrimitiveCost) {
        let name = name.into();
        match cost {
            PrimitiveCost::Fixed(c) => {
                self.input_dependent.remove(&name);
                self.input_independent.insert(name, c);
            },
            PrimitiveCost::PerInput { base, per_input } => {
                self.input_independent.remove(&name);
                self.input_dependent.insert(name, (base, per_input));
            }
        }
    }

    /// Looks a primitive up, without considering modules.
    pub fn primitive(&self, name: &str) -> Option<PrimitiveCost> {
        if let Some(&c) = self.input_independent.get(name) {
            return Some(PrimitiveCost::Fixed(c))
        }
        self.input_dependent.get(name)
            .map(|&(base, per_input)| PrimitiveCost::PerInput { base, per_input })
    }

    /// Cost of a resolved module.
    #[inline]
    pub fn module_cost(&self, name: &str) -> Option<u64> {
        self.modules.get(name).copied()
    }

    /// Looks a component up in all three tiers.
    pub fn lookup(&self, name: &str) -> Option<ComponentCost> {
        self.primitive(name).map(ComponentCost::Primitive)
            .or_else(|| self.module_cost(name).map(ComponentCost::Module))
    }

    #[inline]
    pub fn is_known(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Cost of one instance of `name` with `input_count` inputs.
    /// `None` for an unknown name or a cost overflowing `u64`.
    #[inline]
    pub fn cost_of(&self, name: &str, input_count: usize) -> Option<u64> {
        self.lookup(name).and_then(|c| c.cost(input_count))
    }

    /// Records the count of a resolved module and returns the cost it
    /// replaced, if any.
    pub fn record_module(&mut self, name: &CompactString, cost: u64) -> Option<u64> {
        if self.primitive(name).is_some() {
            clilog::warn!(TC_SHADOW,
                          "module {} has the name of a primitive, \
                           instances of {} keep the primitive cost", name, name);
        }
        let prev = self.modules.insert(name.clone(), cost);
        if let Some(prev) = prev {
            clilog::warn!(TC_OVERWRITE,
                          "cost of module {} overwritten: {} -> {}", name, prev, cost);
        }
        prev
    }

    /// Number of resolved modules recorded.
    #[inline]
    pub fn num_modules(&self) -> usize {
        self.modules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table() {
        let reg = CostRegistry::new();
        assert_eq!(reg.cost_of("and", 3), Some(4));
        assert_eq!(reg.cost_of("or", 2), Some(3));
        assert_eq!(reg.cost_of("nand", 2), Some(2));
        assert_eq!(reg.cost_of("nor", 5), Some(5));
        assert_eq!(reg.cost_of("xor", 2), Some(8));
        assert_eq!(reg.cost_of("not", 1), Some(1));
        assert_eq!(reg.cost_of("bufif1", 2), Some(6));
        assert_eq!(reg.cost_of("mux2", 2), None);
    }

    #[test]
    fn modules_ignore_input_count() {
        let mut reg = CostRegistry::new();
        assert!(!reg.is_known("half_adder"));
        assert_eq!(reg.record_module(&"half_adder".into(), 14), None);
        assert_eq!(reg.cost_of("half_adder", 1), Some(14));
        assert_eq!(reg.cost_of("half_adder", 9), Some(14));
        assert_eq!(reg.record_module(&"half_adder".into(), 20), Some(14));
        assert_eq!(reg.module_cost("half_adder"), Some(20));
        assert_eq!(reg.num_modules(), 1);
    }

    #[test]
    fn primitives_take_precedence() {
        let mut reg = CostRegistry::new();
        reg.record_module(&"not".into(), 100);
        assert_eq!(reg.lookup("not"), Some(ComponentCost::Primitive(PrimitiveCost::Fixed(1))));
    }

    #[test]
    fn insert_primitive_moves_tier() {
        let mut reg = CostRegistry::new();
        reg.insert_primitive("and", PrimitiveCost::Fixed(3));
        assert_eq!(reg.cost_of("and", 7), Some(3));
        reg.insert_primitive("and", PrimitiveCost::PerInput { base: 2, per_input: 2 });
        assert_eq!(reg.cost_of("and", 2), Some(6));
        assert_eq!(CostRegistry::empty().cost_of("and", 2), None);
    }

    #[test]
    fn primitive_specs() {
        assert_eq!(PrimitiveCost::parse_spec("buf=2").unwrap(),
                   (CompactString::from("buf"), PrimitiveCost::Fixed(2)));
        assert_eq!(PrimitiveCost::parse_spec("xnor=2+4xN").unwrap(),
                   (CompactString::from("xnor"), PrimitiveCost::PerInput { base: 2, per_input: 4 }));
        for bad in ["buf", "=3", "buf=", "buf=2+", "buf=2+3", "buf=x"] {
            assert!(matches!(PrimitiveCost::parse_spec(bad),
                             Err(TransCountError::InvalidPrimitiveSpec { .. })),
                    "{bad} should be rejected");
        }
    }

    #[test]
    fn huge_primitive_costs() {
        let (name, cost) = PrimitiveCost::parse_spec("big=18446744073709551615+2xN").unwrap();
        assert_eq!(cost.cost(0), Some(u64::MAX));
        assert_eq!(cost.cost(1), None);
        let mut reg = CostRegistry::new();
        reg.insert_primitive(name, cost);
        assert_eq!(reg.cost_of("big", 3), None);
        assert!(reg.is_known("big"));
        let wide = PrimitiveCost::PerInput { base: 0, per_input: u64::MAX / 2 + 1 };
        assert_eq!(wide.cost(2), None);
        assert_eq!(wide.cost(1), Some(u64::MAX / 2 + 1));
    }
}
