use super::*;
use svmodparse::{ InstanceRef, NamedField, SVModule };

/// An `assign` statement with its estimated cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRecord {
    /// Assigned signal.
    pub target: CompactString,
    /// 0 for a plain assign.
    pub transistors: u64,
}

/// A module ready for costing.
///
/// The public members are all READ-ONLY outside. The transistor
/// count is filled in exactly once, by [Resolver::resolve].
#[readonly::make]
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Module {
    /// Declared module name, also its key in the [CostRegistry].
    pub name: CompactString,
    pub inputs: Vec<NamedField>,
    pub outputs: Vec<NamedField>,
    pub inouts: Vec<NamedField>,
    pub wires: Vec<NamedField>,
    /// Primitive and sub-module instances, in source order.
    pub instances: Vec<InstanceRef>,
    pub assigns: Vec<AssignRecord>,
    /// `None` until resolved.
    pub transistor_count: Option<u64>,
}

impl Module {
    /// Builds an unresolved module, pricing its assigns with `mux`.
    pub fn from_parsed(m: SVModule, mux: &MuxCostModel) -> Result<Module, TransCountError> {
        let overflow = || TransCountError::CountOverflow { module: m.name.clone() };
        let mut total = 0u64;
        let mut assigns = Vec::with_capacity(m.assigns.len());
        for a in &m.assigns {
            let transistors = mux.assign_cost(&a.rhs).ok_or_else(overflow)?;
            total = total.checked_add(transistors).ok_or_else(overflow)?;
            assigns.push(AssignRecord { target: a.target.clone(), transistors });
        }
        Ok(Module {
            name: m.name,
            inputs: m.inputs,
            outputs: m.outputs,
            inouts: m.inouts,
            wires: m.wires,
            instances: m.instances,
            assigns,
            transistor_count: None,
        })
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.transistor_count.is_some()
    }

    /// Total cost of all assigns. Checked against overflow in
    /// [Module::from_parsed].
    #[inline]
    pub fn assign_transistors(&self) -> u64 {
        self.assigns.iter().map(|a| a.transistors).sum()
    }

    /// Sets the count of a module that has not been resolved yet.
    pub(crate) fn set_transistor_count(&mut self, count: u64) {
        debug_assert!(self.transistor_count.is_none(),
                      "module {} resolved twice", self.name);
        self.transistor_count = Some(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svmodparse::SVDesign;

    fn parsed(src: &str) -> SVModule {
        SVDesign::parse_str(src).unwrap().modules.remove(0)
    }

    #[test]
    fn starts_unresolved() {
        let mux = MuxCostModel::from_registry(&CostRegistry::new()).unwrap();
        let mut m = Module::from_parsed(parsed("\
module m(s, y);
  input s;
  output [1:0] y;
  assign y = (s == 1'b1) ? 2'b11 : 2'b00;
endmodule
"), &mux).unwrap();
        assert!(!m.is_resolved());
        // (1*1 + 1) + 6*2
        assert_eq!(m.assign_transistors(), 14);
        m.set_transistor_count(14);
        assert!(m.is_resolved());
    }

    #[test]
    fn overflowing_assigns() {
        let mux = MuxCostModel { and_base: u64::MAX, and_per_input: 1, buffer: 0 };
        let err = Module::from_parsed(parsed(
            "module m(s, y); assign y = (s == 1'b1) ? 1'b1 : 1'b0; endmodule"), &mux).unwrap_err();
        assert!(matches!(err, TransCountError::CountOverflow { module } if module == "m"));
        // each alternative fits on its own, their sum does not.
        let mux = MuxCostModel { and_base: u64::MAX / 2, and_per_input: 0, buffer: 0 };
        let err = Module::from_parsed(parsed("\
module m(s, y);
  assign y = (s == 1'b1) ? 1'b1 : 1'b0;
  assign y = (s == 1'b0) ? 1'b0 : 1'b1;
  assign y = (s == 1'b1) ? 1'b1 : 1'b0;
endmodule
"), &mux).unwrap_err();
        assert!(matches!(err, TransCountError::CountOverflow { .. }));
    }
}
