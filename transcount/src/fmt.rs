use std::fmt;
use indexmap::IndexMap;
use itertools::Itertools;

use super::*;
use svmodparse::NamedField;

struct FieldsFmt<'i>(&'i [NamedField]);

impl fmt::Display for FieldsFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for field in self.0 {
            writeln!(f, "{} : width {}", field.name, field.width)?;
        }
        Ok(())
    }
}

impl fmt::Display for AssignRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} : {} transistors", self.target, self.transistors)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "//////////////////////")?;
        writeln!(f, "Module name: {}", self.name)?;
        match self.transistor_count {
            Some(c) => writeln!(f, "Transistor count: {}", c)?,
            None => writeln!(f, "Transistor count: unresolved")?,
        }
        writeln!(f, "\n-----------------\n")?;
        writeln!(f, "Inputs:\n{}", FieldsFmt(&self.inputs))?;
        writeln!(f, "Outputs:\n{}", FieldsFmt(&self.outputs))?;
        if !self.inouts.is_empty() {
            writeln!(f, "Inouts:\n{}", FieldsFmt(&self.inouts))?;
        }
        writeln!(f, "Wires:\n{}", FieldsFmt(&self.wires))?;
        writeln!(f, "Assigns:")?;
        for a in &self.assigns {
            writeln!(f, "{}", a)?;
        }
        writeln!(f, "\nModules:")?;
        // identical (component, inputs) pairs are grouped in order
        // of first appearance.
        let mut groups = IndexMap::<(&str, usize), usize>::new();
        for inst in &self.instances {
            *groups.entry((inst.component.as_str(), inst.input_count)).or_default() += 1;
        }
        write!(f, "{}", groups.iter().format_with("", |((comp, inputs), n), g| {
            g(&format_args!("{}x {} - {} input\n", n, comp, inputs))
        }))
    }
}

impl fmt::Display for TransCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for m in &self.modules {
            writeln!(f, "{}", m)?;
        }
        Ok(())
    }
}

/// The closing `Top level module: ...` line of a report.
pub struct TopLineFmt<'i>(pub &'i Module);

impl fmt::Display for TopLineFmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Top level module: {} with {} transistors.",
               self.0.name, self.0.transistor_count.unwrap_or_default())
    }
}
