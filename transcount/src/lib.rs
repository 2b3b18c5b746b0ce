//! Transistor-count estimation for structural verilog.
//!
//! Each module's count is the sum of the costs of its primitive gate
//! and sub-module instances, plus an estimate for its multiplexing
//! `assign` chains. Modules are costed bottom-up along the
//! instantiation graph, and every resolved module becomes a known
//! component for the modules instantiating it.
//!
//! # Usage
//! ```
//! use transcount::{ CostRegistry, TransCount };
//!
//! let tc = TransCount::from_verilog_source(
//!     "module BUF(a,b); input a; output b; not g1(b,a); endmodule",
//!     CostRegistry::new()
//! ).expect("costing error");
//! assert_eq!(tc.modules[0].transistor_count, Some(1));
//! ```

use compact_str::CompactString;
use itertools::Itertools;
use std::collections::HashSet;
use svmodparse::SVDesign;

mod error;
pub use error::TransCountError;

mod registry;
pub use registry::{
    CostRegistry, ComponentCost, PrimitiveCost,
    BUILTIN_INPUT_DEPENDENT, BUILTIN_INPUT_INDEPENDENT
};

mod estimate;
pub use estimate::MuxCostModel;

mod module;
pub use module::{ AssignRecord, Module };

mod resolve;
pub use resolve::Resolver;

mod fmt;
pub use fmt::TopLineFmt;

/// A fully costed design.
#[derive(Debug, Clone)]
pub struct TransCount {
    /// Resolved modules, each after the modules it instantiates.
    pub modules: Vec<Module>,
    /// The registry after resolution, holding every module's count.
    pub registry: CostRegistry,
}

impl TransCount {
    /// Costs every module of a parsed design.
    pub fn from_design(
        design: SVDesign, registry: CostRegistry
    ) -> Result<TransCount, TransCountError> {
        let mux = MuxCostModel::from_registry(&registry)?;
        let modules = design.modules.into_iter()
            .map(|m| Module::from_parsed(m, &mux))
            .collect::<Result<Vec<_>, _>>()?;
        let mut resolver = Resolver::new(registry);
        let modules = resolver.resolve(modules)?;
        clilog::info!(TC_RESOLVED, "resolved {} modules", modules.len());
        Ok(TransCount { modules, registry: resolver.into_registry() })
    }

    /// Parses and costs a string of verilog code.
    pub fn from_verilog_source(
        source: &str, registry: CostRegistry
    ) -> Result<TransCount, TransCountError> {
        let timer = clilog::stimer!("parse");
        let design = SVDesign::parse_str(source)?;
        clilog::finish!(timer);
        TransCount::from_design(design, registry)
    }

    /// Reads, parses and costs the verilog file at `path`.
    pub fn from_verilog_file(
        path: impl AsRef<std::path::Path>, registry: CostRegistry
    ) -> Result<TransCount, TransCountError> {
        let timer = clilog::stimer!("parse");
        let design = SVDesign::parse_file(path)?;
        clilog::finish!(timer);
        TransCount::from_design(design, registry)
    }

    /// Modules no other module of the design instantiates.
    pub fn unreferenced(&self) -> Vec<&Module> {
        let referenced: HashSet<&str> = self.modules.iter()
            .flat_map(|m| m.instances.iter().map(|i| i.component.as_str()))
            .collect();
        self.modules.iter()
            .filter(|m| !referenced.contains(m.name.as_str()))
            .collect()
    }

    /// The module reported as top level: `name` if given, otherwise
    /// the last one resolved.
    pub fn top(&self, name: Option<&str>) -> Result<&Module, TransCountError> {
        if let Some(name) = name {
            return self.modules.iter().find(|m| m.name == name)
                .ok_or_else(|| TransCountError::TopModuleNotFound { name: name.into() })
        }
        let last = self.modules.last().ok_or(TransCountError::EmptyDesign)?;
        let unrefs = self.unreferenced();
        if unrefs.len() > 1 {
            clilog::info!(TC_MULTITOP,
                          "{} modules are never instantiated: {}. reporting {}",
                          unrefs.len(),
                          unrefs.iter().map(|m| &m.name).format(", "),
                          last.name);
        }
        Ok(last)
    }

    /// Looks up a resolved module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }
}
