//! A statement-level structural verilog module parser, written for
//! quick area estimation rather than full elaboration.
//!
//! The parser understands the small subset a gate-level netlist
//! needs: `input`/`output`/`inout`/`wire` declarations with optional
//! `[hi:lo]` ranges, primitive and sub-module instances, and
//! `assign` statements, including `(x == L) ? R : ...` chains whose
//! literals are expanded to bit strings.
//!
//! # Usage
//!
//! Just pass a `&str` to [SVDesign::parse_str]. Example:
//! ```
//! use svmodparse::SVDesign;
//!
//! let parsed = SVDesign::parse_str(r#"
//! module simple (a, b);
//! input a;
//! output b;
//! not n1 (b, a);
//! endmodule
//! "#).expect("parse error");
//! assert_eq!(parsed.modules[0].name, "simple");
//! assert_eq!(parsed.modules[0].instances[0].component, "not");
//! ```

use compact_str::CompactString;

mod error;
pub use error::ParseError;

mod range;
pub use range::BitRange;

mod literal;
pub use literal::{ BitLiteral, Radix, convert_literal, MAX_LITERAL_WIDTH };

mod segment;
pub use segment::segment_statements;

mod extract;
pub use extract::{ RawModule, extract_modules };

mod stmtnom;
pub use stmtnom::{
    StatementKind, classify,
    parse_module_name, parse_field_decl, parse_instance, parse_assign
};

/// Declaration kinds.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FieldKind {
    Input,
    Output,
    InOut,
    Wire
}

/// One declared signal with its bit width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedField {
    /// Signal name. E.g. `data`
    pub name: CompactString,
    /// Width in bits. 1 if declared without a range.
    pub width: usize,
}

/// A primitive gate or sub-module instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    /// The instantiated component. E.g. `nand`, `full_adder`.
    pub component: CompactString,
    /// Instance label, if any. E.g. `g1`.
    pub label: Option<CompactString>,
    /// Number of `,` in the connection list, i.e. the number of
    /// connections minus one. For a gate like `and g(y, a, b)`
    /// this is its input count.
    pub input_count: usize,
}

/// One guarded alternative of a conditional assign, with both
/// literals expanded to bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxAlternative {
    /// Bits of the literal the selector is compared against.
    pub condition_bits: String,
    /// Bits of the value selected when the guard holds.
    pub result_bits: String,
}

/// Right-hand side of an assign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignRhs {
    /// Any assign without a `: ` alternative chain.
    Plain(String),
    /// `(s == L1) ? R1 : (s == L2) ? R2 : D`.
    Conditional {
        alternatives: Vec<MuxAlternative>,
        /// The trailing unguarded expression, kept verbatim.
        default: String,
    },
}

/// A parsed `assign` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignStmt {
    /// Assigned signal, verbatim. E.g. `out` or `y[3:0]`.
    pub target: CompactString,
    pub rhs: AssignRhs,
}

/// A module, parsed statement by statement.
#[derive(Debug, Clone)]
pub struct SVModule {
    pub name: CompactString,
    pub inputs: Vec<NamedField>,
    pub outputs: Vec<NamedField>,
    pub inouts: Vec<NamedField>,
    pub wires: Vec<NamedField>,
    pub instances: Vec<InstanceRef>,
    pub assigns: Vec<AssignStmt>,
}

impl SVModule {
    /// Parses the text of one module, from `module` to `endmodule`.
    ///
    /// Errors are tagged with the module name when it is known.
    pub fn parse_text(text: &str) -> Result<SVModule, ParseError> {
        let statements = segment_statements(text);
        let (header, body) = match statements.split_first() {
            Some(s) => s,
            None => return Err(ParseError::MalformedDeclaration {
                module: CompactString::default(),
                statement: text.lines().next().unwrap_or_default().to_string(),
                reason: "module header is not terminated by `;`"
            })
        };
        let name = parse_module_name(header)?;
        let mut m = SVModule {
            name,
            inputs: Vec::new(),
            outputs: Vec::new(),
            inouts: Vec::new(),
            wires: Vec::new(),
            instances: Vec::new(),
            assigns: Vec::new(),
        };
        for stmt in body {
            m.push_statement(stmt).map_err(|e| e.in_module(&m.name))?;
        }
        Ok(m)
    }

    fn push_statement(&mut self, stmt: &str) -> Result<(), ParseError> {
        match classify(stmt) {
            StatementKind::Decl(_) => {
                let (kind, fields) = parse_field_decl(stmt)?;
                use FieldKind::*;
                match kind {
                    Input => self.inputs.extend(fields),
                    Output => self.outputs.extend(fields),
                    InOut => self.inouts.extend(fields),
                    Wire => self.wires.extend(fields),
                }
            },
            StatementKind::Assign => self.assigns.push(parse_assign(stmt)?),
            StatementKind::Instance => self.instances.push(parse_instance(stmt)?),
        }
        Ok(())
    }
}

/// All modules of one source file, in source order.
#[derive(Debug, Clone)]
pub struct SVDesign {
    pub modules: Vec<SVModule>,
}

impl SVDesign {
    /// Extracts and parses every module in a string of verilog code.
    pub fn parse_str(s: &str) -> Result<SVDesign, ParseError> {
        let modules = extract_modules(s)?
            .into_iter()
            .map(|raw| SVModule::parse_text(&raw.text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SVDesign { modules })
    }

    /// Reads and parses the verilog file at the specific path.
    pub fn parse_file(path: impl AsRef<std::path::Path>) -> Result<SVDesign, ParseError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source
        })?;
        SVDesign::parse_str(&s)
    }
}
