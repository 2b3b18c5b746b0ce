//! end-to-end tests for transcount

use transcount::*;

const VERILOG_FUNCTION_UNIT: &str = include_str!("function_unit.v");
const VERILOG_ALU_SLICE: &str = include_str!("alu_slice.v");

fn counts(tc: &TransCount) -> Vec<(String, u64)> {
  tc.modules.iter()
    .map(|m| (m.name.to_string(), m.transistor_count.unwrap()))
    .collect()
}

#[test]
fn test_single_buffer() {
  clilog::init_stdout_simple_trace();
  let tc = TransCount::from_verilog_source(
    "module BUF(a,b); input a; output b; not g1(b,a); endmodule",
    CostRegistry::new()
  ).expect("costing error");
  assert_eq!(counts(&tc), vec![("BUF".to_string(), 1)]);
  assert_eq!(tc.top(None).unwrap().name, "BUF");
}

#[test]
fn test_function_unit() {
  clilog::init_stdout_simple_trace();
  let tc = TransCount::from_verilog_source(VERILOG_FUNCTION_UNIT, CostRegistry::new())
    .expect("costing error");
  // half_adder: xor(2 inputs) = 8, and(2 inputs) = 3.
  // function_unit: half_adder 11 + not 1 + two 2-bit/4-bit mux alternatives 2 * 27.
  assert_eq!(counts(&tc), vec![
    ("half_adder".to_string(), 11),
    ("function_unit".to_string(), 11 + 1 + 54),
  ]);
  let fu = tc.module("function_unit").unwrap();
  assert_eq!(fu.assigns, vec![AssignRecord { target: "y".into(), transistors: 54 }]);
  assert_eq!(tc.registry.module_cost("half_adder"), Some(11));
  assert_eq!(tc.top(None).unwrap().name, "function_unit");
}

#[test]
fn test_alu_slice() {
  clilog::init_stdout_simple_trace();
  let tc = TransCount::from_verilog_file(
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/alu_slice.v"),
    CostRegistry::new()
  ).expect("costing error");
  // mux2: inv 1 + 3 nand(2) = 7.
  // alu_slice: xor(3) 12 + and(2) 3 + or(2) 3 + 2 * mux2 14.
  assert_eq!(counts(&tc), vec![
    ("inv".to_string(), 1),
    ("mux2".to_string(), 7),
    ("alu_slice".to_string(), 32),
  ]);
  assert_eq!(tc.unreferenced().iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
             vec!["alu_slice"]);
}

#[test]
fn test_custom_primitives() {
  clilog::init_stdout_simple_trace();
  let mut registry = CostRegistry::new();
  for spec in ["nand=1+2xN", "inv=2"] {
    let (name, cost) = PrimitiveCost::parse_spec(spec).unwrap();
    registry.insert_primitive(name, cost);
  }
  let tc = TransCount::from_verilog_source(VERILOG_ALU_SLICE, registry)
    .expect("costing error");
  // the inv primitive shadows the inv module.
  // mux2: inv 2 + 3 * nand(2 inputs) 5 = 17.
  // alu_slice: 12 + 3 + 3 + 2 * 17 = 52.
  assert_eq!(counts(&tc), vec![
    ("inv".to_string(), 1),
    ("mux2".to_string(), 17),
    ("alu_slice".to_string(), 52),
  ]);
}

#[test]
fn test_report_format() {
  clilog::init_stdout_simple_trace();
  let tc = TransCount::from_verilog_source("\
module dup(a, y);
  input [3:0] a;
  output y;
  wire w;
  not n0(w, a);
  not n1(y, w);
  and g(y, a, w);
  assign w = a;
endmodule
", CostRegistry::new()).expect("costing error");
  assert_eq!(format!("{tc}"), "\
//////////////////////
Module name: dup
Transistor count: 5

-----------------

Inputs:
a : width 4

Outputs:
y : width 1

Wires:
w : width 1

Assigns:
w : 0 transistors

Modules:
2x not - 1 input
1x and - 2 input

");
  let top = tc.top(None).unwrap();
  assert_eq!(format!("{}", TopLineFmt(top)), "Top level module: dup with 5 transistors.");
}

#[test]
fn test_top_selection() {
  let tc = TransCount::from_verilog_source(
    "module a(y); not n(y, y); endmodule\nmodule b(y); a i(y); endmodule\nmodule c(y); endmodule",
    CostRegistry::new()
  ).expect("costing error");
  assert_eq!(tc.top(None).unwrap().name, "c");
  assert_eq!(tc.top(Some("b")).unwrap().transistor_count, Some(1));
  assert!(matches!(tc.top(Some("zz")), Err(TransCountError::TopModuleNotFound { .. })));

  let empty = TransCount::from_verilog_source("// empty\n", CostRegistry::new()).unwrap();
  assert!(matches!(empty.top(None), Err(TransCountError::EmptyDesign)));
}

#[test]
fn test_cycle_file() {
  clilog::init_stdout_simple_trace();
  let err = TransCount::from_verilog_file(
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/cyclic.v"),
    CostRegistry::new()
  ).unwrap_err();
  match err {
    TransCountError::DependencyCycle { module, cycle } => {
      assert_eq!(module, "ping");
      assert_eq!(cycle.len(), 2);
    },
    other => panic!("unexpected {other:?}")
  }
}

#[test]
fn test_parse_errors_surface() {
  let err = TransCount::from_verilog_source(
    "module m(y); output y; assign y = (y == 2'z1) ? 1'b1 : 1'b0; endmodule",
    CostRegistry::new()
  ).unwrap_err();
  assert!(matches!(err, TransCountError::Parse(svmodparse::ParseError::MalformedLiteral { .. })));
  assert!(err.to_string().contains("2'z1"));
}

#[test]
fn test_deep_hierarchy_overflow() {
  clilog::init_stdout_simple_trace();
  // m0 costs 16 and every level doubles it, so m60 no longer fits.
  let mut src = String::from(
    "module m0(y, a); nand g(y, a, a, a, a, a, a, a, a, a, a, a, a, a, a, a, a); endmodule\n");
  for i in 1..70 {
    src += &format!("module m{i}(y, a); m{p} u1(y, a); m{p} u2(y, a); endmodule\n", p = i - 1);
  }
  let err = TransCount::from_verilog_source(&src, CostRegistry::new()).unwrap_err();
  match err {
    TransCountError::CountOverflow { module } => assert_eq!(module, "m60"),
    other => panic!("unexpected {other:?}")
  }

  let tc = TransCount::from_verilog_source(
    &src.lines().take(60).collect::<Vec<_>>().join("\n"), CostRegistry::new()
  ).expect("costing error");
  assert_eq!(tc.module("m59").unwrap().transistor_count, Some(1 << 63));
}

#[test]
fn test_huge_primitive_spec() {
  let mut registry = CostRegistry::new();
  let (name, cost) = PrimitiveCost::parse_spec("nand=18446744073709551615+1xN").unwrap();
  registry.insert_primitive(name, cost);
  let err = TransCount::from_verilog_source(VERILOG_ALU_SLICE, registry).unwrap_err();
  assert!(matches!(err, TransCountError::CountOverflow { module } if module == "mux2"));
}

#[test]
fn test_resolve_twice() {
  clilog::init_stdout_simple_trace();
  let tc = TransCount::from_verilog_source(VERILOG_FUNCTION_UNIT, CostRegistry::new())
    .expect("costing error");
  let mut resolver = Resolver::default();
  let again = resolver.resolve(tc.modules.clone()).expect("costing error");
  assert!(again.iter().all(|m| m.is_resolved()));
  assert_eq!(again.iter().map(|m| m.transistor_count).collect::<Vec<_>>(),
             vec![Some(11), Some(66)]);
  assert_eq!(resolver.registry().module_cost("function_unit"), Some(66));
}
