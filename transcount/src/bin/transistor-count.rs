//! Prints the transistor count of every module in a structural
//! verilog file, followed by the top-level total.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use transcount::{ CostRegistry, PrimitiveCost, TopLineFmt, TransCount, TransCountError };

/// Estimate transistor counts of structural verilog modules.
#[derive(Parser, Debug)]
#[command(name = "transistor-count", version)]
struct Cli {
    /// Verilog file to analyze.
    #[arg(short = 'f', long = "file", alias = "f", default_value = "function_unit.v")]
    file: PathBuf,

    /// Module to report as top level. Defaults to the last one resolved.
    #[arg(long)]
    top: Option<String>,

    /// Extra or overriding primitive cost, as NAME=COST or
    /// NAME=BASE+PERxN. May be repeated.
    #[arg(long = "primitive", value_name = "SPEC")]
    primitives: Vec<String>,

    /// Print only the top-level summary.
    #[arg(short, long)]
    quiet: bool,
}

fn run(cli: &Cli) -> Result<(), TransCountError> {
    let mut registry = CostRegistry::new();
    for spec in &cli.primitives {
        let (name, cost) = PrimitiveCost::parse_spec(spec)?;
        clilog::info!(TC_PRIM, "primitive {} set to {:?}", name, cost);
        registry.insert_primitive(name, cost);
    }
    clilog::info!("Verilog file {}", cli.file.display());
    let tc = TransCount::from_verilog_file(&cli.file, registry)?;
    if !cli.quiet {
        print!("{}", tc);
    }
    println!("{}", TopLineFmt(tc.top(cli.top.as_deref())?));
    Ok(())
}

fn main() {
    clilog::init_stderr_color_debug();
    clilog::enable_timer("transcount");
    let start = Instant::now();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        clilog::error!("{}", e);
        process::exit(1);
    }
    println!("Runtime: {} seconds", start.elapsed().as_secs_f64());
}
