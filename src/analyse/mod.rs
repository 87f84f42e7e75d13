//! Human-facing analysis of the discovered dataflow.
//!
//! This command runs the full pipeline (parse, validate, classify, search,
//! aggregate) and renders the result for a reader instead of a tool: a
//! node-kind census, one table per discovered path (hop by hop), and an
//! optional Graphviz dump of the macro-flow graph.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use macroflow::analyse::{AnalyseArgs, analyse_main};
//!
//! let args = AnalyseArgs {
//!     input: "design.netlist".into(),
//!     report: Some("paths.rpt".into()),
//!     dot: Some("flow.dot".into()),
//!     depth: 3,
//!     clock_pattern: None,
//! };
//!
//! analyse_main(args)?;
//! # Ok(())
//! # }
//! ```

use std::{cmp, fs, io::Write, path::PathBuf};

use anyhow::*;
use clap::Parser;
use ordered_float::OrderedFloat;
use petgraph::dot;
use prettytable::*;
use rayon::prelude::*;

use crate::{
    classify::{ClockPredicate, NodeKind, classify},
    dataflow::{compute_flow, macro_flow_graph, macro_names},
    netlist::validate_netlist,
    read_netlist,
};

/// Command-line arguments for the analysis command.
#[derive(Parser, Debug)]
pub struct AnalyseArgs {
    /// Netlist description input file
    pub input: PathBuf,

    /// Report file for the path dump (default: stdout)
    #[clap(long, short)]
    pub report: Option<PathBuf>,

    /// DOT file displaying the macro-to-macro flow graph
    #[clap(long)]
    pub dot: Option<PathBuf>,

    /// Bound on clocked stages per path; negative admits no paths
    #[clap(long, short, default_value_t = 3)]
    pub depth: i32,

    /// Regex deciding which pin names mark a node as clocked
    #[clap(long)]
    pub clock_pattern: Option<String>,
}

/// Run the pipeline and dump every discovered path, strongest first.
pub fn analyse_main(args: AnalyseArgs) -> Result<()> {
    let AnalyseArgs {
        input,
        report,
        dot,
        depth,
        clock_pattern,
    } = args;

    // Create writer for output (file or stdout)
    let mut writer: Box<dyn Write> = match report {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };

    let netlist = read_netlist(&input)?;
    validate_netlist(&netlist)?;
    let clock = ClockPredicate::from_option(clock_pattern.as_deref())?;
    let classes = classify(&netlist, &clock);
    let (paths, matrix) = compute_flow(&netlist, &classes, depth)?;

    let (macros, registers, terminals, logic) = classes.census();
    writeln!(
        writer,
        "Nodes: {} macros, {} registers, {} terminals, {} logic cells",
        macros, registers, terminals, logic
    )?;
    writeln!(
        writer,
        "Paths discovered: {} (depth bound {})",
        paths.len(),
        depth
    )?;
    writeln!(writer, "Total flow: {}", matrix.total())?;

    if let Some(filename) = dot {
        let names = macro_names(&netlist, &classes);
        let graph = macro_flow_graph(&matrix, &names);
        fs::write(filename, format!("{:?}", dot::Dot::new(&graph)))?;
    }

    let mut ranked: Vec<_> = paths
        .into_par_iter()
        .map(|path| (path.weight(), path))
        .collect();
    ranked.par_sort_unstable_by_key(|(weight, _)| cmp::Reverse(OrderedFloat(*weight)));

    for (i, (weight, path)) in ranked.into_iter().enumerate() {
        let mut table = Table::new();
        table.set_titles(row!["Hop", "From", "Pin", "Net", "Pin", "To", "Kind"]);
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        for (h, hop) in path.hops.iter().enumerate() {
            let kind = match classes.kind(hop.to) {
                NodeKind::Macro(index) => format!("Macro {}", index),
                NodeKind::Register => "Register".to_string(),
                NodeKind::Terminal => "Terminal".to_string(),
                NodeKind::Logic => "Logic".to_string(),
            };
            table.add_row(row![
                h,
                netlist.node(hop.from).name,
                netlist.pin(hop.from_pin).name,
                netlist.net(hop.net).name,
                netlist.pin(hop.to_pin).name,
                netlist.node(hop.to).name,
                kind,
            ]);
        }

        writeln!(
            writer,
            "\nPath {}: {} -> {} (weight {}, {} {}, {} hops):",
            i,
            netlist.node(path.start).name,
            netlist.node(path.end()).name,
            weight,
            path.register_depth,
            if path.register_depth == 1 {
                "register"
            } else {
                "registers"
            },
            path.hops.len()
        )?;
        table.print(&mut writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::parse;

    #[test]
    fn dot_output_contains_macro_edges() {
        let input = r#"
            macro "ram0" [out "q" -> "n1"]
            macro "ram1" [in "d" <- "n1"]
            "#;
        let netlist = parse(input).unwrap();
        let classes = classify(&netlist, &ClockPredicate::default());
        let (_, matrix) = compute_flow(&netlist, &classes, 3).unwrap();

        let names = macro_names(&netlist, &classes);
        let graph = macro_flow_graph(&matrix, &names);
        let rendered = format!("{:?}", dot::Dot::new(&graph));

        assert!(rendered.contains("digraph"));
        assert!(rendered.contains("ram0"));
        assert!(rendered.contains("ram1"));
    }

    #[test]
    fn analyse_writes_report_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let input_path = dir.path().join("design.netlist");
        let report_path = dir.path().join("paths.rpt");
        fs::write(
            &input_path,
            r#"
            macro "a" [out "q" -> "n1"]
            cell "ff" [in "clk" <- "ck", in "d" <- "n1", out "q" -> "n2"]
            macro "b" [in "d" <- "n2"]
            "#,
        )
        .expect("write netlist");

        analyse_main(AnalyseArgs {
            input: input_path,
            report: Some(report_path.clone()),
            dot: None,
            depth: 3,
            clock_pattern: None,
        })
        .expect("analyse should succeed");

        let report = fs::read_to_string(report_path).expect("read report");
        assert!(report.contains("Paths discovered: 1"));
        assert!(report.contains("a -> b"));
        assert!(report.contains("weight 0.5"));
        assert!(report.contains("Register"));
    }

    #[test]
    fn analyse_handles_zero_macros() {
        let input = r#"
            cell "u1" [out "y" -> "n1"]
            cell "u2" [in "a" <- "n1"]
            "#;
        let netlist = parse(input).unwrap();
        let classes = classify(&netlist, &ClockPredicate::default());
        let (paths, matrix) = compute_flow(&netlist, &classes, 3).unwrap();

        assert!(paths.is_empty());
        assert_eq!(matrix.dim(), 0);
        assert_eq!(matrix.total(), 0.0);
    }
}
