//! Serialisation of the flow matrix to its CSV exchange format.
//!
//! The format mirrors what the downstream placement tooling reads back:
//! a header line of comma-prefixed macro names in index order, then one
//! line per source macro holding its name and its outgoing weights in
//! column order. Values use the default floating-point rendering.

use std::fmt;

use itertools::Itertools;

use crate::netlist::Symbol;

use super::FlowMatrix;

/// Serialise the flow matrix as CSV into the provided writer.
///
/// Panics if `names` does not have exactly one entry per matrix row; the
/// two always come from the same classification.
pub fn serialise_flow_csv_to<W: fmt::Write>(
    matrix: &FlowMatrix,
    names: &[Symbol],
    writer: &mut W,
) -> fmt::Result {
    for name in names.iter() {
        write!(writer, ",{}", name)?;
    }
    writer.write_char('\n')?;

    for (name, row) in names.iter().zip_eq(matrix.rows()) {
        write!(writer, "{}", name)?;
        for value in row.iter() {
            write!(writer, ",{}", value)?;
        }
        writer.write_char('\n')?;
    }

    Ok(())
}

/// Serialise the flow matrix as CSV.
pub fn serialise_flow_csv(matrix: &FlowMatrix, names: &[Symbol]) -> String {
    let mut out = String::new();
    // Infallible for String
    let _ = serialise_flow_csv_to(matrix, names, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| Symbol::from(*n)).collect()
    }

    #[test]
    fn csv_layout_is_header_then_named_rows() {
        let mut matrix = FlowMatrix::new(2);
        matrix.add(0, 1, 1.5);
        matrix.add(1, 0, 0.25);

        let text = serialise_flow_csv(&matrix, &names(&["ram0", "rom1"]));
        assert_eq!(text, ",ram0,rom1\nram0,0,1.5\nrom1,0.25,0\n");
    }

    #[test]
    fn csv_of_empty_matrix_is_a_bare_header() {
        let text = serialise_flow_csv(&FlowMatrix::new(0), &[]);
        assert_eq!(text, "\n");
    }

    #[test]
    fn csv_row_order_follows_macro_indices() {
        let mut matrix = FlowMatrix::new(3);
        matrix.add(2, 0, 2.0);

        let text = serialise_flow_csv(&matrix, &names(&["a", "b", "c"]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ",a,b,c");
        assert_eq!(lines[1], "a,0,0,0");
        assert_eq!(lines[3], "c,2,0,0");
    }
}
