use ode_compare::ResultTable;
use proptest::prelude::*;

fn grid() -> impl Strategy<Value = Vec<(Vec<f64>, bool)>> {
    (1usize..6).prop_flat_map(|ncols| {
        prop::collection::vec(
            (prop::collection::vec(-1.0e6f64..1.0e6, ncols), any::<bool>()),
            0..30,
        )
    })
}

/// rows joined with single spaces, a blank line before each flagged row
fn render(rows: &[(Vec<f64>, bool)]) -> String {
    let mut text = String::new();
    for (row, blank_before) in rows {
        if *blank_before {
            text.push_str("   \n");
        }
        let fields: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        text.push_str(&fields.join(" "));
        text.push('\n');
    }
    text
}

proptest! {
    #[test]
    fn shape_follows_non_empty_lines(rows in grid()) {
        let text = render(&rows);
        let table: ResultTable = text.parse().unwrap();
        prop_assert_eq!(table.nrows(), rows.len());
        let expected_cols = rows.first().map_or(0, |(r, _)| r.len());
        prop_assert_eq!(table.ncols(), expected_cols);
        for (i, (row, _)) in rows.iter().enumerate() {
            prop_assert_eq!(table.row(i).unwrap(), &row[..]);
        }
    }

    #[test]
    fn loading_twice_gives_the_same_table(rows in grid()) {
        let text = render(&rows);
        let first = ResultTable::from_reader(text.as_bytes(), "run.txt").unwrap();
        let second = ResultTable::from_reader(text.as_bytes(), "run.txt").unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_column_has_one_value_per_row(rows in grid()) {
        let table: ResultTable = render(&rows).parse().unwrap();
        for i in 0..table.ncols() {
            prop_assert_eq!(table.column(i).unwrap().len(), table.nrows());
        }
        prop_assert!(table.column(table.ncols()).is_err());
    }
}
