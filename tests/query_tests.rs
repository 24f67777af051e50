#[cfg(test)]
mod tests {
    use gastos_bot::ledger::{ExpenseRecord, Ledger};
    use gastos_bot::query::{
        expenses_on, parse_query, total_for_category, total_in_range, GastosQuery,
    };

    fn ledger_with(rows: &[(&str, f64, &str)]) -> Ledger {
        let mut ledger = Ledger::empty();
        for (date, amount, category) in rows {
            ledger.push(ExpenseRecord {
                date: date.to_string(),
                amount: *amount,
                category: category.to_string(),
                description: String::new(),
            });
        }
        ledger
    }

    #[test]
    fn test_parse_fecha_query() {
        assert_eq!(
            parse_query("fecha:2025-01-05"),
            GastosQuery::ByDate("2025-01-05".to_string())
        );
    }

    #[test]
    fn test_parse_categoria_query() {
        assert_eq!(
            parse_query("categoria:farmacia"),
            GastosQuery::ByCategory("farmacia".to_string())
        );
    }

    #[test]
    fn test_parse_range_query() {
        assert_eq!(
            parse_query("desde:2025-01-01 hasta:2025-01-31"),
            GastosQuery::ByRange {
                desde: "2025-01-01".to_string(),
                hasta: "2025-01-31".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_precedence_fecha_first() {
        // The markers are checked in a fixed order; fecha wins.
        assert_eq!(
            parse_query("fecha:2025-01-05 categoria:farmacia"),
            GastosQuery::ByDate("2025-01-05 categoria:farmacia".to_string())
        );
    }

    #[test]
    fn test_parse_unrecognized_is_invalid() {
        assert_eq!(parse_query(""), GastosQuery::Invalid);
        assert_eq!(parse_query("total de enero"), GastosQuery::Invalid);
        assert_eq!(parse_query("desde:2025-01-01"), GastosQuery::Invalid);
    }

    #[test]
    fn test_expenses_on_exact_string_match() {
        let ledger = ledger_with(&[
            ("2025-01-05", 100.0, "general"),
            ("2025-1-5", 200.0, "general"),
            ("2025-01-05", 300.0, "farmacia"),
        ]);

        let matches = expenses_on(&ledger, "2025-01-05");

        // "2025-1-5" names the same day but is a different string.
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].amount, 100.0);
        assert_eq!(matches[1].amount, 300.0);
    }

    #[test]
    fn test_category_total_case_insensitive() {
        let ledger = ledger_with(&[
            ("2025-01-05", 100.0, "Farmacia"),
            ("2025-01-06", 50.0, "farmacia"),
            ("2025-01-07", 999.0, "supermercado"),
        ]);

        assert_eq!(total_for_category(&ledger, "FARMACIA"), 150.0);
    }

    #[test]
    fn test_category_total_on_empty_ledger_is_zero() {
        assert_eq!(total_for_category(&Ledger::empty(), "farmacia"), 0.0);
    }

    #[test]
    fn test_range_total_bounds_inclusive() {
        let ledger = ledger_with(&[
            ("2025-01-01", 10.0, "general"),
            ("2025-01-15", 20.0, "general"),
            ("2025-01-31", 30.0, "general"),
            ("2025-02-01", 40.0, "general"),
        ]);

        assert_eq!(total_in_range(&ledger, "2025-01-01", "2025-01-31"), 60.0);
    }

    #[test]
    fn test_range_excludes_unpadded_dates() {
        // Lexicographic comparison: "2025-1-5" > "2025-01-31" as a string,
        // so the row falls outside January even though the day is in range.
        let ledger = ledger_with(&[
            ("2025-01-05", 100.0, "general"),
            ("2025-1-5", 200.0, "general"),
        ]);

        assert_eq!(total_in_range(&ledger, "2025-01-01", "2025-01-31"), 100.0);
    }

    #[test]
    fn test_range_total_on_empty_ledger_is_zero() {
        assert_eq!(
            total_in_range(&Ledger::empty(), "2025-01-01", "2025-01-31"),
            0.0
        );
    }
}
