#[cfg(test)]
mod tests {
    use gastos_bot::ledger::{ExpenseRecord, Ledger};

    fn record(date: &str, amount: f64, category: &str, description: &str) -> ExpenseRecord {
        ExpenseRecord {
            date: date.to_string(),
            amount,
            category: category.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_empty_ledger_serializes_to_header_only() {
        let csv = Ledger::empty().to_csv().unwrap();
        assert_eq!(csv, "fecha,monto,categoria,descripcion\n");
    }

    #[test]
    fn test_append_preserves_arrival_order() {
        let mut ledger = Ledger::empty();
        for i in 0..5 {
            ledger.push(record("2025-01-05", i as f64, "general", &format!("gasto {i}")));
        }

        let parsed = Ledger::from_csv(&ledger.to_csv().unwrap()).unwrap();

        assert_eq!(parsed.len(), 5);
        for (i, rec) in parsed.records().iter().enumerate() {
            assert_eq!(rec.description, format!("gasto {i}"));
        }
    }

    #[test]
    fn test_header_intact_after_writes() {
        let mut ledger = Ledger::empty();
        ledger.push(record("2025-01-05", 500.0, "supermercado", "COTO"));

        let csv = ledger.to_csv().unwrap();
        assert!(csv.starts_with("fecha,monto,categoria,descripcion\n"));
    }

    #[test]
    fn test_comma_in_description_is_quoted() {
        let mut ledger = Ledger::empty();
        ledger.push(record("2025-01-05", 89.1, "farmacia", "ibuprofeno, curitas"));

        let csv = ledger.to_csv().unwrap();
        assert!(csv.contains("\"ibuprofeno, curitas\""));

        let parsed = Ledger::from_csv(&csv).unwrap();
        assert_eq!(parsed.records()[0].description, "ibuprofeno, curitas");
    }

    #[test]
    fn test_parses_integer_and_decimal_amounts() {
        let csv = "fecha,monto,categoria,descripcion\n\
                   2025-01-05,500,general,taxi\n\
                   2025-01-06,123.45,farmacia,remedios\n";
        let ledger = Ledger::from_csv(csv).unwrap();

        assert_eq!(ledger.records()[0].amount, 500.0);
        assert_eq!(ledger.records()[1].amount, 123.45);
    }

    #[test]
    fn test_header_only_input_is_empty_ledger() {
        let ledger = Ledger::from_csv("fecha,monto,categoria,descripcion\n").unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let csv = "fecha,monto,categoria,descripcion\n2025-01-05,not-a-number,general,x\n";
        assert!(Ledger::from_csv(csv).is_err());
    }
}
