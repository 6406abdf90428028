use panelmerge_core::Table;

use super::{date, dec, text};

/// Column layout of the fundamentals fixture.
pub const COLUMNS: [&str; 11] = [
    "cusip", "datadate", "gvkey", "tic", "chq", "actq", "atq", "curcdq", "datafmt", "indfmt",
    "consol",
];

/// Quarterly fundamentals rows: (cusip, datadate, gvkey, tic, chq, actq, atq).
const ROWS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("AAPL123456", "2020-01-31", "001690", "AAPL", "50", "80", "100"),
    ("AAPL123456", "2020-02-15", "001690", "AAPL", "55", "85", "110"),
    ("AAPL123456", "2020-04-30", "001690", "AAPL", "60", "90", "120"),
    ("MSFT567890", "2020-03-31", "012141", "MSFT", "130", "180", "300"),
    ("XYZ111110", "2020-01-31", "900001", "XY1", "1", "5", "10"),
    ("XYZ222220", "2020-01-31", "900002", "XY2", "2", "8", "20"),
];

/// Number of fundamentals rows in the fixture.
pub const ROW_COUNT: usize = ROWS.len();

/// Build the fundamentals fixture table.
#[must_use]
pub fn table() -> Table {
    let mut t = Table::new(COLUMNS);
    for (cusip, datadate, gvkey, tic, chq, actq, atq) in ROWS {
        t.push_row(vec![
            text(cusip),
            date(datadate),
            text(gvkey),
            text(tic),
            dec(chq),
            dec(actq),
            dec(atq),
            text("USD"),
            text("STD"),
            text("INDL"),
            text("C"),
        ])
        .unwrap();
    }
    t
}
