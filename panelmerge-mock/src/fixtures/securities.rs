use panelmerge_core::Table;

use super::{date, dec, text};

/// Column layout of the securities fixture.
pub const COLUMNS: [&str; 6] = ["cusip", "caldt", "permno", "ret", "prc", "ticker"];

/// Monthly securities rows: (cusip, caldt, permno, ret, prc, ticker). Empty `ret` is null.
const ROWS: &[(&str, &str, &str, &str, &str, &str)] = &[
    ("AAPL1234", "2020-01-31", "14593", "0.02", "309.51", "AAPL"),
    ("AAPL1234", "2020-02-29", "14593", "-0.01", "273.36", "AAPL"),
    ("AAPL1234", "2020-03-31", "14593", "", "254.29", "AAPL"),
    ("AAPL1234", "2020-04-30", "14593", "0.05", "293.80", "AAPL"),
    ("MSFT5678", "2020-01-31", "10107", "0.01", "170.23", "MSFT"),
    ("MSFT5678", "2020-02-29", "10107", "0.03", "162.01", "MSFT"),
    ("MSFT5678", "2020-03-31", "10107", "0.00", "157.71", "MSFT"),
    ("MSFT5678", "2020-04-30", "10107", "0.02", "179.21", "MSFT"),
    ("XYZ11111", "2020-01-31", "90001", "0.01", "10.00", "XYZ"),
    ("XYZ22222", "2020-01-31", "90002", "0.02", "20.00", "XYZ"),
];

/// Number of securities rows in the fixture.
pub const ROW_COUNT: usize = ROWS.len();

/// Build the securities fixture table.
#[must_use]
pub fn table() -> Table {
    let mut t = Table::new(COLUMNS);
    for (cusip, caldt, permno, ret, prc, ticker) in ROWS {
        t.push_row(vec![
            text(cusip),
            date(caldt),
            dec(permno),
            dec(ret),
            dec(prc),
            text(ticker),
        ])
        .unwrap();
    }
    t
}
