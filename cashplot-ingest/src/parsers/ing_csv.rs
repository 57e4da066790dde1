//! ING Bank (NL) CSV export parser, English and Dutch variants.
//!
//! Columns (both languages, by position):
//!   Date,Name / Description,Account,Counterparty,Code,Debit/credit,Amount (EUR),Transaction type,Notifications
//!   Datum;Naam / Omschrijving;Rekening;Tegenrekening;Code;Af Bij;Bedrag (EUR);Mutatiesoort;Mededelingen
//!
//! Rows are newest first. Amounts are unsigned with a decimal comma; the
//! direction column carries the sign.

use anyhow::{Context, Result, bail};
use cashplot_core::{CashplotError, NormalizedTransaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::Source;

const MIN_COLUMNS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Credit" | "Bij" => Some(Direction::Credit),
            "Debit" | "Af" => Some(Direction::Debit),
            _ => None,
        }
    }
}

/// One row of an ING export, all columns kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngTransaction {
    pub date: NaiveDate,
    pub counter_name: String,
    pub account: String,
    pub counter_account: String,
    pub code: String,
    pub direction: Direction,
    /// Unsigned; see `direction`.
    pub amount: Decimal,
    pub transaction_type: String,
    pub description: String,
}

impl IngTransaction {
    /// Parse a data row. `line` is only used in error messages.
    pub fn from_record(record: &csv::StringRecord, line: u64) -> Result<Self> {
        let malformed = |what: String| CashplotError::MalformedInput(format!("line {line}: {what}"));

        if record.len() < MIN_COLUMNS {
            return Err(malformed(format!(
                "expected at least {MIN_COLUMNS} columns, got {}",
                record.len()
            ))
            .into());
        }
        let field = |i: usize| record.get(i).unwrap_or("").to_string();

        let raw_date = &record[0];
        let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y%m%d")
            .map_err(|_| malformed(format!("could not parse date '{raw_date}'")))?;

        let raw_direction = &record[5];
        let direction = Direction::parse(raw_direction).ok_or_else(|| {
            malformed(format!(
                "could not determine transaction direction based on value '{raw_direction}'"
            ))
        })?;

        let raw_amount = &record[6];
        let amount = Decimal::from_str_exact(&raw_amount.trim().replace(',', "."))
            .map_err(|_| malformed(format!("could not parse amount '{raw_amount}'")))?;

        Ok(Self {
            date,
            counter_name: field(1),
            account: field(2),
            counter_account: field(3),
            code: field(4),
            direction,
            amount,
            transaction_type: field(7),
            description: field(8),
        })
    }

    pub fn convert(&self) -> NormalizedTransaction {
        let change = match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
        };
        NormalizedTransaction::new(
            self.date,
            self.counter_name.as_str(),
            self.counter_account.as_str(),
            self.description.as_str(),
            change,
        )
    }
}

/// The Dutch export is `;`-separated. Byte 7 is the character right after the
/// quoted first header (`"Datum"` vs `"Date",`).
fn delimiter(data: &str) -> u8 {
    match data.as_bytes().get(7) {
        Some(b';') => b';',
        _ => b',',
    }
}

/// Parse an export into rows, oldest first.
pub fn parse_ing_csv(data: &str) -> Result<Vec<IngTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter(data))
        .has_headers(true)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.context("reading ING CSV row")?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(IngTransaction::from_record(&record, line)?);
    }

    // newest first in the export; keep same-day rows in booking order
    rows.reverse();
    rows.sort_by_key(|row| row.date);

    log::info!("parsed {} ING transactions", rows.len());
    Ok(rows)
}

/// Load and normalize an ING export from disk.
pub fn load_ing_csv(path: impl AsRef<Path>) -> Result<Vec<NormalizedTransaction>> {
    IngCsv.load(path.as_ref())
}

/// [`Source`] adapter for ING exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngCsv;

impl Source for IngCsv {
    fn name(&self) -> &'static str {
        "ING CSV"
    }

    fn parse(&self, data: &str) -> Result<Vec<NormalizedTransaction>> {
        let rows = parse_ing_csv(data)?;
        if rows.is_empty() {
            bail!("no transactions in {} export", self.name());
        }
        Ok(rows.iter().map(IngTransaction::convert).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EN: &str = r#""Date","Name / Description","Account","Counterparty","Code","Debit/credit","Amount (EUR)","Transaction type","Notifications"
"20200712","GOOD STORE","NL00MAIN1234567890","NL05GOOD0000000001","BA","Debit","50,00","Payment terminal","Purchase no. 32"
"20200628","Company Inc.","NL00MAIN1234567890","NL01WORK0987654321","OV","Credit","500,00","Transfer","Bonus for June 2020"
"20200628","Company Inc.","NL00MAIN1234567890","NL01WORK0987654321","OV","Credit","2000,00","Transfer","Salary for June 2020"
"#;

    const NL: &str = r#""Datum";"Naam / Omschrijving";"Rekening";"Tegenrekening";"Code";"Af Bij";"Bedrag (EUR)";"Mutatiesoort";"Mededelingen"
"20191215";"GOOD STORE";"NL00SELF";"NL05GOOD";"BA";"Af";"50,00";"Betaalautomaat";"Aankoop 32"
"20191214";"Werkgever";"NL00SELF";"NL01WORK";"OV";"Bij";"1234,56";"Overschrijving";"Salaris"
"#;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_load_row() {
        let row = record(&[
            "20191215",
            "GOOD STORE",
            "NL00SELF",
            "NL05GOOD",
            "BA",
            "Debit",
            "50,00",
            "Payment terminal",
            "Purchase no. 32",
        ]);
        let txn = IngTransaction::from_record(&row, 2).unwrap();
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2019, 12, 15).unwrap());
        assert_eq!(txn.counter_name, "GOOD STORE");
        assert_eq!(txn.account, "NL00SELF");
        assert_eq!(txn.counter_account, "NL05GOOD");
        assert_eq!(txn.code, "BA");
        assert_eq!(txn.direction, Direction::Debit);
        assert_eq!(txn.amount, dec!(50));
        assert_eq!(txn.transaction_type, "Payment terminal");
        assert_eq!(txn.description, "Purchase no. 32");

        assert_eq!(
            txn.convert(),
            NormalizedTransaction::new(
                NaiveDate::from_ymd_opt(2019, 12, 15).unwrap(),
                "GOOD STORE",
                "NL05GOOD",
                "Purchase no. 32",
                dec!(-50),
            )
        );
    }

    #[test]
    fn test_parse_english_export_oldest_first() {
        let txns = IngCsv.parse(EN).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].description, "Salary for June 2020");
        assert_eq!(txns[0].change, dec!(2000));
        assert_eq!(txns[1].description, "Bonus for June 2020");
        assert_eq!(txns[2].change, dec!(-50));
    }

    #[test]
    fn test_parse_dutch_export() {
        let rows = parse_ing_csv(NL).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].direction, Direction::Credit);
        assert_eq!(rows[0].amount, dec!(1234.56));
        assert_eq!(rows[1].convert().change, dec!(-50));
    }

    #[test]
    fn test_unknown_direction_is_malformed() {
        let data = EN.replace("\"Debit\"", "\"Sideways\"");
        let err = IngCsv.parse(&data).unwrap_err();
        let malformed = err.downcast_ref::<CashplotError>().unwrap();
        assert!(malformed.to_string().contains("line 2"), "{malformed}");
        assert!(malformed.to_string().contains("Sideways"), "{malformed}");
    }

    #[test]
    fn test_bad_amount_is_malformed() {
        let data = EN.replace("\"50,00\"", "\"fifty\"");
        let err = parse_ing_csv(&data).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CashplotError>(),
            Some(CashplotError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_header_only_is_an_error() {
        let header = EN.lines().next().unwrap();
        assert!(parse_ing_csv(header).unwrap().is_empty());
        assert!(IngCsv.parse(header).is_err());
    }
}
