//! Validated configuration: savings accounts, net-worth exclusions, starting
//! balances and the ordered categorization rules.
//!
//! [`RawConfig`] is the serde shape read from disk. [`Config`] is only ever
//! built through validation, so the classifier and ledger can trust it.

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CashplotError, Result};
use crate::transaction::{AccountAmounts, MAIN_ACCOUNT, NET_ACCOUNT, NormalizedTransaction, UNCATEGORIZED};

/// Transaction field a rule pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    CounterAccount,
    CounterName,
    Description,
}

impl MatchField {
    pub const ALL: [MatchField; 3] = [
        MatchField::CounterAccount,
        MatchField::CounterName,
        MatchField::Description,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MatchField::CounterAccount => "counter_account",
            MatchField::CounterName => "counter_name",
            MatchField::Description => "description",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    fn value<'a>(&self, txn: &'a NormalizedTransaction) -> &'a str {
        match self {
            MatchField::CounterAccount => &txn.counter_account,
            MatchField::CounterName => &txn.counter_name,
            MatchField::Description => &txn.description,
        }
    }
}

/// Per-field regex patterns. An absent field matches anything.
#[derive(Debug, Clone, Default)]
pub struct MatchPredicate {
    patterns: BTreeMap<MatchField, Regex>,
}

impl MatchPredicate {
    /// The empty predicate, matching every transaction.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: MatchField, pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|e| {
            CashplotError::config(format!("invalid {} pattern '{pattern}': {e}", field.key()))
        })?;
        self.patterns.insert(field, re);
        Ok(self)
    }

    pub fn is_catch_all(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn pattern(&self, field: MatchField) -> Option<&str> {
        self.patterns.get(&field).map(Regex::as_str)
    }

    /// True when every specified pattern is found somewhere in its field.
    pub fn matches(&self, txn: &NormalizedTransaction) -> bool {
        self.patterns
            .iter()
            .all(|(field, re)| re.is_match(field.value(txn)))
    }
}

impl PartialEq for MatchPredicate {
    fn eq(&self, other: &Self) -> bool {
        MatchField::ALL
            .iter()
            .all(|f| self.pattern(*f) == other.pattern(*f))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRule {
    pub category: String,
    pub predicate: MatchPredicate,
}

impl MatchRule {
    pub fn new(category: impl Into<String>, predicate: MatchPredicate) -> Self {
        Self {
            category: category.into(),
            predicate,
        }
    }

    pub fn catch_all(category: impl Into<String>) -> Self {
        Self::new(category, MatchPredicate::any())
    }

    pub fn matches(&self, txn: &NormalizedTransaction) -> bool {
        self.predicate.matches(txn)
    }
}

/// `[label, {field: pattern}]`, as written in the configuration file.
pub type RawMatchRule = (String, BTreeMap<String, String>);

/// A starting balance as written in a config file: a number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Significant decimal digits every `f64` reproduces exactly.
const FLOAT_EXACT_DIGITS: usize = 15;

impl RawAmount {
    fn to_decimal(&self, account: &str) -> Result<Decimal> {
        let not_numeric =
            || CashplotError::config(format!("starting balance for '{account}' is not numeric"));
        match self {
            RawAmount::Integer(i) => Ok(Decimal::from(*i)),
            RawAmount::Float(f) => {
                let text = f.to_string();
                if significant_digits(&text) > FLOAT_EXACT_DIGITS {
                    return Err(CashplotError::config(format!(
                        "starting balance for '{account}' has more than {FLOAT_EXACT_DIGITS} \
                         significant digits; write it as a string to keep it exact"
                    )));
                }
                Decimal::from_str_exact(&text).map_err(|_| not_numeric())
            }
            RawAmount::Text(s) => Decimal::from_str_exact(s.trim()).map_err(|_| not_numeric()),
        }
    }
}

fn significant_digits(number: &str) -> usize {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').len()
}

/// Unvalidated configuration as deserialized from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub savings_accounts: Vec<String>,
    pub net_ignore_accounts: Vec<String>,
    pub starting_balances: BTreeMap<String, RawAmount>,
    pub match_rules: Vec<RawMatchRule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    savings_accounts: Vec<String>,
    net_ignore_accounts: BTreeSet<String>,
    starting_balances: AccountAmounts,
    match_rules: Vec<MatchRule>,
}

impl Config {
    /// Validate the parts and build a configuration.
    ///
    /// Accounts without a starting balance start at zero, and an
    /// `Uncategorized` catch-all rule is appended unless the last rule already
    /// matches everything.
    pub fn new(
        savings_accounts: Vec<String>,
        net_ignore_accounts: Vec<String>,
        starting_balances: BTreeMap<String, Decimal>,
        mut match_rules: Vec<MatchRule>,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for name in &savings_accounts {
            if name.trim().is_empty() {
                return Err(CashplotError::config("savings account names must not be empty"));
            }
            if name == MAIN_ACCOUNT || name == NET_ACCOUNT {
                return Err(CashplotError::config(format!(
                    "savings account name '{name}' is reserved"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(CashplotError::config(format!(
                    "savings account '{name}' is declared twice"
                )));
            }
        }

        let is_known = |name: &str| name == MAIN_ACCOUNT || seen.contains(name);

        for name in &net_ignore_accounts {
            if !is_known(name.as_str()) {
                return Err(CashplotError::config(format!(
                    "net_ignore_accounts names unknown account '{name}'"
                )));
            }
        }

        for name in starting_balances.keys() {
            if !is_known(name.as_str()) {
                return Err(CashplotError::config(format!(
                    "starting balance given for unknown account '{name}'"
                )));
            }
        }

        for (i, rule) in match_rules.iter().enumerate() {
            if rule.category.trim().is_empty() {
                return Err(CashplotError::config(format!("match rule {} has an empty label", i + 1)));
            }
        }

        let balances = std::iter::once(MAIN_ACCOUNT)
            .chain(savings_accounts.iter().map(String::as_str))
            .map(|name| {
                let amount = starting_balances.get(name).copied().unwrap_or_default();
                (name.to_string(), amount)
            })
            .collect();

        if !match_rules.last().is_some_and(|r| r.predicate.is_catch_all()) {
            match_rules.push(MatchRule::catch_all(UNCATEGORIZED));
        }

        log::debug!(
            "configuration: {} savings accounts, {} match rules",
            savings_accounts.len(),
            match_rules.len()
        );

        Ok(Self {
            savings_accounts,
            net_ignore_accounts: net_ignore_accounts.into_iter().collect(),
            starting_balances: balances,
            match_rules,
        })
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let mut rules = Vec::with_capacity(raw.match_rules.len());
        for (i, (label, fields)) in raw.match_rules.into_iter().enumerate() {
            let mut predicate = MatchPredicate::any();
            for (key, pattern) in &fields {
                let field = MatchField::from_key(key).ok_or_else(|| {
                    CashplotError::config(format!(
                        "match rule {} ('{label}') has unknown field '{key}'",
                        i + 1
                    ))
                })?;
                predicate = predicate.with(field, pattern)?;
            }
            rules.push(MatchRule::new(label, predicate));
        }

        let mut balances = BTreeMap::new();
        for (name, amount) in &raw.starting_balances {
            balances.insert(name.clone(), amount.to_decimal(name)?);
        }

        Self::new(raw.savings_accounts, raw.net_ignore_accounts, balances, rules)
    }

    pub fn savings_accounts(&self) -> &[String] {
        &self.savings_accounts
    }

    pub fn is_savings_account(&self, name: &str) -> bool {
        self.savings_accounts.iter().any(|s| s == name)
    }

    pub fn net_ignore_accounts(&self) -> &BTreeSet<String> {
        &self.net_ignore_accounts
    }

    pub fn is_net_ignored(&self, name: &str) -> bool {
        self.net_ignore_accounts.contains(name)
    }

    /// Starting balance of every real account (main + savings).
    pub fn starting_balances(&self) -> &AccountAmounts {
        &self.starting_balances
    }

    pub fn match_rules(&self) -> &[MatchRule] {
        &self.match_rules
    }

    /// Main account first, then savings accounts in declaration order.
    pub fn account_names(&self) -> Vec<&str> {
        std::iter::once(MAIN_ACCOUNT)
            .chain(self.savings_accounts.iter().map(String::as_str))
            .collect()
    }
}

impl TryFrom<RawConfig> for Config {
    type Error = CashplotError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        Self::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CONFIG_JSON: &str = r#"{
        "savings_accounts": ["Emergency", "Loan"],
        "net_ignore_accounts": ["Loan"],
        "starting_balances": {"main": 150, "Emergency": "20.50"},
        "match_rules": [
            ["Salary", {"counter_name": "Company Inc.", "counter_account": "NL01WORK0987654321"}],
            ["Emergency", {"description": "ABC123456"}]
        ]
    }"#;

    fn raw(json: &str) -> RawConfig {
        serde_json::from_str(json).unwrap()
    }

    fn err(json: &str) -> String {
        match Config::from_raw(raw(json)).unwrap_err() {
            CashplotError::ConfigValidation(msg) => msg,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_config() {
        let config = Config::from_raw(raw(CONFIG_JSON)).unwrap();
        assert_eq!(config.savings_accounts(), ["Emergency", "Loan"]);
        assert!(config.is_net_ignored("Loan"));
        assert_eq!(config.account_names(), vec!["main", "Emergency", "Loan"]);

        let first = &config.match_rules()[0];
        assert_eq!(first.category, "Salary");
        assert_eq!(first.predicate.pattern(MatchField::CounterName), Some("Company Inc."));
        assert_eq!(first.predicate.pattern(MatchField::Description), None);
    }

    #[test]
    fn test_starting_balances_default_to_zero() {
        let config = Config::from_raw(raw(CONFIG_JSON)).unwrap();
        let balances = config.starting_balances();
        assert_eq!(balances["main"], dec!(150));
        assert_eq!(balances["Emergency"], dec!(20.50));
        assert_eq!(balances["Loan"], Decimal::ZERO);
        assert_eq!(balances.len(), 3);
    }

    #[test]
    fn test_fallback_rule_appended() {
        let config = Config::from_raw(raw(CONFIG_JSON)).unwrap();
        let last = config.match_rules().last().unwrap();
        assert_eq!(last.category, UNCATEGORIZED);
        assert!(last.predicate.is_catch_all());
        assert_eq!(config.match_rules().len(), 3);
    }

    #[test]
    fn test_existing_catch_all_kept() {
        let config = Config::from_raw(raw(r#"{"match_rules": [["Other", {}]]}"#)).unwrap();
        assert_eq!(config.match_rules().len(), 1);
        assert_eq!(config.match_rules()[0].category, "Other");
    }

    #[test]
    fn test_unknown_match_field_rejected() {
        let msg = err(r#"{"match_rules": [["X", {"amount": "12"}]]}"#);
        assert!(msg.contains("unknown field 'amount'"), "{msg}");
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let msg = err(r#"{"match_rules": [["X", {"description": "("}]]}"#);
        assert!(msg.contains("invalid description pattern"), "{msg}");
    }

    #[test]
    fn test_unconfigured_starting_balance_rejected() {
        let msg = err(r#"{"starting_balances": {"Holiday": 5}}"#);
        assert!(msg.contains("unknown account 'Holiday'"), "{msg}");
    }

    #[test]
    fn test_non_numeric_balance_rejected() {
        let msg = err(r#"{"starting_balances": {"main": "lots"}}"#);
        assert!(msg.contains("not numeric"), "{msg}");
    }

    #[test]
    fn test_float_balance_within_precision_is_exact() {
        let config = Config::from_raw(raw(r#"{"starting_balances": {"main": 123456789.012345}}"#))
            .unwrap();
        assert_eq!(config.starting_balances()["main"], dec!(123456789.012345));
        let config = Config::from_raw(raw(r#"{"starting_balances": {"main": 0.1}}"#)).unwrap();
        assert_eq!(config.starting_balances()["main"], dec!(0.1));
    }

    #[test]
    fn test_float_balance_beyond_precision_rejected() {
        let msg = err(r#"{"starting_balances": {"main": 1234567890.123456789}}"#);
        assert!(msg.contains("write it as a string"), "{msg}");

        // too large for i64, so it arrives as a float
        let msg = err(r#"{"starting_balances": {"main": 12345678901234567890123}}"#);
        assert!(msg.contains("write it as a string"), "{msg}");
    }

    #[test]
    fn test_string_balance_keeps_every_digit() {
        let config =
            Config::from_raw(raw(r#"{"starting_balances": {"main": "1234567890.123456789"}}"#))
                .unwrap();
        assert_eq!(config.starting_balances()["main"], dec!(1234567890.123456789));
    }

    #[test]
    fn test_account_name_validation() {
        assert!(err(r#"{"savings_accounts": [""]}"#).contains("must not be empty"));
        assert!(err(r#"{"savings_accounts": ["net"]}"#).contains("reserved"));
        assert!(err(r#"{"savings_accounts": ["A", "A"]}"#).contains("declared twice"));
        assert!(err(r#"{"net_ignore_accounts": ["Loan"]}"#).contains("unknown account 'Loan'"));
    }

    #[test]
    fn test_predicate_is_search_not_full_match() {
        let predicate = MatchPredicate::any()
            .with(MatchField::Description, "Savings Account")
            .unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2020, 6, 29).unwrap();
        let txn = NormalizedTransaction::new(
            date,
            "Mr. G",
            "NL00MAIN1234567890",
            "To Orange Savings Account ABC123456",
            dec!(-100),
        );
        assert!(predicate.matches(&txn));
        assert!(MatchPredicate::any().matches(&txn));
    }
}
