use anyhow::{Context, Result, bail};
use getarg::ArgStore;
use indexmap::IndexMap;
use serde::Serialize;

/// A flag name to look up plus the default used when it is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Query<T> {
    pub name: String,
    pub default: T,
}

fn split_query(raw: &str) -> Result<(&str, Option<&str>)> {
    let (name, default) = match raw.split_once('=') {
        Some((name, default)) => (name, Some(default)),
        None => (raw, None),
    };
    if !name.starts_with('-') || name.len() < 2 {
        bail!("invalid flag name '{name}': expected a leading dash");
    }
    Ok((name, default))
}

pub fn parse_bool(raw: &str) -> Result<Query<bool>> {
    let (name, default) = split_query(raw)?;
    let default = match default {
        None => false,
        Some("1" | "true") => true,
        Some("0" | "false") => false,
        Some(other) => bail!("invalid bool default for {name}: '{other}' (use true/false/1/0)"),
    };
    Ok(Query {
        name: name.to_string(),
        default,
    })
}

pub fn parse_string(raw: &str) -> Result<Query<String>> {
    let (name, default) = split_query(raw)?;
    Ok(Query {
        name: name.to_string(),
        default: default.unwrap_or_default().to_string(),
    })
}

pub fn parse_int(raw: &str) -> Result<Query<i64>> {
    let (name, default) = split_query(raw)?;
    let default = match default {
        None => 0,
        Some(value) => value
            .parse()
            .with_context(|| format!("invalid int default for {name}: '{value}'"))?,
    };
    Ok(Query {
        name: name.to_string(),
        default,
    })
}

/// Accessor results grouped by kind, each in query order.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    #[serde(rename = "bool", skip_serializing_if = "IndexMap::is_empty")]
    pub bools: IndexMap<String, bool>,
    #[serde(rename = "string", skip_serializing_if = "IndexMap::is_empty")]
    pub strings: IndexMap<String, String>,
    #[serde(rename = "int", skip_serializing_if = "IndexMap::is_empty")]
    pub ints: IndexMap<String, i64>,
}

pub fn evaluate(
    store: &ArgStore,
    bools: &[Query<bool>],
    strings: &[Query<String>],
    ints: &[Query<i64>],
) -> Report {
    let mut report = Report::default();
    for q in bools {
        report
            .bools
            .insert(q.name.clone(), store.get_bool(&q.name, q.default));
    }
    for q in strings {
        report
            .strings
            .insert(q.name.clone(), store.get_string(&q.name, &q.default));
    }
    for q in ints {
        report
            .ints
            .insert(q.name.clone(), store.get_int(&q.name, q.default));
    }
    report
}

/// Strictly read each integer flag. Absent flags map to `None`.
pub fn check_ints(store: &ArgStore, names: &[String]) -> Result<IndexMap<String, Option<i64>>> {
    let mut values = IndexMap::new();
    for name in names {
        split_query(name)?;
        let value = store.try_int(name)?;
        values.insert(name.clone(), value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parsing_defaults() {
        assert_eq!(
            parse_bool("-via").unwrap(),
            Query {
                name: "-via".to_string(),
                default: false
            }
        );
        assert!(parse_bool("-via=true").unwrap().default);
        assert!(parse_bool("-via=1").unwrap().default);
        assert!(parse_bool("-via=maybe").is_err());

        assert_eq!(parse_string("-s").unwrap().default, "");
        assert_eq!(parse_string("-s=a=b").unwrap().default, "a=b");

        assert_eq!(parse_int("-n").unwrap().default, 0);
        assert_eq!(parse_int("-n=-3").unwrap().default, -3);
        assert!(parse_int("-n=x").is_err());
    }

    #[test]
    fn query_names_need_a_dash() {
        let err = parse_bool("via").unwrap_err();
        assert!(err.to_string().contains("leading dash"));
        assert!(parse_string("-").is_err());
    }

    #[test]
    fn evaluate_runs_each_accessor() {
        let store = ArgStore::build(["-novia", "-n=11", "-s"]);
        let report = evaluate(
            &store,
            &[parse_bool("-via=true").unwrap()],
            &[parse_string("-s=fallback").unwrap()],
            &[parse_int("-n").unwrap(), parse_int("-m=4").unwrap()],
        );
        assert!(!report.bools["-via"]);
        assert_eq!(report.strings["-s"], "");
        assert_eq!(report.ints["-n"], 11);
        assert_eq!(report.ints["-m"], 4);

        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"bool":{"-via":false},"string":{"-s":""},"int":{"-n":11,"-m":4}}"#
        );
    }

    #[test]
    fn check_ints_rejects_malformed() {
        let store = ArgStore::build(["-n=11", "-bad=NaN"]);
        let ok = check_ints(&store, &["-n".to_string(), "-missing".to_string()]).unwrap();
        assert_eq!(ok["-n"], Some(11));
        assert_eq!(ok["-missing"], None);

        let err = check_ints(&store, &["-bad".to_string()]).unwrap_err();
        assert!(err.to_string().contains("invalid integer for -bad"));
    }
}
