use std::io::{self, Write};

use itertools::Itertools;
use opendota_model::RequestError;
use serde_json::Value;

struct HeroLine<'a> {
    id: Option<u64>,
    name: &'a str,
}

/// Writes one line per hero from a `heroes()` result.
///
/// Records may come as an array or as an object keyed by anything; fields are
/// read leniently and missing ones are printed as `?`.
pub fn render_hero_list(
    heroes: &Result<Value, RequestError>,
    out: &mut impl Write,
) -> io::Result<()> {
    let heroes = match heroes {
        Ok(heroes) => heroes,
        Err(e) => return writeln!(out, "No heroes available ({e})"),
    };
    let records: Vec<&Value> = match heroes {
        Value::Array(items) => items.iter().collect(),
        Value::Object(items) => items.values().collect(),
        _ => vec![],
    };
    let lines = records
        .into_iter()
        .map(hero_line)
        .sorted_by_key(|line| (line.id.is_none(), line.id));
    for line in lines {
        match line.id {
            Some(id) => writeln!(out, "{id:>4} {}", line.name)?,
            None => writeln!(out, "{:>4} {}", "?", line.name)?,
        }
    }
    Ok(())
}

fn hero_line(record: &Value) -> HeroLine<'_> {
    let name = ["localized_name", "name"]
        .iter()
        .find_map(|field| record.get(field).and_then(Value::as_str))
        .unwrap_or("?");
    HeroLine {
        id: record.get("id").and_then(Value::as_u64),
        name,
    }
}
