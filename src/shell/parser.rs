//! Shell command parser using Pest
//!
//! Turns one input line into a [`RawCommand`]: the command name plus literal
//! arguments. Literals are data only; nothing is evaluated.

use super::{ShellError, ShellResult};
use crate::graph::{PropertyMap, PropertyValue};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "shell/command.pest"]
struct CommandParser;

/// A parsed but not yet schema-checked command
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    pub name: String,
    pub positional: Vec<PropertyValue>,
    pub keyword: Vec<(String, PropertyValue)>,
}

/// Parse one command line
pub fn parse_raw(input: &str) -> ShellResult<RawCommand> {
    let mut pairs = CommandParser::parse(Rule::command, input)?;
    let command = pairs
        .next()
        .ok_or_else(|| ShellError::InvalidLiteral("empty command".to_string()))?;

    let mut raw = RawCommand {
        name: String::new(),
        positional: Vec::new(),
        keyword: Vec::new(),
    };

    for inner in command.into_inner() {
        match inner.as_rule() {
            Rule::name => raw.name = inner.as_str().to_string(),
            Rule::value => raw.positional.push(parse_value(inner)?),
            Rule::keyword_arg => {
                let mut parts = inner.into_inner();
                let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                    continue;
                };
                raw.keyword.push((key.as_str().to_string(), parse_value(value)?));
            }
            _ => {}
        }
    }

    Ok(raw)
}

fn parse_value(pair: Pair<Rule>) -> ShellResult<PropertyValue> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::null => return Ok(PropertyValue::Null),
            Rule::boolean => {
                let val = inner.as_str().eq_ignore_ascii_case("true");
                return Ok(PropertyValue::Boolean(val));
            }
            Rule::integer => {
                let val = inner
                    .as_str()
                    .parse()
                    .map_err(|_| ShellError::InvalidLiteral(inner.as_str().to_string()))?;
                return Ok(PropertyValue::Integer(val));
            }
            Rule::float => {
                let val = inner
                    .as_str()
                    .parse()
                    .map_err(|_| ShellError::InvalidLiteral(inner.as_str().to_string()))?;
                return Ok(PropertyValue::Float(val));
            }
            Rule::string => return Ok(PropertyValue::String(parse_string(inner))),
            Rule::word => return Ok(PropertyValue::String(inner.as_str().to_string())),
            Rule::list => {
                let items = inner
                    .into_inner()
                    .filter(|item| item.as_rule() == Rule::value)
                    .map(parse_value)
                    .collect::<ShellResult<Vec<_>>>()?;
                return Ok(PropertyValue::Array(items));
            }
            Rule::map => {
                let mut map = PropertyMap::new();
                for entry in inner.into_inner() {
                    if entry.as_rule() != Rule::map_entry {
                        continue;
                    }
                    let mut key = String::new();
                    let mut val = PropertyValue::Null;
                    for part in entry.into_inner() {
                        match part.as_rule() {
                            Rule::word => key = part.as_str().to_string(),
                            Rule::string => key = parse_string(part),
                            Rule::value => val = parse_value(part)?,
                            _ => {}
                        }
                    }
                    map.insert(key, val);
                }
                return Ok(PropertyValue::Map(map));
            }
            _ => {}
        }
    }

    Ok(PropertyValue::Null)
}

/// Body of a quoted string with escapes resolved
fn parse_string(pair: Pair<Rule>) -> String {
    let body = pair
        .into_inner()
        .next()
        .map(|inner| inner.as_str())
        .unwrap_or_default();
    unescape(body)
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
