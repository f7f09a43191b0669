use std::{borrow::Cow, sync::OnceLock};

use regex::{Captures, Regex};

/// `{{ env.NAME }}` with an optional `| default("value")` filter
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand environment placeholders in raw TOML text before it is parsed
///
/// Comment lines are left untouched so that a commented-out secret does not
/// require its variable to be set.
pub fn expand_env(input: &str) -> anyhow::Result<String> {
    let lines = input
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(Cow::Borrowed(line))
            } else {
                expand_line(line)
            }
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(lines.join("\n"))
}

fn expand_line(line: &str) -> anyhow::Result<Cow<'_, str>> {
    let mut failure = None;

    let expanded = placeholder().replace_all(line, |caps: &Captures<'_>| {
        resolve(&caps[1], caps.get(2).map(|m| m.as_str())).unwrap_or_else(|e| {
            failure.get_or_insert(e);
            String::new()
        })
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(expanded),
    }
}

fn resolve(key: &str, default: Option<&str>) -> anyhow::Result<String> {
    let Some(name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        anyhow::bail!("only variables scoped with 'env.' are supported: `{key}`");
    };

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => anyhow::bail!("environment variable not found: `{name}`"),
    }
}
