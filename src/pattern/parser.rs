use crate::domain::Metadata;
use crate::error::{GitVersionError, Result};

/// How the text before a placeholder value is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    None,
    /// `${pre:NAME}`, always emitted
    Prefix(String),
    /// `${pre~NAME}`, emitted only before a non-empty value
    OptionalPrefix(String),
    /// `${<NAME}`, separator chosen from the evaluation state
    AutoSeparator,
}

/// Where a placeholder value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Version,
    Major,
    Minor,
    Patch,
    NextMajor,
    NextMinor,
    NextPatch,
    Meta(Metadata),
    Env(String),
    Sys(String),
}

impl Source {
    /// True for the placeholders after which the numeric triple is complete
    pub fn closes_triple(&self) -> bool {
        matches!(self, Source::Version | Source::Patch | Source::NextPatch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub modifier: Modifier,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed template, keeping its source text for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Parse a template into literal and placeholder segments
pub fn parse(template: &str) -> Result<Template> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        literal.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find('}').ok_or_else(|| {
            GitVersionError::pattern(
                template,
                format!("unterminated placeholder at offset {}", template.len() - rest.len() + start),
            )
        })?;

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(parse_placeholder(template, &after[..end])?));
        rest = &after[end + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(Template {
        source: template.to_string(),
        segments,
    })
}

fn parse_placeholder(template: &str, body: &str) -> Result<Placeholder> {
    let (modifier, name) = if let Some(name) = body.strip_prefix('<') {
        (Modifier::AutoSeparator, name)
    } else if let Some(index) = body.find([':', '~']) {
        let prefix = body[..index].to_string();
        let modifier = if body[index..].starts_with(':') {
            Modifier::Prefix(prefix)
        } else {
            Modifier::OptionalPrefix(prefix)
        };
        (modifier, &body[index + 1..])
    } else {
        (Modifier::None, body)
    };

    Ok(Placeholder {
        modifier,
        source: parse_source(template, name)?,
    })
}

fn parse_source(template: &str, name: &str) -> Result<Source> {
    let source = match name {
        "v" => Source::Version,
        "M" => Source::Major,
        "m" => Source::Minor,
        "p" => Source::Patch,
        "M+" => Source::NextMajor,
        "m+" => Source::NextMinor,
        "p+" => Source::NextPatch,
        _ => {
            let (namespace, key) = name.split_once('.').ok_or_else(|| {
                GitVersionError::pattern(template, format!("unknown placeholder '{}'", name))
            })?;
            if key.is_empty() {
                return Err(GitVersionError::pattern(
                    template,
                    format!("placeholder '{}' has no name", name),
                ));
            }

            match namespace {
                "meta" => Source::Meta(key.parse().map_err(|_| {
                    GitVersionError::pattern(template, format!("unknown metadata '{}'", key))
                })?),
                "env" => Source::Env(key.to_string()),
                "sys" => Source::Sys(key.to_string()),
                _ => {
                    return Err(GitVersionError::pattern(
                        template,
                        format!("unknown placeholder '{}'", name),
                    ))
                }
            }
        }
    };

    Ok(source)
}
