use super::parser::{Modifier, Segment, Source, Template};
use crate::domain::{MetadataRegistry, Version};
use crate::error::{GitVersionError, Result};
use std::collections::HashMap;

/// Values a template is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct PatternContext<'a> {
    /// Version behind `${v}` and the number placeholders
    pub version: &'a Version,
    pub metadata: &'a MetadataRegistry,
    pub system_properties: &'a HashMap<String, String>,
}

/// Separator bookkeeping of one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SeparatorState {
    triple_closed: bool,
    first_qualifier_emitted: bool,
}

impl SeparatorState {
    fn auto_separator(self) -> (&'static str, SeparatorState) {
        if !self.triple_closed {
            (".", self)
        } else if !self.first_qualifier_emitted {
            (
                "-",
                SeparatorState {
                    first_qualifier_emitted: true,
                    ..self
                },
            )
        } else {
            (".", self)
        }
    }

    fn after(self, source: &Source, version: &Version) -> SeparatorState {
        match source {
            Source::Version => SeparatorState {
                triple_closed: true,
                first_qualifier_emitted: self.first_qualifier_emitted || version.is_qualified(),
            },
            s if s.closes_triple() => SeparatorState {
                triple_closed: true,
                ..self
            },
            _ => self,
        }
    }
}

fn resolve(source: &Source, context: &PatternContext<'_>) -> String {
    let version = context.version;
    match source {
        Source::Version => version.to_string(),
        Source::Major => version.major().to_string(),
        Source::Minor => version.minor().to_string(),
        Source::Patch => version.patch().to_string(),
        Source::NextMajor => (u64::from(version.major()) + 1).to_string(),
        Source::NextMinor => (u64::from(version.minor()) + 1).to_string(),
        Source::NextPatch => (u64::from(version.patch()) + 1).to_string(),
        Source::Meta(key) => context.metadata.get(*key).unwrap_or_default().to_string(),
        Source::Env(name) => std::env::var(name).unwrap_or_default(),
        Source::Sys(name) => context
            .system_properties
            .get(name)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Expand `template` to a string
pub fn expand(template: &Template, context: &PatternContext<'_>) -> String {
    let (expanded, _) = template.segments().iter().fold(
        (String::new(), SeparatorState::default()),
        |(mut out, state), segment| match segment {
            Segment::Literal(text) => {
                out.push_str(text);
                (out, state)
            }
            Segment::Placeholder(placeholder) => {
                let value = resolve(&placeholder.source, context);
                let state = match &placeholder.modifier {
                    Modifier::None => state,
                    Modifier::Prefix(prefix) => {
                        out.push_str(prefix);
                        state
                    }
                    Modifier::OptionalPrefix(prefix) => {
                        if !value.is_empty() {
                            out.push_str(prefix);
                        }
                        state
                    }
                    Modifier::AutoSeparator if value.is_empty() => state,
                    Modifier::AutoSeparator => {
                        let (separator, next) = state.auto_separator();
                        out.push_str(separator);
                        next
                    }
                };

                if value.is_empty() {
                    return (out, state);
                }
                out.push_str(&value);
                (out, state.after(&placeholder.source, context.version))
            }
        },
    );

    expanded
}

/// Expand `template` and parse the result as a version
pub fn evaluate(template: &Template, context: &PatternContext<'_>) -> Result<Version> {
    let expanded = expand(template, context);
    tracing::trace!(template = template.source(), %expanded, "pattern expanded");

    Version::parse(&expanded).map_err(|e| {
        GitVersionError::pattern(
            template.source(),
            format!("expansion '{}' is not a valid version ({})", expanded, e),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metadata;
    use crate::pattern::{parse, render};
    use serial_test::serial;

    struct Fixture {
        version: Version,
        metadata: MetadataRegistry,
        system_properties: HashMap<String, String>,
    }

    impl Fixture {
        fn new(version: &str) -> Self {
            Fixture {
                version: Version::parse(version).unwrap(),
                metadata: MetadataRegistry::new(),
                system_properties: HashMap::new(),
            }
        }

        fn context(&self) -> PatternContext<'_> {
            PatternContext {
                version: &self.version,
                metadata: &self.metadata,
                system_properties: &self.system_properties,
            }
        }

        fn render(&self, template: &str) -> String {
            render(template, &self.context()).unwrap().to_string()
        }
    }

    #[test]
    fn test_numbers() {
        let fixture = Fixture::new("1.2.3");
        assert_eq!(fixture.render("${M}.${m}.${p}"), "1.2.3");
        assert_eq!(fixture.render("${M+}.0.0"), "2.0.0");
        assert_eq!(fixture.render("${M}.${m+}.0"), "1.3.0");
        assert_eq!(fixture.render("${M}.${m}.${p+}"), "1.2.4");
    }

    #[test]
    fn test_auto_separator_inside_and_after_triple() {
        let mut fixture = Fixture::new("1.2.3");
        fixture.metadata.register(Metadata::CommitDistance, "4");
        fixture.metadata.register(Metadata::GitSha1Short, "abcdef12");

        assert_eq!(fixture.render("${M}${<m}${<p}"), "1.2.3");
        assert_eq!(
            fixture.render("${v}${<meta.COMMIT_DISTANCE}${<meta.GIT_SHA1_8}"),
            "1.2.3-4.abcdef12"
        );
    }

    #[test]
    fn test_empty_value_skips_separator() {
        let mut fixture = Fixture::new("1.0.0");
        fixture.metadata.register(Metadata::GitSha1Short, "0badcafe");

        assert_eq!(
            fixture.render("${v}${<meta.BRANCH_NAME}${<meta.GIT_SHA1_8}"),
            "1.0.0-0badcafe"
        );
    }

    #[test]
    fn test_qualified_version_counts_as_first_qualifier() {
        let mut fixture = Fixture::new("1.0.0-rc1");
        fixture.metadata.register(Metadata::CommitDistance, "2");
        assert_eq!(fixture.render("${v}${<meta.COMMIT_DISTANCE}"), "1.0.0-rc1.2");
    }

    #[test]
    fn test_prefixes() {
        let mut fixture = Fixture::new("1.0.0");
        fixture
            .system_properties
            .insert("arch".to_string(), "x86".to_string());

        assert_eq!(fixture.render("${v}${-~sys.arch}"), "1.0.0-x86");
        assert_eq!(fixture.render("${v}${-~sys.missing}"), "1.0.0");
        assert_eq!(fixture.render("${v}${-build:sys.arch}"), "1.0.0-buildx86");
        assert_eq!(
            expand(&parse("${v}${-rc:sys.missing}").unwrap(), &fixture.context()),
            "1.0.0-rc"
        );
    }

    #[test]
    #[serial]
    fn test_env_placeholder() {
        std::env::set_var("GIT_SEMVER_TEST_BUILD", "77");
        let fixture = Fixture::new("1.0.0");
        assert_eq!(
            fixture.render("${v}${<env.GIT_SEMVER_TEST_BUILD}"),
            "1.0.0-77"
        );
        std::env::remove_var("GIT_SEMVER_TEST_BUILD");
        assert_eq!(fixture.render("${v}${<env.GIT_SEMVER_TEST_BUILD}"), "1.0.0");
    }

    #[test]
    fn test_state_is_fresh_per_evaluation() {
        let mut fixture = Fixture::new("1.0.0");
        fixture.metadata.register(Metadata::CommitDistance, "3");
        let template = parse("${v}${<meta.COMMIT_DISTANCE}").unwrap();

        let first = evaluate(&template, &fixture.context()).unwrap();
        let second = evaluate(&template, &fixture.context()).unwrap();
        assert_eq!(first.to_string(), "1.0.0-3");
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_expansion() {
        let fixture = Fixture::new("1.0.0");
        let err = render("release-${v}", &fixture.context()).unwrap_err();
        match err {
            GitVersionError::Pattern { pattern, reason } => {
                assert_eq!(pattern, "release-${v}");
                assert!(reason.contains("release-1.0.0"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
