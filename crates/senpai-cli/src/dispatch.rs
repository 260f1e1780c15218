//! Turn an input line into a constructed handler.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use thiserror::Error;

use crate::context::AppContext;
use crate::error::CommandError;
use crate::registry::{self, Handler, Inputs};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub keyword: &'a str,
    pub parameter: Option<&'a str>,
}

impl<'a> Invocation<'a> {
    /// Split on the first whitespace; `None` for a blank line.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };
        Some(Self {
            keyword,
            parameter: (!rest.is_empty()).then_some(rest),
        })
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Command {keyword} not recognized.")]
    Unknown {
        keyword: String,
        suggestion: Option<String>,
    },

    #[error("Handler {0} is not loaded.")]
    NotLoaded(String),

    #[error("{0} command requires a parameter.")]
    MissingParameter(String),

    #[error("{0} command requires a username.")]
    MissingIdentity(String),

    #[error(transparent)]
    Build(#[from] CommandError),
}

pub struct Dispatcher<'a> {
    ctx: &'a AppContext,
}

impl<'a> Dispatcher<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    /// Validate the line against its binding and build the handler.
    /// A blank line yields `Ok(None)`.
    pub fn resolve(&self, line: &str) -> Result<Option<Box<dyn Handler>>, DispatchError> {
        let Some(invocation) = Invocation::parse(line) else {
            return Ok(None);
        };
        let keyword = invocation.keyword;

        let Some(binding) = self.ctx.config.commands.get(keyword) else {
            return Err(DispatchError::Unknown {
                keyword: keyword.to_string(),
                suggestion: self.suggest(keyword),
            });
        };

        let spec = registry::find_handler(&binding.handler)
            .filter(|_| self.ctx.config.is_enabled(&binding.handler))
            .ok_or_else(|| DispatchError::NotLoaded(binding.handler.clone()))?;
        let needs = spec.requirements;

        if needs.parameter && invocation.parameter.is_none() {
            return Err(DispatchError::MissingParameter(keyword.to_string()));
        }

        let mut inputs = Inputs {
            keyword: keyword.to_string(),
            ..Inputs::default()
        };

        if needs.identity {
            let identity = match invocation.parameter {
                Some(name) => Some(name.to_string()),
                None => self.ctx.profile.identity().map_err(CommandError::from)?,
            };
            inputs.identity =
                Some(identity.ok_or_else(|| DispatchError::MissingIdentity(keyword.to_string()))?);
        }
        if needs.parameter {
            inputs.parameter = invocation.parameter.map(String::from);
        }
        if needs.api {
            inputs.api = Some(self.ctx.anilist()?);
        }

        tracing::debug!(keyword, handler = spec.id, "dispatching");
        Ok(Some((spec.build)(inputs)?))
    }

    /// Closest configured keyword, if any is close at all.
    fn suggest(&self, keyword: &str) -> Option<String> {
        let pattern = keyword.trim_start_matches('-');
        if pattern.is_empty() {
            return None;
        }
        let matcher = SkimMatcherV2::default();
        self.ctx
            .config
            .commands
            .keys()
            .filter_map(|known| {
                matcher
                    .fuzzy_match(known, pattern)
                    .map(|score| (score, known))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, known)| known.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::temp_context;

    fn resolve_err(ctx: &AppContext, line: &str) -> DispatchError {
        match Dispatcher::new(ctx).resolve(line) {
            Err(e) => e,
            Ok(_) => panic!("expected {line:?} to fail"),
        }
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(Invocation::parse("   "), None);
        assert_eq!(
            Invocation::parse("-search  Sousou no Frieren "),
            Some(Invocation {
                keyword: "-search",
                parameter: Some("Sousou no Frieren"),
            })
        );
        assert_eq!(
            Invocation::parse("-ulist"),
            Some(Invocation {
                keyword: "-ulist",
                parameter: None,
            })
        );
    }

    #[test]
    fn test_unknown_keyword_with_suggestion() {
        let (_dir, ctx) = temp_context();
        let err = resolve_err(&ctx, "-serch frieren");
        assert_eq!(err.to_string(), "Command -serch not recognized.");
        match err {
            DispatchError::Unknown { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("-search"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bare_dashes_get_no_suggestion() {
        let (_dir, ctx) = temp_context();
        for line in ["-", "--"] {
            match resolve_err(&ctx, line) {
                DispatchError::Unknown { suggestion, .. } => assert_eq!(suggestion, None),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_parameter() {
        let (_dir, ctx) = temp_context();
        let err = resolve_err(&ctx, "-time");
        assert_eq!(err.to_string(), "-time command requires a parameter.");
    }

    #[test]
    fn test_missing_identity() {
        let (_dir, ctx) = temp_context();
        let err = resolve_err(&ctx, "-stats");
        assert_eq!(err.to_string(), "-stats command requires a username.");
    }

    #[test]
    fn test_identity_from_parameter_or_file() {
        let (_dir, ctx) = temp_context();
        let dispatcher = Dispatcher::new(&ctx);
        assert!(dispatcher.resolve("-stats someone").unwrap().is_some());

        ctx.profile.save_identity("me").unwrap();
        assert!(dispatcher.resolve("-stats").unwrap().is_some());
        assert!(dispatcher.resolve("-ulist").unwrap().is_some());
    }

    #[test]
    fn test_disabled_handler_is_not_loaded() {
        let (_dir, mut ctx) = temp_context();
        ctx.config.features.enabled.retain(|h| h != "kirby");
        let err = resolve_err(&ctx, "-kirby");
        assert_eq!(err.to_string(), "Handler kirby is not loaded.");
    }

    #[test]
    fn test_binding_to_unknown_handler_is_not_loaded() {
        let (_dir, mut ctx) = temp_context();
        ctx.config.commands.insert(
            "-ghost".into(),
            senpai_core::config::CommandBinding {
                handler: "ghost".into(),
                description: String::new(),
            },
        );
        ctx.config.features.enabled.push("ghost".into());
        let err = resolve_err(&ctx, "-ghost");
        assert_eq!(err.to_string(), "Handler ghost is not loaded.");
    }

    #[test]
    fn test_blank_line_is_no_op() {
        let (_dir, ctx) = temp_context();
        assert!(Dispatcher::new(&ctx).resolve("  ").unwrap().is_none());
    }

    #[test]
    fn test_parameterless_handler_resolves() {
        let (_dir, ctx) = temp_context();
        assert!(Dispatcher::new(&ctx).resolve("-help").unwrap().is_some());
    }
}
