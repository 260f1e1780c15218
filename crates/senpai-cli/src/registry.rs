//! Static handler table.
//!
//! Keywords are bound to handler ids in the `[commands]` config table; the
//! ids resolve here, at compile time. To add a handler:
//! 1. Create a module in `commands/` with a constructor
//! 2. Add a [`HandlerSpec`] to [`HANDLERS`]
//! 3. Bind a keyword to its id in `config/default.toml`

use futures::future::LocalBoxFuture;
use senpai_api::anilist::AniListClient;

use crate::commands;
use crate::console::Console;
use crate::context::AppContext;
use crate::error::CommandError;

/// Inputs a handler needs before it can be constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
    /// Trailing free text after the keyword.
    pub parameter: bool,
    /// A username: the parameter when given, else the stored identity.
    pub identity: bool,
    /// An AniList client.
    pub api: bool,
}

impl Requirements {
    const NONE: Self = Self {
        parameter: false,
        identity: false,
        api: false,
    };
    const PARAMETER: Self = Self {
        parameter: true,
        identity: false,
        api: false,
    };
    const API: Self = Self {
        parameter: false,
        identity: false,
        api: true,
    };
    const PARAMETER_API: Self = Self {
        parameter: true,
        identity: false,
        api: true,
    };
    const IDENTITY_API: Self = Self {
        parameter: false,
        identity: true,
        api: true,
    };
    const PARAMETER_IDENTITY_API: Self = Self {
        parameter: true,
        identity: true,
        api: true,
    };
}

/// The declared subset of inputs, filled by the dispatcher.
#[derive(Default)]
pub struct Inputs {
    pub keyword: String,
    pub parameter: Option<String>,
    pub identity: Option<String>,
    pub api: Option<AniListClient>,
}

impl Inputs {
    pub fn take_parameter(&mut self) -> Result<String, CommandError> {
        self.parameter
            .take()
            .ok_or_else(|| self.missing("a parameter"))
    }

    pub fn take_identity(&mut self) -> Result<String, CommandError> {
        self.identity.take().ok_or_else(|| self.missing("a username"))
    }

    pub fn take_api(&mut self) -> Result<AniListClient, CommandError> {
        self.api.take().ok_or_else(|| self.missing("an AniList client"))
    }

    fn missing(&self, what: &str) -> CommandError {
        CommandError::Dispatch(format!("{} command requires {what}.", self.keyword))
    }
}

/// A constructed command, ready to run once.
pub trait Handler {
    fn run<'a>(
        &'a self,
        ctx: &'a AppContext,
        console: &'a mut dyn Console,
    ) -> LocalBoxFuture<'a, Result<(), CommandError>>;
}

pub type Constructor = fn(Inputs) -> Result<Box<dyn Handler>, CommandError>;

pub struct HandlerSpec {
    pub id: &'static str,
    pub requirements: Requirements,
    pub build: Constructor,
}

pub static HANDLERS: &[HandlerSpec] = &[
    HandlerSpec {
        id: "add-completed",
        requirements: Requirements::PARAMETER_API,
        build: commands::add::completed,
    },
    HandlerSpec {
        id: "add-watching",
        requirements: Requirements::PARAMETER_API,
        build: commands::add::watching,
    },
    HandlerSpec {
        id: "add-on-hold",
        requirements: Requirements::PARAMETER_API,
        build: commands::add::on_hold,
    },
    HandlerSpec {
        id: "add-dropped",
        requirements: Requirements::PARAMETER_API,
        build: commands::add::dropped,
    },
    HandlerSpec {
        id: "add-planned",
        requirements: Requirements::PARAMETER_API,
        build: commands::add::planned,
    },
    HandlerSpec {
        id: "sync",
        requirements: Requirements::IDENTITY_API,
        build: commands::sync::build,
    },
    HandlerSpec {
        id: "compare",
        requirements: Requirements::PARAMETER_API,
        build: commands::compare::build,
    },
    HandlerSpec {
        id: "search",
        requirements: Requirements::PARAMETER_API,
        build: commands::search::build,
    },
    HandlerSpec {
        id: "time",
        requirements: Requirements::PARAMETER_API,
        build: commands::time::build,
    },
    HandlerSpec {
        id: "stats",
        requirements: Requirements::IDENTITY_API,
        build: commands::stats::build,
    },
    HandlerSpec {
        id: "user-stats",
        requirements: Requirements::PARAMETER_IDENTITY_API,
        build: commands::stats::build,
    },
    HandlerSpec {
        id: "recent",
        requirements: Requirements::API,
        build: commands::recent::build,
    },
    HandlerSpec {
        id: "auth",
        requirements: Requirements::NONE,
        build: commands::auth::build,
    },
    HandlerSpec {
        id: "steam",
        requirements: Requirements::PARAMETER,
        build: commands::steam::build,
    },
    HandlerSpec {
        id: "closer",
        requirements: Requirements::NONE,
        build: commands::closer::build,
    },
    HandlerSpec {
        id: "help",
        requirements: Requirements::NONE,
        build: commands::help::build,
    },
    HandlerSpec {
        id: "kirby",
        requirements: Requirements::NONE,
        build: commands::kirby::build,
    },
];

/// Look up a handler by id.
pub fn find_handler(id: &str) -> Option<&'static HandlerSpec> {
    HANDLERS.iter().find(|spec| spec.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use senpai_core::config::AppConfig;

    use super::*;

    #[test]
    fn test_handler_ids_are_unique() {
        let ids: HashSet<&str> = HANDLERS.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), HANDLERS.len());
    }

    #[test]
    fn test_every_default_binding_resolves() {
        let config = AppConfig::default();
        for (keyword, binding) in &config.commands {
            assert!(
                find_handler(&binding.handler).is_some(),
                "{keyword} is bound to unknown handler {}",
                binding.handler
            );
        }
    }

    #[test]
    fn test_lookup() {
        let spec = find_handler("user-stats").unwrap();
        assert!(spec.requirements.parameter);
        assert!(spec.requirements.identity);
        assert!(find_handler("nope").is_none());
    }

    #[test]
    fn test_missing_input_names_keyword() {
        let mut inputs = Inputs {
            keyword: "-time".into(),
            ..Inputs::default()
        };
        let err = inputs.take_parameter().unwrap_err();
        assert_eq!(err.to_string(), "-time command requires a parameter.");
    }
}
