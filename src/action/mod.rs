//! Action registry and dispatch.
//!
//! Each CLI verb is backed by an [`Action`] registered explicitly at
//! start-up. The registry owns the mapping and builds the clap command
//! tree from it, so the set of verbs and the parser can never drift apart.

use crate::error::{Error, Result};
use async_trait::async_trait;
use clap::ArgMatches;
use std::collections::BTreeMap;

/// One CLI verb: its name, one-line help, argument schema and handler.
#[async_trait]
pub trait Action: Send + Sync {
    /// Verb that selects this action. Must be unique across the registry.
    fn verb(&self) -> &'static str;

    fn help(&self) -> &'static str;

    /// Adds the action's own flags and subcommands to its clap subcommand.
    fn configure(&self, cmd: clap::Command) -> clap::Command;

    async fn run(&self, matches: &ArgMatches) -> Result<()>;
}

/// Verb-to-action mapping. Built once at start-up, read-only afterwards.
#[derive(Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, Box<dyn Action>>,
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: impl IntoIterator<Item = Box<dyn Action>>) -> Result<Self> {
        let mut registry = Self::new();
        for action in actions {
            registry.register(action)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, action: Box<dyn Action>) -> Result<()> {
        let verb = action.verb();
        if self.actions.contains_key(verb) {
            return Err(Error::DuplicateAction(verb.to_string()));
        }
        self.actions.insert(verb, action);
        Ok(())
    }

    pub fn get(&self, verb: &str) -> Option<&dyn Action> {
        self.actions.get(verb).map(|action| action.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Action> {
        self.actions.values().map(|action| action.as_ref())
    }

    /// Builds the full CLI command tree from the registered actions.
    pub fn to_command(&self, root: clap::Command) -> clap::Command {
        let mut root = root.subcommand_required(true).arg_required_else_help(true);
        for action in self.iter() {
            let sub = clap::Command::new(action.verb()).about(action.help());
            root = root.subcommand(action.configure(sub));
        }
        root
    }

    /// Looks up the verb and invokes its handler with the remaining parsed
    /// arguments. Never logs and never exits the process.
    pub async fn dispatch(&self, verb: &str, matches: &ArgMatches) -> Result<()> {
        let action = self
            .get(verb)
            .ok_or_else(|| Error::UnknownAction(verb.to_string()))?;
        action.run(matches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;
    use std::sync::{Arc, Mutex};

    struct Probe {
        verb: &'static str,
        calls: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Action for Probe {
        fn verb(&self) -> &'static str {
            self.verb
        }

        fn help(&self) -> &'static str {
            "probe"
        }

        fn configure(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(Arg::new("tag").long("tag"))
        }

        async fn run(&self, matches: &ArgMatches) -> Result<()> {
            let tag = matches
                .get_one::<String>("tag")
                .cloned()
                .unwrap_or_default();
            self.calls.lock().unwrap().push(format!("{}:{}", self.verb, tag));
            Ok(())
        }
    }

    fn probe(verb: &'static str, calls: &Arc<Mutex<Vec<String>>>) -> Box<dyn Action> {
        Box::new(Probe {
            verb,
            calls: Arc::clone(calls),
        })
    }

    #[tokio::test]
    async fn dispatch_invokes_the_matching_handler() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let registry =
            ActionRegistry::from_actions([probe("alpha", &calls), probe("beta", &calls)]).unwrap();

        let cmd = registry.to_command(clap::Command::new("mth"));
        let matches = cmd.get_matches_from(["mth", "beta", "--tag", "x"]);
        let (verb, sub) = matches.subcommand().unwrap();

        registry.dispatch(verb, sub).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["beta:x".to_string()]);
    }

    #[tokio::test]
    async fn unknown_verb_never_reaches_a_handler() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let registry = ActionRegistry::from_actions([probe("alpha", &calls)]).unwrap();

        let empty = clap::Command::new("empty").get_matches_from(["empty"]);
        let err = registry.dispatch("teleport", &empty).await.unwrap_err();

        assert!(matches!(err, Error::UnknownAction(verb) if verb == "teleport"));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_verb_registration_fails_fast() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let err = ActionRegistry::from_actions([probe("alpha", &calls), probe("alpha", &calls)])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAction(verb) if verb == "alpha"));
    }
}
