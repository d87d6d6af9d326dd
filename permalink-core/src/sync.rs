//! Binding between query parameters and in-memory application state.
//!
//! Loading decodes each recognized parameter independently: a parameter that
//! fails to decode is logged and skipped, and never stops the other one from
//! loading. Changes go the other way, packing the new value into the URL
//! without adding a history entry.

use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::pack::{DecodeError, Packer};
use crate::query::QueryString;
use crate::store::{UrlStore, UrlStoreError};

/// A piece of application state that can be read and overwritten as text,
/// such as an editor buffer or an input element's value.
pub trait StateSlot {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
}

impl StateSlot for String {
    fn value(&self) -> String {
        self.clone()
    }

    fn set_value(&mut self, value: &str) {
        value.clone_into(self);
    }
}

/// The two pieces of state carried in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Document source text
    Code,
    /// Secondary canvas buffer
    Canvas,
}

impl Param {
    pub const ALL: [Param; 2] = [Param::Code, Param::Canvas];
}

/// What happened to one parameter during a load.
#[derive(Debug)]
pub enum ParamOutcome {
    /// Not in the query; the slot keeps its current value.
    Absent,
    /// Decoded and written to the slot.
    Applied,
    /// Decoded, but equal to what the slot already held.
    Unchanged,
    /// Present but undecodable; the slot keeps its current value.
    Rejected { name: String, error: DecodeError },
}

impl ParamOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ParamOutcome::Rejected { .. })
    }
}

#[derive(Debug)]
pub struct LoadReport {
    pub code: ParamOutcome,
    pub canvas: ParamOutcome,
}

impl LoadReport {
    pub fn outcome(&self, param: Param) -> &ParamOutcome {
        match param {
            Param::Code => &self.code,
            Param::Canvas => &self.canvas,
        }
    }

    /// Names of the parameters that failed to decode.
    pub fn rejected_names(&self) -> Vec<&str> {
        Param::ALL
            .iter()
            .filter_map(|&param| match self.outcome(param) {
                ParamOutcome::Rejected { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Set or remove a single raw query parameter, replacing the current URL.
///
/// `None` removes every occurrence of `key`; `Some(value)` sets it verbatim.
/// Nothing is written when the query is already in the requested state.
pub fn update_query_param<S: UrlStore + ?Sized>(
    store: &mut S,
    key: &str,
    value: Option<&str>,
) -> Result<(), UrlStoreError> {
    rewrite(store, |query| match value {
        None => {
            query.remove(key);
        }
        Some(value) => query.set(key, value),
    })
}

fn rewrite<S, F>(store: &mut S, edit: F) -> Result<(), UrlStoreError>
where
    S: UrlStore + ?Sized,
    F: FnOnce(&mut QueryString),
{
    let current = store.read();
    let mut query = current.clone();
    edit(&mut query);
    if query == current {
        return Ok(());
    }
    store.replace(&query)
}

/// Loads state from the URL and writes changes back to it.
#[derive(Debug, Clone, Default)]
pub struct StateSync {
    config: SyncConfig,
    packer: Packer,
}

impl StateSync {
    pub fn new(config: SyncConfig) -> Self {
        let packer = Packer::new(config.compression_level);
        Self { config, packer }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn packer(&self) -> &Packer {
        &self.packer
    }

    /// Primary query parameter name for `param`.
    pub fn param_name(&self, param: Param) -> &str {
        match param {
            Param::Code => &self.config.code_param,
            Param::Canvas => &self.config.canvas_param,
        }
    }

    fn aliases(&self, param: Param) -> &[String] {
        match param {
            Param::Code => &self.config.code_aliases,
            Param::Canvas => &self.config.canvas_aliases,
        }
    }

    /// First name for `param` present in `query`, primary name before aliases.
    /// An empty value (`?code=`) counts as absent.
    fn lookup<'q>(&self, query: &'q QueryString, param: Param) -> Option<(&'q str, &'q str)> {
        std::iter::once(self.param_name(param))
            .chain(self.aliases(param).iter().map(String::as_str))
            .find_map(|name| {
                query
                    .iter()
                    .find(|(key, _)| *key == name)
                    .filter(|(_, value)| !value.is_empty())
            })
    }

    /// Decode the recognized parameters of `query` into the slots.
    ///
    /// Never fails: undecodable parameters are logged and reported, and the
    /// corresponding slot is left alone.
    pub fn apply(
        &self,
        query: &QueryString,
        code: &mut impl StateSlot,
        canvas: &mut impl StateSlot,
    ) -> LoadReport {
        LoadReport {
            code: self.apply_param(query, Param::Code, code),
            canvas: self.apply_param(query, Param::Canvas, canvas),
        }
    }

    fn apply_param(
        &self,
        query: &QueryString,
        param: Param,
        slot: &mut impl StateSlot,
    ) -> ParamOutcome {
        let Some((name, token)) = self.lookup(query, param) else {
            return ParamOutcome::Absent;
        };

        match self.packer.unpack(token) {
            Ok(value) => {
                if slot.value() == value {
                    debug!("?{name} matches current state, skipping");
                    return ParamOutcome::Unchanged;
                }
                debug!("Applying ?{name} ({} chars)", value.chars().count());
                slot.set_value(&value);
                ParamOutcome::Applied
            }
            Err(error) => {
                warn!("Invalid compressed value in ?{name}: {error}");
                ParamOutcome::Rejected {
                    name: name.to_string(),
                    error,
                }
            }
        }
    }

    /// Read the URL store and apply it to the slots.
    ///
    /// With `clean_invalid_params` set, parameters that failed to decode are
    /// then removed from the URL. A failure to rewrite is logged, not returned.
    pub fn load<S: UrlStore + ?Sized>(
        &self,
        store: &mut S,
        code: &mut impl StateSlot,
        canvas: &mut impl StateSlot,
    ) -> LoadReport {
        let query = store.read();
        let report = self.apply(&query, code, canvas);

        let rejected = report.rejected_names();
        if !rejected.is_empty() {
            info!("Loaded state with {} invalid parameter(s)", rejected.len());
            if self.config.clean_invalid_params {
                let result = rewrite(store, |query| {
                    for name in &rejected {
                        query.remove(name);
                    }
                });
                if let Err(e) = result {
                    warn!("Failed to remove invalid parameters from URL: {e}");
                }
            }
        }

        report
    }

    /// Record a new value for `param` in the URL.
    ///
    /// `None` removes the parameter, otherwise it is set to the packed value.
    /// Legacy aliases of the parameter are dropped so they can't shadow it.
    pub fn on_state_change<S: UrlStore + ?Sized>(
        &self,
        store: &mut S,
        param: Param,
        value: Option<&str>,
    ) -> Result<(), UrlStoreError> {
        let name = self.param_name(param);
        let token = value.map(|value| self.packer.pack(value));

        rewrite(store, |query| {
            match &token {
                Some(token) => query.set(name, token),
                None => {
                    query.remove(name);
                }
            }
            for alias in self.aliases(param) {
                query.remove(alias);
            }
        })
    }
}
