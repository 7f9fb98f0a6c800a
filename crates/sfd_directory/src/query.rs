//! Filtering and ordering of a fetched listing for display.

use std::cmp::Reverse;

use crate::server::{Server, ServerKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    GameName,
    GameMode,
    /// Current player count, busiest first.
    Players,
    /// Open servers first.
    Password,
    Version,
}

#[derive(Debug, Clone, Default)]
pub struct ServerQuery {
    pub search: Option<String>,
    pub sort: Option<SortKey>,
}

impl ServerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_sort(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    pub fn matches(&self, server: &Server) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => server
                .game_name()
                .to_lowercase()
                .contains(&term.to_lowercase()),
        }
    }

    /// Servers matching the search term, ordered by the sort key. Ties keep listing order.
    pub fn apply(&self, servers: &[Server]) -> Vec<Server> {
        let mut result: Vec<Server> = servers
            .iter()
            .filter(|server| self.matches(server))
            .cloned()
            .collect();

        match self.sort {
            Some(SortKey::GameName) => result.sort_by(|a, b| a.game_name().cmp(b.game_name())),
            Some(SortKey::GameMode) => result.sort_by_key(|s| s.game_mode_name()),
            Some(SortKey::Players) => result.sort_by_key(|s| Reverse(s.players())),
            Some(SortKey::Password) => result.sort_by_key(|s| s.has_password()),
            Some(SortKey::Version) => result.sort_by(|a, b| a.version().cmp(b.version())),
            None => {}
        }

        result
    }
}

/// Looks a server up by its stable identity rather than its display name.
pub fn find<'a>(servers: &'a [Server], key: &ServerKey) -> Option<&'a Server> {
    servers
        .iter()
        .find(|s| s.address_ipv4() == key.address && s.port() == key.port)
}
