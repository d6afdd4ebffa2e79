//! Fetch state for views
//!
//! A [`Query`] remembers which dependency (usually a project id) it last
//! fetched for and only fetches again when that dependency changes or
//! [`Query::refetch`] is called. Failures are kept as display strings and are
//! never retried.

use std::fmt;

/// Data, loading flag and error message exposed to a view
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Handle for one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct Query<K, T> {
    key: Option<K>,
    state: FetchState<T>,
    issued: u64,
}

impl<K, T> Default for Query<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            state: FetchState::default(),
            issued: 0,
        }
    }
}

impl<K: PartialEq + Clone + fmt::Debug, T> Query<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Dependency of the most recent request
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// True when `key` differs from the last dependency fetched for
    pub fn needs_fetch(&self, key: &K) -> bool {
        self.key.as_ref() != Some(key)
    }

    /// Marks a request for `key` as in flight
    pub fn begin(&mut self, key: K) -> Ticket {
        self.key = Some(key);
        self.issued += 1;
        self.state.loading = true;
        self.state.error = None;
        Ticket(self.issued)
    }

    /// Whether `ticket` belongs to the most recently issued request
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Stores the outcome of a request
    ///
    /// Outcomes are applied in completion order: a slow earlier request that
    /// finishes after a later one overwrites it. On error the previous data
    /// is kept.
    pub fn complete<E: fmt::Display>(&mut self, ticket: Ticket, result: Result<T, E>) {
        if !self.is_latest(ticket) {
            log::debug!(
                "Request {} for {:?} completed after request {}",
                ticket.0,
                self.key,
                self.issued
            );
        }

        self.state.loading = false;
        match result {
            Ok(data) => {
                self.state.data = Some(data);
                self.state.error = None;
            }
            Err(e) => {
                log::warn!("Fetch for {:?} failed: {}", self.key, e);
                self.state.error = Some(e.to_string());
            }
        }
    }

    /// Fetches for `key` unless that is already the current dependency
    pub fn load<E, F>(&mut self, key: K, fetch: F) -> &FetchState<T>
    where
        E: fmt::Display,
        F: FnOnce(&K) -> Result<T, E>,
    {
        if self.needs_fetch(&key) {
            let ticket = self.begin(key.clone());
            let result = fetch(&key);
            self.complete(ticket, result);
        }
        &self.state
    }

    /// Fetches again for the current dependency; no-op before the first load
    pub fn refetch<E, F>(&mut self, fetch: F) -> &FetchState<T>
    where
        E: fmt::Display,
        F: FnOnce(&K) -> Result<T, E>,
    {
        if let Some(key) = self.key.clone() {
            let ticket = self.begin(key.clone());
            let result = fetch(&key);
            self.complete(ticket, result);
        }
        &self.state
    }

    /// Back to the initial, never-fetched state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
