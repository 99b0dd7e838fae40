//! Navigation driver: resolves a path, runs the guard, and applies the
//! decision unless a newer navigation has started in the meantime.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::guard::{Gate, NavigationDecision};
use super::table::{RouteTable, normalize_path};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    Committed(String),
    Redirected { from: String, to: String },
    Blocked { stayed_on: String },
    /// No route matches; the router renders its fallback.
    NotFound(String),
    /// A newer navigation started before this one was decided.
    Superseded,
}

impl NavigationOutcome {
    /// The path the browser should show, if it should change.
    pub fn destination(&self) -> Option<&str> {
        match self {
            Self::Committed(path) | Self::NotFound(path) => Some(path.as_str()),
            Self::Redirected { to, .. } => Some(to.as_str()),
            Self::Blocked { .. } | Self::Superseded => None,
        }
    }
}

#[derive(Clone)]
pub struct Navigator {
    gate: Rc<dyn Gate>,
    table: Rc<RouteTable>,
    current: Rc<RefCell<String>>,
    ticket: Rc<Cell<u64>>,
    approved: Rc<RefCell<Option<String>>>,
}

impl Navigator {
    pub fn new(gate: Rc<dyn Gate>, table: Rc<RouteTable>, initial_path: &str) -> Self {
        Self {
            gate,
            table,
            current: Rc::new(RefCell::new(normalize_path(initial_path).to_owned())),
            ticket: Rc::new(Cell::new(0)),
            approved: Rc::new(RefCell::new(None)),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn gate(&self) -> Rc<dyn Gate> {
        Rc::clone(&self.gate)
    }

    pub fn current_path(&self) -> String {
        self.current.borrow().clone()
    }

    /// Record a location change that happened outside [`Navigator::navigate`]
    /// (history traversal, a resolved direct load).
    pub fn sync_location(&self, path: &str) {
        self.current.replace(normalize_path(path).to_owned());
    }

    /// Consume the approval left by the [`Navigator::navigate`] call that
    /// just committed `path`, so the rendered route does not check twice.
    pub fn take_approval(&self, path: &str) -> bool {
        let path = normalize_path(path);
        let mut approved = self.approved.borrow_mut();
        if approved.as_deref() == Some(path) {
            *approved = None;
            return true;
        }
        false
    }

    /// Attempt to navigate to `path`.
    ///
    /// Redirect targets are committed without another guard pass; the route
    /// table guarantees they are public.
    pub async fn navigate(&self, path: &str) -> NavigationOutcome {
        let ticket = self.ticket.get() + 1;
        self.ticket.set(ticket);
        self.approved.replace(None);

        let Some(route) = self.table.lookup(path).cloned() else {
            let path = normalize_path(path).to_owned();
            self.current.replace(path.clone());
            return NavigationOutcome::NotFound(path);
        };

        let decision = self.gate.check(&route).await;
        if self.ticket.get() != ticket {
            log::debug!("{}: decision arrived after a newer navigation, discarding", route.path);
            return NavigationOutcome::Superseded;
        }

        match decision {
            NavigationDecision::Proceed => {
                self.current.replace(route.path.clone());
                self.approved.replace(Some(route.path.clone()));
                NavigationOutcome::Committed(route.path)
            }
            NavigationDecision::Redirect(to) => {
                self.current.replace(to.clone());
                NavigationOutcome::Redirected { from: route.path, to }
            }
            NavigationDecision::Block => NavigationOutcome::Blocked { stayed_on: self.current_path() },
        }
    }
}
