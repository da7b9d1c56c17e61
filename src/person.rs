//! Participants of a shouting network.
//!
//! A [`Person`] owns its own state (position and inbox) and keeps only a weak
//! reference to the network it was created on. The network in turn keeps weak
//! references to its persons, so neither side keeps the other alive.

use log::{trace, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use super::error::ShoutyError;
use super::network::{Network, NetworkState};
use super::types::{PersonId, Position};

/// State shared between a person handle and the network delivering to it.
#[derive(Debug, Default)]
pub(crate) struct PersonState {
    pub(crate) position: Position,
    messages_heard: VecDeque<String>,
}

impl PersonState {
    /// Append a message to the inbox, evicting the oldest ones when a
    /// capacity is set and already reached. A capacity of zero keeps nothing.
    pub(crate) fn hear(&mut self, message: &str, capacity: Option<usize>) {
        if let Some(capacity) = capacity {
            if capacity == 0 {
                self.messages_heard.clear();
                return;
            }
            while self.messages_heard.len() >= capacity && self.messages_heard.pop_front().is_some() {}
        }
        self.messages_heard.push_back(message.to_owned());
    }
}

/// A participant that can move along the axis, shout, and hear others.
#[derive(Debug)]
pub struct Person {
    id: Option<PersonId>,
    state: Rc<RefCell<PersonState>>,
    network: Option<Weak<RefCell<NetworkState>>>,
}

impl Person {
    /// Create a person standing at the origin and register it with `network`.
    ///
    /// The person only keeps a weak reference to the network. The caller
    /// must keep a [`Network`] handle (or a clone of it) alive for as long as
    /// the person should be able to shout; once every handle is dropped,
    /// [`Person::shout`] returns [`ShoutyError::DetachedParticipant`].
    ///
    /// # Arguments
    /// * `network` - Network the person joins; registration happens here
    pub fn new(network: &Network) -> Self {
        let state = Rc::new(RefCell::new(PersonState::default()));
        let id = network.register(&state);
        Self {
            id: Some(id),
            state,
            network: Some(network.downgrade()),
        }
    }

    /// Create a person that belongs to no network. It can move and be
    /// inspected, but every shout fails.
    pub fn detached() -> Self {
        Self {
            id: None,
            state: Rc::new(RefCell::new(PersonState::default())),
            network: None,
        }
    }

    /// Id assigned by the network at registration; `None` when detached.
    pub fn id(&self) -> Option<PersonId> {
        self.id
    }

    /// Current position in metres from the origin.
    pub fn position(&self) -> Position {
        self.state.borrow().position
    }

    /// Move to an absolute position. Moving never makes anyone hear anything.
    pub fn move_to(&self, distance: Position) {
        self.state.borrow_mut().position = distance;
        trace!("Person {:?} moved to {}m", self.id, distance);
    }

    /// The network this person shouts through, if it is still alive.
    pub fn network(&self) -> Option<Network> {
        self.network.as_ref().and_then(Weak::upgrade).map(Network::from_state)
    }

    /// Whether a shout right now would reach a network.
    pub fn is_attached(&self) -> bool {
        self.network().is_some()
    }

    /// Ask the network to deliver `message` to everyone eligible to hear it.
    ///
    /// Returns once every recipient's inbox has been updated.
    ///
    /// # Returns
    /// * `Ok(())` after delivery, even if nobody was in range
    /// * `Err(ShoutyError::DetachedParticipant)` if the person has no live network
    pub fn shout(&self, message: &str) -> Result<(), ShoutyError> {
        let Some(network) = self.network() else {
            warn!("Person {:?} shouted {:?} without a network", self.id, message);
            return Err(ShoutyError::DetachedParticipant);
        };
        network.emit(self, message);
        Ok(())
    }

    /// Messages heard so far, oldest first.
    pub fn messages_heard(&self) -> Vec<String> {
        self.state.borrow().messages_heard.iter().cloned().collect()
    }

    pub(crate) fn state(&self) -> &Rc<RefCell<PersonState>> {
        &self.state
    }
}
