//! The shared medium persons shout through.
//!
//! A [`Network`] keeps a registry of the persons created on it, in
//! registration order. On every emission it:
//! 1. Captures the sender's position as an [`Emission`]
//! 2. Drops registry entries whose person no longer exists
//! 3. Selects the members admitted by the configured [`DeliveryPolicy`],
//!    never including the sender itself
//! 4. Appends the message to each selected member's inbox, in registration
//!    order, before returning
//!
//! [`DeliveryPolicy`]: crate::config::DeliveryPolicy

use anyhow::Context;
use log::{debug, error, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::config::NetworkConfig;
use super::person::{Person, PersonState};
use super::types::{Emission, PersonId};

/// Running totals over the lifetime of a network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkStats {
    /// Number of emissions, including those nobody heard.
    pub shouts: u64,
    /// Number of individual inbox deliveries.
    pub deliveries: u64,
}

#[derive(Debug)]
struct Member {
    id: PersonId,
    state: Weak<RefCell<PersonState>>,
}

impl Member {
    fn is(&self, person: &Rc<RefCell<PersonState>>) -> bool {
        std::ptr::eq(self.state.as_ptr(), Rc::as_ptr(person))
    }
}

#[derive(Debug)]
pub(crate) struct NetworkState {
    config: NetworkConfig,
    members: Vec<Member>,
    next_id: u32,
    stats: NetworkStats,
}

impl NetworkState {
    /// Drop registry entries for persons that no longer exist.
    fn prune(&mut self) {
        let before = self.members.len();
        self.members.retain(|m| m.state.strong_count() > 0);
        if self.members.len() < before {
            debug!("Pruned {} dropped persons from network", before - self.members.len());
        }
    }

    /// Hand out the next id, logging once the id space wraps around.
    fn allocate_id(&mut self) -> PersonId {
        let id = PersonId(self.next_id);
        self.next_id = match self.next_id.checked_add(1) {
            Some(next) => next,
            None => {
                error!("Person id space exhausted, ids will repeat from {}", PersonId(0));
                0
            }
        };
        id
    }
}

/// Handle to a shouting network. Clones refer to the same network.
#[derive(Debug, Clone)]
pub struct Network {
    state: Rc<RefCell<NetworkState>>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// A network where every shout reaches every other member.
    pub fn new() -> Self {
        Self::from_validated(NetworkConfig::default())
    }

    /// Build a network with an explicit configuration.
    ///
    /// # Arguments
    /// * `config` - Delivery policy and inbox bound for every member
    ///
    /// # Returns
    /// * `Ok(Network)` if `config` passes [`NetworkConfig::validate`]
    /// * `Err` describing the invalid setting otherwise
    pub fn with_config(config: NetworkConfig) -> anyhow::Result<Self> {
        config.validate().context("Invalid network config")?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: NetworkConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(NetworkState {
                config,
                members: Vec::new(),
                next_id: 0,
                stats: NetworkStats::default(),
            })),
        }
    }

    pub(crate) fn from_state(state: Rc<RefCell<NetworkState>>) -> Self {
        Self { state }
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<NetworkState>> {
        Rc::downgrade(&self.state)
    }

    /// Add a freshly created person to the registry. Only called from
    /// [`Person::new`].
    pub(crate) fn register(&self, person: &Rc<RefCell<PersonState>>) -> PersonId {
        let mut state = self.state.borrow_mut();
        state.prune();
        let id = state.allocate_id();
        state.members.push(Member {
            id,
            state: Rc::downgrade(person),
        });
        trace!("Registered person {} ({} members)", id, state.members.len());
        id
    }

    /// Copy of the configuration this network was built with.
    pub fn config(&self) -> NetworkConfig {
        self.state.borrow().config.clone()
    }

    /// Shout and delivery totals so far.
    pub fn stats(&self) -> NetworkStats {
        self.state.borrow().stats
    }

    /// Number of registered persons that are still alive.
    pub fn participant_count(&self) -> usize {
        self.state.borrow().members.iter().filter(|m| m.state.strong_count() > 0).count()
    }

    /// Whether `person` is registered on this network.
    pub fn contains(&self, person: &Person) -> bool {
        self.state.borrow().members.iter().any(|m| m.is(person.state()))
    }

    /// Deliver `message` from `sender` to every eligible member.
    ///
    /// The sender never hears its own message. A sender registered on a
    /// different network still reaches this network's members, measured from
    /// its current position.
    pub fn emit(&self, sender: &Person, message: &str) {
        let sender_state = sender.state();
        let emission = Emission {
            sender: self.id_of(sender_state),
            message,
            origin: sender_state.borrow().position,
        };

        let recipients = self.find_recipients(sender_state, &emission);
        let capacity = self.state.borrow().config.inbox_capacity;
        for (id, recipient) in &recipients {
            recipient.borrow_mut().hear(emission.message, capacity);
            trace!("Person {} heard {:?}", id, emission.message);
        }

        let mut state = self.state.borrow_mut();
        state.stats.shouts += 1;
        state.stats.deliveries += recipients.len() as u64;
        debug!(
            "Person {:?} shouted at {}m, heard by {} of {} members",
            emission.sender,
            emission.origin,
            recipients.len(),
            state.members.len()
        );
    }

    fn id_of(&self, person: &Rc<RefCell<PersonState>>) -> Option<PersonId> {
        self.state.borrow().members.iter().find(|m| m.is(person)).map(|m| m.id)
    }

    /// Collect live members admitted by the delivery policy, in registration
    /// order, pruning entries for persons that have been dropped.
    fn find_recipients(&self, sender: &Rc<RefCell<PersonState>>, emission: &Emission) -> Vec<(PersonId, Rc<RefCell<PersonState>>)> {
        let mut state = self.state.borrow_mut();
        state.prune();

        let policy = state.config.delivery;
        state
            .members
            .iter()
            .filter(|m| !m.is(sender))
            .filter_map(|m| {
                let person = m.state.upgrade()?;
                let position = person.borrow().position;
                policy.admits(emission.origin, position).then(|| (m.id, person))
            })
            .collect()
    }
}
