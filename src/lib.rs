//! A minimal broadcast medium.
//!
//! Persons are created on a [`Network`], stand somewhere along a single axis
//! and shout messages. The network decides, synchronously, which other
//! persons hear each shout and appends the message to their inboxes.
//!
//! ```
//! use shouty::{Network, Person};
//!
//! let network = Network::new();
//! let sean = Person::new(&network);
//! let lucy = Person::new(&network);
//! lucy.move_to(15);
//!
//! sean.shout("free bagels at Sean's").unwrap();
//! assert_eq!(lucy.messages_heard(), ["free bagels at Sean's"]);
//! assert!(sean.messages_heard().is_empty());
//! ```
//!
//! ## Module Organization
//!
//! - `types`: identifiers, positions and the emission event
//! - `geometry`: distance between positions
//! - `config`: delivery policy and inbox bounds, loadable from TOML
//! - `error`: error type for misuse such as shouting without a network
//! - `person`: the participant handle
//! - `network`: registry and distribution logic

pub mod config;
pub mod error;
pub mod geometry;
pub mod network;
pub mod person;
pub mod types;

pub use config::{DeliveryPolicy, NetworkConfig};
pub use error::ShoutyError;
pub use network::{Network, NetworkStats};
pub use person::Person;
pub use types::{Emission, PersonId, Position};
