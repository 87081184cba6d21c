//! Process-wide node state consumed by the dispatcher.
//!
//! The state moves monotonically forward: one write-once identity slot and
//! two counters that only ever increase. It is owned by the caller and lent
//! to the dispatcher by `&mut`, so there is exactly one writer.

/// Outcome of [`NodeState::assign_identity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityAssignment {
    /// The identity was unset and now holds the requested value.
    Assigned,
    /// The identity was already set; it was left unchanged.
    AlreadyAssigned {
        /// The identity the node keeps using.
        current: String,
    },
}

/// Identity and counters of one node.
///
/// # Example
///
/// ```
/// use glomer_node::{IdentityAssignment, NodeState};
///
/// let mut state = NodeState::new();
/// assert_eq!(state.assign_identity("n1"), IdentityAssignment::Assigned);
/// assert_eq!(state.next_unique_id(), "n1.1");
/// assert_eq!(state.next_message_id(), 1);
/// assert_eq!(state.next_message_id(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeState {
    identity: Option<String>,
    last_message_id: u64,
    last_generated: u64,
}

impl NodeState {
    /// Creates state with no identity and both counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            identity: None,
            last_message_id: 0,
            last_generated: 0,
        }
    }

    /// Returns the node identity, or an empty string before `init`.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.identity.as_deref().unwrap_or_default()
    }

    /// Returns `true` once an identity has been assigned.
    #[must_use]
    pub const fn is_initialised(&self) -> bool {
        self.identity.is_some()
    }

    /// Sets the identity if it has not been set yet.
    pub fn assign_identity(&mut self, node_id: &str) -> IdentityAssignment {
        match &self.identity {
            Some(current) => IdentityAssignment::AlreadyAssigned {
                current: current.clone(),
            },
            None => {
                self.identity = Some(node_id.to_owned());
                IdentityAssignment::Assigned
            }
        }
    }

    /// Issues the next outgoing message id, starting at 1.
    ///
    /// Call exactly once per outgoing message that carries a `msg_id`.
    pub const fn next_message_id(&mut self) -> u64 {
        self.last_message_id += 1;
        self.last_message_id
    }

    /// Issues the next unique identifier as `<identity>.<counter>`.
    pub fn next_unique_id(&mut self) -> String {
        self.last_generated += 1;
        format!("{}.{}", self.identity(), self.last_generated)
    }

    /// Returns the most recently issued message id, or 0.
    #[must_use]
    pub const fn last_message_id(&self) -> u64 {
        self.last_message_id
    }

    /// Returns the most recently used unique-id counter value, or 0.
    #[must_use]
    pub const fn last_generated(&self) -> u64 {
        self.last_generated
    }
}
