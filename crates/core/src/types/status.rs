//! Order status state machine.
//!
//! An order moves through `PENDING -> CONFIRMED -> DELIVERED`. Transitions
//! are validated by [`OrderStatus::transition_to`]: only the next step in
//! that chain is accepted, plus the identity transition so that re-applying
//! a status (e.g. a retried request) succeeds without changing anything.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed by the customer, awaiting payment verification.
    #[default]
    Pending,
    /// Payment verified by a sales admin.
    Confirmed,
    /// Handed over to the customer.
    Delivered,
}

/// Rejected order status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot transition order from {from} to {to}")]
pub struct TransitionError {
    /// Status the order currently has.
    pub from: OrderStatus,
    /// Status that was requested.
    pub to: OrderStatus,
}

impl OrderStatus {
    /// Whether moving from `self` to `target` is a legal transition.
    ///
    /// The identity transition is always legal so that status updates are
    /// idempotent; otherwise only the next step in the lifecycle is allowed.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed) | (Self::Confirmed, Self::Delivered)
        ) || self == target
    }

    /// Validate a transition, returning the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the transition is not legal.
    pub fn transition_to(self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: self,
                to: target,
            })
        }
    }

    /// Stable string form as stored in the database (`PENDING`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Delivered => "DELIVERED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "DELIVERED" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_steps_are_legal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn identity_transitions_are_idempotent() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Delivered,
        ] {
            assert_eq!(status.transition_to(status), Ok(status));
        }
    }

    #[test]
    fn skipping_and_reversing_are_rejected() {
        let rejected = [
            (OrderStatus::Pending, OrderStatus::Delivered),
            (OrderStatus::Confirmed, OrderStatus::Pending),
            (OrderStatus::Delivered, OrderStatus::Confirmed),
            (OrderStatus::Delivered, OrderStatus::Pending),
        ];
        for (from, to) in rejected {
            assert_eq!(from.transition_to(to), Err(TransitionError { from, to }));
        }
    }

    #[test]
    fn serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"DELIVERED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Delivered);
    }

    #[test]
    fn round_trips_through_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Delivered,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }
}
