//! Order Status Lookup
//!
//! Status is a pure function of the order id: the id's characters are
//! hashed and the hash picks one of three statuses. Determinism is a
//! testability requirement: repeated lookups for the same id must agree
//! on status, message, and tracking number.

/// Possible order states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Shipped,
    Processing,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Processing => "Processing",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one order-status lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatusReport {
    /// Normalized (uppercased) order id
    pub order_id: String,
    pub status: OrderStatus,
    /// Present only for shipped orders
    pub tracking_number: Option<String>,
    /// Customer-facing message
    pub message: String,
}

/// Rolling hash over the id's bytes. Stable across runs and platforms,
/// unlike std's randomized hashers.
fn order_hash(id: &str) -> u64 {
    id.bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
}

/// Look up the status of an order.
///
/// The id is trimmed and uppercased before hashing, so differently cased
/// inputs resolve to the same order.
pub fn order_status(order_id: &str) -> OrderStatusReport {
    let order_id = order_id.trim().to_uppercase();
    let hash = order_hash(&order_id);

    let status = match hash % 3 {
        0 => OrderStatus::Shipped,
        1 => OrderStatus::Processing,
        _ => OrderStatus::Delivered,
    };

    let tracking_number = match status {
        OrderStatus::Shipped => Some(format!("TRK{:09}", hash.wrapping_mul(7919) % 1_000_000_000)),
        _ => None,
    };

    let message = match status {
        OrderStatus::Shipped => format!(
            "Good news! Order {} has been Shipped. Your tracking number is {}. \
             Expect delivery within 3-5 business days.",
            order_id,
            tracking_number.as_deref().unwrap_or_default()
        ),
        OrderStatus::Processing => format!(
            "Order {} is currently Processing. We'll send you an email the \
             moment it ships.",
            order_id
        ),
        OrderStatus::Delivered => format!(
            "Order {} was Delivered. If anything looks wrong with it, let us \
             know and we'll sort it out.",
            order_id
        ),
    };

    OrderStatusReport {
        order_id,
        status,
        tracking_number,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = order_status("ABC1234");
        let b = order_status("ABC1234");
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_and_whitespace_normalized() {
        let a = order_status("abc1234");
        let b = order_status("  ABC1234  ");
        assert_eq!(a, b);
        assert_eq!(a.order_id, "ABC1234");
    }

    #[test]
    fn test_message_contains_id_and_status() {
        let report = order_status("xyz9876");
        assert!(report.message.contains("XYZ9876"));
        assert!(report.message.contains(report.status.as_str()));
    }

    #[test]
    fn test_tracking_only_when_shipped() {
        let report = order_status("ABC1234");
        match report.status {
            OrderStatus::Shipped => {
                let tracking = report.tracking_number.as_deref().unwrap();
                assert!(tracking.starts_with("TRK"));
                assert!(report.message.contains(tracking));
            },
            _ => assert!(report.tracking_number.is_none()),
        }
    }

    #[test]
    fn test_all_statuses_reachable() {
        // Single-character ids with consecutive byte values cycle through
        // all three hash classes
        let statuses: std::collections::HashSet<&str> = ["A", "B", "C"]
            .iter()
            .map(|id| order_status(id).status.as_str())
            .collect();
        assert_eq!(statuses.len(), 3);
    }
}
