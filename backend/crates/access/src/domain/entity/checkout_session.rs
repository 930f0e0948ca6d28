use crate::domain::value_object::AccessPlan;

/// Checkout as reported by the billing provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Payment captured or session completed
    pub paid: bool,
    /// `metadata.product` set when the checkout was created
    pub product: Option<String>,
    /// One-time payment rather than a subscription checkout
    pub one_time: bool,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
}

impl CheckoutSession {
    /// Plan bought. An unrecognised product falls back on the checkout mode.
    pub fn plan(&self) -> AccessPlan {
        self.product
            .as_deref()
            .and_then(AccessPlan::from_code)
            .unwrap_or(if self.one_time {
                AccessPlan::Daypass
            } else {
                AccessPlan::Pro
            })
    }
}

/// Checkout session ids are opaque provider tokens: ASCII letters, digits, `_` and `-`.
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 255
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}
