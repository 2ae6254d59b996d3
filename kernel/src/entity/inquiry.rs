use destructure::Destructure;
use vodca::References;

/// Contact-form submission routed to the operator inbox.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Inquiry {
    full_name: String,
    email: String,
    mobile: String,
    query: String,
    time_slot: String,
}

impl Inquiry {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        mobile: impl Into<String>,
        query: impl Into<String>,
        time_slot: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            mobile: mobile.into(),
            query: query.into(),
            time_slot: time_slot.into(),
        }
    }
}
