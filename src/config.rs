//! Factory configuration.

/// What happens when a record type is bound under a name that is already
/// taken in the factory's namespace.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Rebind {
    /// Replace the existing binding and log a warning.
    #[default]
    Replace,
    /// Refuse with [`Condition::NameBoundMultipleTimes`](crate::exceptions::Condition).
    Reject,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub rebind: Rebind,
}

impl Config {
    pub fn with_rebind(mut self, rebind: Rebind) -> Self {
        self.rebind = rebind;
        self
    }
}
