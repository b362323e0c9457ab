use mcprims_cmd::Scheme;

/// How a connection chooses its command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemeSelection {
    /// Query the firmware version and pick the matching command set.
    #[default]
    Detect,
    /// Skip the query and use this command set.
    Force(Scheme),
}

/// Connection configuration.
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    pub scheme: SchemeSelection,
}

impl ConnectionConfig {
    pub fn forced(scheme: Scheme) -> Self {
        Self {
            scheme: SchemeSelection::Force(scheme),
        }
    }
}
