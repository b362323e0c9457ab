use mcprims_cmd::ops::dpmng::FirmwareVersion;

/// Simulator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Version reported to the version probe. Decides the command set.
    pub firmware: FirmwareVersion,
    /// First token handed out; later tokens count up from it, skipping 0.
    pub first_token: u16,
    /// Id of the container the simulated portal belongs to.
    pub root_container_id: u32,
}

impl SimConfig {
    /// Firmware speaking the legacy command set.
    pub fn legacy() -> Self {
        Self {
            firmware: FirmwareVersion {
                major: 9,
                minor: 0,
                revision: 6,
            },
            ..Self::default()
        }
    }

    /// Firmware speaking the container-addressed command set.
    pub fn container() -> Self {
        Self::default()
    }

    pub fn with_first_token(mut self, token: u16) -> Self {
        self.first_token = token;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            firmware: FirmwareVersion {
                major: 10,
                minor: 18,
                revision: 0,
            },
            first_token: 1,
            root_container_id: 1,
        }
    }
}
