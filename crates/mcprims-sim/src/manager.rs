use std::collections::{BTreeMap, HashMap};

use mcprims_cmd::ops::dpaiop::{self, AiopState, DpaiopAttributes, DpaiopConfig};
use mcprims_cmd::ops::dpci::{self, DpciAttributes, LinkState, PeerAttributes};
use mcprims_cmd::ops::dpmng::encode_firmware_version;
use mcprims_cmd::ops::dprc::encode_container_id;
use mcprims_cmd::ops::irq::{self, IrqDescriptor};
use mcprims_cmd::ops::lifecycle::{decode_object_id, encode_api_version, encode_object_id};
use mcprims_cmd::ops::ApiVersion;
use mcprims_cmd::{McCommand, McStatus, ObjectType, Opcode, Params, Scheme, VERSION_PROBE_ID};
use mcprims_transport::{McTransport, Result, TransportError};
use tracing::trace;

use crate::config::SimConfig;
use crate::object::{IrqState, SimObject, SL_VERSION};

/// Interrupt sources per simulated object.
const IRQ_COUNT: u8 = 1;

const SEARCH_ORDER: [ObjectType; 3] = [ObjectType::Dpci, ObjectType::Dpaiop, ObjectType::Dprc];

/// A failure injected for every command with a given opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Answer with this status and do nothing.
    Status(McStatus),
    /// Report success but hand back token 0.
    ZeroToken,
    /// Fail the exchange itself.
    Disconnect,
}

type Handle = (ObjectType, u32);

enum Reply {
    Empty,
    Params(Params),
    Token(u16),
}

/// Simulated Management Complex.
#[derive(Debug)]
pub struct SimManager {
    config: SimConfig,
    scheme: Option<Scheme>,
    objects: BTreeMap<Handle, SimObject>,
    sessions: HashMap<u16, Handle>,
    root_irq: IrqState,
    next_token: u16,
    faults: HashMap<Opcode, Fault>,
    commands_sent: u64,
}

impl SimManager {
    pub fn new(config: SimConfig) -> Self {
        let scheme = match config.firmware.major {
            8 | 9 => Some(Scheme::Legacy),
            major if major >= 10 => Some(Scheme::Container),
            _ => None,
        };
        Self {
            config,
            scheme,
            objects: BTreeMap::new(),
            sessions: HashMap::new(),
            root_irq: IrqState::default(),
            next_token: config.first_token,
            faults: HashMap::new(),
            commands_sent: 0,
        }
    }

    pub fn legacy() -> Self {
        Self::new(SimConfig::legacy())
    }

    pub fn container() -> Self {
        Self::new(SimConfig::container())
    }

    /// A pair of linked DPCIs (0 and 1) and one AIOP controller (0).
    pub fn with_demo_objects(mut self) -> Self {
        self.add_dpci(0, 2);
        self.add_dpci(1, 2);
        self.link_dpci(0, 1);
        self.add_dpaiop(0, DpaiopConfig::default());
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Command set the simulated firmware speaks, `None` for firmware
    /// older than both.
    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    pub fn add_dpci(&mut self, id: u32, num_of_priorities: u8) {
        self.objects.insert(
            (ObjectType::Dpci, id),
            SimObject::Dpci {
                num_of_priorities,
                peer: None,
                irq: IrqState::default(),
            },
        );
    }

    pub fn add_dpaiop(&mut self, id: u32, config: DpaiopConfig) {
        self.objects.insert(
            (ObjectType::Dpaiop, id),
            SimObject::Dpaiop {
                config,
                state: AiopState::RESET_DONE,
                irq: IrqState::default(),
            },
        );
    }

    /// Connect two existing DPCIs to each other.
    pub fn link_dpci(&mut self, a: u32, b: u32) {
        for (this, other) in [(a, b), (b, a)] {
            if let Some(SimObject::Dpci { peer, .. }) =
                self.objects.get_mut(&(ObjectType::Dpci, this))
            {
                *peer = Some(other);
            }
        }
    }

    pub fn object(&self, object: ObjectType, id: u32) -> Option<&SimObject> {
        self.objects.get(&(object, id))
    }

    pub fn contains(&self, object: ObjectType, id: u32) -> bool {
        self.objects.contains_key(&(object, id))
    }

    /// Latch `bits` in the status of the object's interrupt source.
    ///
    /// Returns whether the interrupt would be signalled, or `None` when
    /// the object does not exist.
    pub fn raise_irq(&mut self, object: ObjectType, id: u32, bits: u32) -> Option<bool> {
        if object == ObjectType::Dprc && id == self.config.root_container_id {
            return Some(self.root_irq.raise(bits));
        }
        self.objects
            .get_mut(&(object, id))
            .map(|obj| obj.irq_mut().raise(bits))
    }

    /// Tokens currently open.
    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Exchanges attempted so far, including failed ones.
    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    pub fn inject(&mut self, opcode: Opcode, fault: Fault) {
        self.faults.insert(opcode, fault);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    fn dispatch(&mut self, command: &McCommand) -> std::result::Result<Reply, McStatus> {
        let header = command.header();
        let params = &command.params;

        if header.cmd_id == VERSION_PROBE_ID {
            let mut out = Params::default();
            encode_firmware_version(&mut out, &self.config.firmware);
            return Ok(Reply::Params(out));
        }

        let scheme = self.scheme.ok_or(McStatus::UnsupportedOp)?;
        if let Some((object, opcode)) = type_addressed(scheme, header.cmd_id) {
            return self.type_command(scheme, object, opcode, header.token, params);
        }

        let handle = *self.sessions.get(&header.token).ok_or(McStatus::AuthError)?;
        let opcode = scheme
            .opcode_of(handle.0, header.cmd_id)
            .ok_or(McStatus::UnsupportedOp)?;
        self.session_command(scheme, header.token, handle, opcode, params)
    }

    /// Commands addressed by object type rather than by an open token.
    fn type_command(
        &mut self,
        scheme: Scheme,
        object: ObjectType,
        opcode: Opcode,
        token: u16,
        params: &Params,
    ) -> std::result::Result<Reply, McStatus> {
        match opcode {
            Opcode::Open => {
                let id = decode_object_id(params);
                let exists = match object {
                    ObjectType::Dprc => id == self.config.root_container_id,
                    _ => self.contains(object, id),
                };
                if !exists {
                    return Err(McStatus::ConfigError);
                }
                self.allocate_token((object, id)).map(Reply::Token)
            }
            Opcode::Create => match scheme {
                Scheme::Legacy => {
                    let id = self.create_object(object, params)?;
                    self.allocate_token((object, id)).map(Reply::Token)
                }
                Scheme::Container => {
                    self.require_container(token)?;
                    let id = self.create_object(object, params)?;
                    let mut out = Params::default();
                    encode_object_id(&mut out, id);
                    Ok(Reply::Params(out))
                }
            },
            Opcode::Destroy => {
                self.require_container(token)?;
                self.destroy_object((object, decode_object_id(params)))?;
                Ok(Reply::Empty)
            }
            Opcode::GetApiVersion => {
                let mut out = Params::default();
                encode_api_version(&mut out, api_version(object));
                Ok(Reply::Params(out))
            }
            Opcode::GetContainerId => {
                let mut out = Params::default();
                encode_container_id(&mut out, self.config.root_container_id);
                Ok(Reply::Params(out))
            }
            _ => Err(McStatus::UnsupportedOp),
        }
    }

    fn session_command(
        &mut self,
        scheme: Scheme,
        token: u16,
        handle: Handle,
        opcode: Opcode,
        params: &Params,
    ) -> std::result::Result<Reply, McStatus> {
        match opcode {
            Opcode::Close => {
                self.sessions.remove(&token);
                return Ok(Reply::Empty);
            }
            Opcode::Destroy => {
                self.destroy_object(handle)?;
                return Ok(Reply::Empty);
            }
            _ => {}
        }

        if is_irq(opcode) {
            return self.irq_command(handle, opcode, params);
        }

        let legacy_version = (scheme == Scheme::Legacy).then(|| api_version(handle.0));
        let peers: HashMap<u32, u8> = self
            .objects
            .iter()
            .filter_map(|((object, id), obj)| match (object, obj) {
                (ObjectType::Dpci, SimObject::Dpci { num_of_priorities, .. }) => {
                    Some((*id, *num_of_priorities))
                }
                _ => None,
            })
            .collect();

        let obj = self
            .objects
            .get_mut(&handle)
            .ok_or(McStatus::UnsupportedOp)?;
        let mut out = Params::default();

        match (obj, opcode) {
            (obj, Opcode::Reset) => {
                obj.reset();
                return Ok(Reply::Empty);
            }
            (SimObject::Dpci { num_of_priorities, .. }, Opcode::GetAttributes) => {
                let attrs = DpciAttributes {
                    id: handle.1,
                    num_of_priorities: *num_of_priorities,
                    version: legacy_version,
                };
                dpci::encode_attributes(&mut out, &attrs);
            }
            (SimObject::Dpci { peer, .. }, Opcode::GetPeerAttributes) => {
                let linked = peer.filter(|id| peers.contains_key(id));
                let attrs = PeerAttributes {
                    peer_id: linked,
                    num_of_priorities: linked.and_then(|id| peers.get(&id).copied()).unwrap_or(0),
                };
                dpci::encode_peer_attributes(&mut out, &attrs);
            }
            (SimObject::Dpci { peer, .. }, Opcode::GetLinkState) => {
                let up = peer.is_some_and(|id| peers.contains_key(&id));
                let state = if up { LinkState::Up } else { LinkState::Down };
                dpci::encode_link_state(&mut out, state);
            }
            (SimObject::Dpaiop { .. }, Opcode::GetAttributes) => {
                let attrs = DpaiopAttributes {
                    id: handle.1,
                    version: legacy_version,
                };
                dpaiop::encode_attributes(&mut out, &attrs);
            }
            (SimObject::Dpaiop { state, .. }, Opcode::Load) => {
                if *state != AiopState::RESET_DONE {
                    return Err(McStatus::InvalidState);
                }
                if dpaiop::decode_load(params).img_size == 0 {
                    return Err(McStatus::ConfigError);
                }
                *state = AiopState::LOAD_DONE;
                return Ok(Reply::Empty);
            }
            (SimObject::Dpaiop { state, .. }, Opcode::Run) => {
                if *state != AiopState::LOAD_DONE {
                    return Err(McStatus::InvalidState);
                }
                if dpaiop::decode_run(params).cores_mask == 0 {
                    return Err(McStatus::ConfigError);
                }
                *state = AiopState::RUNNING;
                return Ok(Reply::Empty);
            }
            (SimObject::Dpaiop { state, .. }, Opcode::GetState) => {
                dpaiop::encode_state(&mut out, *state);
            }
            (SimObject::Dpaiop { state, .. }, Opcode::GetSlVersion) => {
                if !state.contains(AiopState::RUNNING) {
                    return Err(McStatus::InvalidState);
                }
                dpaiop::encode_sl_version(&mut out, &SL_VERSION);
            }
            _ => return Err(McStatus::UnsupportedOp),
        }
        Ok(Reply::Params(out))
    }

    fn irq_command(
        &mut self,
        handle: Handle,
        opcode: Opcode,
        params: &Params,
    ) -> std::result::Result<Reply, McStatus> {
        if irq::decode_index(params) >= IRQ_COUNT {
            return Err(McStatus::ConfigError);
        }
        let state = if handle.0 == ObjectType::Dprc {
            &mut self.root_irq
        } else {
            self.objects
                .get_mut(&handle)
                .ok_or(McStatus::UnsupportedOp)?
                .irq_mut()
        };

        let mut out = Params::default();
        match opcode {
            Opcode::SetIrq => {
                state.descriptor = IrqDescriptor {
                    irq_type: 0,
                    config: irq::decode_config(params),
                };
                return Ok(Reply::Empty);
            }
            Opcode::GetIrq => irq::encode_descriptor(&mut out, &state.descriptor),
            Opcode::SetIrqEnable => {
                state.enabled = irq::decode_enable(params);
                return Ok(Reply::Empty);
            }
            Opcode::GetIrqEnable => irq::encode_word(&mut out, u32::from(state.enabled)),
            Opcode::SetIrqMask => {
                state.mask = irq::decode_bits(params);
                return Ok(Reply::Empty);
            }
            Opcode::GetIrqMask => irq::encode_word(&mut out, state.mask),
            Opcode::GetIrqStatus => irq::encode_word(&mut out, state.status),
            Opcode::ClearIrqStatus => {
                state.status &= !irq::decode_bits(params);
                return Ok(Reply::Empty);
            }
            _ => return Err(McStatus::UnsupportedOp),
        }
        Ok(Reply::Params(out))
    }

    fn require_container(&self, token: u16) -> std::result::Result<(), McStatus> {
        match self.sessions.get(&token) {
            Some((ObjectType::Dprc, _)) => Ok(()),
            _ => Err(McStatus::AuthError),
        }
    }

    fn create_object(
        &mut self,
        object: ObjectType,
        params: &Params,
    ) -> std::result::Result<u32, McStatus> {
        let id = (0..=u32::MAX)
            .find(|id| !self.contains(object, *id))
            .ok_or(McStatus::NoResource)?;
        match object {
            ObjectType::Dpci => {
                let config = dpci::decode_config(params);
                if !(dpci::MIN_PRIORITIES..=dpci::MAX_PRIORITIES)
                    .contains(&config.num_of_priorities)
                {
                    return Err(McStatus::ConfigError);
                }
                self.add_dpci(id, config.num_of_priorities);
            }
            ObjectType::Dpaiop => self.add_dpaiop(id, dpaiop::decode_config(params)),
            _ => return Err(McStatus::UnsupportedOp),
        }
        Ok(id)
    }

    /// Remove an object along with every token open on it.
    fn destroy_object(&mut self, handle: Handle) -> std::result::Result<(), McStatus> {
        if self.objects.remove(&handle).is_none() {
            return Err(McStatus::ConfigError);
        }
        self.sessions.retain(|_, open| *open != handle);
        Ok(())
    }

    fn allocate_token(&mut self, handle: Handle) -> std::result::Result<u16, McStatus> {
        for _ in 0..=u32::from(u16::MAX) {
            let token = self.next_token;
            self.next_token = self.next_token.wrapping_add(1);
            if token != 0 && !self.sessions.contains_key(&token) {
                self.sessions.insert(token, handle);
                return Ok(token);
            }
        }
        Err(McStatus::NoResource)
    }

    /// Opcode named by `cmd_id`, for fault lookup.
    fn opcode_hint(&self, cmd_id: u16) -> Option<Opcode> {
        if cmd_id == VERSION_PROBE_ID {
            return Some(Opcode::GetFirmwareVersion);
        }
        let scheme = self.scheme?;
        SEARCH_ORDER
            .into_iter()
            .find_map(|object| scheme.opcode_of(object, cmd_id))
    }
}

impl Default for SimManager {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl McTransport for SimManager {
    fn send(&mut self, command: &McCommand) -> Result<McCommand> {
        self.commands_sent += 1;
        let header = command.header();

        let fault = self
            .opcode_hint(header.cmd_id)
            .and_then(|opcode| self.faults.get(&opcode).copied());
        let outcome = match fault {
            Some(Fault::Disconnect) => {
                return Err(TransportError::Unavailable(
                    "simulated link failure".to_string(),
                ))
            }
            Some(Fault::Status(status)) => Err(status),
            Some(Fault::ZeroToken) => Ok(Reply::Token(0)),
            None => self.dispatch(command),
        };

        let mut response = *command;
        let status = match outcome {
            Ok(Reply::Empty) => McStatus::Ok,
            Ok(Reply::Params(params)) => {
                response.params = params;
                McStatus::Ok
            }
            Ok(Reply::Token(token)) => {
                response.set_token(token);
                McStatus::Ok
            }
            Err(status) => status,
        };
        response.set_status(status);
        trace!(cmd_id = header.cmd_id, token = header.token, %status, "simulated command");
        Ok(response)
    }

    fn transport_name(&self) -> &'static str {
        "simulator"
    }
}

/// Commands that name their object by type, not by an open token.
fn type_addressed(scheme: Scheme, cmd_id: u16) -> Option<(ObjectType, Opcode)> {
    SEARCH_ORDER.into_iter().find_map(|object| {
        let opcode = scheme.opcode_of(object, cmd_id)?;
        let by_type = matches!(
            opcode,
            Opcode::Open | Opcode::Create | Opcode::GetApiVersion | Opcode::GetContainerId
        ) || (opcode == Opcode::Destroy && scheme == Scheme::Container);
        by_type.then_some((object, opcode))
    })
}

fn is_irq(opcode: Opcode) -> bool {
    matches!(
        opcode,
        Opcode::SetIrq
            | Opcode::GetIrq
            | Opcode::SetIrqEnable
            | Opcode::GetIrqEnable
            | Opcode::SetIrqMask
            | Opcode::GetIrqMask
            | Opcode::GetIrqStatus
            | Opcode::ClearIrqStatus
    )
}

fn api_version(object: ObjectType) -> ApiVersion {
    match object {
        ObjectType::Dpci => ApiVersion { major: 3, minor: 3 },
        ObjectType::Dpaiop => ApiVersion { major: 2, minor: 2 },
        ObjectType::Dprc => ApiVersion { major: 6, minor: 3 },
        ObjectType::Dpmng => ApiVersion { major: 1, minor: 0 },
    }
}
