mod common;

use common::{commands_sent, connect};
use mcprims_cmd::ops::dpmng::FirmwareVersion;
use mcprims_cmd::{ObjectType, Opcode, Scheme};
use mcprims_session::{
    ConnectionConfig, ContractViolation, Dpaiop, Dpci, Dprc, McConnection, McError,
};
use mcprims_sim::{SimConfig, SimManager};
use mcprims_transport::SharedPortal;

#[test]
fn firmware_9_selects_legacy_commands() {
    let (conn, _portal) = connect(SimManager::legacy());
    assert_eq!(conn.scheme(), Scheme::Legacy);
    assert_eq!(conn.firmware_version().map(|v| v.major), Some(9));
}

#[test]
fn firmware_10_selects_container_commands() {
    let (conn, _portal) = connect(SimManager::container());
    assert_eq!(conn.scheme(), Scheme::Container);
}

#[test]
fn old_firmware_is_refused_at_connect() {
    let sim = SimManager::new(SimConfig {
        firmware: FirmwareVersion {
            major: 7,
            minor: 2,
            revision: 0,
        },
        ..SimConfig::default()
    });
    let err = McConnection::connect(sim).expect_err("connect should fail");
    assert!(matches!(err, McError::UnsupportedFirmware(v) if v.major == 7));
}

#[test]
fn forced_scheme_skips_the_version_probe() {
    let portal = SharedPortal::new(SimManager::legacy());
    let config = ConnectionConfig::forced(Scheme::Legacy);
    let conn =
        McConnection::with_config(portal.clone(), &config).expect("connect should succeed");
    assert_eq!(conn.firmware_version(), None);
    assert_eq!(commands_sent(&portal), 0);

    let version = conn
        .query_firmware_version()
        .expect("query should succeed");
    assert_eq!(version.major, 9);
}

#[test]
fn api_version_comes_from_attributes_on_legacy_firmware() {
    let (conn, portal) = connect(SimManager::legacy().with_demo_objects());
    let session = conn.open::<Dpci>(0).expect("open should succeed");
    let before = commands_sent(&portal);

    let version = session.api_version().expect("version should be readable");
    assert_eq!((version.major, version.minor), (3, 3));
    // Answered by get_attributes, not a dedicated query.
    assert_eq!(commands_sent(&portal) - before, 1);

    let err = conn
        .api_version::<Dpci>()
        .expect_err("dedicated query is container-only");
    assert!(matches!(
        err,
        McError::Contract(ContractViolation::SchemeMismatch { .. })
    ));
}

#[test]
fn api_version_has_a_dedicated_query_on_container_firmware() {
    let (conn, _portal) = connect(SimManager::container().with_demo_objects());
    let version = conn
        .api_version::<Dpaiop>()
        .expect("version should be readable");
    assert_eq!((version.major, version.minor), (2, 2));

    let session = conn.open::<Dpaiop>(0).expect("open should succeed");
    assert_eq!(
        session.api_version().expect("version should be readable"),
        version
    );
}

#[test]
fn operation_missing_from_the_table_is_not_sent() {
    let (conn, portal) = connect(SimManager::container());
    let root = conn.open_root_container().expect("root should open");
    let before = commands_sent(&portal);

    let err = root.reset().expect_err("containers have no reset");
    assert!(matches!(
        err,
        McError::Contract(ContractViolation::Unsupported {
            object: ObjectType::Dprc,
            opcode: Opcode::Reset,
            scheme: Scheme::Container,
        })
    ));
    assert_eq!(commands_sent(&portal), before);
}

#[test]
fn root_container_is_reachable_in_both_schemes() {
    for sim in [SimManager::legacy(), SimManager::container()] {
        let (conn, _portal) = connect(sim);
        let id = conn.container_id().expect("container id should be readable");
        assert_eq!(id, 1);
        let root = conn.open::<Dprc>(id).expect("root should open");
        root.close().expect("close should succeed");
    }
}
