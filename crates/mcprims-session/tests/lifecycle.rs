mod common;

use common::{commands_sent, connect, open_sessions};
use mcprims_cmd::{McStatus, ObjectType, Opcode};
use mcprims_session::{ContractViolation, Dpaiop, Dpci, DpciConfig, ErrorClass, McError, Token};
use mcprims_sim::{Fault, SimConfig, SimManager};

#[test]
fn open_returns_the_token_issued_by_the_mc() {
    let mut sim = SimManager::new(SimConfig::container().with_first_token(0x1234));
    sim.add_dpci(5, 1);
    let (conn, portal) = connect(sim);

    let session = conn.open::<Dpci>(5).expect("open should succeed");
    assert_eq!(session.token().get(), 0x1234);
    assert_eq!(session.id(), 5);
    assert_eq!(open_sessions(&portal), 1);

    let attrs = session.get_attributes().expect("attributes should be readable");
    assert_eq!(attrs.id, 5);

    session.close().expect("close should succeed");
    assert_eq!(open_sessions(&portal), 0);

    let stale = conn.adopt::<Dpci>(5, 0x1234).expect("adopt should succeed");
    let err = stale.get_attributes().expect_err("closed token should be refused");
    assert!(matches!(
        err,
        McError::Firmware {
            opcode: Opcode::GetAttributes,
            status: McStatus::AuthError,
            ..
        }
    ));
    assert_eq!(err.class(), ErrorClass::FirmwareStatus);
}

#[test]
fn reopening_after_close_issues_a_fresh_token() {
    let (conn, portal) = connect(SimManager::container().with_demo_objects());

    let first = conn.open::<Dpci>(0).expect("open should succeed");
    let first_token = first.token();
    first.close().expect("close should succeed");

    let second = conn.open::<Dpci>(0).expect("reopen should succeed");
    assert_eq!(second.id(), 0);
    assert_ne!(second.token(), first_token);
    second.get_attributes().expect("reopened session should be usable");
    second.close().expect("close should succeed");
    assert_eq!(open_sessions(&portal), 0);
}

#[test]
fn open_of_unknown_id_is_not_found() {
    let (conn, _portal) = connect(SimManager::container());
    let err = conn.open::<Dpci>(42).expect_err("open should fail");
    assert!(matches!(
        err,
        McError::NotFound {
            object: ObjectType::Dpci,
            id: 42,
            ..
        }
    ));
    assert_eq!(err.class(), ErrorClass::FirmwareStatus);
}

#[test]
fn open_success_with_token_zero_is_invalid_handle() {
    let mut sim = SimManager::container().with_demo_objects();
    sim.inject(Opcode::Open, Fault::ZeroToken);
    let (conn, portal) = connect(sim);

    let err = conn.open::<Dpci>(0).expect_err("open should fail");
    assert!(matches!(
        err,
        McError::InvalidHandle {
            opcode: Opcode::Open,
            ..
        }
    ));
    assert_eq!(open_sessions(&portal), 0);
}

#[test]
fn adopting_token_zero_is_a_contract_violation() {
    let (conn, portal) = connect(SimManager::container().with_demo_objects());
    let before = commands_sent(&portal);

    let err = conn.adopt::<Dpci>(0, 0).expect_err("adopt should fail");
    assert!(matches!(err, McError::Contract(ContractViolation::ZeroToken)));
    assert_eq!(commands_sent(&portal), before);
}

#[test]
fn stale_token_is_refused_by_the_mc() {
    let (conn, _portal) = connect(SimManager::container().with_demo_objects());
    let session = conn.open::<Dpci>(0).expect("open should succeed");
    let raw = session.token().get();
    session.close().expect("close should succeed");

    let stale = conn.adopt::<Dpci>(0, raw).expect("adopt should succeed");
    let err = stale.get_attributes().expect_err("stale token should be refused");
    assert_eq!(err.status(), Some(McStatus::AuthError));
    assert!(!err.is_retryable());
}

#[test]
fn dropping_a_session_closes_it() {
    let (conn, portal) = connect(SimManager::container().with_demo_objects());
    {
        let _first = conn.open::<Dpci>(0).expect("open should succeed");
        let _second = conn.open::<Dpaiop>(0).expect("open should succeed");
        assert_eq!(open_sessions(&portal), 2);
    }
    assert_eq!(open_sessions(&portal), 0);
}

#[test]
fn with_session_closes_after_failure_and_keeps_first_error() {
    let mut sim = SimManager::container().with_demo_objects();
    sim.inject(Opcode::GetAttributes, Fault::Status(McStatus::Busy));
    sim.inject(Opcode::Close, Fault::Status(McStatus::Timeout));
    let (conn, portal) = connect(sim);

    let before = commands_sent(&portal);
    let err = conn
        .with_session::<Dpci, _>(0, |dpci| dpci.get_attributes())
        .expect_err("get_attributes should fail");
    assert_eq!(err.status(), Some(McStatus::Busy));
    assert!(err.is_retryable());
    // open, get_attributes, close
    assert_eq!(commands_sent(&portal) - before, 3);
}

#[test]
fn with_session_surfaces_close_failure_when_nothing_else_failed() {
    let mut sim = SimManager::container().with_demo_objects();
    sim.inject(Opcode::Close, Fault::Status(McStatus::Timeout));
    let (conn, _portal) = connect(sim);

    let err = conn
        .with_session::<Dpci, _>(0, |dpci| dpci.get_attributes())
        .expect_err("close should fail");
    assert!(matches!(
        err,
        McError::Firmware {
            opcode: Opcode::Close,
            status: McStatus::Timeout,
            ..
        }
    ));
}

#[test]
fn transport_failure_is_classified_apart_from_firmware_status() {
    let mut sim = SimManager::container().with_demo_objects();
    sim.inject(Opcode::GetLinkState, Fault::Disconnect);
    let (conn, _portal) = connect(sim);

    let session = conn.open::<Dpci>(0).expect("open should succeed");
    let err = session.get_link_state().expect_err("link state should fail");
    assert_eq!(err.class(), ErrorClass::TransportFailure);
    assert_eq!(err.status(), None);
}

#[test]
fn container_create_and_destroy_go_through_the_root_container() {
    let (conn, portal) = connect(SimManager::container());
    let root = conn.open_root_container().expect("root should open");

    let config = DpciConfig {
        num_of_priorities: 2,
    };
    let id = conn
        .create::<Dpci>(Some(&root), &config)
        .expect("create should succeed");
    assert!(portal
        .with(|sim| sim.contains(ObjectType::Dpci, id))
        .expect("portal should be usable"));

    let attrs = conn
        .with_session::<Dpci, _>(id, |dpci| dpci.get_attributes())
        .expect("attributes should be readable");
    assert_eq!(attrs.id, id);
    assert_eq!(attrs.num_of_priorities, 2);
    assert_eq!(attrs.version, None);

    conn.destroy::<Dpci>(Some(&root), id)
        .expect("destroy should succeed");
    assert!(!portal
        .with(|sim| sim.contains(ObjectType::Dpci, id))
        .expect("portal should be usable"));

    root.close().expect("close should succeed");
    assert_eq!(open_sessions(&portal), 0);
}

#[test]
fn container_create_without_parent_sends_nothing() {
    let (conn, portal) = connect(SimManager::container());
    let before = commands_sent(&portal);

    let err = conn
        .create::<Dpci>(None, &DpciConfig::default())
        .expect_err("create should fail");
    assert!(matches!(
        err,
        McError::Contract(ContractViolation::MissingContainer {
            object: ObjectType::Dpci,
            opcode: Opcode::Create,
        })
    ));
    assert_eq!(commands_sent(&portal), before);
}

#[test]
fn legacy_create_learns_id_and_releases_its_token() {
    let (conn, portal) = connect(SimManager::legacy());

    let id = conn
        .create::<Dpci>(None, &DpciConfig::default())
        .expect("create should succeed");
    assert_eq!(id, 0);
    assert_eq!(open_sessions(&portal), 0);

    let attrs = conn
        .with_session::<Dpci, _>(id, |dpci| dpci.get_attributes())
        .expect("attributes should be readable");
    assert!(attrs.version.is_some());

    conn.destroy::<Dpci>(None, id).expect("destroy should succeed");
    assert!(!portal
        .with(|sim| sim.contains(ObjectType::Dpci, id))
        .expect("portal should be usable"));
    assert_eq!(open_sessions(&portal), 0);
}

#[test]
fn legacy_destroy_of_unknown_id_fails_without_destroying() {
    let (conn, portal) = connect(SimManager::legacy().with_demo_objects());
    let before = commands_sent(&portal);

    let err = conn.destroy::<Dpci>(None, 42).expect_err("destroy should fail");
    assert!(matches!(
        err,
        McError::NotFound {
            object: ObjectType::Dpci,
            id: 42,
            ..
        }
    ));
    // only the refused open reaches the mc
    assert_eq!(commands_sent(&portal) - before, 1);
    assert_eq!(open_sessions(&portal), 0);
    assert!(portal
        .with(|sim| sim.contains(ObjectType::Dpci, 0) && sim.contains(ObjectType::Dpci, 1))
        .expect("portal should be usable"));
}

#[test]
fn legacy_destroy_through_session_consumes_the_token() {
    let (conn, portal) = connect(SimManager::legacy().with_demo_objects());
    let session = conn.open::<Dpaiop>(0).expect("open should succeed");
    session.destroy().expect("destroy should succeed");

    assert_eq!(open_sessions(&portal), 0);
    let err = conn.open::<Dpaiop>(0).expect_err("object should be gone");
    assert!(matches!(err, McError::NotFound { .. }));
}

#[test]
fn session_destroy_is_legacy_only_and_still_closes() {
    let (conn, portal) = connect(SimManager::container().with_demo_objects());
    let session = conn.open::<Dpci>(1).expect("open should succeed");

    let err = session.destroy().expect_err("destroy should be refused");
    assert!(matches!(
        err,
        McError::Contract(ContractViolation::SchemeMismatch { .. })
    ));
    assert_eq!(open_sessions(&portal), 0);
    assert!(portal
        .with(|sim| sim.contains(ObjectType::Dpci, 1))
        .expect("portal should be usable"));
}

#[test]
fn out_of_range_create_config_is_rejected_before_sending() {
    let (conn, portal) = connect(SimManager::legacy());
    let before = commands_sent(&portal);

    let err = conn
        .create::<Dpci>(
            None,
            &DpciConfig {
                num_of_priorities: 3,
            },
        )
        .expect_err("create should fail");
    assert_eq!(err.class(), ErrorClass::ContractViolation);
    assert_eq!(commands_sent(&portal), before);
}

#[test]
fn token_display_is_hex() {
    let token = Token::new(0x00ab).expect("token should be valid");
    assert_eq!(token.to_string(), "0x00ab");
}
