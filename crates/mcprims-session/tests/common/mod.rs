#![allow(dead_code)]

use mcprims_session::McConnection;
use mcprims_sim::SimManager;
use mcprims_transport::SharedPortal;

pub type SimConnection = McConnection<SharedPortal<SimManager>>;

/// Connect to `sim`, keeping a handle for inspecting it afterwards.
pub fn connect(sim: SimManager) -> (SimConnection, SharedPortal<SimManager>) {
    let portal = SharedPortal::new(sim);
    let conn = McConnection::connect(portal.clone()).expect("connect should succeed");
    (conn, portal)
}

pub fn commands_sent(portal: &SharedPortal<SimManager>) -> u64 {
    portal
        .with(|sim| sim.commands_sent())
        .expect("portal should be usable")
}

pub fn open_sessions(portal: &SharedPortal<SimManager>) -> usize {
    portal
        .with(|sim| sim.open_sessions())
        .expect("portal should be usable")
}
