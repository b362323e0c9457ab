use clap::{Args, Subcommand};
use mcprims_cmd::Scheme;
use mcprims_session::{Creatable, Described};

use crate::connect::{CliConnection, ConnectionArgs};
use crate::exit::{CliError, CliResult, FAILURE};
use crate::output::OutputFormat;

pub mod dpaiop;
pub mod dpci;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show CLI and MC firmware version information.
    Version(VersionArgs),
    /// Manage DPCI (command interface) objects.
    #[command(subcommand)]
    Dpci(DpciCommand),
    /// Manage DPAIOP (AIOP controller) objects.
    #[command(subcommand)]
    Dpaiop(DpaiopCommand),
}

pub fn run(command: Command, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Version(args) => version::run(args, conn, format),
        Command::Dpci(command) => dpci::run(command, conn, format),
        Command::Dpaiop(command) => dpaiop::run(command, conn, format),
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Also query the MC firmware version and command set.
    #[arg(long)]
    pub mc: bool,
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug)]
pub struct ObjectArgs {
    /// Object name, e.g. `dpci.5`.
    pub object: String,
}

#[derive(Subcommand, Debug)]
pub enum DpciCommand {
    /// Show attributes, peer and link state.
    Info(ObjectArgs),
    /// Create a DPCI in the root container.
    Create(DpciCreateArgs),
    /// Destroy a DPCI.
    Destroy(ObjectArgs),
}

#[derive(Args, Debug)]
pub struct DpciCreateArgs {
    /// Number of receive priorities (1 or 2).
    #[arg(long, default_value_t = 1)]
    pub num_priorities: u8,
}

#[derive(Subcommand, Debug)]
pub enum DpaiopCommand {
    /// Show attributes, state and service-layer version.
    Info(ObjectArgs),
    /// Create a DPAIOP in the root container.
    Create(DpaiopCreateArgs),
    /// Destroy a DPAIOP.
    Destroy(ObjectArgs),
    /// Reset the AIOP tile.
    Reset(ObjectArgs),
}

#[derive(Args, Debug)]
pub struct DpaiopCreateArgs {
    /// AIOP tile to control.
    #[arg(long, default_value_t = 0)]
    pub aiop_id: u32,
    /// Container the AIOP runs in.
    #[arg(long, default_value_t = 0)]
    pub aiop_container_id: u32,
}

/// Refuse to destroy an object the caller relies on, as named with
/// `--protect`.
pub fn ensure_not_in_use(args: &ConnectionArgs, name: &str) -> CliResult<()> {
    if args.protect.iter().any(|p| p == name) {
        return Err(CliError::new(
            FAILURE,
            format!("{name} is in use and cannot be destroyed"),
        ));
    }
    Ok(())
}

/// Create a `K` where the command set expects it: directly under the
/// legacy set, inside the root container otherwise.
pub fn create_object<K>(conn: &CliConnection, config: &K::Config) -> mcprims_session::Result<u32>
where
    K: Creatable + Described,
{
    match conn.scheme() {
        Scheme::Legacy => conn.create::<K>(None, config),
        Scheme::Container => {
            let root = conn.open_root_container()?;
            let created = conn.create::<K>(Some(&root), config);
            root.finish(created)
        }
    }
}

pub fn destroy_object<K: Creatable>(conn: &CliConnection, id: u32) -> mcprims_session::Result<()> {
    match conn.scheme() {
        Scheme::Legacy => conn.destroy::<K>(None, id),
        Scheme::Container => {
            let root = conn.open_root_container()?;
            let destroyed = conn.destroy::<K>(Some(&root), id);
            root.finish(destroyed)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use mcprims_session::{Dpci, DpciConfig, McConnection, McTransport};
    use mcprims_sim::SimManager;
    use mcprims_transport::SharedPortal;

    use super::*;

    fn sim_connection(sim: SimManager) -> (CliConnection, SharedPortal<SimManager>) {
        let portal = SharedPortal::new(sim);
        let transport: Box<dyn McTransport + Send> = Box::new(portal.clone());
        let conn = McConnection::connect(transport).expect("connect should succeed");
        (conn, portal)
    }

    fn commands_sent(portal: &SharedPortal<SimManager>) -> u64 {
        portal
            .with(|sim| sim.commands_sent())
            .expect("portal should be usable")
    }

    #[test]
    fn legacy_lifecycle_skips_the_root_container() {
        let (conn, portal) = sim_connection(SimManager::legacy());

        let before = commands_sent(&portal);
        let id = create_object::<Dpci>(&conn, &DpciConfig::default())
            .expect("create should succeed");
        // create, get_attributes, close
        assert_eq!(commands_sent(&portal) - before, 3);

        let before = commands_sent(&portal);
        destroy_object::<Dpci>(&conn, id).expect("destroy should succeed");
        // open, destroy
        assert_eq!(commands_sent(&portal) - before, 2);
    }

    #[test]
    fn container_lifecycle_goes_through_the_root_container() {
        let (conn, portal) = sim_connection(SimManager::container());

        let before = commands_sent(&portal);
        let id = create_object::<Dpci>(&conn, &DpciConfig::default())
            .expect("create should succeed");
        // get_container_id, open, create, close
        assert_eq!(commands_sent(&portal) - before, 4);
        assert!(portal
            .with(|sim| sim.contains(mcprims_cmd::ObjectType::Dpci, id))
            .expect("portal should be usable"));

        destroy_object::<Dpci>(&conn, id).expect("destroy should succeed");
        assert_eq!(
            portal
                .with(|sim| sim.open_sessions())
                .expect("portal should be usable"),
            0
        );
    }

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        connection: ConnectionArgs,
    }

    fn connection_args(argv: &[&str]) -> ConnectionArgs {
        Harness::try_parse_from(argv)
            .expect("connection args should parse")
            .connection
    }

    #[test]
    fn protected_objects_are_refused() {
        let args = connection_args(&["mcprims", "--protect", "dpci.0,dpaiop.0"]);

        let err = ensure_not_in_use(&args, "dpaiop.0")
            .expect_err("protected object should be refused");
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("dpaiop.0"));
    }

    #[test]
    fn unprotected_objects_pass() {
        let args = connection_args(&["mcprims", "--protect", "dpci.0"]);
        ensure_not_in_use(&args, "dpci.1").expect("unprotected object should pass");
    }
}
