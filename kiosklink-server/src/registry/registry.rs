use crate::registry::registry_command::RegistryCommand;
use crate::registry::tables::RegistryTables;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Single owner of the kiosk, customer and pairing tables.
///
/// Commands are applied one at a time, which makes every registry operation
/// atomic with respect to every other.
pub struct Registry {
    tables: RegistryTables,
    command_rx: mpsc::Receiver<RegistryCommand>,
}

impl Registry {
    pub fn new(command_rx: mpsc::Receiver<RegistryCommand>) -> Self {
        Self {
            tables: RegistryTables::default(),
            command_rx,
        }
    }

    pub async fn run(mut self) {
        info!("Registry event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }

        info!("Registry event loop finished");
    }

    // A dropped reply receiver only means the caller's socket went away.
    fn handle_command(&mut self, cmd: RegistryCommand) {
        match cmd {
            RegistryCommand::RegisterKiosk {
                kiosk,
                session,
                reply,
            } => {
                debug!("Registering {} on {}", kiosk, session);
                let _ = reply.send(self.tables.register_kiosk(kiosk, session));
            }
            RegistryCommand::KioskStatus { kiosk, reply } => {
                let _ = reply.send(self.tables.kiosk_status(&kiosk));
            }
            RegistryCommand::BindCustomer {
                customer,
                session,
                reply,
            } => {
                let _ = reply.send(self.tables.bind_customer(customer, session));
            }
            RegistryCommand::ReleaseCustomer { customer, reply } => {
                let _ = reply.send(self.tables.release_customer(&customer));
            }
            RegistryCommand::ReserveKiosk {
                connection,
                session,
                reply,
            } => {
                let _ = reply.send(self.tables.reserve_kiosk(&connection, session));
            }
            RegistryCommand::TryCreateConnection { connection, reply } => {
                let _ = reply.send(self.tables.try_create_connection(&connection));
            }
            RegistryCommand::AbortConnect { connection, reply } => {
                let _ = reply.send(self.tables.abort_connect(&connection));
            }
            RegistryCommand::BeginDisconnect {
                connection,
                session,
                reply,
            } => {
                let _ = reply.send(self.tables.begin_disconnect(&connection, session));
            }
            RegistryCommand::BreakConnection { connection, reply } => {
                let _ = reply.send(self.tables.break_connection(&connection));
            }
            RegistryCommand::FinishDisconnect { connection, reply } => {
                let _ = reply.send(self.tables.finish_disconnect(&connection));
            }
            RegistryCommand::LookupKiosk { kiosk, reply } => {
                let _ = reply.send(self.tables.lookup_kiosk_session(&kiosk));
            }
            RegistryCommand::LookupCustomer { customer, reply } => {
                let _ = reply.send(self.tables.lookup_customer_session(&customer));
            }
            RegistryCommand::Route {
                connection,
                from,
                session,
                reply,
            } => {
                let _ = reply.send(self.tables.route(&connection, from, session));
            }
            RegistryCommand::ReleaseSession { session, reply } => {
                let released = self.tables.release_session(session);
                if !released.is_empty() {
                    debug!("Released session {}: {:?}", session, released);
                }
                let _ = reply.send(released);
            }
            RegistryCommand::Snapshot { reply } => {
                let _ = reply.send(self.tables.snapshot());
            }
        }
    }
}
