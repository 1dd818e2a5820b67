use crate::registry::registry_error::RegistryError;
use crate::registry::registry_types::{
    BrokenPairing, KioskStatus, PairingPhase, Registration, RegistrySnapshot, Released, Role,
};
use kiosklink_core::{Connection, Customer, Kiosk, SessionId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Pairing {
    customer: Customer,
    phase: PairingPhase,
}

/// The broker's tables. Only the registry event loop touches them, so every
/// method here runs without interleaving.
///
/// Invariants kept by every method:
/// - a pairing's kiosk is in `kiosks` and its customer is in `customers`;
/// - a customer appears in at most one pairing.
#[derive(Debug, Default)]
pub(crate) struct RegistryTables {
    kiosks: HashMap<Kiosk, SessionId>,
    customers: HashMap<Customer, SessionId>,
    pairings: HashMap<Kiosk, Pairing>,
}

impl RegistryTables {
    pub(crate) fn register_kiosk(&mut self, kiosk: Kiosk, session: SessionId) -> Registration {
        let replaced = self
            .kiosks
            .insert(kiosk.clone(), session)
            .filter(|previous| *previous != session);

        let orphaned = match replaced {
            Some(_) => self.pairings.remove(&kiosk).map(|pairing| {
                let counterpart = self.customers.remove(&pairing.customer);
                BrokenPairing {
                    connection: Connection::new(kiosk, pairing.customer),
                    phase: pairing.phase,
                    lost: Role::Kiosk,
                    counterpart,
                }
            }),
            None => None,
        };

        Registration { replaced, orphaned }
    }

    pub(crate) fn kiosk_status(&self, kiosk: &Kiosk) -> KioskStatus {
        if !self.kiosks.contains_key(kiosk) {
            KioskStatus::NotFound
        } else if self.pairings.contains_key(kiosk) {
            KioskStatus::Busy
        } else {
            KioskStatus::Free
        }
    }

    pub(crate) fn bind_customer(
        &mut self,
        customer: Customer,
        session: SessionId,
    ) -> Result<(), RegistryError> {
        match self.customers.get(&customer) {
            Some(existing) if *existing != session => Err(RegistryError::CustomerInUse),
            _ => {
                self.customers.insert(customer, session);
                Ok(())
            }
        }
    }

    pub(crate) fn release_customer(&mut self, customer: &Customer) -> Option<SessionId> {
        let session = self.customers.remove(customer)?;
        self.pairings.retain(|_, pairing| &pairing.customer != customer);
        Some(session)
    }

    pub(crate) fn reserve_kiosk(
        &mut self,
        connection: &Connection,
        session: SessionId,
    ) -> Result<SessionId, RegistryError> {
        let kiosk_session = *self
            .kiosks
            .get(&connection.kiosk)
            .ok_or(RegistryError::KioskNotFound)?;
        if self.pairings.contains_key(&connection.kiosk) {
            return Err(RegistryError::KioskBusy);
        }
        if self.paired_kiosk(&connection.customer).is_some() {
            return Err(RegistryError::CustomerInUse);
        }

        self.bind_customer(connection.customer.clone(), session)?;
        self.pairings.insert(
            connection.kiosk.clone(),
            Pairing {
                customer: connection.customer.clone(),
                phase: PairingPhase::Connecting,
            },
        );
        Ok(kiosk_session)
    }

    pub(crate) fn try_create_connection(
        &mut self,
        connection: &Connection,
    ) -> Result<SessionId, RegistryError> {
        if !self.kiosks.contains_key(&connection.kiosk) {
            return Err(RegistryError::KioskNotFound);
        }
        let customer_session = *self
            .customers
            .get(&connection.customer)
            .ok_or(RegistryError::CustomerNotBound)?;

        match self.pairings.get_mut(&connection.kiosk) {
            Some(pairing) if pairing.customer == connection.customer => match pairing.phase {
                PairingPhase::Connecting | PairingPhase::Connected => {
                    pairing.phase = PairingPhase::Connected;
                }
                PairingPhase::Disconnecting => return Err(RegistryError::Mismatch),
            },
            Some(_) => return Err(RegistryError::KioskBusy),
            None => {
                if self.paired_kiosk(&connection.customer).is_some() {
                    return Err(RegistryError::CustomerInUse);
                }
                self.pairings.insert(
                    connection.kiosk.clone(),
                    Pairing {
                        customer: connection.customer.clone(),
                        phase: PairingPhase::Connected,
                    },
                );
            }
        }
        Ok(customer_session)
    }

    pub(crate) fn abort_connect(&mut self, connection: &Connection) -> Option<SessionId> {
        if !self.has_pairing(connection, &[PairingPhase::Connecting]) {
            return None;
        }
        self.pairings.remove(&connection.kiosk);
        self.customers.remove(&connection.customer)
    }

    pub(crate) fn begin_disconnect(
        &mut self,
        connection: &Connection,
        session: SessionId,
    ) -> Result<SessionId, RegistryError> {
        let kiosk_session = *self
            .kiosks
            .get(&connection.kiosk)
            .ok_or(RegistryError::KioskNotFound)?;
        if self.customers.get(&connection.customer) != Some(&session) {
            return Err(RegistryError::Mismatch);
        }

        match self.pairings.get_mut(&connection.kiosk) {
            Some(pairing) if pairing.customer == connection.customer => match pairing.phase {
                PairingPhase::Connected | PairingPhase::Disconnecting => {
                    pairing.phase = PairingPhase::Disconnecting;
                    Ok(kiosk_session)
                }
                PairingPhase::Connecting => Err(RegistryError::Mismatch),
            },
            _ => Err(RegistryError::Mismatch),
        }
    }

    pub(crate) fn break_connection(
        &mut self,
        connection: &Connection,
    ) -> Result<(), RegistryError> {
        match self.pairings.get(&connection.kiosk) {
            Some(pairing) if pairing.customer == connection.customer => {
                self.pairings.remove(&connection.kiosk);
                Ok(())
            }
            _ => Err(RegistryError::Mismatch),
        }
    }

    /// Breaks the pairing and releases its customer in one step.
    pub(crate) fn finish_disconnect(
        &mut self,
        connection: &Connection,
    ) -> Result<Option<SessionId>, RegistryError> {
        self.break_connection(connection)?;
        Ok(self.customers.remove(&connection.customer))
    }

    pub(crate) fn lookup_kiosk_session(&self, kiosk: &Kiosk) -> Option<SessionId> {
        self.kiosks.get(kiosk).copied()
    }

    pub(crate) fn lookup_customer_session(&self, customer: &Customer) -> Option<SessionId> {
        self.customers.get(customer).copied()
    }

    /// Destination for a relayed frame, or `None` when the frame does not
    /// belong to the live pairing or was not sent from that pairing's socket.
    pub(crate) fn route(
        &self,
        connection: &Connection,
        from: Role,
        session: SessionId,
    ) -> Option<SessionId> {
        // The pairing stays live until the kiosk answers a disconnect.
        if !self.has_pairing(
            connection,
            &[
                PairingPhase::Connecting,
                PairingPhase::Connected,
                PairingPhase::Disconnecting,
            ],
        ) {
            return None;
        }
        let kiosk_session = self.kiosks.get(&connection.kiosk).copied()?;
        let customer_session = self.customers.get(&connection.customer).copied()?;

        match from {
            Role::Kiosk if kiosk_session == session => Some(customer_session),
            Role::Customer if customer_session == session => Some(kiosk_session),
            _ => None,
        }
    }

    pub(crate) fn release_session(&mut self, session: SessionId) -> Released {
        let kiosks: Vec<Kiosk> = self
            .kiosks
            .iter()
            .filter(|(_, owner)| **owner == session)
            .map(|(kiosk, _)| kiosk.clone())
            .collect();
        let customers: Vec<Customer> = self
            .customers
            .iter()
            .filter(|(_, owner)| **owner == session)
            .map(|(customer, _)| customer.clone())
            .collect();

        let mut broken = Vec::new();

        for kiosk in &kiosks {
            self.kiosks.remove(kiosk);
            if let Some(pairing) = self.pairings.remove(kiosk) {
                let counterpart = self.customers.remove(&pairing.customer);
                broken.push(BrokenPairing {
                    connection: Connection::new(kiosk.clone(), pairing.customer),
                    phase: pairing.phase,
                    lost: Role::Kiosk,
                    counterpart,
                });
            }
        }

        for customer in &customers {
            self.customers.remove(customer);
            if let Some(kiosk) = self.paired_kiosk(customer) {
                if let Some(pairing) = self.pairings.remove(&kiosk) {
                    let counterpart = self.kiosks.get(&kiosk).copied();
                    broken.push(BrokenPairing {
                        connection: Connection::new(kiosk, customer.clone()),
                        phase: pairing.phase,
                        lost: Role::Customer,
                        counterpart,
                    });
                }
            }
        }

        Released {
            kiosks,
            customers,
            broken,
        }
    }

    pub(crate) fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            kiosks: self.kiosks.len(),
            customers: self.customers.len(),
            pairings: self
                .pairings
                .iter()
                .map(|(kiosk, pairing)| {
                    (
                        Connection::new(kiosk.clone(), pairing.customer.clone()),
                        pairing.phase,
                    )
                })
                .collect(),
        }
    }

    fn paired_kiosk(&self, customer: &Customer) -> Option<Kiosk> {
        self.pairings
            .iter()
            .find(|(_, pairing)| &pairing.customer == customer)
            .map(|(kiosk, _)| kiosk.clone())
    }

    fn has_pairing(&self, connection: &Connection, phases: &[PairingPhase]) -> bool {
        self.pairings
            .get(&connection.kiosk)
            .is_some_and(|pairing| {
                pairing.customer == connection.customer && phases.contains(&pairing.phase)
            })
    }
}
