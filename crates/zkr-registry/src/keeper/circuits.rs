//! `CreateCircuit` and `UpdateCircuit`.

use zkr_core::CircuitId;

use super::Keeper;
use crate::capabilities::{IdentityValidator, Ledger};
use crate::circuit::{Circuit, InputSpec};
use crate::context::{BlockContext, Event, EventKind};
use crate::error::RegistryError;
use crate::msgs::{
    MsgCreateCircuit, MsgCreateCircuitResponse, MsgUpdateCircuit, MsgUpdateCircuitResponse,
};

/// Maximum circuit name length in bytes.
pub const MAX_CIRCUIT_NAME_LEN: usize = 256;
/// Maximum circuit description length in bytes.
pub const MAX_CIRCUIT_DESCRIPTION_LEN: usize = 4096;

impl<I: IdentityValidator, L: Ledger> Keeper<I, L> {
    /// Register a circuit. Returns the generated `circuit-N` id.
    pub fn create_circuit(
        &mut self,
        ctx: &mut BlockContext,
        msg: MsgCreateCircuit,
    ) -> Result<MsgCreateCircuitResponse, RegistryError> {
        tracing::debug!(creator = %msg.creator, circuit_type = %msg.circuit_type, "create_circuit");

        self.require_prover(&msg.creator)?;
        validate_name(&msg.name)?;
        validate_description(&msg.description)?;
        validate_input_specs(&msg.public_input_spec)?;
        validate_input_specs(&msg.private_input_spec)?;

        let params = &self.state.params;
        let size = msg.circuit_data.len() as u64;
        if size > params.max_circuit_size {
            return Err(RegistryError::CircuitTooLarge {
                size,
                max: params.max_circuit_size,
            });
        }
        if !params.allows_circuit_type(&msg.circuit_type) {
            return Err(RegistryError::InvalidCircuitType(msg.circuit_type.to_string()));
        }
        if msg.supported_proof_types.is_empty() {
            return Err(RegistryError::InvalidProofType(
                "circuit must support at least one proof type".into(),
            ));
        }
        if let Some(t) = msg
            .supported_proof_types
            .iter()
            .find(|t| !params.allows_proof_type(t))
        {
            return Err(RegistryError::InvalidProofType(t.to_string()));
        }
        let public_input_count = count_inputs(&msg.public_input_spec)?;
        let private_input_count = count_inputs(&msg.private_input_spec)?;

        let n = self.state.circuits.next_sequence()?;
        let id = CircuitId::from_sequence(n);
        if self.state.circuits.contains(&id) {
            return Err(RegistryError::CircuitAlreadyExists(id.to_string()));
        }

        let circuit = Circuit {
            id: id.clone(),
            creator: msg.creator,
            name: msg.name,
            description: msg.description,
            circuit_type: msg.circuit_type,
            supported_proof_types: msg.supported_proof_types.into_iter().collect(),
            circuit_data: msg.circuit_data,
            parameters: msg.parameters,
            public_input_spec: msg.public_input_spec,
            private_input_spec: msg.private_input_spec,
            constraint_count: msg.constraint_count,
            public_input_count,
            private_input_count,
            verification_method: msg.verification_method,
            trusted_setup: msg.trusted_setup,
            version: 1,
            active: true,
            created_at: ctx.time,
            updated_at: ctx.time,
            block_height: ctx.height,
            tx_hash: ctx.tx_hash.clone(),
            proof_count: 0,
            verified_count: 0,
        };
        let event = Event::new(EventKind::CreateCircuit)
            .attr("circuit_id", &circuit.id)
            .attr("creator", &circuit.creator)
            .attr("circuit_type", &circuit.circuit_type);
        let creator = circuit.creator.clone();

        let fee = self.state.params.circuit_creation_fee.clone();
        self.charged(&creator, &fee, "circuit creation fee", |k| {
            k.state.circuits.insert_sequenced(n, circuit)
        })?;

        ctx.emit(event);
        tracing::info!(circuit_id = %id, creator = %creator, "circuit created");
        Ok(MsgCreateCircuitResponse { circuit_id: id })
    }

    /// Edit circuit metadata or toggle `active`. Creator only; no fee.
    pub fn update_circuit(
        &mut self,
        ctx: &mut BlockContext,
        msg: MsgUpdateCircuit,
    ) -> Result<MsgUpdateCircuitResponse, RegistryError> {
        tracing::debug!(creator = %msg.creator, circuit_id = %msg.circuit_id, "update_circuit");

        let current = self
            .state
            .circuits
            .get(&msg.circuit_id)
            .ok_or_else(|| RegistryError::InvalidCircuit(msg.circuit_id.to_string()))?;
        if current.creator != msg.creator {
            return Err(RegistryError::Unauthorized(format!(
                "{} is not the creator of {}",
                msg.creator, msg.circuit_id
            )));
        }
        if let Some(name) = &msg.name {
            validate_name(name)?;
        }
        if let Some(description) = &msg.description {
            validate_description(description)?;
        }

        let mut updated = current.clone();
        if let Some(name) = msg.name {
            updated.name = name;
        }
        if let Some(description) = msg.description {
            updated.description = description;
        }
        if let Some(active) = msg.active {
            updated.active = active;
        }
        updated.version = updated.version.saturating_add(1);
        updated.updated_at = ctx.time;
        let version = updated.version;
        let active = updated.active;

        self.state.circuits.update(updated)?;

        ctx.emit(
            Event::new(EventKind::UpdateCircuit)
                .attr("circuit_id", &msg.circuit_id)
                .attr("creator", &msg.creator)
                .attr("version", version)
                .attr("active", active),
        );
        tracing::info!(circuit_id = %msg.circuit_id, version, active, "circuit updated");
        Ok(MsgUpdateCircuitResponse { version })
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.trim().is_empty() {
        return Err(RegistryError::InvalidCircuitDefinition(
            "name must not be empty".into(),
        ));
    }
    if name.len() > MAX_CIRCUIT_NAME_LEN {
        return Err(RegistryError::InvalidCircuitDefinition(format!(
            "name exceeds {MAX_CIRCUIT_NAME_LEN} bytes"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), RegistryError> {
    if description.len() > MAX_CIRCUIT_DESCRIPTION_LEN {
        return Err(RegistryError::InvalidCircuitDefinition(format!(
            "description exceeds {MAX_CIRCUIT_DESCRIPTION_LEN} bytes"
        )));
    }
    Ok(())
}

fn validate_input_specs(specs: &[InputSpec]) -> Result<(), RegistryError> {
    if let Some(spec) = specs.iter().find(|s| s.name.trim().is_empty()) {
        return Err(RegistryError::InvalidCircuitDefinition(format!(
            "input spec of type {:?} has an empty name",
            spec.data_type
        )));
    }
    Ok(())
}

fn count_inputs(specs: &[InputSpec]) -> Result<u32, RegistryError> {
    u32::try_from(specs.len())
        .map_err(|_| RegistryError::InvalidCircuitDefinition("too many inputs".into()))
}

