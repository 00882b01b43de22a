//! `CreateProofRequest`.

use zkr_core::RequestId;
use zkr_store::{Record, StoreError};

use super::Keeper;
use crate::capabilities::{IdentityValidator, Ledger};
use crate::context::{BlockContext, Event, EventKind};
use crate::error::RegistryError;
use crate::msgs::{MsgCreateProofRequest, MsgCreateProofRequestResponse};
use crate::request::{ProofRequest, RequestStatus};

impl<I: IdentityValidator, L: Ledger> Keeper<I, L> {
    /// Open a proof request addressed to `msg.target_prover`.
    ///
    /// The reward is recorded on the request for the parties to settle; the
    /// registry does not escrow it.
    pub fn create_proof_request(
        &mut self,
        ctx: &mut BlockContext,
        msg: MsgCreateProofRequest,
    ) -> Result<MsgCreateProofRequestResponse, RegistryError> {
        tracing::debug!(
            requester = %msg.requester,
            target_prover = %msg.target_prover,
            circuit_id = %msg.circuit_id,
            "create_proof_request"
        );
        let now = ctx.time;

        self.require_verifier(&msg.requester)?;
        self.require_prover(&msg.target_prover)?;
        let circuit = self
            .state
            .circuits
            .get(&msg.circuit_id)
            .ok_or_else(|| RegistryError::InvalidCircuit(msg.circuit_id.to_string()))?;
        if !circuit.active {
            return Err(RegistryError::CircuitInactive(circuit.id.to_string()));
        }
        if msg.deadline < now {
            return Err(RegistryError::ProofRequestExpired(format!(
                "deadline {} is before block time {now}",
                msg.deadline
            )));
        }
        if msg.challenge.trim().is_empty() {
            return Err(RegistryError::MalformedProofRequest(
                "challenge must not be empty".into(),
            ));
        }
        if !self.state.params.allows_proof_type(&msg.required_proof_type)
            || !circuit.supports(&msg.required_proof_type)
        {
            return Err(RegistryError::InvalidProofType(format!(
                "{} cannot be proven with {}",
                circuit.id, msg.required_proof_type
            )));
        }
        msg.reward
            .validate()
            .map_err(|e| RegistryError::MalformedProofRequest(format!("reward: {e}")))?;

        let n = self.state.requests.next_sequence()?;
        let id = RequestId::from_sequence(n);
        if self.state.requests.contains(&id) {
            return Err(StoreError::Duplicate {
                table: ProofRequest::TABLE,
                id: id.to_string(),
            }
            .into());
        }

        let request = ProofRequest {
            id: id.clone(),
            requester: msg.requester,
            target_prover: msg.target_prover,
            circuit_id: msg.circuit_id,
            required_proof_type: msg.required_proof_type,
            challenge: msg.challenge,
            required_public_inputs: msg.required_public_inputs,
            deadline: msg.deadline,
            reward: msg.reward,
            status: RequestStatus::Pending,
            proof_id: None,
            created_at: now,
            completed_at: None,
        };
        let event = Event::new(EventKind::CreateProofRequest)
            .attr("request_id", &request.id)
            .attr("requester", &request.requester)
            .attr("target_prover", &request.target_prover)
            .attr("circuit_id", &request.circuit_id)
            .attr("reward", &request.reward);
        let requester = request.requester.clone();

        let fee = self.state.params.proof_request_fee.clone();
        self.charged(&requester, &fee, "proof request fee", |k| {
            k.state.requests.insert_sequenced(n, request)
        })?;

        ctx.emit(event);
        tracing::info!(request_id = %id, requester = %requester, "proof request created");
        Ok(MsgCreateProofRequestResponse { request_id: id })
    }
}
