//! `SubmitProof` and `VerifyProof`.

use zkr_core::ProofId;
use zkr_store::{Record, StoreError};

use super::Keeper;
use crate::capabilities::{IdentityValidator, Ledger};
use crate::context::{BlockContext, Event, EventKind};
use crate::error::RegistryError;
use crate::msgs::{MsgSubmitProof, MsgSubmitProofResponse, MsgVerifyProof, MsgVerifyProofResponse};
use crate::proof::{ProofStatus, ZkProof};

impl<I: IdentityValidator, L: Ledger> Keeper<I, L> {
    /// Submit a proof. When `msg.request_id` is set the named request is
    /// completed by the same call, or the whole submission is rejected.
    pub fn submit_proof(
        &mut self,
        ctx: &mut BlockContext,
        msg: MsgSubmitProof,
    ) -> Result<MsgSubmitProofResponse, RegistryError> {
        tracing::debug!(
            prover = %msg.prover,
            circuit_id = %msg.circuit_id,
            proof_type = %msg.proof_type,
            "submit_proof"
        );
        let now = ctx.time;

        self.require_prover(&msg.prover)?;
        if let Some(verifier) = &msg.verifier {
            self.require_verifier(verifier)?;
        }

        let circuit = self
            .state
            .circuits
            .get(&msg.circuit_id)
            .ok_or_else(|| RegistryError::InvalidCircuit(msg.circuit_id.to_string()))?;
        if !circuit.active {
            return Err(RegistryError::CircuitInactive(circuit.id.to_string()));
        }
        let params = &self.state.params;
        if !params.allows_proof_type(&msg.proof_type) {
            return Err(RegistryError::InvalidProofType(msg.proof_type.to_string()));
        }
        if !circuit.supports(&msg.proof_type) {
            return Err(RegistryError::InvalidProofType(format!(
                "{} does not support {}",
                circuit.id, msg.proof_type
            )));
        }
        if msg.proof_data.is_empty() {
            return Err(RegistryError::MalformedProof("proof data is empty".into()));
        }
        let size = msg.proof_data.len() as u64;
        if size > params.max_proof_size {
            return Err(RegistryError::ProofTooLarge {
                size,
                max: params.max_proof_size,
            });
        }
        let fee = params.proof_submission_fee.clone();
        if let Some(offered) = &msg.fee {
            if !offered.covers(&fee) {
                return Err(RegistryError::InsufficientFees(format!(
                    "offered {offered}, required {fee}"
                )));
            }
        }
        let valid_to = match params.proof_validity_period_secs {
            0 => None,
            secs => Some(now.checked_add_secs(secs)?),
        };

        let n = self.state.proofs.next_sequence()?;
        let id = ProofId::from_sequence(n);
        if self.state.proofs.contains(&id) {
            return Err(StoreError::Duplicate {
                table: ZkProof::TABLE,
                id: id.to_string(),
            }
            .into());
        }

        let proof = ZkProof {
            id: id.clone(),
            circuit_id: msg.circuit_id,
            prover: msg.prover,
            verifier: msg.verifier,
            proof_type: msg.proof_type,
            proof_data: msg.proof_data,
            public_inputs: msg.public_inputs,
            verification_context: msg.verification_context,
            status: ProofStatus::Pending,
            valid_from: now,
            valid_to,
            verified_at: None,
            verified_by: None,
            verification_result: None,
            tags: msg.tags,
            metadata: msg.metadata,
            created_at: now,
            updated_at: now,
            fee_paid: fee.clone(),
            request_id: msg.request_id,
        };

        let mut circuit = circuit.clone();
        circuit.proof_count = circuit.proof_count.saturating_add(1);

        let request = match &proof.request_id {
            Some(request_id) => {
                let request = self
                    .state
                    .requests
                    .get(request_id)
                    .ok_or_else(|| RegistryError::InvalidProofRequest(request_id.to_string()))?;
                request.check_fulfilment(&proof, now)?;
                let mut request = request.clone();
                request.complete(&id, now);
                Some(request)
            }
            None => None,
        };

        let mut events = vec![Event::new(EventKind::SubmitProof)
            .attr("proof_id", &proof.id)
            .attr("prover", &proof.prover)
            .attr("circuit_id", &proof.circuit_id)
            .attr("proof_type", &proof.proof_type)];
        if let Some(request) = &request {
            events.push(
                Event::new(EventKind::CompleteProofRequest)
                    .attr("request_id", &request.id)
                    .attr("proof_id", &id)
                    .attr("prover", &proof.prover),
            );
        }
        let prover = proof.prover.clone();

        self.charged(&prover, &fee, "proof submission fee", |k| {
            k.state.record_submission(n, proof, circuit, request)
        })?;

        for event in events {
            ctx.emit(event);
        }
        tracing::info!(proof_id = %id, prover = %prover, "proof submitted");
        Ok(MsgSubmitProofResponse { proof_id: id })
    }

    /// Adjudicate a pending proof through the verifier registered for its
    /// proof type.
    ///
    /// The backend runs before the fee is charged. A backend error leaves
    /// the proof `pending` and nothing is charged.
    pub fn verify_proof(
        &mut self,
        ctx: &mut BlockContext,
        msg: MsgVerifyProof,
    ) -> Result<MsgVerifyProofResponse, RegistryError> {
        tracing::debug!(verifier = %msg.verifier, proof_id = %msg.proof_id, "verify_proof");
        let now = ctx.time;

        self.require_verifier(&msg.verifier)?;
        let proof = self
            .state
            .proofs
            .get(&msg.proof_id)
            .ok_or_else(|| RegistryError::InvalidProof(msg.proof_id.to_string()))?;
        proof.require_verifiable(now)?;
        if let Some(designated) = &proof.verifier {
            if designated != &msg.verifier {
                return Err(RegistryError::Unauthorized(format!(
                    "{} is not the designated verifier of {}",
                    msg.verifier, proof.id
                )));
            }
        }
        let circuit = self
            .state
            .circuits
            .get(&proof.circuit_id)
            .ok_or_else(|| RegistryError::InvalidCircuit(proof.circuit_id.to_string()))?;

        let valid = self
            .verifiers
            .verify(&circuit.descriptor(), &proof.envelope())
            .map_err(|e| {
                tracing::warn!(proof_id = %proof.id, error = %e, "verification backend failed");
                RegistryError::ProofVerificationFailed(e)
            })?;

        let mut proof = proof.clone();
        proof.adjudicate(valid, &msg.verifier, now)?;
        let mut circuit = circuit.clone();
        circuit.verified_count = circuit.verified_count.saturating_add(1);
        let status = proof.status;

        let fee = self.state.params.proof_verification_fee.clone();
        self.charged(&msg.verifier, &fee, "proof verification fee", |k| {
            k.state.record_verification(proof, circuit)
        })?;

        ctx.emit(
            Event::new(EventKind::VerifyProof)
                .attr("proof_id", &msg.proof_id)
                .attr("verifier", &msg.verifier)
                .attr("status", status)
                .attr("valid", valid),
        );
        tracing::info!(
            proof_id = %msg.proof_id,
            verifier = %msg.verifier,
            %status,
            "proof verified"
        );
        Ok(MsgVerifyProofResponse { status, valid })
    }
}
