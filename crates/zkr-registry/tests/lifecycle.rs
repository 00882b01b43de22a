//! End-to-end handler scenarios: circuit registration, proof submission and
//! verification, proof requests, fees, lazy expiry and failure atomicity.

mod common;

use common::*;
use zkr_core::{CircuitId, CircuitType, ProofId, ProofType, RequestId};
use zkr_registry::{
    ErrorKind, EventKind, MsgCreateProofRequest, MsgSubmitProof, MsgUpdateCircuit, MsgVerifyProof,
    PageRequest, Params, ProofFilter, ProofStatus, RegistryError, RequestStatus,
};
use zkr_zkp::DigestVerifier;

fn verify_msg(verifier: &str, proof_id: &ProofId) -> MsgVerifyProof {
    MsgVerifyProof {
        verifier: addr(verifier),
        proof_id: proof_id.clone(),
    }
}

fn request_msg(circuit_id: &CircuitId) -> MsgCreateProofRequest {
    MsgCreateProofRequest {
        requester: addr(ALICE),
        target_prover: addr(BOB),
        circuit_id: circuit_id.clone(),
        required_proof_type: ProofType::new("groth16").unwrap(),
        challenge: "nonce-7f3a".into(),
        required_public_inputs: vec!["18".into()],
        deadline: ts("2026-03-10T00:00:00Z"),
        reward: uzkr(500),
    }
}

/// A submission by `prover` answering `request_id` with `challenge` echoed
/// in its public inputs.
fn answer_msg(
    prover: &str,
    circuit_id: &CircuitId,
    request_id: &RequestId,
    challenge: &str,
) -> MsgSubmitProof {
    let mut msg = submit_msg(prover, circuit_id);
    msg.public_inputs = vec!["18".into(), challenge.into()];
    msg.proof_data = DigestVerifier::prove(circuit_id, CIRCUIT_DATA, &msg.public_inputs);
    msg.request_id = Some(request_id.clone());
    msg
}

// ─── Circuits ──────────────────────────────────────────────────────────

#[test]
fn test_create_circuit_assigns_sequence_id() {
    let mut k = keeper();
    let mut ctx = ctx();
    let first = k.create_circuit(&mut ctx, create_circuit_msg(ALICE)).unwrap();
    let second = k.create_circuit(&mut ctx, create_circuit_msg(DAVE)).unwrap();
    assert_eq!(first.circuit_id.as_str(), "circuit-1");
    assert_eq!(second.circuit_id.as_str(), "circuit-2");

    let circuit = k.state().circuit(&first.circuit_id).unwrap();
    assert_eq!(circuit.version, 1);
    assert!(circuit.active);
    assert_eq!(circuit.public_input_count, 1);
    assert_eq!(circuit.tx_hash.as_deref(), Some("deadbeef"));
    assert_eq!(ctx.events_of(EventKind::CreateCircuit).count(), 2);

    let by_alice = k.state().list_circuits(Some(&addr(ALICE)), PageRequest::default());
    assert_eq!(by_alice.total, 1);
}

#[test]
fn test_create_circuit_validation() {
    let mut k = keeper_with(Params {
        max_circuit_size: 8,
        ..Params::default()
    });

    let err = k.create_circuit(&mut ctx(), create_circuit_msg(ALICE)).unwrap_err();
    assert!(matches!(err, RegistryError::CircuitTooLarge { size: 14, max: 8 }));

    let mut msg = create_circuit_msg(ALICE);
    msg.circuit_data = vec![1];
    msg.circuit_type = CircuitType::new("voting").unwrap();
    assert!(matches!(
        k.create_circuit(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidCircuitType(_)
    ));

    let mut msg = create_circuit_msg(ALICE);
    msg.circuit_data = vec![1];
    msg.supported_proof_types = vec![ProofType::new("halo9").unwrap()];
    assert!(matches!(
        k.create_circuit(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidProofType(_)
    ));

    let mut msg = create_circuit_msg(ALICE);
    msg.circuit_data = vec![1];
    msg.name = "   ".into();
    let err = k.create_circuit(&mut ctx(), msg).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let mut msg = create_circuit_msg(STRANGER);
    msg.circuit_data = vec![1];
    assert!(matches!(
        k.create_circuit(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidProver(_)
    ));

    assert!(k.state().circuits().is_empty());
    assert_eq!(k.state().circuits().sequence().last(), 0);
}

#[test]
fn test_update_by_non_creator_unauthorized() {
    let mut k = keeper();
    let id = with_circuit(&mut k);
    let err = k
        .update_circuit(
            &mut ctx(),
            MsgUpdateCircuit {
                creator: addr(BOB),
                circuit_id: id.clone(),
                name: Some("hijacked".into()),
                description: None,
                active: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);
    let circuit = k.state().circuit(&id).unwrap();
    assert_eq!(circuit.version, 1);
    assert_eq!(circuit.name, "age over 18");
}

#[test]
fn test_update_bumps_version_and_deactivation_blocks_submissions() {
    let mut k = keeper();
    let id = with_circuit(&mut k);
    let mut later = ctx_at(ts("2026-03-02T00:00:00Z"));
    let resp = k
        .update_circuit(
            &mut later,
            MsgUpdateCircuit {
                creator: addr(ALICE),
                circuit_id: id.clone(),
                name: None,
                description: Some("v2 wording".into()),
                active: Some(false),
            },
        )
        .unwrap();
    assert_eq!(resp.version, 2);
    let circuit = k.state().circuit(&id).unwrap();
    assert_eq!(circuit.description, "v2 wording");
    assert_eq!(circuit.updated_at, later.time);
    assert!(!circuit.active);

    let err = k.submit_proof(&mut ctx(), submit_msg(BOB, &id)).unwrap_err();
    assert!(matches!(err, RegistryError::CircuitInactive(_)));
    // A retired circuit cannot be asked for proofs either.
    let err = k.create_proof_request(&mut ctx(), request_msg(&id)).unwrap_err();
    assert!(matches!(err, RegistryError::CircuitInactive(_)));
    assert!(k.state().requests().is_empty());
    // Still queryable.
    assert!(k.state().circuit(&id).is_ok());

    let missing = CircuitId::new("circuit-42").unwrap();
    let err = k
        .update_circuit(
            &mut ctx(),
            MsgUpdateCircuit {
                creator: addr(ALICE),
                circuit_id: missing,
                name: None,
                description: None,
                active: Some(true),
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ─── Proofs ────────────────────────────────────────────────────────────

#[test]
fn test_submit_verify_stats_scenario() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let mut ctx = ctx();

    let mut msg = submit_msg(BOB, &circuit_id);
    msg.verifier = Some(addr(CAROL));
    let proof_id = k.submit_proof(&mut ctx, msg).unwrap().proof_id;
    assert_eq!(proof_id.as_str(), "proof-1");

    let proof = k.state().proof(&proof_id, ctx.time).unwrap();
    assert_eq!(proof.status, ProofStatus::Pending);
    assert_eq!(proof.valid_from, ctx.time);
    assert_eq!(
        proof.valid_to,
        Some(ctx.time.checked_add_secs(30 * 24 * 60 * 60).unwrap())
    );

    let resp = k.verify_proof(&mut ctx, verify_msg(CAROL, &proof_id)).unwrap();
    assert_eq!(resp.status, ProofStatus::Valid);
    assert!(resp.valid);
    let proof = k.state().proof(&proof_id, ctx.time).unwrap();
    assert_eq!(proof.verified_by, Some(addr(CAROL)));
    assert_eq!(proof.verification_result, Some(true));

    let err = k.verify_proof(&mut ctx, verify_msg(CAROL, &proof_id)).unwrap_err();
    assert!(matches!(err, RegistryError::ProofAlreadyVerified { .. }));
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    let stats = k.state().circuit_stats(&circuit_id, ctx.time).unwrap();
    assert_eq!(stats.total_proofs, 1);
    assert_eq!(stats.valid_proofs, 1);
    assert_eq!(stats.success_rate, 100.0);

    let circuit = k.state().circuit(&circuit_id).unwrap();
    assert_eq!(circuit.proof_count, 1);
    assert_eq!(circuit.verified_count, 1);

    let kinds: Vec<_> = ctx.events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::SubmitProof, EventKind::VerifyProof]);
    assert!(k.state().check_invariants().is_ok());
}

#[test]
fn test_wrong_proof_bytes_adjudicated_invalid() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let mut msg = submit_msg(BOB, &circuit_id);
    msg.proof_data = vec![0u8; 32];
    let proof_id = k.submit_proof(&mut ctx(), msg).unwrap().proof_id;

    let resp = k.verify_proof(&mut ctx(), verify_msg(CAROL, &proof_id)).unwrap();
    assert_eq!(resp.status, ProofStatus::Invalid);
    assert!(!resp.valid);
    let invalid = k
        .state()
        .proofs_by_status(ProofStatus::Invalid, t0(), PageRequest::default());
    assert_eq!(invalid.total, 1);
}

#[test]
fn test_designated_verifier_enforced() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let mut msg = submit_msg(BOB, &circuit_id);
    msg.verifier = Some(addr(CAROL));
    let proof_id = k.submit_proof(&mut ctx(), msg).unwrap().proof_id;

    let err = k.verify_proof(&mut ctx(), verify_msg(DAVE, &proof_id)).unwrap_err();
    // A registered verifier acting on someone else's proof is an
    // authorization failure, not an identity one.
    assert!(matches!(err, RegistryError::Unauthorized(_)));
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert!(err.to_string().contains("not the designated verifier"));
    assert_eq!(
        k.state().proof(&proof_id, t0()).unwrap().status,
        ProofStatus::Pending
    );

    // The designated verifier still adjudicates it.
    k.verify_proof(&mut ctx(), verify_msg(CAROL, &proof_id)).unwrap();
    assert_eq!(
        k.state().proof(&proof_id, t0()).unwrap().status,
        ProofStatus::Valid
    );
}

#[test]
fn test_submit_against_missing_circuit_changes_nothing() {
    let mut k = keeper();
    with_circuit(&mut k);
    let before = k.export_genesis();
    let missing = CircuitId::new("circuit-9").unwrap();
    let err = k.submit_proof(&mut ctx(), submit_msg(BOB, &missing)).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidCircuit(_)));
    assert_eq!(k.export_genesis(), before);
}

#[test]
fn test_submit_validation() {
    let mut k = keeper_with(Params {
        max_proof_size: 16,
        ..Params::default()
    });
    let circuit_id = with_circuit(&mut k);

    let err = k.submit_proof(&mut ctx(), submit_msg(BOB, &circuit_id)).unwrap_err();
    assert!(matches!(err, RegistryError::ProofTooLarge { size: 32, max: 16 }));

    let mut msg = submit_msg(BOB, &circuit_id);
    msg.proof_data = vec![];
    assert!(matches!(
        k.submit_proof(&mut ctx(), msg).unwrap_err(),
        RegistryError::MalformedProof(_)
    ));

    let mut msg = submit_msg(BOB, &circuit_id);
    msg.proof_data = vec![1];
    msg.proof_type = ProofType::new("bulletproofs").unwrap();
    assert!(matches!(
        k.submit_proof(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidProofType(_)
    ));

    let mut msg = submit_msg(STRANGER, &circuit_id);
    msg.proof_data = vec![1];
    assert!(matches!(
        k.submit_proof(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidProver(_)
    ));

    let mut msg = submit_msg(BOB, &circuit_id);
    msg.proof_data = vec![1];
    msg.verifier = Some(addr(STRANGER));
    assert!(matches!(
        k.submit_proof(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidVerifier(_)
    ));

    assert!(k.state().proofs().is_empty());
}

#[test]
fn test_unsupported_backend_leaves_proof_pending() {
    let mut k = keeper_with(params_with_fees(10));
    let circuit_id = with_circuit(&mut k);
    let mut msg = submit_msg(BOB, &circuit_id);
    msg.proof_type = ProofType::new("stark").unwrap();
    let proof_id = k.submit_proof(&mut ctx(), msg).unwrap().proof_id;
    let carol_before = balance(&k, CAROL);

    let mut ctx = ctx();
    let err = k.verify_proof(&mut ctx, verify_msg(CAROL, &proof_id)).unwrap_err();
    assert!(matches!(err, RegistryError::ProofVerificationFailed(_)));
    assert_eq!(err.kind(), ErrorKind::Verification);
    assert_eq!(k.state().proof(&proof_id, t0()).unwrap().status, ProofStatus::Pending);
    assert_eq!(balance(&k, CAROL), carol_before);
    assert!(ctx.events.is_empty());
}

#[test]
fn test_malformed_proof_is_backend_error() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let mut msg = submit_msg(BOB, &circuit_id);
    msg.proof_data = vec![1, 2, 3];
    let proof_id = k.submit_proof(&mut ctx(), msg).unwrap().proof_id;
    let err = k.verify_proof(&mut ctx(), verify_msg(CAROL, &proof_id)).unwrap_err();
    assert!(matches!(err, RegistryError::ProofVerificationFailed(_)));
}

#[test]
fn test_expired_proof_cannot_be_verified() {
    let mut k = keeper_with(Params {
        proof_validity_period_secs: 60,
        ..Params::default()
    });
    let circuit_id = with_circuit(&mut k);
    let proof_id = k
        .submit_proof(&mut ctx(), submit_msg(BOB, &circuit_id))
        .unwrap()
        .proof_id;

    let edge = t0().checked_add_secs(60).unwrap();
    assert_eq!(k.state().proof(&proof_id, edge).unwrap().status, ProofStatus::Pending);

    let late = t0().checked_add_secs(61).unwrap();
    let err = k
        .verify_proof(&mut ctx_at(late), verify_msg(CAROL, &proof_id))
        .unwrap_err();
    assert!(matches!(err, RegistryError::ProofExpired(_)));
    assert_eq!(k.state().proof(&proof_id, late).unwrap().status, ProofStatus::Expired);

    let expired = k
        .state()
        .proofs_by_status(ProofStatus::Expired, late, PageRequest::default());
    assert_eq!(expired.total, 1);
    // Stored status is never rewritten by expiry.
    assert_eq!(
        k.state().proofs().get(&proof_id).unwrap().status,
        ProofStatus::Pending
    );
}

#[test]
fn test_zero_validity_period_never_expires() {
    let mut k = keeper_with(Params {
        proof_validity_period_secs: 0,
        ..Params::default()
    });
    let circuit_id = with_circuit(&mut k);
    let proof_id = k
        .submit_proof(&mut ctx(), submit_msg(BOB, &circuit_id))
        .unwrap()
        .proof_id;
    let far = ts("2099-01-01T00:00:00Z");
    assert_eq!(k.state().proof(&proof_id, far).unwrap().valid_to, None);
    k.verify_proof(&mut ctx_at(far), verify_msg(CAROL, &proof_id)).unwrap();
}

#[test]
fn test_proof_queries_by_index() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let mut ctx = ctx();
    k.submit_proof(&mut ctx, submit_msg(BOB, &circuit_id)).unwrap();
    let mut plonk = submit_msg(DAVE, &circuit_id);
    plonk.proof_type = ProofType::new("plonk").unwrap();
    plonk.verifier = Some(addr(CAROL));
    k.submit_proof(&mut ctx, plonk).unwrap();

    let state = k.state();
    assert_eq!(state.proofs_by_prover(&addr(BOB), t0(), PageRequest::default()).total, 1);
    let by_type = ProofFilter {
        proof_type: Some(ProofType::new("plonk").unwrap()),
        ..ProofFilter::default()
    };
    let plonk = state.list_proofs(&by_type, t0(), PageRequest::default());
    assert_eq!(plonk.items[0].prover, addr(DAVE));
    let by_verifier = ProofFilter {
        verifier: Some(addr(CAROL)),
        ..ProofFilter::default()
    };
    assert_eq!(state.list_proofs(&by_verifier, t0(), PageRequest::default()).total, 1);
    let by_circuit = ProofFilter {
        circuit_id: Some(circuit_id),
        ..ProofFilter::default()
    };
    assert_eq!(state.list_proofs(&by_circuit, t0(), PageRequest::default()).total, 2);
}

// ─── Fees ──────────────────────────────────────────────────────────────

#[test]
fn test_fees_move_to_module_account() {
    let mut k = keeper_with(params_with_fees(25));
    let circuit_id = with_circuit(&mut k);
    let proof_id = k
        .submit_proof(&mut ctx(), submit_msg(BOB, &circuit_id))
        .unwrap()
        .proof_id;
    k.verify_proof(&mut ctx(), verify_msg(CAROL, &proof_id)).unwrap();
    k.create_proof_request(&mut ctx(), request_msg(&circuit_id)).unwrap();

    assert_eq!(balance(&k, ALICE), STARTING_BALANCE - 50);
    assert_eq!(balance(&k, BOB), STARTING_BALANCE - 25);
    assert_eq!(balance(&k, CAROL), STARTING_BALANCE - 25);
    assert_eq!(balance(&k, MODULE), 100);
    assert_eq!(k.state().proof(&proof_id, t0()).unwrap().fee_paid, uzkr(25));
}

#[test]
fn test_insufficient_funds_changes_nothing() {
    let mut k = keeper_with(params_with_fees(STARTING_BALANCE + 1));
    let before = k.export_genesis();
    let ledger_before = k.ledger().clone();
    let mut ctx = ctx();
    let err = k.create_circuit(&mut ctx, create_circuit_msg(ALICE)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Economic);
    assert_eq!(k.export_genesis(), before);
    assert_eq!(k.ledger(), &ledger_before);
    assert!(ctx.events.is_empty());
}

#[test]
fn test_offered_fee_below_required_rejected() {
    let mut k = keeper_with(params_with_fees(25));
    let circuit_id = with_circuit(&mut k);
    let mut msg = submit_msg(BOB, &circuit_id);
    msg.fee = Some(uzkr(24));
    let err = k.submit_proof(&mut ctx(), msg).unwrap_err();
    assert!(matches!(err, RegistryError::InsufficientFees(_)));
    assert_eq!(balance(&k, BOB), STARTING_BALANCE);

    // Offering more than required still charges only the required fee.
    let mut msg = submit_msg(BOB, &circuit_id);
    msg.fee = Some(uzkr(100));
    k.submit_proof(&mut ctx(), msg).unwrap();
    assert_eq!(balance(&k, BOB), STARTING_BALANCE - 25);
}

// ─── Proof requests ────────────────────────────────────────────────────

#[test]
fn test_request_with_past_deadline_rejected() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let mut msg = request_msg(&circuit_id);
    msg.deadline = ts("2026-02-28T00:00:00Z");
    let err = k.create_proof_request(&mut ctx(), msg).unwrap_err();
    assert!(matches!(err, RegistryError::ProofRequestExpired(_)));
    assert!(k.state().requests().is_empty());
    assert_eq!(k.state().requests().sequence().count(), 0);
}

#[test]
fn test_request_validation() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);

    let mut msg = request_msg(&circuit_id);
    msg.requester = addr(STRANGER);
    assert!(matches!(
        k.create_proof_request(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidVerifier(_)
    ));

    let mut msg = request_msg(&circuit_id);
    msg.target_prover = addr(STRANGER);
    assert!(matches!(
        k.create_proof_request(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidProver(_)
    ));

    let mut msg = request_msg(&circuit_id);
    msg.challenge = String::new();
    assert_eq!(
        k.create_proof_request(&mut ctx(), msg).unwrap_err().kind(),
        ErrorKind::Validation
    );

    let msg = request_msg(&CircuitId::new("circuit-5").unwrap());
    assert!(matches!(
        k.create_proof_request(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidCircuit(_)
    ));

    let mut msg = request_msg(&circuit_id);
    msg.required_proof_type = ProofType::new("bulletproofs").unwrap();
    assert!(matches!(
        k.create_proof_request(&mut ctx(), msg).unwrap_err(),
        RegistryError::InvalidProofType(_)
    ));
    assert!(k.state().requests().is_empty());
}

#[test]
fn test_request_fulfilled_by_matching_submission() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let request_id = k
        .create_proof_request(&mut ctx(), request_msg(&circuit_id))
        .unwrap()
        .request_id;
    assert_eq!(request_id.as_str(), "request-1");

    let mut ctx = ctx_at(ts("2026-03-05T00:00:00Z"));
    let msg = answer_msg(BOB, &circuit_id, &request_id, "nonce-7f3a");
    let proof_id = k.submit_proof(&mut ctx, msg).unwrap().proof_id;

    let request = k.state().proof_request(&request_id, ctx.time).unwrap();
    assert_eq!(request.status, RequestStatus::Completed);
    assert_eq!(request.proof_id.as_ref(), Some(&proof_id));
    assert_eq!(request.completed_at, Some(ctx.time));
    assert_eq!(
        k.state().proof(&proof_id, ctx.time).unwrap().request_id,
        Some(request_id.clone())
    );
    let completion = ctx
        .events_of(EventKind::CompleteProofRequest)
        .next()
        .unwrap();
    assert_eq!(completion.get("request_id"), Some("request-1"));

    // A completed request cannot be fulfilled twice.
    let again = answer_msg(BOB, &circuit_id, &request_id, "nonce-7f3a");
    let err = k.submit_proof(&mut ctx, again).unwrap_err();
    assert!(matches!(err, RegistryError::ProofRequestNotPending { .. }));
    assert_eq!(k.state().proofs().len(), 1);
    assert!(k.state().check_invariants().is_ok());
}

#[test]
fn test_request_fulfilment_rejections_charge_nothing() {
    let mut k = keeper_with(params_with_fees(10));
    let circuit_id = with_circuit(&mut k);
    let request_id = k
        .create_proof_request(&mut ctx(), request_msg(&circuit_id))
        .unwrap()
        .request_id;
    let before = k.export_genesis();
    let dave_before = balance(&k, DAVE);

    let wrong_prover = answer_msg(DAVE, &circuit_id, &request_id, "nonce-7f3a");
    let err = k.submit_proof(&mut ctx(), wrong_prover).unwrap_err();
    assert!(matches!(err, RegistryError::Unauthorized(_)));
    assert_eq!(balance(&k, DAVE), dave_before);

    let mut missing_input = answer_msg(BOB, &circuit_id, &request_id, "nonce-7f3a");
    missing_input.public_inputs = vec!["21".into(), "nonce-7f3a".into()];
    assert!(matches!(
        k.submit_proof(&mut ctx(), missing_input).unwrap_err(),
        RegistryError::ProofRequestMismatch(_)
    ));

    let wrong_nonce = answer_msg(BOB, &circuit_id, &request_id, "nonce-0000");
    assert!(matches!(
        k.submit_proof(&mut ctx(), wrong_nonce).unwrap_err(),
        RegistryError::ProofRequestMismatch(_)
    ));

    let mut no_nonce = submit_msg(BOB, &circuit_id);
    no_nonce.request_id = Some(request_id.clone());
    assert!(matches!(
        k.submit_proof(&mut ctx(), no_nonce).unwrap_err(),
        RegistryError::ProofRequestMismatch(_)
    ));

    let late = answer_msg(BOB, &circuit_id, &request_id, "nonce-7f3a");
    assert!(matches!(
        k.submit_proof(&mut ctx_at(ts("2026-03-11T00:00:00Z")), late).unwrap_err(),
        RegistryError::ProofRequestExpired(_)
    ));

    let unknown = answer_msg(
        BOB,
        &circuit_id,
        &RequestId::new("request-99").unwrap(),
        "nonce-7f3a",
    );
    assert_eq!(
        k.submit_proof(&mut ctx(), unknown).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    assert_eq!(k.export_genesis(), before);
}

#[test]
fn test_earlier_proof_cannot_answer_later_request() {
    let mut k = keeper_with(params_with_fees(10));
    let circuit_id = with_circuit(&mut k);

    // Bob proved the statement before anyone asked for it.
    let earlier = submit_msg(BOB, &circuit_id);
    let replayed_bytes = earlier.proof_data.clone();
    k.submit_proof(&mut ctx(), earlier).unwrap();

    let request_id = k
        .create_proof_request(&mut ctx(), request_msg(&circuit_id))
        .unwrap()
        .request_id;
    let before = k.export_genesis();
    let bob_before = balance(&k, BOB);

    let mut replay = submit_msg(BOB, &circuit_id);
    replay.proof_data = replayed_bytes;
    replay.request_id = Some(request_id.clone());
    let err = k.submit_proof(&mut ctx(), replay).unwrap_err();
    assert!(matches!(err, RegistryError::ProofRequestMismatch(_)));
    assert!(err.to_string().contains("nonce-7f3a"));

    assert_eq!(k.export_genesis(), before);
    assert_eq!(balance(&k, BOB), bob_before);
    assert_eq!(
        k.state().proof_request(&request_id, t0()).unwrap().status,
        RequestStatus::Pending
    );

    // A fresh proof bound to the challenge still completes it.
    let fresh = answer_msg(BOB, &circuit_id, &request_id, "nonce-7f3a");
    k.submit_proof(&mut ctx(), fresh).unwrap();
    assert_eq!(
        k.state().proof_request(&request_id, t0()).unwrap().status,
        RequestStatus::Completed
    );
}

#[test]
fn test_request_lazily_expires() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let request_id = k
        .create_proof_request(&mut ctx(), request_msg(&circuit_id))
        .unwrap()
        .request_id;
    let after = ts("2026-03-10T00:00:01Z");
    assert_eq!(
        k.state().proof_request(&request_id, after).unwrap().status,
        RequestStatus::Expired
    );
    assert_eq!(
        k.state().requests().get(&request_id).unwrap().status,
        RequestStatus::Pending
    );
}

// ─── Identity ──────────────────────────────────────────────────────────

#[test]
fn test_revoked_verifier_rejected() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    let proof_id = k
        .submit_proof(&mut ctx(), submit_msg(BOB, &circuit_id))
        .unwrap()
        .proof_id;
    k.identities_mut().revoke(&addr(CAROL));
    let err = k.verify_proof(&mut ctx(), verify_msg(CAROL, &proof_id)).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidVerifier(_)));
    assert!(err.to_string().contains("revoked"));
}

#[test]
fn test_verify_unknown_proof_not_found() {
    let mut k = keeper();
    let err = k
        .verify_proof(&mut ctx(), verify_msg(CAROL, &ProofId::new("proof-3").unwrap()))
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidProof(_)));
}

// ─── Params ────────────────────────────────────────────────────────────

#[test]
fn test_set_params_applies_to_later_messages() {
    let mut k = keeper();
    let circuit_id = with_circuit(&mut k);
    k.set_params(params_with_fees(40)).unwrap();
    k.submit_proof(&mut ctx(), submit_msg(BOB, &circuit_id)).unwrap();
    assert_eq!(balance(&k, BOB), STARTING_BALANCE - 40);

    let err = k
        .set_params(Params {
            allowed_proof_types: Default::default(),
            ..Params::default()
        })
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidParams(_)));
    assert_eq!(k.params().proof_submission_fee, uzkr(40));
}
