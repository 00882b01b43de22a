//! Shared fixtures for the registry integration tests.

#![allow(dead_code)]

use zkr_core::{Address, CircuitId, CircuitType, Coin, ProofType, Timestamp};
use zkr_registry::{
    BankLedger, BlockContext, IdentityRegistry, InputSpec, Keeper, MsgCreateCircuit,
    MsgSubmitProof, Params,
};
use zkr_zkp::{DigestVerifier, StructuralVerifier, VerifierRegistry};

pub type TestKeeper = Keeper<IdentityRegistry, BankLedger>;

pub const MODULE: &str = "zkr1registrymodule";
pub const ALICE: &str = "zkr1alice";
pub const BOB: &str = "zkr1bob";
pub const CAROL: &str = "zkr1carol";
pub const DAVE: &str = "zkr1dave";
pub const STRANGER: &str = "zkr1stranger";

pub const CIRCUIT_DATA: &[u8] = b"age-circuit-v1";
pub const STARTING_BALANCE: u64 = 1_000;

pub fn addr(s: &str) -> Address {
    Address::new(s).unwrap()
}

pub fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

pub fn t0() -> Timestamp {
    ts("2026-03-01T12:00:00Z")
}

pub fn ctx_at(time: Timestamp) -> BlockContext {
    BlockContext::new(100, time).with_tx_hash("deadbeef")
}

pub fn ctx() -> BlockContext {
    ctx_at(t0())
}

pub fn uzkr(amount: u64) -> Coin {
    Coin::new("uzkr", amount).unwrap()
}

/// Params with every fee set to `fee` uzkr.
pub fn params_with_fees(fee: u64) -> Params {
    Params {
        circuit_creation_fee: uzkr(fee),
        proof_submission_fee: uzkr(fee),
        proof_verification_fee: uzkr(fee),
        proof_request_fee: uzkr(fee),
        ..Params::default()
    }
}

/// Keeper with alice, bob, carol and dave registered and funded.
/// `groth16` is verified by the digest mock, `plonk` structurally, and
/// `stark` has no backend.
pub fn keeper_with(params: Params) -> TestKeeper {
    let mut identities = IdentityRegistry::new();
    let mut ledger = BankLedger::new();
    for who in [ALICE, BOB, CAROL, DAVE] {
        identities.register(addr(who));
        ledger.mint(&addr(who), &uzkr(STARTING_BALANCE)).unwrap();
    }
    let verifiers = VerifierRegistry::new()
        .with(ProofType::new("groth16").unwrap(), DigestVerifier)
        .with(ProofType::new("plonk").unwrap(), StructuralVerifier);
    Keeper::new(addr(MODULE), params, identities, ledger, verifiers).unwrap()
}

pub fn keeper() -> TestKeeper {
    keeper_with(Params::default())
}

pub fn create_circuit_msg(creator: &str) -> MsgCreateCircuit {
    MsgCreateCircuit {
        creator: addr(creator),
        name: "age over 18".into(),
        description: "proves age without revealing birth date".into(),
        circuit_type: CircuitType::new("age-proof").unwrap(),
        supported_proof_types: vec![
            ProofType::new("groth16").unwrap(),
            ProofType::new("plonk").unwrap(),
            ProofType::new("stark").unwrap(),
        ],
        circuit_data: CIRCUIT_DATA.to_vec(),
        parameters: vec![],
        public_input_spec: vec![InputSpec {
            name: "threshold".into(),
            data_type: "u64".into(),
            required: true,
        }],
        private_input_spec: vec![InputSpec {
            name: "birth_date".into(),
            data_type: "date".into(),
            required: true,
        }],
        constraint_count: 1200,
        verification_method: "digest".into(),
        trusted_setup: false,
    }
}

/// A `groth16` submission carrying a proof the digest verifier accepts.
pub fn submit_msg(prover: &str, circuit_id: &CircuitId) -> MsgSubmitProof {
    let public_inputs = vec!["18".to_string()];
    MsgSubmitProof {
        prover: addr(prover),
        verifier: None,
        circuit_id: circuit_id.clone(),
        proof_type: ProofType::new("groth16").unwrap(),
        proof_data: DigestVerifier::prove(circuit_id, CIRCUIT_DATA, &public_inputs),
        public_inputs,
        verification_context: vec![],
        fee: None,
        request_id: None,
        tags: vec!["kyc".into()],
        metadata: Default::default(),
    }
}

/// Create the first circuit as alice and return its id.
pub fn with_circuit(keeper: &mut TestKeeper) -> CircuitId {
    keeper
        .create_circuit(&mut ctx(), create_circuit_msg(ALICE))
        .unwrap()
        .circuit_id
}

pub fn balance(keeper: &TestKeeper, who: &str) -> u64 {
    keeper.ledger().balance(&addr(who), "uzkr").amount
}
