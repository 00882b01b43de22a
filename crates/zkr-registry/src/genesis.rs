//! # Genesis Import / Export
//!
//! The registry's full state as one JSON document: params, the three
//! entity lists, and per-table counters. Secondary indices are never part
//! of genesis; import rebuilds them from the records.
//!
//! Import validates the whole document before touching state. Export
//! enumerates each table in id order, so `export → import → export` is a
//! byte-identical round trip and [`GenesisState::digest`] is stable across
//! replicas.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use zkr_core::{sha256_digest, CanonicalBytes, CircuitId, ContentDigest, ProofId, RequestId};
use zkr_store::{Sequence, Table};

use crate::circuit::Circuit;
use crate::error::RegistryError;
use crate::params::Params;
use crate::proof::ZkProof;
use crate::request::{ProofRequest, RequestStatus};
use crate::state::RegistryState;

/// Serialized registry state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub circuits: Vec<Circuit>,
    #[serde(default)]
    pub proofs: Vec<ZkProof>,
    #[serde(default)]
    pub proof_requests: Vec<ProofRequest>,
    #[serde(default)]
    pub circuit_count: u64,
    #[serde(default)]
    pub proof_count: u64,
    #[serde(default)]
    pub proof_request_count: u64,
    /// Highest circuit sequence number issued.
    #[serde(default)]
    pub last_circuit_id: u64,
    /// Highest proof sequence number issued.
    #[serde(default)]
    pub last_proof_id: u64,
    /// Highest request sequence number issued.
    #[serde(default)]
    pub last_request_id: u64,
}

impl GenesisState {
    /// Parse a genesis document from JSON. Does not validate.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(json).map_err(|e| RegistryError::InvalidGenesis(e.to_string()))
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(self).map_err(|e| RegistryError::InvalidGenesis(e.to_string()))
    }

    /// SHA-256 over the JCS canonical form.
    pub fn digest(&self) -> Result<ContentDigest, RegistryError> {
        let canonical = CanonicalBytes::new(self)
            .map_err(|e| RegistryError::InvalidGenesis(format!("canonicalization: {e}")))?;
        Ok(sha256_digest(&canonical))
    }

    /// Check the document is internally consistent.
    pub fn validate(&self) -> Result<(), RegistryError> {
        self.params
            .validate()
            .map_err(|e| invalid(format!("params: {e}")))?;

        let circuit_ids = unique_ids("circuit", self.circuits.iter().map(|c| &c.id))?;
        unique_ids("proof", self.proofs.iter().map(|p| &p.id))?;
        unique_ids("proof request", self.proof_requests.iter().map(|r| &r.id))?;
        let proofs: BTreeMap<&ProofId, &ZkProof> =
            self.proofs.iter().map(|p| (&p.id, p)).collect();
        let requests: BTreeMap<&RequestId, &ProofRequest> =
            self.proof_requests.iter().map(|r| (&r.id, r)).collect();

        check_count("circuit_count", self.circuit_count, self.circuits.len())?;
        check_count("proof_count", self.proof_count, self.proofs.len())?;
        check_count(
            "proof_request_count",
            self.proof_request_count,
            self.proof_requests.len(),
        )?;

        check_last_id(
            "last_circuit_id",
            self.last_circuit_id,
            "circuit-",
            self.circuits.iter().map(|c| c.id.as_str()),
        )?;
        check_last_id(
            "last_proof_id",
            self.last_proof_id,
            "proof-",
            self.proofs.iter().map(|p| p.id.as_str()),
        )?;
        check_last_id(
            "last_request_id",
            self.last_request_id,
            "request-",
            self.proof_requests.iter().map(|r| r.id.as_str()),
        )?;

        for c in &self.circuits {
            if c.version == 0 {
                return Err(invalid(format!("circuit {} has version 0", c.id)));
            }
            if c.updated_at < c.created_at {
                return Err(invalid(format!("circuit {} updated before created", c.id)));
            }
        }

        let mut counters: BTreeMap<&CircuitId, (u64, u64)> = BTreeMap::new();
        for p in &self.proofs {
            if !circuit_ids.contains(&p.circuit_id) {
                return Err(invalid(format!(
                    "proof {} references missing circuit {}",
                    p.id, p.circuit_id
                )));
            }
            if p.created_at > p.valid_from {
                return Err(invalid(format!("proof {} valid before it was created", p.id)));
            }
            if p.valid_to.is_some_and(|to| to < p.valid_from) {
                return Err(invalid(format!("proof {} valid_to precedes valid_from", p.id)));
            }
            if let Some(request_id) = &p.request_id {
                let completed_by_p = requests
                    .get(request_id)
                    .is_some_and(|r| r.proof_id.as_ref() == Some(&p.id));
                if !completed_by_p {
                    return Err(invalid(format!(
                        "proof {} names request {request_id}, which it did not complete",
                        p.id
                    )));
                }
            }
            let entry = counters.entry(&p.circuit_id).or_default();
            entry.0 += 1;
            if p.verification_result.is_some() {
                entry.1 += 1;
            }
        }
        for c in &self.circuits {
            let (proofs, verified) = counters.get(&c.id).copied().unwrap_or_default();
            if c.proof_count != proofs || c.verified_count != verified {
                return Err(invalid(format!(
                    "circuit {} counters ({}, {}) disagree with stored proofs \
                     ({proofs}, {verified})",
                    c.id, c.proof_count, c.verified_count
                )));
            }
        }

        for r in &self.proof_requests {
            if !circuit_ids.contains(&r.circuit_id) {
                return Err(invalid(format!(
                    "request {} references missing circuit {}",
                    r.id, r.circuit_id
                )));
            }
            if r.deadline < r.created_at {
                return Err(invalid(format!("request {} deadline precedes creation", r.id)));
            }
            if r.status == RequestStatus::Completed {
                let resolved = r.proof_id.as_ref().and_then(|id| proofs.get(id));
                if resolved.is_none() || r.completed_at.is_none() {
                    return Err(invalid(format!(
                        "completed request {} lacks a resolvable proof or completion time",
                        r.id
                    )));
                }
                if resolved.is_some_and(|p| p.request_id.as_ref() != Some(&r.id)) {
                    return Err(invalid(format!(
                        "completed request {} names a proof that does not name it",
                        r.id
                    )));
                }
            } else if let Some(proof_id) = &r.proof_id {
                return Err(invalid(format!(
                    "request {} is {} but carries proof {proof_id}",
                    r.id, r.status
                )));
            }
        }
        Ok(())
    }
}

impl RegistryState {
    /// Validate `genesis` and build state from it, rebuilding every index.
    pub fn from_genesis(genesis: &GenesisState) -> Result<Self, RegistryError> {
        genesis.validate().map_err(|e| {
            tracing::warn!(error = %e, "genesis rejected");
            e
        })?;
        let mut state = RegistryState::new(genesis.params.clone());
        state.circuits = restored(
            genesis.circuits.clone(),
            Sequence::restore(genesis.last_circuit_id, genesis.circuit_count),
        )?;
        state.proofs = restored(
            genesis.proofs.clone(),
            Sequence::restore(genesis.last_proof_id, genesis.proof_count),
        )?;
        state.requests = restored(
            genesis.proof_requests.clone(),
            Sequence::restore(genesis.last_request_id, genesis.proof_request_count),
        )?;
        Ok(state)
    }

    /// Export every table in id order, with counters.
    pub fn export_genesis(&self) -> GenesisState {
        let circuits = self.circuits.sequence();
        let proofs = self.proofs.sequence();
        let requests = self.requests.sequence();
        GenesisState {
            params: self.params.clone(),
            circuits: self.circuits.iter().cloned().collect(),
            proofs: self.proofs.iter().cloned().collect(),
            proof_requests: self.requests.iter().cloned().collect(),
            circuit_count: circuits.count(),
            proof_count: proofs.count(),
            proof_request_count: requests.count(),
            last_circuit_id: circuits.last(),
            last_proof_id: proofs.last(),
            last_request_id: requests.last(),
        }
    }
}

fn restored<R: zkr_store::Record>(
    records: Vec<R>,
    sequence: Sequence,
) -> Result<Table<R>, RegistryError> {
    let mut table = Table::new();
    table.restore(records, sequence)?;
    Ok(table)
}

fn invalid(msg: String) -> RegistryError {
    RegistryError::InvalidGenesis(msg)
}

fn unique_ids<'a, T: Ord + Display + 'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a T>,
) -> Result<BTreeSet<&'a T>, RegistryError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(invalid(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(seen)
}

fn check_count(field: &str, declared: u64, actual: usize) -> Result<(), RegistryError> {
    if declared != actual as u64 {
        return Err(invalid(format!("{field} is {declared} but {actual} records present")));
    }
    Ok(())
}

/// Ids of the form `<prefix>N` must have `N <= last` so the sequence never
/// reissues them.
fn check_last_id<'a>(
    field: &str,
    last: u64,
    prefix: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), RegistryError> {
    for id in ids {
        if let Some(n) = id.strip_prefix(prefix).and_then(|n| n.parse::<u64>().ok()) {
            if n > last {
                return Err(invalid(format!("{field} is {last} but {id} exists")));
            }
        }
    }
    Ok(())
}
