//! # Invariant Checker
//!
//! A read-only audit over [`RegistryState`]. Each check has a stable route
//! name; the report lists every broken invariant with a human-readable
//! message rather than stopping at the first.
//!
//! Checks compare derived data (counters, secondary indices, denormalised
//! circuit counters) against the primary arenas, plus referential and
//! temporal consistency of the records themselves.

use std::collections::BTreeMap;

use serde::Serialize;

use zkr_core::CircuitId;
use zkr_store::{IndexDiscrepancy, Record, Table};

use crate::circuit::IDX_CIRCUIT_CREATOR;
use crate::proof::{
    IDX_PROOF_CIRCUIT, IDX_PROOF_PROVER, IDX_PROOF_STATUS, IDX_PROOF_TYPE, IDX_PROOF_VERIFIER,
};
use crate::request::{
    RequestStatus, IDX_REQUEST_REQUESTER, IDX_REQUEST_STATUS, IDX_REQUEST_TARGET,
};
use crate::state::RegistryState;

type Check = fn(&RegistryState) -> Vec<String>;

/// Every check, in the order it runs.
const CHECKS: &[(&str, Check)] = &[
    ("circuit-count", |s| sequence_count(&s.circuits)),
    ("proof-count", |s| sequence_count(&s.proofs)),
    ("proof-request-count", |s| sequence_count(&s.requests)),
    ("circuit-creator-index", |s| index(&s.circuits, &[IDX_CIRCUIT_CREATOR])),
    ("proof-prover-index", |s| index(&s.proofs, &[IDX_PROOF_PROVER])),
    ("proof-verifier-index", |s| index(&s.proofs, &[IDX_PROOF_VERIFIER])),
    ("proof-circuit-index", |s| index(&s.proofs, &[IDX_PROOF_CIRCUIT])),
    ("proof-status-index", |s| index(&s.proofs, &[IDX_PROOF_STATUS])),
    ("proof-type-index", |s| index(&s.proofs, &[IDX_PROOF_TYPE])),
    ("circuit-references", circuit_references),
    ("proof-validity-window", proof_validity_window),
    ("proof-request-indices", |s| {
        index(
            &s.requests,
            &[IDX_REQUEST_REQUESTER, IDX_REQUEST_TARGET, IDX_REQUEST_STATUS],
        )
    }),
    ("proof-request-completion", proof_request_completion),
    ("circuit-proof-counters", circuit_proof_counters),
];

/// Route names of every check.
pub fn routes() -> impl Iterator<Item = &'static str> {
    CHECKS.iter().map(|(route, _)| *route)
}

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenInvariant {
    pub route: &'static str,
    pub message: String,
}

impl std::fmt::Display for BrokenInvariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.route, self.message)
    }
}

/// Result of a full invariant pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvariantReport {
    /// Routes that ran.
    pub checked: Vec<&'static str>,
    /// Everything that failed, grouped by route in run order.
    pub broken: Vec<BrokenInvariant>,
}

impl InvariantReport {
    pub fn is_ok(&self) -> bool {
        self.broken.is_empty()
    }

    /// Whether `route` reported at least one break.
    pub fn is_broken(&self, route: &str) -> bool {
        self.broken.iter().any(|b| b.route == route)
    }
}

impl RegistryState {
    /// Run every invariant check.
    pub fn check_invariants(&self) -> InvariantReport {
        let mut report = InvariantReport::default();
        for (route, check) in CHECKS {
            report.checked.push(*route);
            for message in check(self) {
                tracing::warn!(route = *route, %message, "invariant broken");
                report.broken.push(BrokenInvariant {
                    route: *route,
                    message,
                });
            }
        }
        report
    }
}

// ─── Checks ────────────────────────────────────────────────────────────

fn sequence_count<R: Record>(table: &Table<R>) -> Vec<String> {
    let recorded = table.sequence().count();
    let actual = table.len() as u64;
    if recorded == actual {
        Vec::new()
    } else {
        vec![format!(
            "{}: sequence count {recorded} but {actual} records stored",
            R::TABLE
        )]
    }
}

fn index<R: Record>(table: &Table<R>, names: &[&'static str]) -> Vec<String> {
    names
        .iter()
        .flat_map(|&name| table.index_discrepancies(name))
        .map(|d| match d {
            IndexDiscrepancy::Missing { index, value, id } => {
                format!("{}: {id} missing from {index} index under {value:?}", R::TABLE)
            }
            IndexDiscrepancy::Orphan { index, value, id } => {
                format!("{}: orphan {index} index entry {value:?} -> {id}", R::TABLE)
            }
        })
        .collect()
}

fn circuit_references(s: &RegistryState) -> Vec<String> {
    let proofs = s
        .proofs
        .iter()
        .filter(|p| !s.circuits.contains(&p.circuit_id))
        .map(|p| format!("proof {} references missing circuit {}", p.id, p.circuit_id));
    let requests = s
        .requests
        .iter()
        .filter(|r| !s.circuits.contains(&r.circuit_id))
        .map(|r| format!("request {} references missing circuit {}", r.id, r.circuit_id));
    proofs.chain(requests).collect()
}

fn proof_validity_window(s: &RegistryState) -> Vec<String> {
    let mut broken = Vec::new();
    for p in s.proofs.iter() {
        if p.created_at > p.valid_from {
            broken.push(format!(
                "proof {} valid_from {} precedes created_at {}",
                p.id, p.valid_from, p.created_at
            ));
        }
        if let Some(valid_to) = p.valid_to {
            if valid_to < p.valid_from {
                broken.push(format!(
                    "proof {} valid_to {valid_to} precedes valid_from {}",
                    p.id, p.valid_from
                ));
            }
        }
    }
    broken
}

fn proof_request_completion(s: &RegistryState) -> Vec<String> {
    let mut broken = Vec::new();
    for r in s.requests.iter() {
        match (r.status, &r.proof_id) {
            (RequestStatus::Completed, None) => {
                broken.push(format!("request {} is completed without a proof", r.id));
            }
            (RequestStatus::Completed, Some(proof_id)) => match s.proofs.get(proof_id) {
                None => broken.push(format!(
                    "request {} completed by missing proof {proof_id}",
                    r.id
                )),
                Some(proof) if proof.request_id.as_ref() != Some(&r.id) => broken.push(format!(
                    "request {} completed by proof {proof_id} which does not name it",
                    r.id
                )),
                Some(_) => {}
            },
            (status, Some(proof_id)) => broken.push(format!(
                "request {} is {status} but carries proof {proof_id}",
                r.id
            )),
            (_, None) => {}
        }
        if r.status == RequestStatus::Completed && r.completed_at.is_none() {
            broken.push(format!("request {} is completed without completed_at", r.id));
        }
    }
    for p in s.proofs.iter() {
        let Some(request_id) = &p.request_id else {
            continue;
        };
        match s.requests.get(request_id) {
            None => broken.push(format!("proof {} names missing request {request_id}", p.id)),
            Some(r) if r.proof_id.as_ref() != Some(&p.id) => broken.push(format!(
                "proof {} names request {request_id} which it did not complete",
                p.id
            )),
            Some(_) => {}
        }
    }
    broken
}

fn circuit_proof_counters(s: &RegistryState) -> Vec<String> {
    let mut counted: BTreeMap<&CircuitId, (u64, u64)> = BTreeMap::new();
    for p in s.proofs.iter() {
        let entry = counted.entry(&p.circuit_id).or_default();
        entry.0 += 1;
        if p.verification_result.is_some() {
            entry.1 += 1;
        }
    }
    let mut broken = Vec::new();
    for c in s.circuits.iter() {
        let (proofs, verified) = counted.get(&c.id).copied().unwrap_or_default();
        if c.proof_count != proofs {
            broken.push(format!(
                "circuit {} proof_count {} but {proofs} proofs stored",
                c.id, c.proof_count
            ));
        }
        if c.verified_count != verified {
            broken.push(format!(
                "circuit {} verified_count {} but {verified} proofs adjudicated",
                c.id, c.verified_count
            ));
        }
    }
    broken
}
