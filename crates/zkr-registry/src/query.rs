//! # Query Façade
//!
//! Read-only lookups over [`RegistryState`]. Every list query is served
//! from a secondary index where one applies and returns a [`Page`].
//!
//! ## Lazy expiry
//!
//! Queries take the caller's block time. Proofs and requests are returned
//! with their *effective* status at that time, and status filters match on
//! the effective status: asking for `expired` proofs also scans the
//! `pending` and `valid` index buckets for proofs whose window has closed.

use serde::{Deserialize, Serialize};

use zkr_core::{Address, CircuitId, ProofId, ProofType, RequestId, Timestamp};

use crate::circuit::{Circuit, IDX_CIRCUIT_CREATOR};
use crate::error::RegistryError;
use crate::proof::{
    ProofStatus, ZkProof, IDX_PROOF_CIRCUIT, IDX_PROOF_PROVER, IDX_PROOF_STATUS, IDX_PROOF_TYPE,
    IDX_PROOF_VERIFIER,
};
use crate::request::{
    ProofRequest, RequestStatus, IDX_REQUEST_REQUESTER, IDX_REQUEST_STATUS, IDX_REQUEST_TARGET,
};
use crate::state::RegistryState;

/// Page size used when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: usize = 100;
/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: usize = 1000;

// ─── Pagination ────────────────────────────────────────────────────────

/// Offset/limit pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    /// The limit actually applied, clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    fn apply<T>(&self, items: impl Iterator<Item = T>) -> Page<T> {
        let limit = self.effective_limit();
        let mut page = Page {
            items: Vec::new(),
            total: 0,
        };
        for (i, item) in items.enumerate() {
            page.total += 1;
            if i >= self.offset && page.items.len() < limit {
                page.items.push(item);
            }
        }
        page
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

// ─── Filters ───────────────────────────────────────────────────────────

/// Proof list filter. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofFilter {
    #[serde(default)]
    pub prover: Option<Address>,
    #[serde(default)]
    pub verifier: Option<Address>,
    #[serde(default)]
    pub circuit_id: Option<CircuitId>,
    #[serde(default)]
    pub proof_type: Option<ProofType>,
    /// Matched against the effective status.
    #[serde(default)]
    pub status: Option<ProofStatus>,
}

impl ProofFilter {
    fn matches(&self, proof: &ZkProof, now: Timestamp) -> bool {
        self.prover.as_ref().map_or(true, |p| &proof.prover == p)
            && self
                .verifier
                .as_ref()
                .map_or(true, |v| proof.verifier.as_ref() == Some(v))
            && self.circuit_id.as_ref().map_or(true, |c| &proof.circuit_id == c)
            && self.proof_type.as_ref().map_or(true, |t| &proof.proof_type == t)
            && self.status.map_or(true, |s| proof.effective_status(now) == s)
    }
}

/// Proof request list filter. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFilter {
    #[serde(default)]
    pub requester: Option<Address>,
    #[serde(default)]
    pub target_prover: Option<Address>,
    /// Matched against the effective status.
    #[serde(default)]
    pub status: Option<RequestStatus>,
}

impl RequestFilter {
    fn matches(&self, request: &ProofRequest, now: Timestamp) -> bool {
        self.requester.as_ref().map_or(true, |r| &request.requester == r)
            && self
                .target_prover
                .as_ref()
                .map_or(true, |t| &request.target_prover == t)
            && self.status.map_or(true, |s| request.effective_status(now) == s)
    }
}

// ─── Statistics ────────────────────────────────────────────────────────

/// Per-circuit proof statistics, aggregated at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitStats {
    pub circuit_id: CircuitId,
    pub total_proofs: u64,
    pub pending_proofs: u64,
    pub valid_proofs: u64,
    pub invalid_proofs: u64,
    pub expired_proofs: u64,
    /// `valid / total * 100`, or 0 with no proofs.
    pub success_rate: f64,
}

// ─── Queries ───────────────────────────────────────────────────────────

impl RegistryState {
    /// Circuit by id.
    pub fn circuit(&self, id: &CircuitId) -> Result<&Circuit, RegistryError> {
        self.circuits
            .get(id)
            .ok_or_else(|| RegistryError::InvalidCircuit(id.to_string()))
    }

    /// All circuits, or those of one creator.
    pub fn list_circuits(&self, creator: Option<&Address>, page: PageRequest) -> Page<Circuit> {
        let found = match creator {
            Some(creator) => page.apply(self.circuits.scan(IDX_CIRCUIT_CREATOR, creator.as_str())),
            None => page.apply(self.circuits.iter()),
        };
        found.map(Circuit::clone)
    }

    /// Proof by id, with its effective status at `now`.
    pub fn proof(&self, id: &ProofId, now: Timestamp) -> Result<ZkProof, RegistryError> {
        self.proofs
            .get(id)
            .map(|p| p.observed_at(now))
            .ok_or_else(|| RegistryError::InvalidProof(id.to_string()))
    }

    /// Proofs matching `filter`, in id order.
    ///
    /// The most selective index named by the filter drives the scan; the
    /// remaining fields are checked on each candidate.
    pub fn list_proofs(
        &self,
        filter: &ProofFilter,
        now: Timestamp,
        page: PageRequest,
    ) -> Page<ZkProof> {
        let candidates: Vec<&ZkProof> = if let Some(prover) = &filter.prover {
            self.proofs.scan(IDX_PROOF_PROVER, prover.as_str()).collect()
        } else if let Some(verifier) = &filter.verifier {
            self.proofs.scan(IDX_PROOF_VERIFIER, verifier.as_str()).collect()
        } else if let Some(circuit_id) = &filter.circuit_id {
            self.proofs.scan(IDX_PROOF_CIRCUIT, circuit_id.as_str()).collect()
        } else if let Some(proof_type) = &filter.proof_type {
            self.proofs.scan(IDX_PROOF_TYPE, proof_type.as_str()).collect()
        } else if let Some(status) = filter.status {
            self.proofs_in_status_buckets(status)
        } else {
            self.proofs.iter().collect()
        };
        page
            .apply(candidates.into_iter().filter(|p| filter.matches(p, now)))
            .map(|p| p.observed_at(now))
    }

    /// Proofs submitted by `prover`.
    pub fn proofs_by_prover(
        &self,
        prover: &Address,
        now: Timestamp,
        page: PageRequest,
    ) -> Page<ZkProof> {
        let filter = ProofFilter {
            prover: Some(prover.clone()),
            ..ProofFilter::default()
        };
        self.list_proofs(&filter, now, page)
    }

    /// Proofs whose effective status at `now` is `status`.
    pub fn proofs_by_status(
        &self,
        status: ProofStatus,
        now: Timestamp,
        page: PageRequest,
    ) -> Page<ZkProof> {
        let filter = ProofFilter {
            status: Some(status),
            ..ProofFilter::default()
        };
        self.list_proofs(&filter, now, page)
    }

    /// Proof request by id, with its effective status at `now`.
    pub fn proof_request(
        &self,
        id: &RequestId,
        now: Timestamp,
    ) -> Result<ProofRequest, RegistryError> {
        self.requests
            .get(id)
            .map(|r| r.observed_at(now))
            .ok_or_else(|| RegistryError::InvalidProofRequest(id.to_string()))
    }

    /// Proof requests matching `filter`, in id order.
    pub fn list_proof_requests(
        &self,
        filter: &RequestFilter,
        now: Timestamp,
        page: PageRequest,
    ) -> Page<ProofRequest> {
        let candidates: Vec<&ProofRequest> = if let Some(requester) = &filter.requester {
            self.requests.scan(IDX_REQUEST_REQUESTER, requester.as_str()).collect()
        } else if let Some(target) = &filter.target_prover {
            self.requests.scan(IDX_REQUEST_TARGET, target.as_str()).collect()
        } else if let Some(status) = filter.status {
            let mut found: Vec<&ProofRequest> = self
                .requests
                .scan(IDX_REQUEST_STATUS, status.as_str())
                .collect();
            if status == RequestStatus::Expired {
                let pending = RequestStatus::Pending.as_str();
                found.extend(self.requests.scan(IDX_REQUEST_STATUS, pending));
                found.sort_by(|a, b| a.id.cmp(&b.id));
            }
            found
        } else {
            self.requests.iter().collect()
        };
        page
            .apply(candidates.into_iter().filter(|r| filter.matches(r, now)))
            .map(|r| r.observed_at(now))
    }

    /// Aggregate proof counts for one circuit, by effective status at `now`.
    pub fn circuit_stats(
        &self,
        id: &CircuitId,
        now: Timestamp,
    ) -> Result<CircuitStats, RegistryError> {
        self.circuit(id)?;
        let mut stats = CircuitStats {
            circuit_id: id.clone(),
            total_proofs: 0,
            pending_proofs: 0,
            valid_proofs: 0,
            invalid_proofs: 0,
            expired_proofs: 0,
            success_rate: 0.0,
        };
        for proof in self.proofs.scan(IDX_PROOF_CIRCUIT, id.as_str()) {
            stats.total_proofs += 1;
            match proof.effective_status(now) {
                ProofStatus::Pending => stats.pending_proofs += 1,
                ProofStatus::Valid => stats.valid_proofs += 1,
                ProofStatus::Invalid => stats.invalid_proofs += 1,
                ProofStatus::Expired => stats.expired_proofs += 1,
            }
        }
        if stats.total_proofs > 0 {
            stats.success_rate = stats.valid_proofs as f64 / stats.total_proofs as f64 * 100.0;
        }
        Ok(stats)
    }

    /// Stored-status buckets that can hold proofs of effective `status`.
    fn proofs_in_status_buckets(&self, status: ProofStatus) -> Vec<&ZkProof> {
        let mut found: Vec<&ZkProof> =
            self.proofs.scan(IDX_PROOF_STATUS, status.as_str()).collect();
        if status == ProofStatus::Expired {
            for bucket in [ProofStatus::Pending, ProofStatus::Valid] {
                found.extend(self.proofs.scan(IDX_PROOF_STATUS, bucket.as_str()));
            }
            found.sort_by(|a, b| a.id.cmp(&b.id));
        }
        found
    }
}
