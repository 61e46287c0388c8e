//! The signed "full report" bundle returned by Mercury servers.

use std::collections::HashSet;

use alloy_primitives::{hex, keccak256, Address, Bytes, PrimitiveSignature, B256, U256};
use alloy_sol_types::{
    sol_data::{Array, Bytes as SolBytes, FixedArray, FixedBytes},
    SolType,
};
use tracing::trace;

use crate::{
    constants::{MAX_SIGNATURES, REPORT_CONTEXT_WORDS},
    Report, ReportError, ReportSchema, Result,
};

/// ABI layout of a full report: `(bytes32[3], bytes, bytes32[], bytes32[], bytes32)`.
type FullReportAbi = (
    FixedArray<FixedBytes<32>, REPORT_CONTEXT_WORDS>,
    SolBytes,
    Array<FixedBytes<32>>,
    Array<FixedBytes<32>>,
    FixedBytes<32>,
);

/// A report together with the OCR context it was produced in and the oracle signatures over it.
///
/// This is the payload of the `chainlinkBlob` field of the v0.2 API and the `fullReport` field
/// of the v0.3 API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullReport {
    /// Config digest, epoch and round, and an extra hash.
    pub report_context: [B256; REPORT_CONTEXT_WORDS],
    /// The ABI-encoded report.
    pub report_blob: Bytes,
    /// `r` components of the signatures.
    pub raw_rs: Vec<B256>,
    /// `s` components of the signatures.
    pub raw_ss: Vec<B256>,
    /// Recovery ids, one byte per signature.
    pub raw_vs: B256,
}

impl FullReport {
    /// Decodes an ABI-encoded full report.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (report_context, report_blob, raw_rs, raw_ss, raw_vs) =
            FullReportAbi::abi_decode_params(data, true)?;
        Ok(Self { report_context, report_blob, raw_rs, raw_ss, raw_vs })
    }

    /// Decodes a hex-encoded full report, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::decode(&hex::decode(s.trim())?)
    }

    /// ABI-encodes the full report.
    pub fn encode(&self) -> Vec<u8> {
        FullReportAbi::abi_encode_params(&(
            self.report_context,
            self.report_blob.clone(),
            self.raw_rs.clone(),
            self.raw_ss.clone(),
            self.raw_vs,
        ))
    }

    /// Hex-encodes the full report with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(self.encode())
    }

    /// Digest of the OCR configuration that produced the report.
    pub const fn config_digest(&self) -> B256 {
        self.report_context[0]
    }

    /// OCR epoch and round, packed into the low five bytes of the second context word.
    pub fn epoch_and_round(&self) -> (u32, u8) {
        let word = &self.report_context[1];
        let epoch = u32::from_be_bytes([word[27], word[28], word[29], word[30]]);
        (epoch, word[31])
    }

    /// Decodes the embedded report with the given schema.
    pub fn report(&self, schema: ReportSchema) -> Result<Report> {
        Report::decode(schema, &self.report_blob)
    }

    /// Decodes the embedded report, choosing the schema from its feed id.
    pub fn report_auto(&self) -> Result<Report> {
        Report::decode_auto(&self.report_blob)
    }

    /// Hash the oracles sign: `keccak256(keccak256(report) || reportContext)`.
    pub fn signing_hash(&self) -> B256 {
        let mut preimage = Vec::with_capacity(32 * (1 + REPORT_CONTEXT_WORDS));
        preimage.extend_from_slice(keccak256(&self.report_blob).as_slice());
        for word in &self.report_context {
            preimage.extend_from_slice(word.as_slice());
        }
        keccak256(preimage)
    }

    /// Number of signatures attached.
    pub fn signature_count(&self) -> usize {
        self.raw_rs.len()
    }

    /// Recovers the address behind every signature, in signature order.
    pub fn signers(&self) -> Result<Vec<Address>> {
        if self.raw_rs.len() != self.raw_ss.len() {
            return Err(ReportError::SignatureCountMismatch {
                rs: self.raw_rs.len(),
                ss: self.raw_ss.len(),
            });
        }
        if self.raw_rs.len() > MAX_SIGNATURES {
            return Err(ReportError::TooManySignatures(self.raw_rs.len()));
        }

        let hash = self.signing_hash();
        self.raw_rs
            .iter()
            .zip(&self.raw_ss)
            .enumerate()
            .map(|(index, (r, s))| {
                let parity = match self.raw_vs[index] {
                    0 => false,
                    1 => true,
                    v => return Err(ReportError::InvalidParity { index, v }),
                };
                let signature =
                    PrimitiveSignature::new(U256::from_be_bytes(r.0), U256::from_be_bytes(s.0), parity);
                let signer = signature.recover_address_from_prehash(&hash)?;
                trace!(index, %signer, "recovered report signer");
                Ok(signer)
            })
            .collect()
    }

    /// Checks that at least `f + 1` distinct oracles from `allowed` signed the report.
    ///
    /// Returns the recovered signers on success.
    pub fn verify_signers(&self, allowed: &[Address], f: usize) -> Result<Vec<Address>> {
        let signers = self.signers()?;
        let mut seen = HashSet::with_capacity(signers.len());
        for signer in &signers {
            if !allowed.contains(signer) {
                return Err(ReportError::UnauthorizedSigner(*signer));
            }
            if !seen.insert(*signer) {
                return Err(ReportError::DuplicateSigner(*signer));
            }
        }
        if signers.len() <= f {
            return Err(ReportError::InsufficientSignatures { got: signers.len(), need: f + 1 });
        }
        Ok(signers)
    }
}
