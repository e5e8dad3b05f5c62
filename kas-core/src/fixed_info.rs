//! FixedInfo (OtherInfo) construction, SP 800-56C §4 / SP 800-56A §5.8.2
//!
//! A [`FixedInfoPattern`] names the fields and their order, written as
//! `||`-separated tokens:
//!
//! ```text
//! literal[123456789a]||uPartyInfo||vPartyInfo||l
//! ```
//!
//! [`FixedInfoPattern::build`] is a pure mapping from the pattern, an
//! encoding and a [`FixedInfoParameters`] value to a [`BitString`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use kas_prelude::error::{KasError, Result};
use kas_primitives::BitString;
use std::fmt;
use std::str::FromStr;

/// How the selected fields are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum FixedInfoEncoding {
    /// Fields concatenated in pattern order
    #[default]
    Concatenation,
    /// Each field preceded by its 32-bit big-endian bit length
    ConcatenationWithLengths,
}

/// One token of a FixedInfo pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedInfoField {
    /// Constant bytes, `literal[<hex>]`
    Literal(Vec<u8>),
    /// `ID_U || EphemData_U || DKM nonce_U`
    UPartyInfo,
    /// `ID_V || EphemData_V || DKM nonce_V`
    VPartyInfo,
    /// Caller-supplied context
    Context,
    /// Algorithm identifier
    AlgorithmId,
    /// Caller-supplied label
    Label,
    /// Requested DKM length as a 32-bit big-endian bit count
    L,
    /// Additional entropy bits
    EntropyBits,
    /// Salt
    Salt,
    /// IV
    Iv,
}

impl FixedInfoField {
    fn token(&self) -> String {
        match self {
            FixedInfoField::Literal(bytes) => format!("literal[{}]", hex::encode(bytes)),
            FixedInfoField::UPartyInfo => "uPartyInfo".into(),
            FixedInfoField::VPartyInfo => "vPartyInfo".into(),
            FixedInfoField::Context => "context".into(),
            FixedInfoField::AlgorithmId => "algorithmId".into(),
            FixedInfoField::Label => "label".into(),
            FixedInfoField::L => "l".into(),
            FixedInfoField::EntropyBits => "entropyBits".into(),
            FixedInfoField::Salt => "salt".into(),
            FixedInfoField::Iv => "iv".into(),
        }
    }
}

impl FromStr for FixedInfoField {
    type Err = KasError;

    fn from_str(token: &str) -> Result<Self> {
        let token = token.trim();
        if let Some(inner) = token.strip_prefix("literal[").and_then(|t| t.strip_suffix(']')) {
            if inner.is_empty() {
                return Err(KasError::config("empty literal in FixedInfo pattern"));
            }
            return Ok(FixedInfoField::Literal(hex::decode(inner)?));
        }
        // Length annotations such as `entropyBits[96]` carry no encoding information.
        let name = match token.split_once('[') {
            Some((name, size)) => {
                let digits = size.strip_suffix(']').unwrap_or_default();
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(KasError::config(format!("malformed FixedInfo token `{}`", token)));
                }
                name
            }
            None => token,
        };
        match name {
            "uPartyInfo" => Ok(FixedInfoField::UPartyInfo),
            "vPartyInfo" => Ok(FixedInfoField::VPartyInfo),
            "context" => Ok(FixedInfoField::Context),
            "algorithmId" => Ok(FixedInfoField::AlgorithmId),
            "label" => Ok(FixedInfoField::Label),
            "l" => Ok(FixedInfoField::L),
            "entropyBits" => Ok(FixedInfoField::EntropyBits),
            "salt" => Ok(FixedInfoField::Salt),
            "iv" => Ok(FixedInfoField::Iv),
            other => Err(KasError::config(format!("unknown FixedInfo token `{}`", other))),
        }
    }
}

/// Ordered list of FixedInfo fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedInfoPattern {
    fields: Vec<FixedInfoField>,
}

impl FixedInfoPattern {
    /// A pattern from explicit fields.
    ///
    /// # Errors
    /// Returns a configuration error for an empty pattern.
    pub fn new(fields: Vec<FixedInfoField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(KasError::config("FixedInfo pattern has no fields"));
        }
        Ok(Self { fields })
    }

    /// Parse `token||token||...`.
    ///
    /// # Errors
    /// Returns a configuration error for an unknown or empty token.
    pub fn parse(pattern: &str) -> Result<Self> {
        let fields = pattern
            .split("||")
            .map(FixedInfoField::from_str)
            .collect::<Result<Vec<_>>>()?;
        Self::new(fields)
    }

    /// The fields, in order
    #[must_use]
    pub fn fields(&self) -> &[FixedInfoField] {
        &self.fields
    }

    /// Whether the pattern references `field`.
    #[must_use]
    pub fn contains(&self, field: &FixedInfoField) -> bool {
        self.fields.contains(field)
    }

    /// Encode `params` according to this pattern.
    ///
    /// # Errors
    /// Returns a configuration error when a referenced field has no value,
    /// or when a field is too long for a 32-bit length prefix.
    pub fn build(
        &self,
        encoding: FixedInfoEncoding,
        params: &FixedInfoParameters,
    ) -> Result<BitString> {
        let mut out = BitString::new();
        for field in &self.fields {
            let value = params.value_of(field)?;
            if encoding == FixedInfoEncoding::ConcatenationWithLengths {
                let len = u32::try_from(value.len())
                    .map_err(|_| KasError::config("FixedInfo field exceeds 2^32 bits"))?;
                out.append(&BitString::from_u32(len, 32)?);
            }
            out.append(&value);
        }
        Ok(out)
    }
}

impl Default for FixedInfoPattern {
    /// `uPartyInfo||vPartyInfo`
    fn default() -> Self {
        Self { fields: vec![FixedInfoField::UPartyInfo, FixedInfoField::VPartyInfo] }
    }
}

impl FromStr for FixedInfoPattern {
    type Err = KasError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FixedInfoPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.fields.iter().map(FixedInfoField::token).collect();
        f.write_str(&tokens.join("||"))
    }
}

/// Field values for one FixedInfo encoding.
///
/// The orchestrator fills `u_party_info`, `v_party_info` and `l` from the key
/// material and configuration; callers supply the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedInfoParameters {
    /// Algorithm identifier
    pub algorithm_id: Option<BitString>,
    /// Context
    pub context: Option<BitString>,
    /// Label
    pub label: Option<BitString>,
    /// Entropy bits
    pub entropy_bits: Option<BitString>,
    /// Salt
    pub salt: Option<BitString>,
    /// IV
    pub iv: Option<BitString>,
    /// Party U information
    pub u_party_info: Option<BitString>,
    /// Party V information
    pub v_party_info: Option<BitString>,
    /// Requested DKM length in bits
    pub l: Option<usize>,
}

impl FixedInfoParameters {
    /// Empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the algorithm identifier.
    #[must_use]
    pub fn with_algorithm_id(mut self, value: &[u8]) -> Self {
        self.algorithm_id = Some(BitString::from_bytes(value));
        self
    }

    /// Set the context.
    #[must_use]
    pub fn with_context(mut self, value: &[u8]) -> Self {
        self.context = Some(BitString::from_bytes(value));
        self
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, value: &[u8]) -> Self {
        self.label = Some(BitString::from_bytes(value));
        self
    }

    /// Set the entropy bits.
    #[must_use]
    pub fn with_entropy_bits(mut self, value: BitString) -> Self {
        self.entropy_bits = Some(value);
        self
    }

    /// Set the salt.
    #[must_use]
    pub fn with_salt(mut self, value: &[u8]) -> Self {
        self.salt = Some(BitString::from_bytes(value));
        self
    }

    /// Set the IV.
    #[must_use]
    pub fn with_iv(mut self, value: &[u8]) -> Self {
        self.iv = Some(BitString::from_bytes(value));
        self
    }

    /// Set both PartyInfo values.
    #[must_use]
    pub fn with_party_info(mut self, u: &[u8], v: &[u8]) -> Self {
        self.u_party_info = Some(BitString::from_bytes(u));
        self.v_party_info = Some(BitString::from_bytes(v));
        self
    }

    /// Set the requested length in bits.
    #[must_use]
    pub fn with_l(mut self, l: usize) -> Self {
        self.l = Some(l);
        self
    }

    fn value_of(&self, field: &FixedInfoField) -> Result<BitString> {
        let missing = || KasError::config(format!("FixedInfo field `{}` has no value", field.token()));
        let pick = |v: &Option<BitString>| v.clone().ok_or_else(missing);
        match field {
            FixedInfoField::Literal(bytes) => Ok(BitString::from_bytes(bytes)),
            FixedInfoField::UPartyInfo => pick(&self.u_party_info),
            FixedInfoField::VPartyInfo => pick(&self.v_party_info),
            FixedInfoField::Context => pick(&self.context),
            FixedInfoField::AlgorithmId => pick(&self.algorithm_id),
            FixedInfoField::Label => pick(&self.label),
            FixedInfoField::EntropyBits => pick(&self.entropy_bits),
            FixedInfoField::Salt => pick(&self.salt),
            FixedInfoField::Iv => pick(&self.iv),
            FixedInfoField::L => {
                let l = self.l.ok_or_else(missing)?;
                let l = u32::try_from(l).map_err(|_| KasError::config("L exceeds 2^32 - 1"))?;
                BitString::from_u32(l, 32)
            }
        }
    }
}
