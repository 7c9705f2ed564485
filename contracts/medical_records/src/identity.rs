use alloc::string::String as StdString;
use soroban_sdk::{contracttype, xdr::ToXdr, Address, Bytes, String};

use crate::codec;
use crate::ContractError;

/// Identity envelope supplied with every transaction.
///
/// The membership service has already parsed `certificate` and attests its
/// subject common name in `common_name`. Only `invoker` is authenticated by
/// the host; the certificate is trusted only together with the invoker it
/// was first pinned with.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SerializedIdentity {
    pub invoker: Address,
    pub common_name: String,
    pub certificate: Bytes,
}

/// The resolved caller of the current transaction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallerIdentity {
    pub common_name: StdString,
    /// Raw certificate bytes as delivered by the host.
    pub certificate: Bytes,
    /// XDR encoding of the authenticated invoker address.
    pub invoker: Bytes,
}

impl CallerIdentity {
    /// True when both the certificate and the invoker match a pinned pair.
    pub fn matches(&self, certificate: &Bytes, invoker: &Bytes) -> bool {
        self.certificate == *certificate && self.invoker == *invoker
    }
}

/// Authenticates the envelope and extracts the caller identity from it.
pub fn resolve(creator: &SerializedIdentity) -> Result<CallerIdentity, ContractError> {
    creator.invoker.require_auth();

    if creator.common_name.is_empty() || creator.certificate.is_empty() {
        return Err(ContractError::IdentityUnavailable);
    }

    let common_name = codec::to_std_string(&creator.common_name)
        .map_err(|_| ContractError::IdentityUnavailable)?;

    Ok(CallerIdentity {
        common_name,
        certificate: creator.certificate.clone(),
        invoker: invoker_bytes(&creator.invoker),
    })
}

/// Stable byte form of an address, used when pinning it in the store.
pub fn invoker_bytes(address: &Address) -> Bytes {
    address.clone().to_xdr(address.env())
}
