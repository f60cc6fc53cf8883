use crate::error::InputError;
use crate::FastMap;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Widest token decimals accepted anywhere in the crate. Keeps every
/// decimal adjustment (`10^38 < 2^127`) inside the fixed-width math.
pub const MAX_TOKEN_DECIMALS: u8 = 38;

/// Returns `decimals` if it is supported.
#[inline]
pub fn check_decimals(decimals: u8) -> Result<u8, InputError> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(InputError::DecimalsOutOfRange(decimals));
    }
    Ok(decimals)
}

/// An ERC-20 token as far as pricing is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub address: Address,
    pub decimals: u8,
}

impl TokenDescriptor {
    pub fn new(address: Address, decimals: u8) -> Result<Self, InputError> {
        Ok(Self {
            address,
            decimals: check_decimals(decimals)?,
        })
    }

    /// The address read as a 160 bit integer, the key pools sort tokens by.
    #[inline]
    pub fn sort_key(&self) -> U256 {
        address_to_u160(self.address)
    }
}

#[inline]
pub fn address_to_u160(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

/// Orders two tokens the way a pool does: `token0` has the lower address.
///
/// Returns `(token0, token1, flipped)` where `flipped` is `true` when `a`
/// ended up as `token1`.
pub fn sort_tokens(
    a: TokenDescriptor,
    b: TokenDescriptor,
) -> (TokenDescriptor, TokenDescriptor, bool) {
    if a.sort_key() <= b.sort_key() {
        (a, b, false)
    } else {
        (b, a, true)
    }
}

/// Address keyed lookup of known token descriptors.
#[derive(Clone, Debug, Default)]
pub struct TokenRegistry {
    tokens: FastMap<Address, TokenDescriptor>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a descriptor, returning the one it replaced.
    pub fn insert(&mut self, token: TokenDescriptor) -> Option<TokenDescriptor> {
        self.tokens.insert(token.address, token)
    }

    #[inline]
    pub fn get(&self, address: &Address) -> Option<&TokenDescriptor> {
        self.tokens.get(address)
    }

    #[inline]
    pub fn decimals(&self, address: &Address) -> Option<u8> {
        self.get(address).map(|token| token.decimals)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<TokenDescriptor> for TokenRegistry {
    fn from_iter<I: IntoIterator<Item = TokenDescriptor>>(iter: I) -> Self {
        let mut registry = Self::new();
        for token in iter {
            registry.insert(token);
        }
        registry
    }
}
