//! Binary framing of salts and sealed blocks.
//!
//! # Format
//! ```text
//! salt_a(16) || salt_b(16) || len(block)(4, BE) || block || len(block)(4, BE) || block
//! block = identifier(9) || nonce(12) || ciphertext(variable) || tag(16)
//! ```

use dualpass_common::{Error, Result, Slot};
use dualpass_crypto::{Nonce, Salt, Sealed, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// Length of a block identifier.
pub const IDENTIFIER_LEN: usize = 9;

/// Identifier of the block sealed for slot A.
pub const IDENTIFIER_A: [u8; IDENTIFIER_LEN] = *b"PWA_BLOCK";

/// Identifier of the block sealed for slot B.
pub const IDENTIFIER_B: [u8; IDENTIFIER_LEN] = *b"PWB_BLOCK";

/// Size of a block length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Smallest valid block: empty ciphertext.
pub const MIN_BLOCK_SIZE: usize = IDENTIFIER_LEN + NONCE_SIZE + TAG_SIZE;

/// Size of the two leading salts.
pub const SALTS_SIZE: usize = SALT_SIZE * 2;

/// Largest block a 4-byte length prefix can describe.
pub const MAX_BLOCK_SIZE: usize = u32::MAX as usize;

/// Number of blocks a well-formed payload may carry at most.
pub const MAX_BLOCKS: usize = 2;

/// Identifier bytes bound to a slot.
pub fn identifier_for(slot: Slot) -> [u8; IDENTIFIER_LEN] {
    match slot {
        Slot::A => IDENTIFIER_A,
        Slot::B => IDENTIFIER_B,
    }
}

/// One password's sealed copy of the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    identifier: [u8; IDENTIFIER_LEN],
    nonce: Nonce,
    ciphertext: Vec<u8>,
    tag: [u8; TAG_SIZE],
}

impl Block {
    /// Build the block for `slot` from sealed output.
    pub fn new(slot: Slot, nonce: Nonce, sealed: Sealed) -> Self {
        Self {
            identifier: identifier_for(slot),
            nonce,
            ciphertext: sealed.ciphertext,
            tag: sealed.tag,
        }
    }

    /// The slot named by this block's identifier, if it is a known one.
    pub fn slot(&self) -> Option<Slot> {
        match self.identifier {
            IDENTIFIER_A => Some(Slot::A),
            IDENTIFIER_B => Some(Slot::B),
            _ => None,
        }
    }

    /// Raw identifier bytes.
    pub fn identifier(&self) -> &[u8; IDENTIFIER_LEN] {
        &self.identifier
    }

    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn tag(&self) -> &[u8; TAG_SIZE] {
        &self.tag
    }

    /// Serialized length of this block, without its length prefix.
    pub fn encoded_len(&self) -> usize {
        MIN_BLOCK_SIZE + self.ciphertext.len()
    }

    /// Append the serialized block to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.identifier);
        out.extend_from_slice(self.nonce.as_bytes());
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
    }

    /// Parse a single block body.
    ///
    /// # Errors
    /// - Returns `Error::Framing` if `bytes` is shorter than [`MIN_BLOCK_SIZE`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_BLOCK_SIZE {
            return Err(Error::Framing(format!(
                "Block too short: expected at least {} bytes, got {}",
                MIN_BLOCK_SIZE,
                bytes.len()
            )));
        }

        let (identifier, rest) = bytes.split_at(IDENTIFIER_LEN);
        let (nonce, rest) = rest.split_at(NONCE_SIZE);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_SIZE);

        Ok(Self {
            identifier: to_array(identifier),
            nonce: Nonce::from_bytes(to_array(nonce)),
            ciphertext: ciphertext.to_vec(),
            tag: to_array(tag),
        })
    }
}

/// Salts and blocks carried by one encrypted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub salt_a: Salt,
    pub salt_b: Salt,
    pub blocks: Vec<Block>,
}

impl Payload {
    /// Assemble a payload from two blocks in storage order.
    pub fn new(salt_a: Salt, salt_b: Salt, blocks: [Block; 2]) -> Self {
        Self {
            salt_a,
            salt_b,
            blocks: blocks.into(),
        }
    }

    /// The salt bound to `slot`.
    pub fn salt_for(&self, slot: Slot) -> &Salt {
        match slot {
            Slot::A => &self.salt_a,
            Slot::B => &self.salt_b,
        }
    }

    /// Serialize to the wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let body: usize = self
            .blocks
            .iter()
            .map(|b| LENGTH_PREFIX_SIZE + b.encoded_len())
            .sum();

        let mut out = Vec::with_capacity(SALTS_SIZE + body);
        out.extend_from_slice(self.salt_a.as_bytes());
        out.extend_from_slice(self.salt_b.as_bytes());
        for block in &self.blocks {
            // Blocks above MAX_BLOCK_SIZE are refused before sealing.
            out.extend_from_slice(&(block.encoded_len() as u32).to_be_bytes());
            block.write_to(&mut out);
        }
        out
    }

    /// Parse the wire format.
    ///
    /// Blocks are read until the input is exhausted.
    ///
    /// # Errors
    /// - Returns `Error::Framing` if the salt section is shorter than 32 bytes,
    ///   a length prefix is truncated or exceeds the remaining input, a block is
    ///   too short, or the block count is zero or above two
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SALTS_SIZE {
            return Err(Error::Framing(format!(
                "Salt section too short: expected {} bytes, got {}",
                SALTS_SIZE,
                bytes.len()
            )));
        }

        let (salts, mut rest) = bytes.split_at(SALTS_SIZE);
        let (salt_a, salt_b) = salts.split_at(SALT_SIZE);

        let mut blocks = Vec::with_capacity(MAX_BLOCKS);
        while !rest.is_empty() {
            if blocks.len() == MAX_BLOCKS {
                return Err(Error::Framing(format!(
                    "Too many blocks: at most {} allowed",
                    MAX_BLOCKS
                )));
            }
            if rest.len() < LENGTH_PREFIX_SIZE {
                return Err(Error::Framing(format!(
                    "Truncated length prefix: {} trailing bytes",
                    rest.len()
                )));
            }

            let (prefix, tail) = rest.split_at(LENGTH_PREFIX_SIZE);
            let len = u32::from_be_bytes(to_array(prefix)) as usize;
            if len > tail.len() {
                return Err(Error::Framing(format!(
                    "Block length {} exceeds remaining {} bytes",
                    len,
                    tail.len()
                )));
            }

            let (body, tail) = tail.split_at(len);
            blocks.push(Block::from_bytes(body)?);
            rest = tail;
        }

        if blocks.is_empty() {
            return Err(Error::Framing("Payload contains no blocks".to_string()));
        }

        Ok(Self {
            salt_a: Salt::from_bytes(to_array(salt_a)),
            salt_b: Salt::from_bytes(to_array(salt_b)),
            blocks,
        })
    }
}

/// Copy a slice whose length was already checked into a fixed array.
fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
